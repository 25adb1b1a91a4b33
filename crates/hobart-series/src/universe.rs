//! Cross-sectional alignment of per-symbol series into an asset universe.

use crate::error::{Result, SeriesError};
use crate::price::PriceSeries;
use crate::returns::{ReturnMethod, ReturnSeries};
use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Policy for symbols with missing observations on the common date axis.
///
/// Alignment never patches gaps silently: the caller picks one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapPolicy {
    /// Carry the last observed price forward over the gap.
    ForwardFill,
    /// Drop symbols that do not cover the full axis.
    ExcludeSymbol,
}

/// A set of symbols with price and return histories aligned on a common
/// date axis.
///
/// The axis is the sorted union of all constituent observation dates; gaps
/// are handled per [`GapPolicy`]. After construction every member column
/// has identical length, so the matrices can feed moment estimation and
/// index construction directly.
#[derive(Debug, Clone)]
pub struct AssetUniverse {
    symbols: Vec<String>,
    excluded: Vec<String>,
    dates: Vec<NaiveDate>,
    /// Aligned prices, rows = dates, columns = symbols.
    prices: Array2<f64>,
    /// Aligned returns, rows = dates[1..], columns = symbols.
    returns: Array2<f64>,
    method: ReturnMethod,
}

impl AssetUniverse {
    /// Align per-symbol price series onto a common date axis and derive
    /// the return matrix.
    ///
    /// # Errors
    /// - `InvalidParameter` when `series` is empty or the gap policy
    ///   excludes every symbol.
    /// - `InsufficientData` when the common axis has fewer than 2 dates.
    /// - `AxisMismatch` when a symbol starts after the axis begins under
    ///   `ForwardFill` (a leading gap cannot be filled).
    pub fn from_price_series(
        series: &[PriceSeries],
        method: ReturnMethod,
        policy: GapPolicy,
    ) -> Result<Self> {
        if series.is_empty() {
            return Err(SeriesError::InvalidParameter(
                "cannot build a universe from zero symbols".to_string(),
            ));
        }

        let axis: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.dates().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if axis.len() < 2 {
            return Err(SeriesError::InsufficientData {
                required: 2,
                actual: axis.len(),
            });
        }

        let mut symbols = Vec::new();
        let mut excluded = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for s in series {
            match policy {
                GapPolicy::ForwardFill => {
                    columns.push(forward_fill(s, &axis)?);
                    symbols.push(s.symbol().to_string());
                }
                GapPolicy::ExcludeSymbol => {
                    if covers_axis(s, &axis) {
                        columns.push(s.prices().to_vec());
                        symbols.push(s.symbol().to_string());
                    } else {
                        excluded.push(s.symbol().to_string());
                    }
                }
            }
        }

        if symbols.is_empty() {
            return Err(SeriesError::InvalidParameter(
                "gap policy excluded every symbol from the universe".to_string(),
            ));
        }

        let n = axis.len();
        let k = symbols.len();
        let mut prices = Array2::<f64>::zeros((n, k));
        for (j, column) in columns.iter().enumerate() {
            for (i, &price) in column.iter().enumerate() {
                prices[[i, j]] = price;
            }
        }

        let mut returns = Array2::<f64>::zeros((n - 1, k));
        for j in 0..k {
            for i in 1..n {
                returns[[i - 1, j]] = method.compute(prices[[i - 1, j]], prices[[i, j]]);
            }
        }

        Ok(Self {
            symbols,
            excluded,
            dates: axis,
            prices,
            returns,
            method,
        })
    }

    /// Member symbols, in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Symbols dropped by `GapPolicy::ExcludeSymbol`.
    pub fn excluded_symbols(&self) -> &[String] {
        &self.excluded
    }

    /// The common price date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The return date axis (the price axis without its first date).
    pub fn return_dates(&self) -> &[NaiveDate] {
        &self.dates[1..]
    }

    /// Number of member symbols.
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Number of return periods.
    pub fn n_periods(&self) -> usize {
        self.returns.nrows()
    }

    /// Aligned price matrix, rows = dates, columns = symbols.
    pub fn prices(&self) -> &Array2<f64> {
        &self.prices
    }

    /// Aligned return matrix, rows = return dates, columns = symbols.
    pub fn returns(&self) -> &Array2<f64> {
        &self.returns
    }

    /// Return convention the matrix was built with.
    pub const fn method(&self) -> ReturnMethod {
        self.method
    }

    /// Column index of a symbol, if present.
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Extract one symbol's return series.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for unknown symbols.
    pub fn return_series(&self, symbol: &str) -> Result<ReturnSeries> {
        let j = self
            .index_of(symbol)
            .ok_or_else(|| SeriesError::InvalidParameter(format!("unknown symbol {symbol}")))?;
        ReturnSeries::new(
            self.return_dates().to_vec(),
            self.returns.column(j).to_vec(),
        )
    }
}

fn covers_axis(series: &PriceSeries, axis: &[NaiveDate]) -> bool {
    let dates: BTreeSet<_> = series.dates().iter().copied().collect();
    axis.iter().all(|d| dates.contains(d))
}

fn forward_fill(series: &PriceSeries, axis: &[NaiveDate]) -> Result<Vec<f64>> {
    let mut filled = Vec::with_capacity(axis.len());
    let mut cursor = 0usize;
    let mut last: Option<f64> = None;

    for &date in axis {
        while cursor < series.len() && series.dates()[cursor] <= date {
            last = Some(series.prices()[cursor]);
            cursor += 1;
        }
        match last {
            Some(price) => filled.push(price),
            None => {
                return Err(SeriesError::AxisMismatch(format!(
                    "symbol {} has no observation at or before {date}; leading gaps cannot be forward-filled",
                    series.symbol()
                )));
            }
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(symbol: &str, obs: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::new(
            symbol,
            obs.iter().map(|&(d, p)| (date(d), p)).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_aligned_universe_shapes() {
        let universe = AssetUniverse::from_price_series(
            &[
                series("A", &[(2, 10.0), (3, 11.0), (4, 12.0)]),
                series("B", &[(2, 20.0), (3, 19.0), (4, 21.0)]),
            ],
            ReturnMethod::Simple,
            GapPolicy::ExcludeSymbol,
        )
        .unwrap();

        assert_eq!(universe.n_assets(), 2);
        assert_eq!(universe.n_periods(), 2);
        assert_eq!(universe.prices().dim(), (3, 2));
        assert_eq!(universe.returns().dim(), (2, 2));
        assert_eq!(universe.return_dates(), &[date(3), date(4)]);
    }

    #[test]
    fn test_forward_fill_carries_last_price() {
        // B is missing Jan 3; its Jan 2 price carries forward.
        let universe = AssetUniverse::from_price_series(
            &[
                series("A", &[(2, 10.0), (3, 11.0), (4, 12.0)]),
                series("B", &[(2, 20.0), (4, 21.0)]),
            ],
            ReturnMethod::Simple,
            GapPolicy::ForwardFill,
        )
        .unwrap();

        assert_eq!(universe.n_assets(), 2);
        let j = universe.index_of("B").unwrap();
        assert_abs_diff_eq!(universe.prices()[[1, j]], 20.0, epsilon = 1e-12);
        // Filled price means a zero return over the gap
        assert_abs_diff_eq!(universe.returns()[[0, j]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exclude_symbol_records_dropped() {
        let universe = AssetUniverse::from_price_series(
            &[
                series("A", &[(2, 10.0), (3, 11.0), (4, 12.0)]),
                series("B", &[(2, 20.0), (4, 21.0)]),
            ],
            ReturnMethod::Simple,
            GapPolicy::ExcludeSymbol,
        )
        .unwrap();

        assert_eq!(universe.symbols(), &["A".to_string()]);
        assert_eq!(universe.excluded_symbols(), &["B".to_string()]);
    }

    #[test]
    fn test_leading_gap_fails_forward_fill() {
        let err = AssetUniverse::from_price_series(
            &[
                series("A", &[(2, 10.0), (3, 11.0)]),
                series("B", &[(3, 20.0)]),
            ],
            ReturnMethod::Simple,
            GapPolicy::ForwardFill,
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::AxisMismatch(_)));
    }

    #[test]
    fn test_empty_universe_rejected() {
        let err = AssetUniverse::from_price_series(
            &[],
            ReturnMethod::Simple,
            GapPolicy::ForwardFill,
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::InvalidParameter(_)));
    }

    #[test]
    fn test_return_series_extraction() {
        let universe = AssetUniverse::from_price_series(
            &[series("A", &[(2, 100.0), (3, 102.0), (4, 51.0)])],
            ReturnMethod::Simple,
            GapPolicy::ExcludeSymbol,
        )
        .unwrap();

        let rs = universe.return_series("A").unwrap();
        assert_abs_diff_eq!(rs.values()[0], 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(rs.values()[1], -0.5, epsilon = 1e-12);
        assert!(universe.return_series("Z").is_err());
    }
}
