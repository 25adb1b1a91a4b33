//! Validated price history for a single symbol.

use crate::error::{Result, SeriesError};
use crate::returns::{ReturnMethod, ReturnSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price normalization methods.
///
/// Used when price histories must be made comparable across symbols,
/// e.g. when charting constituents against an index level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeMethod {
    /// Divide every price by the first observation (rebase to 1.0).
    Rebase,
    /// Scale prices into the [0, 1] range.
    MinMax,
    /// Standardize prices to zero mean and unit standard deviation.
    ZScore,
}

/// An ordered series of (date, adjusted close) observations for one symbol.
///
/// Invariants enforced at construction: dates strictly increasing, prices
/// positive and finite. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Build a price series from (date, price) observations.
    ///
    /// # Errors
    /// Returns `InvalidPrice` for zero, negative, or non-finite prices and
    /// `OutOfOrderDate` when dates are not strictly increasing.
    pub fn new(symbol: impl Into<String>, observations: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let mut dates = Vec::with_capacity(observations.len());
        let mut prices = Vec::with_capacity(observations.len());

        for (date, price) in observations {
            if !price.is_finite() || price <= 0.0 {
                return Err(SeriesError::InvalidPrice { date, price });
            }
            if let Some(&last) = dates.last() {
                if date <= last {
                    return Err(SeriesError::OutOfOrderDate { date });
                }
            }
            dates.push(date);
            prices.push(price);
        }

        Ok(Self {
            symbol: symbol.into(),
            dates,
            prices,
        })
    }

    /// Symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Observation dates, strictly increasing.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Adjusted close prices, aligned to `dates`.
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Derive the return series under the given convention.
    ///
    /// The result has one fewer entry than the price series: there is no
    /// return for the first observation date.
    ///
    /// # Errors
    /// Returns `InsufficientData` for series shorter than 2 observations.
    pub fn returns(&self, method: ReturnMethod) -> Result<ReturnSeries> {
        if self.len() < 2 {
            return Err(SeriesError::InsufficientData {
                required: 2,
                actual: self.len(),
            });
        }

        let values = self
            .prices
            .windows(2)
            .map(|w| method.compute(w[0], w[1]))
            .collect();

        ReturnSeries::new(self.dates[1..].to_vec(), values)
    }

    /// Normalize prices for cross-sectional comparison.
    ///
    /// # Errors
    /// Returns `InsufficientData` on an empty series and `InvalidParameter`
    /// when the method degenerates (constant series under `MinMax` or
    /// `ZScore`).
    pub fn normalize(&self, method: NormalizeMethod) -> Result<Vec<f64>> {
        if self.is_empty() {
            return Err(SeriesError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        match method {
            NormalizeMethod::Rebase => {
                let base = self.prices[0];
                Ok(self.prices.iter().map(|p| p / base).collect())
            }
            NormalizeMethod::MinMax => {
                let min = self.prices.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = self
                    .prices
                    .iter()
                    .cloned()
                    .fold(f64::NEG_INFINITY, f64::max);
                if (max - min).abs() < f64::EPSILON {
                    return Err(SeriesError::InvalidParameter(format!(
                        "min-max normalization undefined for constant series {}",
                        self.symbol
                    )));
                }
                Ok(self.prices.iter().map(|p| (p - min) / (max - min)).collect())
            }
            NormalizeMethod::ZScore => {
                let n = self.prices.len() as f64;
                let mean = self.prices.iter().sum::<f64>() / n;
                let var = self
                    .prices
                    .iter()
                    .map(|p| (p - mean).powi(2))
                    .sum::<f64>()
                    / (n - 1.0).max(1.0);
                let std = var.sqrt();
                if std < f64::EPSILON {
                    return Err(SeriesError::InvalidParameter(format!(
                        "z-score normalization undefined for constant series {}",
                        self.symbol
                    )));
                }
                Ok(self.prices.iter().map(|p| (p - mean) / std).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> PriceSeries {
        PriceSeries::new(
            "AAPL",
            vec![
                (date(2024, 1, 2), 100.0),
                (date(2024, 1, 3), 102.0),
                (date(2024, 1, 4), 99.96),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_nonpositive_price() {
        let err = PriceSeries::new("X", vec![(date(2024, 1, 2), 0.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidPrice { .. }));

        let err = PriceSeries::new("X", vec![(date(2024, 1, 2), -3.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidPrice { .. }));

        let err = PriceSeries::new("X", vec![(date(2024, 1, 2), f64::NAN)]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidPrice { .. }));
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let err = PriceSeries::new(
            "X",
            vec![(date(2024, 1, 3), 10.0), (date(2024, 1, 2), 11.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrderDate { .. }));

        // Duplicate dates are out of order too
        let err = PriceSeries::new(
            "X",
            vec![(date(2024, 1, 3), 10.0), (date(2024, 1, 3), 11.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrderDate { .. }));
    }

    #[test]
    fn test_returns_length_is_n_minus_one() {
        let series = sample();
        let returns = series.returns(ReturnMethod::Simple).unwrap();
        assert_eq!(returns.len(), series.len() - 1);
        assert_eq!(returns.dates()[0], date(2024, 1, 3));
    }

    #[test]
    fn test_simple_return_values() {
        let returns = sample().returns(ReturnMethod::Simple).unwrap();
        assert_abs_diff_eq!(returns.values()[0], 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(returns.values()[1], -0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_log_return_values() {
        let returns = sample().returns(ReturnMethod::Log).unwrap();
        assert_abs_diff_eq!(returns.values()[0], (102.0f64 / 100.0).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_returns_require_two_observations() {
        let series = PriceSeries::new("X", vec![(date(2024, 1, 2), 10.0)]).unwrap();
        let err = series.returns(ReturnMethod::Simple).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::InsufficientData {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_rebase_normalization() {
        let normalized = sample().normalize(NormalizeMethod::Rebase).unwrap();
        assert_abs_diff_eq!(normalized[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalized[1], 1.02, epsilon = 1e-12);
    }

    #[test]
    fn test_minmax_rejects_constant_series() {
        let series = PriceSeries::new(
            "X",
            vec![(date(2024, 1, 2), 10.0), (date(2024, 1, 3), 10.0)],
        )
        .unwrap();
        assert!(series.normalize(NormalizeMethod::MinMax).is_err());
    }
}
