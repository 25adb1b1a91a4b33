//! Building synthetic index series from an aligned universe.

use crate::scheme::WeightScheme;
use crate::{IndexError, Result};
use hobart_series::{AssetUniverse, ReturnSeries};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A constructed index: per-period returns plus the scheme that built it.
///
/// The return series shares the universe's return date axis, so it is
/// directly comparable point-in-time against an external benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticIndex {
    /// Scheme label, e.g. `equal_weighted`.
    pub name: String,
    /// Per-period index returns on the universe's return date axis.
    pub returns: ReturnSeries,
}

impl SyntheticIndex {
    /// Cumulate the index returns into levels starting from `base_value`.
    pub fn levels(&self, base_value: f64) -> Vec<f64> {
        self.returns.to_levels(base_value)
    }
}

/// Builds synthetic indices over one aligned universe.
#[derive(Debug)]
pub struct IndexBuilder<'a> {
    universe: &'a AssetUniverse,
}

impl<'a> IndexBuilder<'a> {
    /// Create a builder over the given universe.
    pub const fn new(universe: &'a AssetUniverse) -> Self {
        Self { universe }
    }

    /// Build an index under the given weighting scheme.
    ///
    /// # Errors
    /// - `MissingShares` / `InvalidShares` for value weighting without
    ///   usable shares outstanding.
    /// - `ZeroVolatility` for risk parity over a constant constituent.
    pub fn build(&self, scheme: &WeightScheme) -> Result<SyntheticIndex> {
        let values = match scheme {
            WeightScheme::EqualWeighted => self.equal_weighted(),
            WeightScheme::PriceWeighted => self.capital_weighted(None)?,
            WeightScheme::ValueWeighted { shares_outstanding } => {
                self.capital_weighted(Some(shares_outstanding))?
            }
            WeightScheme::RiskParity => self.risk_parity()?,
        };

        let returns = ReturnSeries::new(self.universe.return_dates().to_vec(), values)?;
        Ok(SyntheticIndex {
            name: scheme.name().to_string(),
            returns,
        })
    }

    /// Each period's index return is the arithmetic mean of constituent
    /// returns that period (1/N rebalanced every period).
    fn equal_weighted(&self) -> Vec<f64> {
        let k = self.universe.n_assets() as f64;
        self.universe
            .returns()
            .rows()
            .into_iter()
            .map(|row| row.sum() / k)
            .collect()
    }

    /// Price- and value-weighted returns share one computation: the weight
    /// entering period `t` is proportional to price[t-1] × shares, with
    /// shares = 1 for pure price weighting.
    fn capital_weighted(&self, shares: Option<&HashMap<String, f64>>) -> Result<Vec<f64>> {
        let multipliers = match shares {
            Some(map) => self.share_multipliers(map)?,
            None => Array1::ones(self.universe.n_assets()),
        };

        let prices = self.universe.prices();
        let returns = self.universe.returns();
        let mut values = Vec::with_capacity(self.universe.n_periods());

        for t in 0..self.universe.n_periods() {
            let caps = &prices.row(t).to_owned() * &multipliers;
            values.push(weighted_return(&(&caps / caps.sum()).view(), &returns.row(t)));
        }

        Ok(values)
    }

    fn share_multipliers(&self, map: &HashMap<String, f64>) -> Result<Array1<f64>> {
        let mut multipliers = Array1::zeros(self.universe.n_assets());
        for (j, symbol) in self.universe.symbols().iter().enumerate() {
            let shares = *map.get(symbol).ok_or_else(|| IndexError::MissingShares {
                symbol: symbol.clone(),
            })?;
            if !shares.is_finite() || shares <= 0.0 {
                return Err(IndexError::InvalidShares {
                    symbol: symbol.clone(),
                    shares,
                });
            }
            multipliers[j] = shares;
        }
        Ok(multipliers)
    }

    /// Weights inversely proportional to each constituent's sample
    /// volatility over the full estimation window, normalized to sum to 1
    /// and held fixed across periods.
    fn risk_parity(&self) -> Result<Vec<f64>> {
        let returns = self.universe.returns();
        let n = self.universe.n_periods() as f64;

        let mut inverse_vols = Array1::zeros(self.universe.n_assets());
        for (j, symbol) in self.universe.symbols().iter().enumerate() {
            let column = returns.column(j);
            let mean = column.sum() / n;
            let variance = column.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let vol = variance.sqrt();
            if vol < f64::EPSILON {
                return Err(IndexError::ZeroVolatility {
                    symbol: symbol.clone(),
                });
            }
            inverse_vols[j] = 1.0 / vol;
        }

        let weights = &inverse_vols / inverse_vols.sum();
        Ok(returns
            .rows()
            .into_iter()
            .map(|row| weighted_return(&weights.view(), &row))
            .collect())
    }
}

fn weighted_return(weights: &ArrayView1<'_, f64>, returns: &ArrayView1<'_, f64>) -> f64 {
    weights.dot(returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use hobart_series::{GapPolicy, PriceSeries, ReturnMethod};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn universe(series: &[(&str, Vec<f64>)]) -> AssetUniverse {
        let priced: Vec<PriceSeries> = series
            .iter()
            .map(|(symbol, prices)| {
                PriceSeries::new(
                    *symbol,
                    prices
                        .iter()
                        .enumerate()
                        .map(|(i, &p)| (date(2 + i as u32), p))
                        .collect::<Vec<_>>(),
                )
                .unwrap()
            })
            .collect();
        AssetUniverse::from_price_series(&priced, ReturnMethod::Simple, GapPolicy::ExcludeSymbol)
            .unwrap()
    }

    #[test]
    fn test_equal_weighted_is_mean_of_constituent_returns() {
        // Period returns 0.01, 0.02, -0.01 -> index return 0.00667
        let u = universe(&[
            ("A", vec![100.0, 101.0]),
            ("B", vec![100.0, 102.0]),
            ("C", vec![100.0, 99.0]),
        ]);
        let index = IndexBuilder::new(&u)
            .build(&WeightScheme::EqualWeighted)
            .unwrap();
        assert_abs_diff_eq!(index.returns.values()[0], 0.02 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_price_weighted_tracks_expensive_constituent() {
        // A is 9x the price of B, so the index return sits close to A's.
        let u = universe(&[("A", vec![90.0, 99.0]), ("B", vec![10.0, 10.0])]);
        let index = IndexBuilder::new(&u)
            .build(&WeightScheme::PriceWeighted)
            .unwrap();
        assert_abs_diff_eq!(index.returns.values()[0], 0.9 * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_value_weighted_requires_all_shares() {
        let u = universe(&[("A", vec![10.0, 11.0]), ("B", vec![20.0, 21.0])]);
        let mut shares = HashMap::new();
        shares.insert("A".to_string(), 1000.0);

        let err = IndexBuilder::new(&u)
            .build(&WeightScheme::ValueWeighted {
                shares_outstanding: shares,
            })
            .unwrap_err();
        assert!(matches!(err, IndexError::MissingShares { .. }));
    }

    #[test]
    fn test_value_weighted_with_equal_shares_matches_price_weighted() {
        let u = universe(&[("A", vec![90.0, 99.0]), ("B", vec![10.0, 10.5])]);
        let shares: HashMap<String, f64> = [("A", 500.0), ("B", 500.0)]
            .iter()
            .map(|&(s, v)| (s.to_string(), v))
            .collect();

        let builder = IndexBuilder::new(&u);
        let value = builder
            .build(&WeightScheme::ValueWeighted {
                shares_outstanding: shares,
            })
            .unwrap();
        let price = builder.build(&WeightScheme::PriceWeighted).unwrap();

        assert_abs_diff_eq!(
            value.returns.values()[0],
            price.returns.values()[0],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_risk_parity_overweights_low_volatility() {
        // A swings ±10%, B ±1%: B gets ~10x A's weight.
        let u = universe(&[
            ("A", vec![100.0, 110.0, 99.0, 108.9]),
            ("B", vec![100.0, 101.0, 99.99, 100.99]),
        ]);
        let index = IndexBuilder::new(&u)
            .build(&WeightScheme::RiskParity)
            .unwrap();

        // First period: A returns +10%, B +1%. A low weight keeps the
        // index return much closer to B's.
        assert!(index.returns.values()[0] < 0.02);
        assert!(index.returns.values()[0] > 0.01);
    }

    #[test]
    fn test_risk_parity_rejects_zero_volatility() {
        let u = universe(&[
            ("A", vec![100.0, 110.0, 99.0]),
            ("FLAT", vec![50.0, 50.0, 50.0]),
        ]);
        let err = IndexBuilder::new(&u)
            .build(&WeightScheme::RiskParity)
            .unwrap_err();
        assert!(matches!(err, IndexError::ZeroVolatility { .. }));
    }

    #[test]
    fn test_index_levels_cumulate() {
        let u = universe(&[("A", vec![100.0, 110.0, 121.0])]);
        let index = IndexBuilder::new(&u)
            .build(&WeightScheme::EqualWeighted)
            .unwrap();
        let levels = index.levels(1.0);
        assert_abs_diff_eq!(levels[0], 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(levels[1], 1.21, epsilon = 1e-12);
    }
}
