//! Annualized mean and covariance estimation.

use crate::{FrontierError, Result};
use hobart_series::AssetUniverse;
use ndarray::{Array1, Array2};

/// Tolerance for the covariance symmetry check.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Annualized first and second moments for an asset universe.
///
/// The covariance is the sample covariance (N−1 denominator) of per-period
/// returns, scaled by trading days per year; the mean vector is the
/// per-period mean scaled the same way. Shared by the optimizer and any
/// portfolio evaluation.
#[derive(Debug, Clone)]
pub struct MomentsEstimate {
    symbols: Vec<String>,
    mean: Array1<f64>,
    covariance: Array2<f64>,
    trading_days: usize,
}

impl MomentsEstimate {
    /// Estimate moments from an aligned universe.
    ///
    /// # Errors
    /// - `InvalidParameter` for fewer than 2 assets (covariance undefined)
    ///   or zero trading days.
    /// - `InsufficientData` for fewer than 2 return periods.
    /// - `AsymmetricCovariance` when the computed matrix fails the
    ///   symmetry check; this is a computation bug, not a data problem.
    pub fn from_universe(universe: &AssetUniverse, trading_days: usize) -> Result<Self> {
        let k = universe.n_assets();
        if k < 2 {
            return Err(FrontierError::InvalidParameter(format!(
                "covariance requires at least 2 assets, got {k}"
            )));
        }
        if trading_days == 0 {
            return Err(FrontierError::InvalidParameter(
                "trading_days must be positive".to_string(),
            ));
        }
        let n = universe.n_periods();
        if n < 2 {
            return Err(FrontierError::InsufficientData {
                required: 2,
                actual: n,
            });
        }

        let returns = universe.returns();
        let periods = trading_days as f64;
        let nf = n as f64;

        let mut mean = Array1::<f64>::zeros(k);
        for j in 0..k {
            mean[j] = returns.column(j).sum() / nf * periods;
        }

        let per_period_mean: Vec<f64> = (0..k).map(|j| returns.column(j).sum() / nf).collect();
        let mut covariance = Array2::<f64>::zeros((k, k));
        for i in 0..k {
            for j in 0..k {
                let mut acc = 0.0;
                for t in 0..n {
                    acc += (returns[[t, i]] - per_period_mean[i])
                        * (returns[[t, j]] - per_period_mean[j]);
                }
                covariance[[i, j]] = acc / (nf - 1.0) * periods;
            }
        }

        verify_symmetric(&covariance)?;

        Ok(Self {
            symbols: universe.symbols().to_vec(),
            mean,
            covariance,
            trading_days,
        })
    }

    /// Build moments directly from precomputed annualized inputs.
    ///
    /// Useful for tests and for callers that estimate moments elsewhere.
    ///
    /// # Errors
    /// Same validation as [`Self::from_universe`] minus the data checks:
    /// at least 2 assets, matching dimensions, symmetric covariance.
    pub fn from_parts(
        symbols: Vec<String>,
        mean: Array1<f64>,
        covariance: Array2<f64>,
        trading_days: usize,
    ) -> Result<Self> {
        let k = symbols.len();
        if k < 2 {
            return Err(FrontierError::InvalidParameter(format!(
                "covariance requires at least 2 assets, got {k}"
            )));
        }
        if mean.len() != k {
            return Err(FrontierError::DimensionMismatch {
                expected: k,
                actual: mean.len(),
            });
        }
        if covariance.dim() != (k, k) {
            return Err(FrontierError::DimensionMismatch {
                expected: k,
                actual: covariance.nrows(),
            });
        }
        verify_symmetric(&covariance)?;

        Ok(Self {
            symbols,
            mean,
            covariance,
            trading_days,
        })
    }

    /// Symbols in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Annualized mean-return vector.
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Annualized covariance matrix.
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Trading days per year used for annualization.
    pub const fn trading_days(&self) -> usize {
        self.trading_days
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Annualized expected return of a weight vector: `w·μ`.
    pub fn expected_return(&self, weights: &Array1<f64>) -> f64 {
        weights.dot(&self.mean)
    }

    /// Annualized variance of a weight vector: `w·(Σ·w)`.
    pub fn variance(&self, weights: &Array1<f64>) -> f64 {
        weights.dot(&self.covariance.dot(weights))
    }
}

fn verify_symmetric(covariance: &Array2<f64>) -> Result<()> {
    let k = covariance.nrows();
    for i in 0..k {
        for j in (i + 1)..k {
            let delta = (covariance[[i, j]] - covariance[[j, i]]).abs();
            if delta > SYMMETRY_TOLERANCE {
                return Err(FrontierError::AsymmetricCovariance {
                    row: i,
                    col: j,
                    delta,
                });
            }
        }
    }
    Ok(())
}
