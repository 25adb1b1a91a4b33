//! Weight vectors and evaluated portfolios.

use crate::moments::MomentsEstimate;
use crate::{FrontierError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Tolerance for the weights-sum-to-one invariant.
const SUM_TOLERANCE: f64 = 1e-9;

/// Volatility below this is treated as zero when forming Sharpe ratios.
const VOL_FLOOR: f64 = 1e-12;

/// A validated portfolio weight vector aligned to a universe's symbol
/// order.
///
/// Weights always sum to 1 within tolerance. Negative weights are only
/// admitted when the vector is built with `allow_short`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    values: Array1<f64>,
}

impl WeightVector {
    /// Validate and wrap a long-only weight vector.
    ///
    /// # Errors
    /// `InvalidWeights` when the sum deviates from 1 beyond tolerance or
    /// any weight is negative.
    pub fn long_only(values: Array1<f64>) -> Result<Self> {
        Self::validate(values, false)
    }

    /// Validate and wrap a weight vector that may hold short positions.
    ///
    /// # Errors
    /// `InvalidWeights` when the sum deviates from 1 beyond tolerance.
    pub fn allow_short(values: Array1<f64>) -> Result<Self> {
        Self::validate(values, true)
    }

    fn validate(values: Array1<f64>, allow_short: bool) -> Result<Self> {
        if values.is_empty() {
            return Err(FrontierError::InvalidWeights(
                "empty weight vector".to_string(),
            ));
        }
        let sum: f64 = values.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(FrontierError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1"
            )));
        }
        if !allow_short {
            if let Some(w) = values.iter().find(|w| **w < -SUM_TOLERANCE) {
                return Err(FrontierError::InvalidWeights(format!(
                    "negative weight {w} under long-only policy"
                )));
            }
        }
        Ok(Self { values })
    }

    /// The underlying weights.
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty (never true for validated vectors).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A weight vector with its derived risk/return statistics.
///
/// Immutable once computed; build a new one when weights or moments
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Weights in universe symbol order.
    pub weights: Vec<f64>,
    /// Annualized expected return `w·μ`.
    pub expected_return: f64,
    /// Annualized volatility `√(w·Σ·w)`.
    pub volatility: f64,
    /// Sharpe ratio `(expected return − r_f) / volatility`.
    pub sharpe_ratio: f64,
}

impl Portfolio {
    /// Evaluate a weight vector against moments and a risk-free rate.
    ///
    /// A portfolio with (numerically) zero volatility gets a Sharpe ratio
    /// of `-∞` so it can never win a max-Sharpe scan.
    ///
    /// # Errors
    /// `DimensionMismatch` when the weights do not match the moments.
    pub fn evaluate(
        weights: &WeightVector,
        moments: &MomentsEstimate,
        risk_free_rate: f64,
    ) -> Result<Self> {
        if weights.len() != moments.n_assets() {
            return Err(FrontierError::DimensionMismatch {
                expected: moments.n_assets(),
                actual: weights.len(),
            });
        }

        let expected_return = moments.expected_return(weights.values());
        let variance = moments.variance(weights.values());
        let volatility = variance.max(0.0).sqrt();
        let sharpe_ratio = if volatility > VOL_FLOOR {
            (expected_return - risk_free_rate) / volatility
        } else {
            f64::NEG_INFINITY
        };

        Ok(Self {
            weights: weights.values().to_vec(),
            expected_return,
            volatility,
            sharpe_ratio,
        })
    }
}
