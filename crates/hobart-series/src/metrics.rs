//! Annualized return and volatility metrics.

use crate::error::{Result, SeriesError};
use crate::returns::ReturnSeries;
use serde::{Deserialize, Serialize};

/// Annualized performance metrics for a single return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedMetrics {
    /// Arithmetic annualized return: mean daily return × trading days.
    pub arithmetic_return: f64,
    /// Geometric annualized return: compounded total return scaled to one year.
    pub geometric_return: f64,
    /// Annualized volatility: sample standard deviation × √(trading days).
    pub volatility: f64,
}

impl AnnualizedMetrics {
    /// Compute annualized metrics from a return series.
    ///
    /// # Errors
    /// Returns `InsufficientData` for series with fewer than 2 observations
    /// (the sample standard deviation is undefined) and `InvalidParameter`
    /// for a non-positive `trading_days`.
    pub fn from_returns(returns: &ReturnSeries, trading_days: usize) -> Result<Self> {
        Self::from_slice(returns.values(), trading_days)
    }

    /// Compute annualized metrics from raw per-period returns.
    ///
    /// # Errors
    /// Same conditions as [`Self::from_returns`].
    pub fn from_slice(returns: &[f64], trading_days: usize) -> Result<Self> {
        if trading_days == 0 {
            return Err(SeriesError::InvalidParameter(
                "trading_days must be positive".to_string(),
            ));
        }
        let n = returns.len();
        if n < 2 {
            return Err(SeriesError::InsufficientData {
                required: 2,
                actual: n,
            });
        }

        let periods = trading_days as f64;
        let nf = n as f64;

        let mean = returns.iter().sum::<f64>() / nf;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (nf - 1.0);

        let total_return = returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;
        let geometric = (1.0 + total_return).powf(periods / nf) - 1.0;

        Ok(Self {
            arithmetic_return: mean * periods,
            geometric_return: geometric,
            volatility: variance.sqrt() * periods.sqrt(),
        })
    }
}
