//! CAPM estimation: excess-return regression against a benchmark.

use crate::regression::fit_ols;
use crate::{CapmError, Result};
use hobart_series::ReturnSeries;
use serde::{Deserialize, Serialize};

/// Risk-free rate input: a constant annual rate or a per-period series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskFreeRate {
    /// Constant annualized rate, de-annualized geometrically:
    /// `(1 + r)^(1/trading_days) − 1` per period.
    Annual(f64),
    /// Explicit per-period rates aligned to the return series.
    PerPeriod(Vec<f64>),
}

impl RiskFreeRate {
    /// Expand into one rate per observation.
    fn per_period(&self, n: usize, trading_days: usize) -> Result<Vec<f64>> {
        match self {
            Self::Annual(rate) => {
                if !rate.is_finite() {
                    return Err(CapmError::InvalidParameter(format!(
                        "risk-free rate {rate} is not finite"
                    )));
                }
                let daily = (1.0 + rate).powf(1.0 / trading_days as f64) - 1.0;
                Ok(vec![daily; n])
            }
            Self::PerPeriod(rates) => {
                if rates.len() != n {
                    return Err(CapmError::AxisMismatch(format!(
                        "{} risk-free observations vs {} return observations",
                        rates.len(),
                        n
                    )));
                }
                Ok(rates.clone())
            }
        }
    }
}

/// A fitted CAPM: `(r_p − r_f) = α + β·(r_b − r_f) + ε`.
///
/// Computed on demand; never cached across parameter changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmEstimate {
    /// Sensitivity to benchmark movement.
    pub beta: f64,
    /// Per-period excess return unexplained by the benchmark.
    pub alpha: f64,
    /// Alpha scaled by trading days per year.
    pub annualized_alpha: f64,
    /// Share of portfolio excess-return variance explained.
    pub r_squared: f64,
    /// Standard error of beta.
    pub beta_std_err: f64,
    /// Standard error of (per-period) alpha.
    pub alpha_std_err: f64,
    /// Two-sided p-value for beta = 0.
    pub beta_p_value: f64,
    /// Two-sided p-value for alpha = 0.
    pub alpha_p_value: f64,
    /// Number of regression observations.
    pub observations: usize,
}

/// Regress a portfolio's excess returns on a benchmark's excess returns.
///
/// # Errors
/// - `AxisMismatch` when the two series do not share a date axis (or a
///   per-period risk-free series has the wrong length).
/// - `InsufficientData` for fewer than 3 observations.
/// - `InvalidParameter` when the benchmark excess return has no variation.
pub fn estimate_capm(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    risk_free: &RiskFreeRate,
    trading_days: usize,
) -> Result<CapmEstimate> {
    if trading_days == 0 {
        return Err(CapmError::InvalidParameter(
            "trading_days must be positive".to_string(),
        ));
    }
    if !portfolio.same_axis(benchmark) {
        return Err(CapmError::AxisMismatch(format!(
            "portfolio ({} obs) and benchmark ({} obs) are not aligned on the same dates",
            portfolio.len(),
            benchmark.len()
        )));
    }

    let n = portfolio.len();
    if n < 3 {
        return Err(CapmError::InsufficientData {
            required: 3,
            actual: n,
        });
    }

    let rf = risk_free.per_period(n, trading_days)?;
    let portfolio_excess: Vec<f64> = portfolio
        .values()
        .iter()
        .zip(&rf)
        .map(|(r, f)| r - f)
        .collect();
    let benchmark_excess: Vec<f64> = benchmark
        .values()
        .iter()
        .zip(&rf)
        .map(|(r, f)| r - f)
        .collect();

    let fit = fit_ols(&benchmark_excess, &portfolio_excess)?;

    Ok(CapmEstimate {
        beta: fit.slope,
        alpha: fit.intercept,
        annualized_alpha: fit.intercept * trading_days as f64,
        r_squared: fit.r_squared,
        beta_std_err: fit.slope_std_err,
        alpha_std_err: fit.intercept_std_err,
        beta_p_value: fit.slope_p_value,
        alpha_p_value: fit.intercept_p_value,
        observations: fit.observations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> ReturnSeries {
        let dates = (0..values.len())
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Days::new(i as u64))
            .collect();
        ReturnSeries::new(dates, values).unwrap()
    }

    #[test]
    fn test_identical_series_is_the_market() {
        let returns = series(vec![0.01, -0.02, 0.03, 0.005, -0.01]);
        let estimate =
            estimate_capm(&returns, &returns.clone(), &RiskFreeRate::Annual(0.04), 252).unwrap();

        assert_abs_diff_eq!(estimate.beta, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(estimate.alpha, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(estimate.annualized_alpha, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.r_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_levered_portfolio_has_beta_above_one() {
        let market = vec![0.01, -0.02, 0.03, 0.005, -0.01, 0.02];
        // 2x the market plus a small constant edge
        let portfolio: Vec<f64> = market.iter().map(|r| 0.0005 + 2.0 * r).collect();

        let estimate = estimate_capm(
            &series(portfolio),
            &series(market),
            &RiskFreeRate::Annual(0.0),
            252,
        )
        .unwrap();

        assert_abs_diff_eq!(estimate.beta, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.alpha, 0.0005, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.annualized_alpha, 0.0005 * 252.0, epsilon = 1e-6);
    }

    #[test]
    fn test_scalar_risk_free_shifts_both_sides() {
        // Beta is invariant to a constant risk-free shift.
        let market = vec![0.01, -0.02, 0.03, 0.005];
        let portfolio: Vec<f64> = market.iter().map(|r| 1.5 * r).collect();

        let with_rf = estimate_capm(
            &series(portfolio.clone()),
            &series(market.clone()),
            &RiskFreeRate::Annual(0.04),
            252,
        )
        .unwrap();
        let without_rf = estimate_capm(
            &series(portfolio),
            &series(market),
            &RiskFreeRate::Annual(0.0),
            252,
        )
        .unwrap();

        assert_abs_diff_eq!(with_rf.beta, without_rf.beta, epsilon = 1e-9);
    }

    #[test]
    fn test_axis_mismatch_rejected() {
        let a = series(vec![0.01, 0.02, 0.03]);
        let mut dates: Vec<NaiveDate> = a.dates().to_vec();
        dates[2] = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let b = ReturnSeries::new(dates, vec![0.01, 0.02, 0.03]).unwrap();

        let err = estimate_capm(&a, &b, &RiskFreeRate::Annual(0.04), 252).unwrap_err();
        assert!(matches!(err, CapmError::AxisMismatch(_)));
    }

    #[test]
    fn test_two_observations_rejected() {
        let a = series(vec![0.01, 0.02]);
        let err = estimate_capm(&a, &a.clone(), &RiskFreeRate::Annual(0.04), 252).unwrap_err();
        assert!(matches!(
            err,
            CapmError::InsufficientData {
                required: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_per_period_risk_free_length_checked() {
        let a = series(vec![0.01, 0.02, 0.03]);
        let err = estimate_capm(
            &a,
            &a.clone(),
            &RiskFreeRate::PerPeriod(vec![0.0001, 0.0001]),
            252,
        )
        .unwrap_err();
        assert!(matches!(err, CapmError::AxisMismatch(_)));
    }
}
