//! Two-variable ordinary least squares.

use crate::{CapmError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// A fitted simple linear regression `y = intercept + slope·x + ε`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    /// Slope coefficient.
    pub slope: f64,
    /// Intercept coefficient.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Standard error of the slope.
    pub slope_std_err: f64,
    /// Standard error of the intercept.
    pub intercept_std_err: f64,
    /// Two-sided p-value for slope = 0 (Student-t, n−2 df).
    pub slope_p_value: f64,
    /// Two-sided p-value for intercept = 0.
    pub intercept_p_value: f64,
    /// Number of observations.
    pub observations: usize,
}

/// Fit `y` on `x` by ordinary least squares.
///
/// # Errors
/// - `AxisMismatch` when the slices differ in length.
/// - `InsufficientData` for fewer than 3 observations.
/// - `InvalidParameter` when `x` has no variation (slope undefined).
pub fn fit_ols(x: &[f64], y: &[f64]) -> Result<OlsFit> {
    if x.len() != y.len() {
        return Err(CapmError::AxisMismatch(format!(
            "{} x-observations vs {} y-observations",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 3 {
        return Err(CapmError::InsufficientData {
            required: 3,
            actual: n,
        });
    }

    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
        .sum();

    if sxx < f64::EPSILON {
        return Err(CapmError::InvalidParameter(
            "regressor has no variation; slope is undefined".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let rss: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - intercept - slope * xi).powi(2))
        .sum();
    let tss: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();

    let r_squared = if tss < f64::EPSILON {
        // y is constant; a perfect fit explains everything, anything else
        // explains nothing.
        if rss < f64::EPSILON { 1.0 } else { 0.0 }
    } else {
        1.0 - rss / tss
    };

    let df = nf - 2.0;
    let sigma_sq = rss / df;
    let slope_std_err = (sigma_sq / sxx).sqrt();
    let intercept_std_err = (sigma_sq * (1.0 / nf + x_mean.powi(2) / sxx)).sqrt();

    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| CapmError::InvalidParameter(format!("t-distribution: {e}")))?;
    let slope_p_value = two_sided_p(&t_dist, slope, slope_std_err);
    let intercept_p_value = two_sided_p(&t_dist, intercept, intercept_std_err);

    Ok(OlsFit {
        slope,
        intercept,
        r_squared,
        slope_std_err,
        intercept_std_err,
        slope_p_value,
        intercept_p_value,
        observations: n,
    })
}

fn two_sided_p(t_dist: &StudentsT, coefficient: f64, std_err: f64) -> f64 {
    if std_err < f64::EPSILON {
        // Exact fit: a zero coefficient is exactly zero, anything else is
        // infinitely significant.
        return if coefficient.abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        };
    }
    let t = (coefficient / std_err).abs();
    2.0 * (1.0 - t_dist.cdf(t))
}
