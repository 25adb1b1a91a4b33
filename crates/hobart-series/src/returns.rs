//! Return series and return conventions.

use crate::error::{Result, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Return computation conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnMethod {
    /// Simple return: `p_t / p_{t-1} - 1`.
    Simple,
    /// Log return: `ln(p_t / p_{t-1})`.
    Log,
}

impl ReturnMethod {
    /// Compute a single-period return from two consecutive prices.
    pub fn compute(self, previous: f64, current: f64) -> f64 {
        match self {
            Self::Simple => current / previous - 1.0,
            Self::Log => (current / previous).ln(),
        }
    }
}

/// An ordered series of (date, return) observations.
///
/// Derived from consecutive price observations, so a return series is one
/// entry shorter than its source price series and carries no entry for the
/// source's first date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Build a return series from parallel date and value vectors.
    ///
    /// # Errors
    /// Returns `AxisMismatch` when the vectors differ in length,
    /// `OutOfOrderDate` when dates are not strictly increasing, and
    /// `InvalidParameter` on non-finite values.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(SeriesError::AxisMismatch(format!(
                "{} dates vs {} values",
                dates.len(),
                values.len()
            )));
        }
        for window in dates.windows(2) {
            if window[1] <= window[0] {
                return Err(SeriesError::OutOfOrderDate { date: window[1] });
            }
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SeriesError::InvalidParameter(format!(
                "non-finite return value {bad}"
            )));
        }
        Ok(Self { dates, values })
    }

    /// Observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Per-period returns, aligned to `dates`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether another series shares this one's date axis exactly.
    pub fn same_axis(&self, other: &Self) -> bool {
        self.dates == other.dates
    }

    /// Inner-join two series on their dates, returning aligned copies.
    ///
    /// # Errors
    /// Returns `AxisMismatch` when the intersection is empty.
    pub fn align_with(&self, other: &Self) -> Result<(Self, Self)> {
        if self.same_axis(other) {
            return Ok((self.clone(), other.clone()));
        }

        let other_dates: std::collections::BTreeSet<NaiveDate> =
            other.dates.iter().copied().collect();
        let mut dates = Vec::new();
        let mut left = Vec::new();
        for (date, value) in self.dates.iter().zip(&self.values) {
            if other_dates.contains(date) {
                dates.push(*date);
                left.push(*value);
            }
        }

        if dates.is_empty() {
            return Err(SeriesError::AxisMismatch(
                "series share no common dates".to_string(),
            ));
        }

        let shared: std::collections::BTreeSet<NaiveDate> = dates.iter().copied().collect();
        let right: Vec<f64> = other
            .dates
            .iter()
            .zip(&other.values)
            .filter(|(d, _)| shared.contains(d))
            .map(|(_, v)| *v)
            .collect();

        Ok((
            Self::new(dates.clone(), left)?,
            Self::new(dates, right)?,
        ))
    }

    /// Cumulate returns into a level series starting from `base_value`.
    ///
    /// Level `t` is `base_value * Π(1 + r_i)` for `i ≤ t`, the usual way a
    /// synthetic index level is charted against a benchmark.
    pub fn to_levels(&self, base_value: f64) -> Vec<f64> {
        let mut level = base_value;
        self.values
            .iter()
            .map(|r| {
                level *= 1.0 + r;
                level
            })
            .collect()
    }
}
