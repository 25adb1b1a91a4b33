//! Error types for series construction and alignment.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for series operations.
pub type Result<T> = std::result::Result<T, SeriesError>;

/// Errors that can occur while building or aligning series.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Too few observations for the requested statistic.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// A price observation is zero, negative, or non-finite.
    #[error("Invalid price {price} on {date}")]
    InvalidPrice {
        /// Date of the offending observation
        date: NaiveDate,
        /// The offending price
        price: f64,
    },

    /// Dates are not strictly increasing.
    #[error("Out-of-order date {date}: series dates must be strictly increasing")]
    OutOfOrderDate {
        /// Date that broke the ordering
        date: NaiveDate,
    },

    /// Two series do not share the same date axis.
    #[error("Axis mismatch: {0}")]
    AxisMismatch(String),

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
