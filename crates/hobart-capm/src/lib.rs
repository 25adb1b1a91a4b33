#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod model;
pub mod regression;

pub use model::{CapmEstimate, RiskFreeRate, estimate_capm};
pub use regression::OlsFit;

use thiserror::Error;

/// Result type for asset pricing operations.
pub type Result<T> = std::result::Result<T, CapmError>;

/// Errors that can occur during CAPM estimation.
#[derive(Debug, Error)]
pub enum CapmError {
    /// Portfolio and benchmark series are not aligned on the same dates.
    #[error("Axis mismatch: {0}")]
    AxisMismatch(String),

    /// OLS with fewer than 3 observations is degenerate.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Invalid parameter (constant regressor, malformed risk-free series).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Underlying series error.
    #[error(transparent)]
    Series(#[from] hobart_series::SeriesError),
}
