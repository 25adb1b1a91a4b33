#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod moments;
pub mod optimizer;
pub mod portfolio;
pub mod solve;

pub use moments::MomentsEstimate;
pub use optimizer::{CapitalMarketLine, FrontierResult, MonteCarloOptimizer, OptimizerConfig};
pub use portfolio::{Portfolio, WeightVector};

use thiserror::Error;

/// Result type for frontier operations.
pub type Result<T> = std::result::Result<T, FrontierError>;

/// Errors that can occur during moment estimation and optimization.
#[derive(Debug, Error)]
pub enum FrontierError {
    /// Too few observations for the requested statistic.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// A matrix inversion was required but the matrix is degenerate.
    #[error("Singular covariance matrix: {0}")]
    SingularCovariance(String),

    /// The computed covariance matrix is not symmetric. This signals a
    /// computation bug and is fatal.
    #[error("Covariance asymmetry at ({row}, {col}): |Σ[r,c] - Σ[c,r]| = {delta}")]
    AsymmetricCovariance {
        /// Row of the offending entry
        row: usize,
        /// Column of the offending entry
        col: usize,
        /// Magnitude of the asymmetry
        delta: f64,
    },

    /// Weights do not sum to 1, or are negative under a long-only policy.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Dimension mismatch between weights and moments.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter (non-positive simulation count, fewer than 2
    /// assets, and similar).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Underlying series error.
    #[error(transparent)]
    Series(#[from] hobart_series::SeriesError),
}
