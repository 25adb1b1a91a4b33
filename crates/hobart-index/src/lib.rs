#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod scheme;

pub use builder::{IndexBuilder, SyntheticIndex};
pub use scheme::WeightScheme;

use thiserror::Error;

/// Result type for index construction.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while building a synthetic index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Value weighting requested without shares outstanding for a member.
    #[error("Shares outstanding missing for {symbol}; value weighting cannot fall back to price weighting")]
    MissingShares {
        /// Symbol without shares outstanding
        symbol: String,
    },

    /// Risk parity is undefined when a constituent has zero volatility.
    #[error("Zero volatility for {symbol} over the estimation window; risk-parity weights are undefined")]
    ZeroVolatility {
        /// Symbol with degenerate volatility
        symbol: String,
    },

    /// Shares outstanding must be positive and finite.
    #[error("Invalid shares outstanding {shares} for {symbol}")]
    InvalidShares {
        /// Symbol with invalid shares
        symbol: String,
        /// The offending value
        shares: f64,
    },

    /// Underlying series error.
    #[error(transparent)]
    Series(#[from] hobart_series::SeriesError),
}
