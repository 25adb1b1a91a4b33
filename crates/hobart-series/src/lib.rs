#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod metrics;
pub mod price;
pub mod returns;
pub mod universe;

pub use error::{Result, SeriesError};
pub use metrics::AnnualizedMetrics;
pub use price::{NormalizeMethod, PriceSeries};
pub use returns::{ReturnMethod, ReturnSeries};
pub use universe::{AssetUniverse, GapPolicy};

/// Trading days per year used for annualization unless overridden.
pub const DEFAULT_TRADING_DAYS: usize = 252;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
