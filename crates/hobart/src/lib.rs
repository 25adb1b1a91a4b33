#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod pipeline;
pub mod universe;

// Re-export the engine crates
pub use hobart_capm as capm;
pub use hobart_frontier as frontier;
pub use hobart_index as index;
pub use hobart_series as series;

pub use config::AnalysisConfig;
pub use pipeline::{AnalysisOutcome, AnalysisReport, Analyzer, PipelineError, PriceSource, Stage};
pub use universe::{Listing, Sector, StockCatalogue};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
