//! Index weighting schemes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How constituent returns are weighted into an index return.
///
/// Every scheme is a pure function of the universe's price/return history
/// (plus auxiliary shares outstanding for value weighting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeightScheme {
    /// `1/N` per constituent, rebalanced every period.
    EqualWeighted,

    /// Weight proportional to each constituent's price entering the period.
    PriceWeighted,

    /// Weight proportional to market capitalization (price × shares
    /// outstanding). Fails explicitly when shares are unavailable for a
    /// member.
    ValueWeighted {
        /// Shares outstanding per symbol.
        shares_outstanding: HashMap<String, f64>,
    },

    /// Weight inversely proportional to each constituent's volatility over
    /// the estimation window.
    RiskParity,
}

impl WeightScheme {
    /// Short name used in reports and index labels.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EqualWeighted => "equal_weighted",
            Self::PriceWeighted => "price_weighted",
            Self::ValueWeighted { .. } => "value_weighted",
            Self::RiskParity => "risk_parity",
        }
    }
}
