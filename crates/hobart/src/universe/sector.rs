//! Sector classification for catalogue listings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad equity sectors used for basket curation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Information technology
    Technology,
    /// Health care
    HealthCare,
    /// Financials
    Financials,
    /// Energy
    Energy,
    /// Consumer discretionary
    ConsumerDiscretionary,
    /// Consumer staples
    ConsumerStaples,
    /// Industrials
    Industrials,
}

impl Sector {
    /// All sectors in canonical order.
    pub const fn all() -> [Self; 7] {
        [
            Self::Technology,
            Self::HealthCare,
            Self::Financials,
            Self::Energy,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::Industrials,
        ]
    }

    /// Human-readable sector name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::HealthCare => "Health Care",
            Self::Financials => "Financials",
            Self::Energy => "Energy",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Industrials => "Industrials",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sectors_unique() {
        let all = Sector::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Sector::ConsumerStaples.to_string(), "Consumer Staples");
    }
}
