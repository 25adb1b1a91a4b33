//! Sector-tagged stock catalogue and seeded sampling.
//!
//! An offline curation aid: the analysis basket can be drawn from the
//! catalogue with a fixed number of names per sector, deterministically
//! given a seed. This has no bearing on the analytics pipeline itself,
//! which takes whatever symbol list the configuration carries.

pub mod sector;

pub use sector::Sector;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// A catalogue entry: symbol plus sector classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Stock symbol.
    pub symbol: String,
    /// Sector classification.
    pub sector: Sector,
}

impl Listing {
    /// Create a new listing.
    pub fn new(symbol: impl Into<String>, sector: Sector) -> Self {
        Self {
            symbol: symbol.into(),
            sector,
        }
    }
}

/// A sector-tagged stock catalogue.
#[derive(Debug, Clone)]
pub struct StockCatalogue {
    listings: Vec<Listing>,
    symbol_to_sector: HashMap<String, Sector>,
}

impl Default for StockCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl StockCatalogue {
    /// Create the catalogue with the default large-cap constituents.
    pub fn new() -> Self {
        Self::from_listings(Self::default_listings())
    }

    /// Create a catalogue from explicit listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let symbol_to_sector = listings
            .iter()
            .map(|l| (l.symbol.clone(), l.sector))
            .collect();
        Self {
            listings,
            symbol_to_sector,
        }
    }

    /// All listings.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// All symbols.
    pub fn symbols(&self) -> Vec<String> {
        self.listings.iter().map(|l| l.symbol.clone()).collect()
    }

    /// Whether a symbol is in the catalogue.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_sector.contains_key(symbol)
    }

    /// Sector of a symbol, if listed.
    pub fn sector(&self, symbol: &str) -> Option<Sector> {
        self.symbol_to_sector.get(symbol).copied()
    }

    /// All symbols in one sector, in catalogue order.
    pub fn symbols_in_sector(&self, sector: Sector) -> Vec<String> {
        self.listings
            .iter()
            .filter(|l| l.sector == sector)
            .map(|l| l.symbol.clone())
            .collect()
    }

    /// Number of listings per sector.
    pub fn sector_counts(&self) -> HashMap<Sector, usize> {
        let mut counts = HashMap::new();
        for listing in &self.listings {
            *counts.entry(listing.sector).or_insert(0) += 1;
        }
        counts
    }

    /// Draw up to `per_sector` symbols from every sector, deterministically
    /// for a given seed.
    ///
    /// Sectors are visited in their canonical order and each sector's
    /// symbols are sampled without replacement, so the same seed over the
    /// same catalogue always yields the same basket.
    pub fn sample_by_sector(&self, seed: u64, per_sector: usize) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut basket = Vec::new();
        for sector in Sector::all() {
            let pool = self.symbols_in_sector(sector);
            basket.extend(
                pool.choose_multiple(&mut rng, per_sector.min(pool.len()))
                    .cloned(),
            );
        }
        basket
    }

    fn default_listings() -> Vec<Listing> {
        use Sector::*;
        vec![
            Listing::new("AAPL", Technology),
            Listing::new("MSFT", Technology),
            Listing::new("GOOGL", Technology),
            Listing::new("NVDA", Technology),
            Listing::new("INTC", Technology),
            Listing::new("AMD", Technology),
            Listing::new("ORCL", Technology),
            Listing::new("JNJ", HealthCare),
            Listing::new("PFE", HealthCare),
            Listing::new("UNH", HealthCare),
            Listing::new("MRK", HealthCare),
            Listing::new("ABBV", HealthCare),
            Listing::new("JPM", Financials),
            Listing::new("BAC", Financials),
            Listing::new("GS", Financials),
            Listing::new("WFC", Financials),
            Listing::new("MS", Financials),
            Listing::new("XOM", Energy),
            Listing::new("CVX", Energy),
            Listing::new("COP", Energy),
            Listing::new("SLB", Energy),
            Listing::new("AMZN", ConsumerDiscretionary),
            Listing::new("TSLA", ConsumerDiscretionary),
            Listing::new("HD", ConsumerDiscretionary),
            Listing::new("MCD", ConsumerDiscretionary),
            Listing::new("NKE", ConsumerDiscretionary),
            Listing::new("PG", ConsumerStaples),
            Listing::new("KO", ConsumerStaples),
            Listing::new("PEP", ConsumerStaples),
            Listing::new("WMT", ConsumerStaples),
            Listing::new("COST", ConsumerStaples),
            Listing::new("BA", Industrials),
            Listing::new("CAT", Industrials),
            Listing::new("UPS", Industrials),
            Listing::new("HON", Industrials),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lookup() {
        let catalogue = StockCatalogue::new();
        assert!(catalogue.contains("AAPL"));
        assert!(!catalogue.contains("NOTREAL"));
        assert_eq!(catalogue.sector("XOM"), Some(Sector::Energy));
    }

    #[test]
    fn test_every_sector_is_populated() {
        let counts = StockCatalogue::new().sector_counts();
        for sector in Sector::all() {
            assert!(counts.get(&sector).copied().unwrap_or(0) >= 4, "{sector:?}");
        }
    }

    #[test]
    fn test_sample_is_deterministic_given_seed() {
        let catalogue = StockCatalogue::new();
        let a = catalogue.sample_by_sector(42, 2);
        let b = catalogue.sample_by_sector(42, 2);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2 * Sector::all().len());
    }

    #[test]
    fn test_different_seeds_differ() {
        let catalogue = StockCatalogue::new();
        let a = catalogue.sample_by_sector(1, 3);
        let b = catalogue.sample_by_sector(2, 3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sample_respects_pool_size() {
        let catalogue = StockCatalogue::from_listings(vec![
            Listing::new("A", Sector::Energy),
            Listing::new("B", Sector::Energy),
        ]);
        let basket = catalogue.sample_by_sector(7, 5);
        assert_eq!(basket.len(), 2);
    }

    #[test]
    fn test_sampled_symbols_come_from_their_sector() {
        let catalogue = StockCatalogue::new();
        let basket = catalogue.sample_by_sector(9, 1);
        for symbol in &basket {
            assert!(catalogue.contains(symbol));
        }
    }
}
