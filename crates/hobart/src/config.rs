//! Immutable analysis configuration.
//!
//! One configuration value is built up front and passed by reference into
//! every stage; no component reads process-wide state. This keeps the
//! index builder, optimizer, and CAPM stages decoupled from each other.

use chrono::NaiveDate;
use hobart_index::WeightScheme;
use hobart_series::{DEFAULT_TRADING_DAYS, GapPolicy, ReturnMethod};
use serde::{Deserialize, Serialize};

/// Static parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Basket of symbols to analyze.
    pub symbols: Vec<String>,
    /// Benchmark index symbol.
    pub benchmark_symbol: String,
    /// First date of the analysis window (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the analysis window (inclusive).
    pub end_date: NaiveDate,
    /// Annualized risk-free rate.
    pub risk_free_rate: f64,
    /// Trading days per year for annualization.
    pub trading_days: usize,
    /// Monte Carlo simulation count.
    pub iterations: usize,
    /// RNG seed for reproducible simulation runs.
    pub seed: u64,
    /// Whether sampled portfolio weights may be negative.
    pub allow_short: bool,
    /// Return convention for all derived series.
    pub return_method: ReturnMethod,
    /// Policy for symbols with gaps on the common date axis.
    pub gap_policy: GapPolicy,
    /// Index weighting schemes to construct.
    pub schemes: Vec<WeightScheme>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: ["AAPL", "MSFT", "GOOGL", "XOM", "INTC"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            benchmark_symbol: "^GSPC".to_string(),
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"),
            risk_free_rate: 0.04,
            trading_days: DEFAULT_TRADING_DAYS,
            iterations: 10_000,
            seed: 42,
            allow_short: false,
            return_method: ReturnMethod::Simple,
            gap_policy: GapPolicy::ForwardFill,
            schemes: vec![WeightScheme::EqualWeighted, WeightScheme::PriceWeighted],
        }
    }
}

impl AnalysisConfig {
    /// The risk-free rate de-annualized to one trading day:
    /// `(1 + r)^(1/trading_days) − 1`.
    pub fn daily_risk_free_rate(&self) -> f64 {
        (1.0 + self.risk_free_rate).powf(1.0 / self.trading_days as f64) - 1.0
    }

    /// Check the configuration for internally inconsistent values.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbols.is_empty() {
            return Err("symbol list is empty".to_string());
        }
        if self.start_date >= self.end_date {
            return Err(format!(
                "start date {} is not before end date {}",
                self.start_date, self.end_date
            ));
        }
        if self.trading_days == 0 {
            return Err("trading_days must be positive".to_string());
        }
        if self.iterations == 0 {
            return Err("iterations must be positive".to_string());
        }
        if !self.risk_free_rate.is_finite() {
            return Err(format!(
                "risk-free rate {} is not finite",
                self.risk_free_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.symbols.len(), 5);
        assert_eq!(config.trading_days, 252);
    }

    #[test]
    fn test_daily_risk_free_rate() {
        let config = AnalysisConfig::default();
        let daily = config.daily_risk_free_rate();
        assert_abs_diff_eq!((1.0 + daily).powi(252) - 1.0, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_rejects_inverted_dates() {
        let config = AnalysisConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = AnalysisConfig {
            iterations: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AnalysisConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
