//! End-to-end analysis pipeline.
//!
//! Runs Price Source → returns → indices → moments → frontier → CAPM as
//! pure in-memory stages. The run aborts on the first uncaught error and
//! reports which stage failed; everything computed before the failing
//! stage stays in the report for the caller.

use crate::config::AnalysisConfig;
use chrono::NaiveDate;
use hobart_capm::{CapmError, CapmEstimate, RiskFreeRate, estimate_capm};
use hobart_frontier::{
    FrontierError, FrontierResult, MomentsEstimate, MonteCarloOptimizer, OptimizerConfig,
    WeightVector,
};
use hobart_index::{IndexBuilder, IndexError, SyntheticIndex};
use hobart_series::{AnnualizedMetrics, AssetUniverse, PriceSeries, ReturnSeries, SeriesError};
use ndarray::Array1;
use thiserror::Error;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Configuration validation.
    Configure,
    /// Price history retrieval from the external source.
    Fetch,
    /// Return derivation and universe alignment.
    Returns,
    /// Synthetic index construction.
    Indices,
    /// Moment estimation.
    Moments,
    /// Frontier simulation.
    Frontier,
    /// CAPM regression.
    AssetPricing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configure => "configure",
            Self::Fetch => "fetch",
            Self::Returns => "returns",
            Self::Indices => "indices",
            Self::Moments => "moments",
            Self::Frontier => "frontier",
            Self::AssetPricing => "asset-pricing",
        };
        f.write_str(name)
    }
}

/// The error a single stage produced.
#[derive(Debug, Error)]
pub enum StageError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The external price source failed.
    #[error("price source: {0}")]
    Source(String),

    /// Series construction or alignment error.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Index construction error.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Moment estimation or optimization error.
    #[error(transparent)]
    Frontier(#[from] FrontierError),

    /// CAPM estimation error.
    #[error(transparent)]
    Capm(#[from] CapmError),
}

/// A stage-attributed pipeline failure.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// Stage that failed.
    pub stage: Stage,
    /// What went wrong.
    #[source]
    pub source: StageError,
}

/// External supplier of price histories.
///
/// Implementations may be unreliable or return partial history; the
/// pipeline tolerates missing dates/symbols through its gap policy but
/// treats a source-level failure as a `Fetch` stage error.
pub trait PriceSource {
    /// Fetch adjusted close history for the symbols over the date range.
    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceSeries>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Everything an analysis run produces, filled stage by stage.
///
/// Fields before a failed stage stay populated, so partial results are
/// retained even when [`AnalysisOutcome::error`] is set.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Aligned asset universe.
    pub universe: Option<AssetUniverse>,
    /// Benchmark return series.
    pub benchmark_returns: Option<ReturnSeries>,
    /// Annualized metrics per basket symbol.
    pub metrics: Vec<(String, AnnualizedMetrics)>,
    /// Constructed indices, one per configured scheme.
    pub indices: Vec<SyntheticIndex>,
    /// Annualized moments shared by the optimizer.
    pub moments: Option<MomentsEstimate>,
    /// Simulated frontier with distinguished portfolios.
    pub frontier: Option<FrontierResult>,
    /// CAPM estimate per (index name, benchmark) pair.
    pub capm: Vec<(String, CapmEstimate)>,
}

/// Report plus the error that stopped the run, if any.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Results of every stage that completed.
    pub report: AnalysisReport,
    /// The failure that aborted the run, if it did not finish.
    pub error: Option<PipelineError>,
}

impl AnalysisOutcome {
    /// Convert into a `Result`, discarding partial results on failure.
    pub fn into_result(self) -> Result<AnalysisReport, PipelineError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.report),
        }
    }
}

/// Drives the analysis pipeline over one configuration and price source.
#[derive(Debug)]
pub struct Analyzer<'a, S> {
    config: &'a AnalysisConfig,
    source: &'a S,
}

impl<'a, S: PriceSource> Analyzer<'a, S> {
    /// Create an analyzer.
    pub const fn new(config: &'a AnalysisConfig, source: &'a S) -> Self {
        Self { config, source }
    }

    /// Run all stages, retaining partial results on failure.
    pub fn run(&self) -> AnalysisOutcome {
        let mut report = AnalysisReport::default();
        let error = self.run_stages(&mut report).err();
        if let Some(e) = &error {
            tracing::error!(stage = %e.stage, error = %e.source, "analysis run aborted");
        }
        AnalysisOutcome { report, error }
    }

    fn run_stages(&self, report: &mut AnalysisReport) -> Result<(), PipelineError> {
        let config = self.config;

        config
            .validate()
            .map_err(|e| fail(Stage::Configure, StageError::Config(e)))?;

        tracing::info!(
            symbols = config.symbols.len(),
            benchmark = %config.benchmark_symbol,
            iterations = config.iterations,
            "starting analysis run"
        );

        let basket = self
            .source
            .fetch(&config.symbols, config.start_date, config.end_date)
            .map_err(|e| fail(Stage::Fetch, StageError::Source(e.to_string())))?;
        let benchmark_prices = self
            .source
            .fetch(
                std::slice::from_ref(&config.benchmark_symbol),
                config.start_date,
                config.end_date,
            )
            .map_err(|e| fail(Stage::Fetch, StageError::Source(e.to_string())))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                fail(
                    Stage::Fetch,
                    StageError::Source(format!(
                        "no history for benchmark {}",
                        config.benchmark_symbol
                    )),
                )
            })?;

        let universe =
            AssetUniverse::from_price_series(&basket, config.return_method, config.gap_policy)
                .map_err(|e| fail(Stage::Returns, e.into()))?;
        let benchmark_returns = benchmark_prices
            .returns(config.return_method)
            .map_err(|e| fail(Stage::Returns, e.into()))?;

        for symbol in universe.symbols() {
            let series = universe
                .return_series(symbol)
                .map_err(|e| fail(Stage::Returns, e.into()))?;
            let metrics = AnnualizedMetrics::from_returns(&series, config.trading_days)
                .map_err(|e| fail(Stage::Returns, e.into()))?;
            report.metrics.push((symbol.clone(), metrics));
        }

        report.universe = Some(universe.clone());
        report.benchmark_returns = Some(benchmark_returns.clone());

        let builder = IndexBuilder::new(&universe);
        for scheme in &config.schemes {
            let index = builder
                .build(scheme)
                .map_err(|e| fail(Stage::Indices, e.into()))?;
            tracing::info!(index = %index.name, "index constructed");
            report.indices.push(index);
        }

        let moments = MomentsEstimate::from_universe(&universe, config.trading_days)
            .map_err(|e| fail(Stage::Moments, e.into()))?;
        report.moments = Some(moments.clone());

        let optimizer = MonteCarloOptimizer::new(OptimizerConfig {
            iterations: config.iterations,
            seed: config.seed,
            risk_free_rate: config.risk_free_rate,
            allow_short: config.allow_short,
        })
        .map_err(|e| fail(Stage::Frontier, e.into()))?;

        // Current holdings baseline: the equal-weight basket.
        let k = universe.n_assets();
        let equal = WeightVector::long_only(Array1::from_elem(k, 1.0 / k as f64))
            .map_err(|e| fail(Stage::Frontier, e.into()))?;
        let frontier = optimizer
            .run(&moments, Some(&equal))
            .map_err(|e| fail(Stage::Frontier, e.into()))?;
        report.frontier = Some(frontier);

        let risk_free = RiskFreeRate::Annual(config.risk_free_rate);
        for index in &report.indices {
            let (portfolio, benchmark) = index
                .returns
                .align_with(&benchmark_returns)
                .map_err(|e| fail(Stage::AssetPricing, e.into()))?;
            let estimate = estimate_capm(&portfolio, &benchmark, &risk_free, config.trading_days)
                .map_err(|e| fail(Stage::AssetPricing, e.into()))?;
            report.capm.push((index.name.clone(), estimate));
        }

        tracing::info!("analysis run complete");
        Ok(())
    }
}

const fn fail(stage: Stage, source: StageError) -> PipelineError {
    PipelineError { stage, source }
}
