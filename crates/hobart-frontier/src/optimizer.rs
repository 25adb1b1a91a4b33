//! Monte Carlo efficient-frontier simulation.
//!
//! Draws seeded random weight vectors over the simplex, evaluates each
//! against a shared [`MomentsEstimate`], and identifies the global
//! minimum variance (GMV) and tangency (max-Sharpe) portfolios. Both are
//! refined with closed-form solutions when the covariance admits them:
//!
//! - GMV: `w = Σ⁻¹·1 / (1ᵀ·Σ⁻¹·1)`
//! - Tangency: `w ∝ Σ⁻¹·(μ − r_f·1)`
//!
//! A singular Σ drops the run back to simulation-only identification; any
//! other error propagates.

use crate::moments::MomentsEstimate;
use crate::portfolio::{Portfolio, WeightVector};
use crate::solve::solve_spd;
use crate::{FrontierError, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing closed-form results to sampled extremes.
const REFINE_TOLERANCE: f64 = 1e-9;

/// Configuration for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Number of weight vectors to sample.
    pub iterations: usize,
    /// RNG seed; identical seeds and inputs reproduce identical results.
    pub seed: u64,
    /// Annualized risk-free rate for Sharpe ratios and the CML.
    pub risk_free_rate: f64,
    /// Whether sampled weights may be negative.
    pub allow_short: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            seed: 42,
            risk_free_rate: 0.04,
            allow_short: false,
        }
    }
}

/// The Capital Market Line: the ray from the risk-free point through the
/// tangency portfolio in (volatility, return) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalMarketLine {
    /// Intercept: the annualized risk-free rate.
    pub risk_free_rate: f64,
    /// Slope: the tangency portfolio's Sharpe ratio.
    pub slope: f64,
}

impl CapitalMarketLine {
    /// Expected return the line assigns to a volatility level.
    pub fn expected_return(&self, volatility: f64) -> f64 {
        self.risk_free_rate + self.slope * volatility
    }
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierResult {
    /// Every sampled portfolio, in sampling order.
    pub portfolios: Vec<Portfolio>,
    /// Global minimum variance portfolio.
    pub gmv: Portfolio,
    /// Tangency (max-Sharpe) portfolio.
    pub tangency: Portfolio,
    /// Caller-supplied reference portfolio (e.g. current holdings),
    /// evaluated against the same moments.
    pub reference: Option<Portfolio>,
    /// The Capital Market Line through the tangency portfolio.
    pub cml: CapitalMarketLine,
    /// Whether the GMV came from the closed-form solution rather than the
    /// sampled cloud.
    pub gmv_closed_form: bool,
    /// Whether the tangency came from the closed-form solution.
    pub tangency_closed_form: bool,
}

/// Seeded Monte Carlo optimizer over portfolio weights.
#[derive(Debug, Clone)]
pub struct MonteCarloOptimizer {
    config: OptimizerConfig,
}

impl MonteCarloOptimizer {
    /// Create an optimizer.
    ///
    /// # Errors
    /// `InvalidParameter` when `iterations` is zero or the risk-free rate
    /// is not finite.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        if config.iterations == 0 {
            return Err(FrontierError::InvalidParameter(
                "simulation count must be positive".to_string(),
            ));
        }
        if !config.risk_free_rate.is_finite() {
            return Err(FrontierError::InvalidParameter(format!(
                "risk-free rate {} is not finite",
                config.risk_free_rate
            )));
        }
        Ok(Self { config })
    }

    /// The configuration this optimizer runs with.
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Run the simulation and identify the distinguished portfolios.
    ///
    /// `reference` is an optional portfolio of current holdings to place
    /// on the same risk/return plane.
    ///
    /// Weights are drawn sequentially from the seeded RNG, then evaluated
    /// in parallel; the result is identical regardless of thread count.
    ///
    /// # Errors
    /// `InvalidParameter` for fewer than 2 assets. `SingularCovariance`
    /// from the closed-form path is caught internally and triggers the
    /// simulation-only fallback; any other error propagates.
    pub fn run(
        &self,
        moments: &MomentsEstimate,
        reference: Option<&WeightVector>,
    ) -> Result<FrontierResult> {
        let k = moments.n_assets();
        if k < 2 {
            return Err(FrontierError::InvalidParameter(format!(
                "optimization requires at least 2 assets, got {k}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let samples: Vec<WeightVector> = (0..self.config.iterations)
            .map(|_| sample_weights(&mut rng, k, self.config.allow_short))
            .collect::<Result<_>>()?;

        let risk_free_rate = self.config.risk_free_rate;
        let portfolios: Vec<Portfolio> = samples
            .into_par_iter()
            .map(|w| Portfolio::evaluate(&w, moments, risk_free_rate))
            .collect::<Result<_>>()?;

        // First sampled wins ties: strict comparisons while scanning in
        // sampling order keep the earliest extremum.
        let mut gmv_idx = 0;
        let mut tangency_idx = 0;
        for (i, p) in portfolios.iter().enumerate() {
            if p.volatility < portfolios[gmv_idx].volatility {
                gmv_idx = i;
            }
            if p.sharpe_ratio > portfolios[tangency_idx].sharpe_ratio {
                tangency_idx = i;
            }
        }

        let mut gmv = portfolios[gmv_idx].clone();
        let mut tangency = portfolios[tangency_idx].clone();
        let mut gmv_closed_form = false;
        let mut tangency_closed_form = false;

        match self.closed_form_gmv(moments) {
            Ok(Some(candidate)) => {
                if candidate.volatility <= gmv.volatility + REFINE_TOLERANCE {
                    gmv = candidate;
                    gmv_closed_form = true;
                } else {
                    tracing::warn!(
                        closed_form_vol = candidate.volatility,
                        sampled_vol = gmv.volatility,
                        "closed-form GMV volatility exceeds best sampled volatility; \
                         covariance may be ill-conditioned, keeping sampled GMV"
                    );
                }
            }
            Ok(None) => {}
            Err(FrontierError::SingularCovariance(reason)) => {
                tracing::warn!(%reason, "singular covariance, falling back to simulation-only GMV");
            }
            Err(other) => return Err(other),
        }

        match self.closed_form_tangency(moments) {
            Ok(Some(candidate)) => {
                if candidate.sharpe_ratio >= tangency.sharpe_ratio - REFINE_TOLERANCE {
                    tangency = candidate;
                    tangency_closed_form = true;
                } else {
                    tracing::debug!("closed-form tangency under sampled max Sharpe, keeping sample");
                }
            }
            Ok(None) => {}
            Err(FrontierError::SingularCovariance(reason)) => {
                tracing::warn!(
                    %reason,
                    "singular covariance, falling back to simulation-only tangency"
                );
            }
            Err(other) => return Err(other),
        }

        let reference = reference
            .map(|w| Portfolio::evaluate(w, moments, risk_free_rate))
            .transpose()?;

        let cml = CapitalMarketLine {
            risk_free_rate,
            slope: tangency.sharpe_ratio,
        };

        Ok(FrontierResult {
            portfolios,
            gmv,
            tangency,
            reference,
            cml,
            gmv_closed_form,
            tangency_closed_form,
        })
    }

    /// Unconstrained minimum-variance weights `Σ⁻¹1 / (1ᵀΣ⁻¹1)`.
    ///
    /// Returns `Ok(None)` when the sign constraint binds under a long-only
    /// policy, so the caller keeps the sampled GMV.
    fn closed_form_gmv(&self, moments: &MomentsEstimate) -> Result<Option<Portfolio>> {
        let ones = Array1::ones(moments.n_assets());
        let x = solve_spd(moments.covariance(), &ones)?;
        self.normalized_candidate(x, moments)
    }

    /// Unconstrained tangency weights `∝ Σ⁻¹(μ − r_f·1)`.
    fn closed_form_tangency(&self, moments: &MomentsEstimate) -> Result<Option<Portfolio>> {
        let excess = moments.mean() - self.config.risk_free_rate;
        let x = solve_spd(moments.covariance(), &excess)?;
        self.normalized_candidate(x, moments)
    }

    fn normalized_candidate(
        &self,
        solution: Array1<f64>,
        moments: &MomentsEstimate,
    ) -> Result<Option<Portfolio>> {
        let sum = solution.sum();
        if sum.abs() < REFINE_TOLERANCE {
            return Ok(None);
        }
        let weights = solution / sum;

        if !self.config.allow_short && weights.iter().any(|w| *w < -REFINE_TOLERANCE) {
            // Sign constraint binds; the unconstrained solution is not
            // admissible under long-only.
            return Ok(None);
        }

        let weights = if self.config.allow_short {
            WeightVector::allow_short(weights)?
        } else {
            // Clamp the residual float noise around zero before validation.
            let clamped = weights.mapv(|w| if w < 0.0 { 0.0 } else { w });
            let total = clamped.sum();
            WeightVector::long_only(clamped / total)?
        };

        Portfolio::evaluate(&weights, moments, self.config.risk_free_rate).map(Some)
    }
}

/// Draw one weight vector summing to 1.
///
/// Long-only: uniform draws in [0, 1) normalized by their sum. This
/// concentrates samples toward the simplex interior relative to a flat
/// Dirichlet; the bias is acceptable for frontier tracing and matches the
/// usual Monte Carlo construction.
///
/// Short-allowed: uniform draws in [-1, 1) normalized by their sum,
/// redrawn while the sum is too close to zero to normalize stably.
fn sample_weights(rng: &mut StdRng, k: usize, allow_short: bool) -> Result<WeightVector> {
    if allow_short {
        loop {
            let raw: Array1<f64> = Array1::from_iter((0..k).map(|_| rng.gen_range(-1.0..1.0)));
            let sum = raw.sum();
            if sum.abs() >= 0.1 {
                return WeightVector::allow_short(raw / sum);
            }
        }
    } else {
        loop {
            let raw: Array1<f64> = Array1::from_iter((0..k).map(|_| rng.r#gen::<f64>()));
            let sum = raw.sum();
            if sum > REFINE_TOLERANCE {
                return WeightVector::long_only(raw / sum);
            }
        }
    }
}
