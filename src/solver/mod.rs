//! Solver contract and strategy dispatch.
//!
//! A [`Solver`] turns a [`BinaryModel`] into a complete [`Sample`] within a
//! [`SolveBudget`], or fails with a [`SolveError`]. It never returns a
//! partial sample.
//!
//! # Strategies
//!
//! | Strategy | Use |
//! |----------|-----|
//! | [`AnnealingStrategy`] | default for models up to the hybrid threshold |
//! | [`HybridStrategy`] | models above the threshold, time-boxed |
//! | [`ExactStrategy`] | small models, selected explicitly |
//!
//! The set of strategies is closed and fixed when a [`StrategySet`] is built
//! from a [`SolverConfig`]; selection depends only on the configuration and
//! the model size.

mod annealing;
mod budget;
mod config;
mod exact;
mod hybrid;
mod sample;

pub use annealing::AnnealingStrategy;
pub use budget::{CancelToken, SolveBudget};
pub use config::{
    AnnealingConfig, ExactConfig, HybridConfig, SolverConfig, StrategyChoice,
    DEFAULT_HYBRID_THRESHOLD, DEFAULT_SEED, DEFAULT_TIME_BUDGET_MS,
};
pub use exact::ExactStrategy;
pub use hybrid::HybridStrategy;
pub use sample::{Sample, SolveInfo};

use std::fmt;

use crate::error::SolveError;
use crate::qubo::BinaryModel;

/// Capability shared by every solving strategy.
pub trait Solver {
    /// Backend name reported in results.
    fn label(&self) -> &'static str;

    /// Solves the model within the budget.
    ///
    /// # Errors
    /// `Timeout` or `Cancelled` when the budget stops the work, or any other
    /// [`SolveError`] the strategy raises.
    fn solve(&self, model: &BinaryModel, budget: &SolveBudget) -> Result<Sample, SolveError>;
}

/// Kind of strategy a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Simulated annealing.
    Annealing,
    /// Decomposition search.
    Hybrid,
    /// Branch and bound.
    Exact,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Annealing => write!(f, "annealing"),
            StrategyKind::Hybrid => write!(f, "hybrid"),
            StrategyKind::Exact => write!(f, "exact"),
        }
    }
}

/// A configured strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Simulated annealing.
    Annealing(AnnealingStrategy),
    /// Decomposition search.
    Hybrid(HybridStrategy),
    /// Branch and bound.
    Exact(ExactStrategy),
}

impl Strategy {
    /// Which variant this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Annealing(_) => StrategyKind::Annealing,
            Strategy::Hybrid(_) => StrategyKind::Hybrid,
            Strategy::Exact(_) => StrategyKind::Exact,
        }
    }
}

impl Solver for Strategy {
    fn label(&self) -> &'static str {
        match self {
            Strategy::Annealing(s) => s.label(),
            Strategy::Hybrid(s) => s.label(),
            Strategy::Exact(s) => s.label(),
        }
    }

    fn solve(&self, model: &BinaryModel, budget: &SolveBudget) -> Result<Sample, SolveError> {
        match self {
            Strategy::Annealing(s) => s.solve(model, budget),
            Strategy::Hybrid(s) => s.solve(model, budget),
            Strategy::Exact(s) => s.solve(model, budget),
        }
    }
}

/// Configured strategies plus the routing policy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySet {
    choice: StrategyChoice,
    hybrid_threshold: usize,
    annealing: Option<AnnealingStrategy>,
    hybrid: Option<HybridStrategy>,
    exact: Option<ExactStrategy>,
}

impl StrategySet {
    /// Builds the set from configuration.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            choice: config.strategy,
            hybrid_threshold: config.hybrid_threshold,
            annealing: config
                .annealing
                .clone()
                .map(|c| AnnealingStrategy::new(c, config.seed)),
            hybrid: config
                .hybrid
                .clone()
                .map(|c| HybridStrategy::new(c, config.seed)),
            exact: config.exact.clone().map(ExactStrategy::new),
        }
    }

    /// Route for a model size, before checking configuration.
    ///
    /// `Auto` sends models with more than `hybrid_threshold` variables to
    /// the hybrid strategy and everything else to annealing.
    pub fn route(&self, num_variables: usize) -> Option<StrategyKind> {
        match self.choice {
            StrategyChoice::Auto if num_variables > self.hybrid_threshold => {
                Some(StrategyKind::Hybrid)
            }
            StrategyChoice::Auto => Some(StrategyKind::Annealing),
            StrategyChoice::Annealing => Some(StrategyKind::Annealing),
            StrategyChoice::Hybrid => Some(StrategyKind::Hybrid),
            StrategyChoice::Exact => Some(StrategyKind::Exact),
            StrategyChoice::Disabled => None,
        }
    }

    /// Selects the strategy for a model size.
    ///
    /// # Errors
    /// `BackendUnavailable` if routing is disabled or the routed strategy
    /// is not configured. No other strategy is tried in its place.
    pub fn select(&self, num_variables: usize) -> Result<Strategy, SolveError> {
        let kind = self.route(num_variables).ok_or_else(|| {
            SolveError::BackendUnavailable("no solver configured".to_string())
        })?;
        let strategy = match kind {
            StrategyKind::Annealing => self.annealing.clone().map(Strategy::Annealing),
            StrategyKind::Hybrid => self.hybrid.clone().map(Strategy::Hybrid),
            StrategyKind::Exact => self.exact.clone().map(Strategy::Exact),
        };
        strategy.ok_or_else(|| {
            SolveError::BackendUnavailable(format!("{kind} strategy is not configured"))
        })
    }
}
