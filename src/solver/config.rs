//! Solver configuration, read from the `solverConfig` input object.
//!
//! Every field has a default; an empty object selects automatic dispatch
//! with annealing and hybrid configured and the exact strategy off.
//! Setting a strategy section to `null` removes that strategy.

use serde::{Deserialize, Serialize};

/// Variable count above which automatic dispatch routes to the hybrid strategy.
pub const DEFAULT_HYBRID_THRESHOLD: usize = 5000;
/// Wall-clock budget of one solve attempt.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 30_000;
/// Seed shared by the stochastic strategies.
pub const DEFAULT_SEED: u64 = 42;

/// How the strategy is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyChoice {
    /// Hybrid above the threshold, annealing otherwise.
    #[default]
    Auto,
    /// Always annealing.
    Annealing,
    /// Always hybrid.
    Hybrid,
    /// Always exact.
    Exact,
    /// No solver; every call falls back.
    #[serde(rename = "none")]
    Disabled,
}

/// Simulated annealing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnealingConfig {
    /// Independent restarts; the best is returned.
    pub num_reads: usize,
    /// Sweeps per read.
    pub num_sweeps: usize,
    /// Inverse temperature at the first and last sweep.
    pub beta_range: [f64; 2],
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            num_reads: 10,
            num_sweeps: 1000,
            beta_range: [0.1, 10.0],
        }
    }
}

/// Decomposition search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HybridConfig {
    /// Time box, further capped by the solve budget.
    pub time_limit_ms: u64,
    /// Share of requests perturbed between rounds.
    pub kick_fraction: f64,
    /// Optional cap on rounds; makes a seeded run reproducible.
    pub max_rounds: Option<u64>,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 5000,
            kick_fraction: 0.2,
            max_rounds: None,
        }
    }
}

/// Branch and bound limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExactConfig {
    /// Larger models are refused.
    pub max_variables: usize,
    /// Search nodes before giving up.
    pub node_limit: u64,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            max_variables: 4096,
            node_limit: 2_000_000,
        }
    }
}

/// Strategy selection and per-strategy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    /// Routing mode.
    pub strategy: StrategyChoice,
    /// Threshold `T` for automatic dispatch.
    pub hybrid_threshold: usize,
    /// Budget applied to every solve attempt.
    pub time_budget_ms: u64,
    /// Seed for stochastic strategies.
    pub seed: u64,
    /// Annealing settings (`None` = not configured).
    pub annealing: Option<AnnealingConfig>,
    /// Hybrid settings (`None` = not configured).
    pub hybrid: Option<HybridConfig>,
    /// Exact settings (`None` = not configured).
    pub exact: Option<ExactConfig>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyChoice::Auto,
            hybrid_threshold: DEFAULT_HYBRID_THRESHOLD,
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            seed: DEFAULT_SEED,
            annealing: Some(AnnealingConfig::default()),
            hybrid: Some(HybridConfig::default()),
            exact: None,
        }
    }
}

impl SolverConfig {
    /// Configuration with no strategy; every call uses the fallback.
    pub fn disabled() -> Self {
        Self {
            strategy: StrategyChoice::Disabled,
            annealing: None,
            hybrid: None,
            exact: None,
            ..Default::default()
        }
    }

    /// Sets the routing mode.
    pub fn with_strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the solve budget.
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = ms;
        self
    }

    /// Sets the annealing section.
    pub fn with_annealing(mut self, config: Option<AnnealingConfig>) -> Self {
        self.annealing = config;
        self
    }

    /// Sets the hybrid section.
    pub fn with_hybrid(mut self, config: Option<HybridConfig>) -> Self {
        self.hybrid = config;
        self
    }

    /// Sets the exact section.
    pub fn with_exact(mut self, config: Option<ExactConfig>) -> Self {
        self.exact = config;
        self
    }
}
