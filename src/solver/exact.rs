//! Constraint-aware branch and bound for small models.
//!
//! # Algorithm
//!
//! Enumerates feasible configurations only: each request, in input order,
//! takes either no variable or one variable whose (host, slot) is still
//! free. Options are tried cheapest first, and a branch is cut when its
//! energy plus the best reward still available to the remaining requests
//! cannot beat the incumbent.
//!
//! With `P_REQ > 2·max|linear|` dropping one end of any active penalty pair
//! lowers the energy, so the model's minimum is attained by a feasible
//! assignment and the search result is optimal for the whole model.
//!
//! # Reference
//! Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

use tracing::debug;

use super::{ExactConfig, Sample, SolveBudget, Solver};
use crate::error::SolveError;
use crate::models::SLOT_COUNT;
use crate::qubo::BinaryModel;

const LABEL: &str = "exact_branch_and_bound";
const BUDGET_CHECK_INTERVAL: u64 = 1024;

/// Exact strategy, selected explicitly for small models.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactStrategy {
    config: ExactConfig,
}

impl ExactStrategy {
    /// Creates the strategy.
    pub fn new(config: ExactConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &ExactConfig {
        &self.config
    }
}

struct Search<'a> {
    linear: &'a [f64],
    width: usize,
    /// Per request: block offsets with negative weight, cheapest first.
    options: Vec<Vec<usize>>,
    /// `optimistic[r]`: best possible reward of requests `r..`.
    optimistic: Vec<f64>,
    occupied: Vec<bool>,
    choice: Vec<Option<usize>>,
    best: f64,
    best_choice: Vec<Option<usize>>,
    nodes: u64,
    node_limit: u64,
    budget: &'a SolveBudget,
}

impl<'a> Search<'a> {
    fn new(model: &'a BinaryModel, node_limit: u64, budget: &'a SolveBudget) -> Self {
        let arena = model.arena();
        let width = arena.host_count() * SLOT_COUNT;
        let requests = arena.request_count();
        let linear = model.linear_weights();

        let options: Vec<Vec<usize>> = (0..requests)
            .map(|r| {
                let base = r * width;
                let mut offsets: Vec<usize> =
                    (0..width).filter(|&o| linear[base + o] < 0.0).collect();
                offsets.sort_by(|&a, &b| linear[base + a].total_cmp(&linear[base + b]));
                offsets
            })
            .collect();

        let mut optimistic = vec![0.0; requests + 1];
        for r in (0..requests).rev() {
            let best = options[r].first().map_or(0.0, |&o| linear[r * width + o]);
            optimistic[r] = optimistic[r + 1] + best;
        }

        Self {
            linear,
            width,
            options,
            optimistic,
            occupied: vec![false; width],
            choice: vec![None; requests],
            best: 0.0,
            best_choice: vec![None; requests],
            nodes: 0,
            node_limit,
            budget,
        }
    }

    fn branch(&mut self, request: usize, energy: f64) -> Result<(), SolveError> {
        self.nodes += 1;
        if self.nodes > self.node_limit {
            return Err(SolveError::Failed(format!(
                "node limit of {} reached",
                self.node_limit
            )));
        }
        if self.nodes % BUDGET_CHECK_INTERVAL == 0 {
            self.budget.check()?;
        }

        if request == self.choice.len() {
            if energy < self.best - 1e-9 {
                self.best = energy;
                self.best_choice.clone_from(&self.choice);
            }
            return Ok(());
        }
        if energy + self.optimistic[request] >= self.best - 1e-9 {
            return Ok(());
        }

        let base = request * self.width;
        for k in 0..self.options[request].len() {
            let offset = self.options[request][k];
            if self.occupied[offset] {
                continue;
            }
            self.occupied[offset] = true;
            self.choice[request] = Some(offset);
            let result = self.branch(request + 1, energy + self.linear[base + offset]);
            self.occupied[offset] = false;
            self.choice[request] = None;
            result?;
        }

        self.branch(request + 1, energy)
    }

    fn bits(&self) -> Vec<bool> {
        let mut bits = vec![false; self.linear.len()];
        for (r, c) in self.best_choice.iter().enumerate() {
            if let Some(o) = c {
                bits[r * self.width + o] = true;
            }
        }
        bits
    }
}

impl Solver for ExactStrategy {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn solve(&self, model: &BinaryModel, budget: &SolveBudget) -> Result<Sample, SolveError> {
        budget.check()?;
        let variables = model.num_variables();
        if variables > self.config.max_variables {
            return Err(SolveError::TooLarge {
                variables,
                limit: self.config.max_variables,
            });
        }

        let mut search = Search::new(model, self.config.node_limit, budget);
        search.branch(0, 0.0)?;
        debug!(nodes = search.nodes, best = search.best, "branch and bound finished");

        let sample = Sample::evaluate(model, &search.bits(), LABEL, budget.elapsed_ms(), search.nodes);
        budget.check()?;
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Host, ProblemSpec, Request};
    use crate::qubo::build_model;
    use crate::solver::{AnnealingConfig, AnnealingStrategy};

    fn exact() -> ExactStrategy {
        ExactStrategy::new(ExactConfig::default())
    }

    #[test]
    fn test_optimal_on_small_model() {
        let spec = ProblemSpec::new(
            vec![
                Request::new("r1").with_importance(90.0),
                Request::new("r2").with_importance(50.0),
            ],
            vec![Host::new("h1")],
        );
        let model = build_model(&spec).unwrap();
        let budget = SolveBudget::from_millis(60_000);
        let sample = exact().solve(&model, &budget).unwrap();
        assert!(sample.feasible);
        assert!((sample.energy + 140.0).abs() < 1e-9);
        assert_eq!(sample.backend_label, "exact_branch_and_bound");
        assert!(sample.info.elapsed_ms <= budget.limit_ms());
    }

    #[test]
    fn test_honours_preferred_day() {
        let spec = ProblemSpec::new(
            vec![Request::new("r1").with_preferred_date("2025-11-18")],
            vec![Host::new("h1")],
        );
        let model = build_model(&spec).unwrap();
        let sample = exact().solve(&model, &SolveBudget::from_millis(60_000)).unwrap();
        let id = sample.active_ids().next().unwrap();
        assert_eq!(model.arena().variable(id).unwrap().slot.day(), 3);
        assert!((sample.energy + 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_never_worse_than_annealing() {
        let spec = ProblemSpec::new(
            vec![
                Request::new("a").with_importance(70.0).with_expertise("AI"),
                Request::new("b").with_importance(20.0).with_expertise("Law"),
                Request::new("c").with_importance(40.0),
            ],
            vec![Host::new("h1").with_expertise("AI"), Host::new("h2").with_expertise("Law")],
        );
        let model = build_model(&spec).unwrap();
        let budget = SolveBudget::from_millis(60_000);
        let best = exact().solve(&model, &budget).unwrap();
        let sa = AnnealingStrategy::new(
            AnnealingConfig {
                num_reads: 1,
                num_sweeps: 100,
                ..Default::default()
            },
            3,
        )
        .solve(&model, &budget)
        .unwrap();
        assert!(best.energy <= sa.energy + 1e-9);
        assert!(best.feasible);
    }

    #[test]
    fn test_too_large() {
        let model = build_model(&ProblemSpec::new(
            vec![Request::new("r1")],
            vec![Host::new("h1")],
        ))
        .unwrap();
        let s = ExactStrategy::new(ExactConfig {
            max_variables: 10,
            ..Default::default()
        });
        assert_eq!(
            s.solve(&model, &SolveBudget::from_millis(1000)),
            Err(SolveError::TooLarge {
                variables: 56,
                limit: 10
            })
        );
    }

    #[test]
    fn test_node_limit() {
        let model = build_model(&ProblemSpec::new(
            vec![Request::new("r1"), Request::new("r2")],
            vec![Host::new("h1")],
        ))
        .unwrap();
        let s = ExactStrategy::new(ExactConfig {
            node_limit: 1,
            ..Default::default()
        });
        let err = s.solve(&model, &SolveBudget::from_millis(1000)).unwrap_err();
        assert!(matches!(err, SolveError::Failed(_)));
    }

    #[test]
    fn test_empty_model() {
        let model = build_model(&ProblemSpec::new(vec![], vec![])).unwrap();
        let sample = exact().solve(&model, &SolveBudget::from_millis(1000)).unwrap();
        assert!(sample.assignment.is_empty());
        assert_eq!(sample.energy, 0.0);
    }
}
