//! Time-boxed decomposition search for large models.
//!
//! # Algorithm
//!
//! The model is decomposed into request blocks. Each block is small enough
//! to optimize exactly given the rest of the assignment: the request takes
//! either no variable or its single cheapest one, where a variable's cost is
//! its linear weight plus `P_HOST` for every other request already holding
//! the same (host, slot).
//!
//! 1. Re-optimize blocks in a shuffled order until a full pass changes nothing.
//! 2. Record the assignment if it beats the best so far.
//! 3. Kick: move a random share of requests to random free (host, slot)
//!    pairs, then repeat from 1.
//!
//! The search stops at its own time limit or after `max_rounds`, and
//! returns the best assignment seen. The time limit is capped below the
//! remaining solve budget. The budget itself is polled every
//! [`CHECK_INTERVAL`] block optimizations and once more before returning:
//! running past it, or being cancelled, is an error even mid-pass. The
//! time limit only interrupts a pass once a first round has completed.
//!
//! Each block holds at most one variable and never takes an occupied pair
//! while a free one is cheaper, so every returned sample is feasible.
//!
//! # Reference
//! Shaw (1998), "Using Constraint Programming and Local Search Methods to
//! Solve Vehicle Routing Problems" (large neighbourhood search)

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{HybridConfig, Sample, SolveBudget, Solver};
use crate::error::SolveError;
use crate::models::SLOT_COUNT;
use crate::qubo::BinaryModel;

const LABEL: &str = "hybrid_decomposition";

/// Block optimizations between budget polls.
const CHECK_INTERVAL: usize = 16;

/// Share of the remaining budget the time limit may use; the rest is kept
/// for the final evaluation.
const BUDGET_SHARE: f64 = 0.9;

/// Decomposition strategy for models above the hybrid threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridStrategy {
    config: HybridConfig,
    seed: u64,
}

impl HybridStrategy {
    /// Creates the strategy.
    pub fn new(config: HybridConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// The configuration.
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }
}

/// One request choice per block plus (host, slot) occupancy counts.
struct BlockState<'m> {
    linear: &'m [f64],
    host_penalty: f64,
    width: usize,
    choice: Vec<Option<usize>>,
    occupancy: Vec<u32>,
}

impl<'m> BlockState<'m> {
    fn new(model: &'m BinaryModel) -> Self {
        let arena = model.arena();
        let width = arena.host_count() * SLOT_COUNT;
        Self {
            linear: model.linear_weights(),
            host_penalty: model.host_penalty(),
            width,
            choice: vec![None; arena.request_count()],
            occupancy: vec![0; width],
        }
    }

    fn set(&mut self, request: usize, offset: Option<usize>) {
        if let Some(old) = self.choice[request] {
            self.occupancy[old] -= 1;
        }
        if let Some(new) = offset {
            self.occupancy[new] += 1;
        }
        self.choice[request] = offset;
    }

    /// Exact re-optimization of one block. Returns whether the choice changed.
    fn optimize_block(&mut self, request: usize) -> bool {
        let current = self.choice[request];
        self.set(request, None);

        let base = request * self.width;
        let mut best: Option<usize> = None;
        let mut best_cost = 0.0;
        for offset in 0..self.width {
            let cost = self.linear[base + offset] + self.host_penalty * self.occupancy[offset] as f64;
            if cost < best_cost - 1e-12 {
                best_cost = cost;
                best = Some(offset);
            }
        }

        // Keep an equally good incumbent to avoid cycling.
        let keep = current.filter(|&c| {
            let cost = self.linear[base + c] + self.host_penalty * self.occupancy[c] as f64;
            best.is_some() && (cost - best_cost).abs() < 1e-12
        });
        let next = keep.or(best);
        self.set(request, next);
        next != current
    }

    fn energy(&self) -> f64 {
        let linear: f64 = self
            .choice
            .iter()
            .enumerate()
            .filter_map(|(r, c)| c.map(|o| self.linear[r * self.width + o]))
            .sum();
        let conflicts: f64 = self
            .occupancy
            .iter()
            .map(|&k| (k as f64) * (k.saturating_sub(1) as f64) / 2.0)
            .sum();
        linear + conflicts * self.host_penalty
    }

    fn bits(&self) -> Vec<bool> {
        let mut bits = vec![false; self.linear.len()];
        for (r, c) in self.choice.iter().enumerate() {
            if let Some(o) = c {
                bits[r * self.width + o] = true;
            }
        }
        bits
    }
}

impl Solver for HybridStrategy {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn solve(&self, model: &BinaryModel, budget: &SolveBudget) -> Result<Sample, SolveError> {
        budget.check()?;
        if model.is_empty() {
            return Ok(Sample::evaluate(model, &[], LABEL, budget.elapsed_ms(), 0));
        }

        let time_box = Duration::from_millis(self.config.time_limit_ms)
            .min(budget.remaining().mul_f64(BUDGET_SHARE));
        let deadline = Instant::now() + time_box;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut state = BlockState::new(model);
        let requests = state.choice.len();
        let kick_count = ((self.config.kick_fraction.clamp(0.0, 1.0) * requests as f64).ceil()
            as usize)
            .clamp(1, requests);
        let mut order: Vec<usize> = (0..requests).collect();

        let mut best_bits = state.bits();
        let mut best_energy = 0.0_f64;
        let mut rounds: u64 = 0;
        let mut steps: usize = 0;

        'search: loop {
            budget.check()?;

            loop {
                order.shuffle(&mut rng);
                let mut changed = false;
                for &r in &order {
                    steps += 1;
                    if steps % CHECK_INTERVAL == 0 {
                        budget.check()?;
                        if rounds > 0 && Instant::now() >= deadline {
                            break 'search;
                        }
                    }
                    changed |= state.optimize_block(r);
                }
                if !changed {
                    break;
                }
            }
            rounds += 1;

            let energy = state.energy();
            if energy < best_energy - 1e-9 {
                best_energy = energy;
                best_bits = state.bits();
            }

            let capped = self.config.max_rounds.is_some_and(|m| rounds >= m);
            if capped || Instant::now() >= deadline {
                break;
            }

            order.shuffle(&mut rng);
            for &r in order.iter().take(kick_count) {
                let offset = rng.random_range(0..state.width);
                if state.occupancy[offset] == 0 {
                    state.set(r, Some(offset));
                } else {
                    state.set(r, None);
                }
            }
        }

        debug!(rounds, best_energy, "hybrid search finished");
        let sample = Sample::evaluate(model, &best_bits, LABEL, budget.elapsed_ms(), rounds);
        budget.check()?;
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Host, ProblemSpec, Request};
    use crate::qubo::build_model;
    use crate::solver::CancelToken;

    fn strategy(rounds: u64) -> HybridStrategy {
        HybridStrategy::new(
            HybridConfig {
                time_limit_ms: 10_000,
                kick_fraction: 0.3,
                max_rounds: Some(rounds),
            },
            42,
        )
    }

    fn contention_model() -> BinaryModel {
        let requests = (0..20)
            .map(|i| Request::new(format!("r{i}")).with_importance(10.0 + i as f64))
            .collect();
        build_model(&ProblemSpec::new(requests, vec![Host::new("h1"), Host::new("h2")])).unwrap()
    }

    #[test]
    fn test_all_requests_placed() {
        let model = contention_model();
        let sample = strategy(5).solve(&model, &SolveBudget::from_millis(60_000)).unwrap();
        assert!(sample.feasible);
        assert_eq!(sample.active_count(), 20);
        let expected: f64 = (0..20).map(|i| -(10.0 + i as f64)).sum();
        assert!((sample.energy - expected).abs() < 1e-9);
        assert_eq!(sample.info.iterations, 5);
        assert_eq!(sample.backend_label, "hybrid_decomposition");
    }

    #[test]
    fn test_more_requests_than_pairs() {
        // 60 requests compete for 56 pairs; the surplus stays unscheduled.
        let requests = (0..60).map(|i| Request::new(format!("r{i}"))).collect();
        let model = build_model(&ProblemSpec::new(requests, vec![Host::new("h1")])).unwrap();
        let sample = strategy(3).solve(&model, &SolveBudget::from_millis(60_000)).unwrap();
        assert!(sample.feasible);
        assert_eq!(sample.active_count(), 56);
    }

    #[test]
    fn test_prefers_expertise_match() {
        let spec = ProblemSpec::new(
            vec![Request::new("r1").with_expertise("AI")],
            vec![Host::new("law").with_expertise("Law"), Host::new("ai").with_expertise("AI")],
        );
        let model = build_model(&spec).unwrap();
        let sample = strategy(2).solve(&model, &SolveBudget::from_millis(60_000)).unwrap();
        let id = sample.active_ids().next().unwrap();
        assert_eq!(model.arena().variable(id).unwrap().host, 1);
    }

    #[test]
    fn test_seeded_rounds_reproducible() {
        let model = contention_model();
        let budget = SolveBudget::from_millis(60_000);
        let a = strategy(4).solve(&model, &budget).unwrap();
        let b = strategy(4).solve(&model, &budget).unwrap();
        assert_eq!(a.assignment, b.assignment);
    }

    #[test]
    fn test_time_box_returns_best() {
        let s = HybridStrategy::new(
            HybridConfig {
                time_limit_ms: 20,
                kick_fraction: 0.2,
                max_rounds: None,
            },
            1,
        );
        let sample = s.solve(&contention_model(), &SolveBudget::from_millis(60_000)).unwrap();
        assert!(sample.feasible);
        assert!(sample.info.iterations >= 1);
    }

    #[test]
    fn test_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let budget = SolveBudget::from_millis(60_000).with_cancel(token);
        assert_eq!(
            strategy(1).solve(&contention_model(), &budget),
            Err(SolveError::Cancelled)
        );
    }

    #[test]
    fn test_expired_budget() {
        let err = strategy(1)
            .solve(&contention_model(), &SolveBudget::from_millis(0))
            .unwrap_err();
        assert!(matches!(err, SolveError::Timeout { .. }));
    }

    fn large_model() -> BinaryModel {
        let requests = (0..1000)
            .map(|i| Request::new(format!("r{i}")).with_importance((i % 97) as f64))
            .collect();
        let hosts = (0..10).map(|h| Host::new(format!("h{h}"))).collect();
        build_model(&ProblemSpec::new(requests, hosts)).unwrap()
    }

    #[test]
    fn test_budget_overrun_mid_pass_is_timeout() {
        let model = large_model();
        let s = HybridStrategy::new(
            HybridConfig {
                time_limit_ms: 5_000,
                kick_fraction: 0.2,
                max_rounds: None,
            },
            7,
        );
        let budget = SolveBudget::from_millis(1);
        let result = s.solve(&model, &budget);
        assert!(matches!(result, Err(SolveError::Timeout { budget_ms: 1 })));
        assert!(budget.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_success_stays_within_budget() {
        let s = HybridStrategy::new(
            HybridConfig {
                time_limit_ms: 60_000,
                kick_fraction: 0.2,
                max_rounds: None,
            },
            7,
        );
        let budget = SolveBudget::from_millis(100);
        match s.solve(&contention_model(), &budget) {
            Ok(sample) => {
                assert!(sample.feasible);
                assert!(sample.info.elapsed_ms <= budget.limit_ms());
            }
            Err(e) => assert!(matches!(e, SolveError::Timeout { .. }), "{e}"),
        }
    }

    #[test]
    fn test_cancel_mid_solve() {
        let token = CancelToken::new();
        let budget = SolveBudget::from_millis(600_000).with_cancel(token.clone());
        let s = HybridStrategy::new(
            HybridConfig {
                time_limit_ms: 600_000,
                kick_fraction: 0.5,
                max_rounds: None,
            },
            11,
        );

        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            token.cancel();
        });
        let started = Instant::now();
        let result = s.solve(&contention_model(), &budget);
        canceller.join().unwrap();

        assert_eq!(result, Err(SolveError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
