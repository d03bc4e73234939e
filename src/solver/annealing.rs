//! Simulated annealing over the full binary model.
//!
//! # Algorithm
//!
//! 1. Start each read from the all-zero assignment.
//! 2. Sweep every variable in id order, proposing a single-bit flip.
//! 3. Then, for every active variable, propose moving it to a random
//!    variable of the same request (paired off/on flip across the
//!    same-request penalty).
//! 4. Accept with the Metropolis rule at the sweep's inverse temperature;
//!    β grows geometrically across the configured range.
//! 5. Keep local fields `h_i = linear_i + Σ_j q_ij·x_j` up to date so a
//!    flip costs `±h_i` to evaluate.
//! 6. Return the lowest-energy end-of-sweep state over all reads.
//!
//! The budget is polled every [`CHECK_INTERVAL`] proposals and once more
//! after the final evaluation, so a returned sample never exceeds it.
//!
//! # Complexity
//! O(reads × sweeps × (n + accepted moves × degree))
//!
//! # Reference
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{AnnealingConfig, Sample, SolveBudget, Solver};
use crate::error::SolveError;
use crate::qubo::{BinaryModel, VariableId};

const LABEL: &str = "simulated_annealing";

/// Single-flip proposals between budget polls.
const CHECK_INTERVAL: usize = 4096;

/// Seeded simulated annealing strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingStrategy {
    config: AnnealingConfig,
    seed: u64,
}

impl AnnealingStrategy {
    /// Creates the strategy.
    pub fn new(config: AnnealingConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// The configuration.
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Geometric inverse temperatures, one per sweep, produced lazily.
    fn beta_schedule(&self) -> Result<impl Iterator<Item = f64> + Clone, SolveError> {
        let [hot, cold] = self.config.beta_range;
        if !(hot.is_finite() && cold.is_finite() && hot > 0.0 && cold >= hot) {
            return Err(SolveError::Failed(format!(
                "invalid beta range [{hot}, {cold}]"
            )));
        }
        let sweeps = self.config.num_sweeps.max(1);
        let (start, ratio) = if sweeps == 1 {
            (cold, 1.0)
        } else {
            (hot, (cold / hot).powf(1.0 / (sweeps - 1) as f64))
        };
        Ok((0..sweeps).map(move |k| start * ratio.powf(k as f64)))
    }
}

impl Solver for AnnealingStrategy {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn solve(&self, model: &BinaryModel, budget: &SolveBudget) -> Result<Sample, SolveError> {
        budget.check()?;
        let betas = self.beta_schedule()?;
        let n = model.num_variables();
        if n == 0 {
            return Ok(Sample::evaluate(model, &[], LABEL, budget.elapsed_ms(), 0));
        }

        let linear = model.linear_weights();
        let arena = model.arena();
        let request_penalty = model.request_penalty();

        let mut best_bits = vec![false; n];
        let mut best_energy = 0.0_f64;
        let mut sweeps_done: u64 = 0;

        for read in 0..self.config.num_reads.max(1) {
            let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(read as u64));
            let mut bits = vec![false; n];
            let mut field = linear.to_vec();
            let mut energy = 0.0_f64;

            for beta in betas.clone() {
                budget.check()?;
                for i in 0..n {
                    if i % CHECK_INTERVAL == CHECK_INTERVAL - 1 {
                        budget.check()?;
                    }
                    let delta = if bits[i] { -field[i] } else { field[i] };
                    if accept(&mut rng, beta, delta) {
                        flip(&mut bits, &mut field, model, i);
                        energy += delta;
                    }
                }

                for r in 0..arena.request_count() {
                    let block = arena.request_block(r);
                    if block.len() < 2 {
                        continue;
                    }
                    for i in block.clone() {
                        if !bits[i] {
                            continue;
                        }
                        let j = rng.random_range(block.clone());
                        if j == i || bits[j] {
                            continue;
                        }
                        // i and j share a request, so q_ij = P_REQ.
                        let delta = field[j] - field[i] - request_penalty;
                        if accept(&mut rng, beta, delta) {
                            flip(&mut bits, &mut field, model, i);
                            flip(&mut bits, &mut field, model, j);
                            energy += delta;
                        }
                    }
                }
                sweeps_done += 1;

                if energy < best_energy - 1e-9 {
                    best_energy = energy;
                    best_bits.clone_from(&bits);
                }
            }
            debug!(read, energy, best_energy, "annealing read finished");
        }

        let sample = Sample::evaluate(model, &best_bits, LABEL, budget.elapsed_ms(), sweeps_done);
        budget.check()?;
        Ok(sample)
    }
}

fn accept(rng: &mut SmallRng, beta: f64, delta: f64) -> bool {
    delta <= 0.0 || rng.random::<f64>() < (-beta * delta).exp()
}

fn flip(bits: &mut [bool], field: &mut [f64], model: &BinaryModel, i: usize) {
    bits[i] = !bits[i];
    let sign = if bits[i] { 1.0 } else { -1.0 };
    for (j, w) in model.neighbors(VariableId(i)) {
        field[j] += sign * w;
    }
}
