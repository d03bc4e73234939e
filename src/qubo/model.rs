//! Binary quadratic model.
//!
//! Energy of an assignment `x ∈ {0,1}^n`:
//!
//! ```text
//! E(x) = Σ_i linear[i]·x_i + Σ_(i<j) q_ij·x_i·x_j
//! ```
//!
//! Quadratic terms only connect variables of the same request
//! ([`PenaltyFamily::SameRequest`]) or the same (host, slot)
//! ([`PenaltyFamily::SameHostSlot`]), and each family carries one uniform
//! weight. The terms are therefore implicit in the arena: energy and
//! violations are computed from occupancy counts
//!
//! ```text
//! E(x) = Σ linear·x + P_REQ·Σ_r C(k_r, 2) + P_HOST·Σ_(h,s) C(k_hs, 2)
//! ```
//!
//! and explicit pairs are only produced on demand. Every quadratic term is
//! a constraint penalty, so an assignment is feasible exactly when no
//! request and no (host, slot) holds more than one active variable.

use serde::{Deserialize, Serialize};

use super::{Variable, VariableArena, VariableId};
use crate::models::{Slot, SLOT_COUNT};

/// Optimization sense. The engine only minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sense {
    /// Lower energy is better.
    #[default]
    Minimize,
}

/// Which constraint a quadratic penalty enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyFamily {
    /// At most one slot per request.
    SameRequest,
    /// At most one request per host per slot.
    SameHostSlot,
}

/// Weight on an unordered pair of distinct variables (`u < v`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticTerm {
    /// Smaller id of the pair.
    pub u: VariableId,
    /// Larger id of the pair.
    pub v: VariableId,
    /// Penalty weight.
    pub weight: f64,
    /// Constraint family.
    pub family: PenaltyFamily,
}

/// Size summary of a model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuboStats {
    /// Number of binary variables.
    pub total_variables: usize,
    /// Number of linear entries.
    pub linear_terms: usize,
    /// Number of quadratic entries.
    pub quadratic_terms: usize,
    /// Energy of the reported sample.
    pub energy: f64,
}

/// Penalty-weighted binary model for one problem.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryModel {
    arena: VariableArena,
    linear: Vec<f64>,
    request_penalty: f64,
    host_penalty: f64,
    sense: Sense,
}

impl BinaryModel {
    /// Assembles a model. The builder is the intended caller.
    pub(crate) fn from_parts(
        arena: VariableArena,
        linear: Vec<f64>,
        request_penalty: f64,
        host_penalty: f64,
    ) -> Self {
        Self {
            arena,
            linear,
            request_penalty,
            host_penalty,
            sense: Sense::Minimize,
        }
    }

    /// Variable layout.
    pub fn arena(&self) -> &VariableArena {
        &self.arena
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    /// Whether the model has no variable.
    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    /// Linear weight of one variable.
    pub fn linear(&self, id: VariableId) -> f64 {
        self.linear[id.index()]
    }

    /// All linear weights, indexed by variable id.
    pub fn linear_weights(&self) -> &[f64] {
        &self.linear
    }

    /// Penalty on two variables of the same request.
    pub fn request_penalty(&self) -> f64 {
        self.request_penalty
    }

    /// Penalty on two variables of the same (host, slot).
    pub fn host_penalty(&self) -> f64 {
        self.host_penalty
    }

    /// Optimization sense.
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Largest absolute linear weight (0 for an empty model).
    pub fn max_abs_linear(&self) -> f64 {
        self.linear.iter().fold(0.0_f64, |acc, w| acc.max(w.abs()))
    }

    /// Number of quadratic terms.
    pub fn quadratic_count(&self) -> usize {
        let requests = self.arena.request_count();
        let pairs = self.arena.host_count() * SLOT_COUNT;
        requests * pair_count(pairs) + pairs * pair_count(requests)
    }

    /// Quadratic terms in emission order: every same-request pair by
    /// request, then every same-host-slot pair by host and slot.
    pub fn quadratic_terms(&self) -> impl Iterator<Item = QuadraticTerm> + '_ {
        let arena = &self.arena;
        let same_request = (0..arena.request_count()).flat_map(move |r| {
            let block = arena.request_block(r);
            block.clone().flat_map(move |u| {
                ((u + 1)..block.end).map(move |v| QuadraticTerm {
                    u: VariableId(u),
                    v: VariableId(v),
                    weight: self.request_penalty,
                    family: PenaltyFamily::SameRequest,
                })
            })
        });
        let same_host_slot = (0..arena.host_count()).flat_map(move |h| {
            Slot::all().flat_map(move |slot| {
                (0..arena.request_count()).flat_map(move |a| {
                    ((a + 1)..arena.request_count()).map(move |b| QuadraticTerm {
                        u: arena.id_of(Variable { request: a, host: h, slot }),
                        v: arena.id_of(Variable { request: b, host: h, slot }),
                        weight: self.host_penalty,
                        family: PenaltyFamily::SameHostSlot,
                    })
                })
            })
        });
        same_request.chain(same_host_slot)
    }

    /// Quadratic neighbours of one variable: its request block, then its
    /// (host, slot) family, each paired with the family weight.
    pub fn neighbors(&self, id: VariableId) -> impl Iterator<Item = (usize, f64)> + '_ {
        let var = self.arena.variable(id);
        let block = var
            .map(|v| self.arena.request_block(v.request))
            .unwrap_or(0..0);
        let same_request = block
            .filter(move |&j| j != id.index())
            .map(move |j| (j, self.request_penalty));
        let same_host_slot = var
            .into_iter()
            .flat_map(move |v| self.arena.host_slot_family(v.host, v.slot))
            .filter(move |j| *j != id)
            .map(move |j| (j.index(), self.host_penalty));
        same_request.chain(same_host_slot)
    }

    /// Active-variable counts per request and per (host, slot).
    fn occupancy(&self, values: &[f64]) -> (Vec<usize>, Vec<usize>) {
        let width = self.arena.host_count() * SLOT_COUNT;
        let mut per_request = vec![0; self.arena.request_count()];
        let mut per_host_slot = vec![0; width];
        for (i, _) in values
            .iter()
            .take(self.num_variables())
            .enumerate()
            .filter(|&(_, &v)| v > 0.5)
        {
            per_request[i / width] += 1;
            per_host_slot[i % width] += 1;
        }
        (per_request, per_host_slot)
    }

    /// Energy of an assignment; values above 0.5 count as 1.
    ///
    /// # Panics
    /// Panics if `values` is shorter than the number of variables.
    pub fn energy(&self, values: &[f64]) -> f64 {
        let linear: f64 = self
            .linear
            .iter()
            .zip(&values[..self.num_variables()])
            .filter(|&(_, &x)| x > 0.5)
            .map(|(w, _)| w)
            .sum();
        let (per_request, per_host_slot) = self.occupancy(values);
        let request_pairs: usize = per_request.iter().map(|&k| pair_count(k)).sum();
        let host_pairs: usize = per_host_slot.iter().map(|&k| pair_count(k)).sum();
        linear
            + self.request_penalty * request_pairs as f64
            + self.host_penalty * host_pairs as f64
    }

    /// Number of penalty pairs with both ends active.
    pub fn violations(&self, values: &[f64]) -> usize {
        let (per_request, per_host_slot) = self.occupancy(values);
        per_request
            .iter()
            .chain(&per_host_slot)
            .map(|&k| pair_count(k))
            .sum()
    }

    /// Whether no penalty is paid by the assignment.
    pub fn is_feasible(&self, values: &[f64]) -> bool {
        self.violations(values) == 0
    }

    /// Size summary with the given sample energy.
    pub fn stats(&self, energy: f64) -> QuboStats {
        QuboStats {
            total_variables: self.num_variables(),
            linear_terms: self.linear.len(),
            quadratic_terms: self.quadratic_count(),
            energy,
        }
    }
}

/// `C(n, 2)`.
pub(crate) fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One request, one host: 56 variables, only the request family.
    fn tiny_model() -> BinaryModel {
        let arena = VariableArena::new(1, 1);
        let mut linear = vec![-10.0; arena.len()];
        linear[1] = -12.0;
        BinaryModel::from_parts(arena, linear, 30.0, 45.0)
    }

    /// Two requests, one host.
    fn shared_host_model() -> BinaryModel {
        let arena = VariableArena::new(2, 1);
        BinaryModel::from_parts(arena, vec![-5.0; arena.len()], 11.0, 16.5)
    }

    #[test]
    fn test_energy_and_feasibility() {
        let m = tiny_model();
        let mut x = vec![0.0; m.num_variables()];
        assert_eq!(m.energy(&x), 0.0);

        x[1] = 1.0;
        assert!((m.energy(&x) + 12.0).abs() < 1e-10);
        assert!(m.is_feasible(&x));

        x[0] = 1.0;
        // -10 - 12 + 30
        assert!((m.energy(&x) - 8.0).abs() < 1e-10);
        assert_eq!(m.violations(&x), 1);
        assert!(!m.is_feasible(&x));

        x[2] = 1.0;
        // three active in one request: C(3, 2) pairs
        assert_eq!(m.violations(&x), 3);
        assert!((m.energy(&x) - (-32.0 + 90.0)).abs() < 1e-10);
    }

    #[test]
    fn test_host_slot_family_energy() {
        let m = shared_host_model();
        let mut x = vec![0.0; m.num_variables()];
        x[3] = 1.0;
        x[56 + 3] = 1.0;
        assert_eq!(m.violations(&x), 1);
        assert!((m.energy(&x) - (-10.0 + 16.5)).abs() < 1e-10);

        x[56 + 3] = 0.0;
        x[56 + 4] = 1.0;
        assert!(m.is_feasible(&x));
    }

    #[test]
    fn test_energy_matches_explicit_terms() {
        let m = shared_host_model();
        let mut x = vec![0.0; m.num_variables()];
        for i in [0, 1, 7, 56, 57, 63, 100] {
            x[i] = 1.0;
        }
        let linear: f64 = (0..m.num_variables())
            .filter(|&i| x[i] > 0.5)
            .map(|i| m.linear(VariableId(i)))
            .sum();
        let pairs: Vec<QuadraticTerm> = m
            .quadratic_terms()
            .filter(|t| x[t.u.index()] > 0.5 && x[t.v.index()] > 0.5)
            .collect();
        let quadratic: f64 = pairs.iter().map(|t| t.weight).sum();
        assert!((m.energy(&x) - (linear + quadratic)).abs() < 1e-9);
        assert_eq!(m.violations(&x), pairs.len());
    }

    #[test]
    fn test_threshold() {
        let m = tiny_model();
        let mut x = vec![0.0; m.num_variables()];
        x[1] = 0.51;
        x[0] = 0.49;
        assert!((m.energy(&x) + 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_neighbors_cover_both_families() {
        let m = shared_host_model();
        let n: Vec<(usize, f64)> = m.neighbors(VariableId(3)).collect();
        assert_eq!(n.len(), 55 + 1);
        assert!(n.iter().take(55).all(|&(j, w)| j < 56 && j != 3 && w == 11.0));
        assert_eq!(n[55], (59, 16.5));

        let t: Vec<(usize, f64)> = tiny_model().neighbors(VariableId(0)).collect();
        assert_eq!(t.len(), 55);
        assert!(tiny_model().neighbors(VariableId(500)).next().is_none());
    }

    #[test]
    fn test_stats() {
        let m = tiny_model();
        let s = m.stats(-12.0);
        assert_eq!(s.total_variables, 56);
        assert_eq!(s.linear_terms, 56);
        assert_eq!(s.quadratic_terms, 56 * 55 / 2);
        assert_eq!(m.quadratic_terms().count(), s.quadratic_terms);
        assert!((m.max_abs_linear() - 12.0).abs() < 1e-10);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["totalVariables"], 56);
        assert_eq!(json["quadraticTerms"], 1540);
    }

    #[test]
    fn test_large_model_stays_compact() {
        // 40 requests × 20 hosts: ~26 million implicit pairs, no storage.
        let arena = VariableArena::new(40, 20);
        let m = BinaryModel::from_parts(arena, vec![-1.0; arena.len()], 3.0, 4.5);
        assert_eq!(m.num_variables(), 44_800);
        assert_eq!(m.quadratic_count(), 40 * (1120 * 1119 / 2) + 1120 * (40 * 39 / 2));
        assert!(std::mem::size_of_val(m.linear_weights()) < 1_000_000);
    }
}
