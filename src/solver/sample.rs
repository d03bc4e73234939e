//! Solver output.

use serde::Serialize;

use crate::qubo::{BinaryModel, VariableId};

/// Run statistics attached to a [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveInfo {
    /// Wall-clock time of the solve.
    pub elapsed_ms: u64,
    /// Strategy-specific unit of work (sweeps, rounds, nodes).
    pub iterations: u64,
    /// Penalty pairs with both ends active.
    pub violations: usize,
}

/// Complete assignment returned by a strategy or the fallback.
///
/// `assignment` is indexed by [`VariableId`]. Values above 0.5 count as
/// active, so continuous relaxations decode the same way as 0/1 vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Value per variable id.
    pub assignment: Vec<f64>,
    /// Model energy of the assignment.
    pub energy: f64,
    /// No penalty pair is active.
    pub feasible: bool,
    /// Name of the producer.
    pub backend_label: String,
    /// Run statistics.
    pub info: SolveInfo,
}

impl Sample {
    /// Evaluates a 0/1 assignment against the model.
    pub fn evaluate(
        model: &BinaryModel,
        bits: &[bool],
        backend_label: impl Into<String>,
        elapsed_ms: u64,
        iterations: u64,
    ) -> Self {
        let assignment: Vec<f64> = bits.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
        let violations = model.violations(&assignment);
        Self {
            energy: model.energy(&assignment),
            feasible: violations == 0,
            assignment,
            backend_label: backend_label.into(),
            info: SolveInfo {
                elapsed_ms,
                iterations,
                violations,
            },
        }
    }

    /// Ids whose value is above the 0.5 threshold, ascending.
    pub fn active_ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0.5)
            .map(|(i, _)| VariableId(i))
    }

    /// Number of active variables.
    pub fn active_count(&self) -> usize {
        self.assignment.iter().filter(|&&v| v > 0.5).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Host, ProblemSpec, Request};
    use crate::qubo::build_model;

    #[test]
    fn test_evaluate() {
        let spec = ProblemSpec::new(
            vec![Request::new("r1").with_importance(30.0)],
            vec![Host::new("h1")],
        );
        let model = build_model(&spec).unwrap();
        let mut bits = vec![false; model.num_variables()];
        bits[4] = true;

        let s = Sample::evaluate(&model, &bits, "test", 3, 7);
        assert!(s.feasible);
        assert!((s.energy + 30.0).abs() < 1e-10);
        assert_eq!(s.active_count(), 1);
        assert_eq!(s.active_ids().collect::<Vec<_>>(), vec![VariableId(4)]);
        assert_eq!(s.info.iterations, 7);

        bits[5] = true;
        let s = Sample::evaluate(&model, &bits, "test", 0, 0);
        assert!(!s.feasible);
        assert_eq!(s.info.violations, 1);
    }
}
