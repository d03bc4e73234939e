//! JSON input and output documents.
//!
//! # Input
//!
//! ```json
//! { "solverConfig": { ... },
//!   "problemData": { "requests": [...], "hosts": [...], "constraints": {...} } }
//! ```
//!
//! # Output
//!
//! `solution`, `schedule`, `energy`, `status`, `quantum_backend`,
//! `active_assignments`, `success_rate`, `quboStats`, `metrics`, and
//! `error` when the status is `ERROR`.
//!
//! [`process`] turns input text into an output document and never fails:
//! malformed JSON becomes an `ERROR` document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::decode::solution_map;
use crate::models::{ProblemSpec, Schedule};
use crate::qubo::QuboStats;
use crate::scheduler::{MeetingOptimizer, OptimizationResult, ScheduleMetrics, Status};
use crate::solver::SolverConfig;

/// Parsed input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    /// Solver selection and settings.
    #[serde(default)]
    pub solver_config: SolverConfig,
    /// The problem; absent is an invalid spec.
    #[serde(default)]
    pub problem_data: Option<ProblemSpec>,
}

/// Result document written to standard output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDocument {
    /// Value of every variable, keyed `{requestId}_{hostId}_{slot}`.
    pub solution: BTreeMap<String, u8>,
    /// Scheduled meetings.
    pub schedule: Schedule,
    /// Energy of the final sample.
    pub energy: f64,
    /// Outcome category.
    pub status: Status,
    /// Producer of the final sample.
    pub quantum_backend: String,
    /// Active variables in the final sample.
    pub active_assignments: usize,
    /// Percentage of requests scheduled.
    pub success_rate: f64,
    /// Model size summary.
    #[serde(rename = "quboStats")]
    pub qubo_stats: QuboStats,
    /// Schedule metrics.
    pub metrics: ScheduleMetrics,
    /// Error message for `ERROR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputDocument {
    /// Builds the document for a result of `spec`.
    pub fn from_result(result: &OptimizationResult, spec: &ProblemSpec) -> Self {
        let solution = result
            .sample
            .as_ref()
            .map(|s| solution_map(s, spec))
            .unwrap_or_default();
        Self {
            solution,
            schedule: result.schedule.clone(),
            energy: result.energy,
            status: result.status,
            quantum_backend: result.backend_label.clone(),
            active_assignments: result.active_assignments(),
            success_rate: result.success_rate(),
            qubo_stats: result.stats,
            metrics: result.metrics.clone(),
            error: result.error.clone(),
        }
    }

    /// `ERROR` document with no problem context.
    pub fn error(message: impl Into<String>) -> Self {
        Self::from_result(
            &OptimizationResult::error(message, 0),
            &ProblemSpec::default(),
        )
    }
}

/// Runs one optimization for a parsed document.
pub fn run(input: &InputDocument) -> OutputDocument {
    let spec = input.problem_data.clone().unwrap_or_default();
    let result = MeetingOptimizer::new(input.solver_config.clone()).optimize(&spec);
    OutputDocument::from_result(&result, &spec)
}

/// Parses input text and runs it.
pub fn process(text: &str) -> OutputDocument {
    match serde_json::from_str::<InputDocument>(text) {
        Ok(input) => run(&input),
        Err(e) => {
            warn!(error = %e, "input is not a valid document");
            OutputDocument::error(format!("invalid input document: {e}"))
        }
    }
}
