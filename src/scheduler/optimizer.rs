//! Optimization orchestrator.
//!
//! # State machine
//!
//! ```text
//! BUILD ──ok──▶ SOLVE_ATTEMPT ──sample──▶ DECODE ──▶ DONE
//!   │                 │
//!   │ invalid spec    │ unavailable / error / timeout / cancel
//!   ▼                 ▼
//! ERROR            FALLBACK ──▶ DONE
//! ```
//!
//! The selected strategy runs at most once. Any solve failure goes straight
//! to the greedy fallback; only an invalid spec ends in `ERROR`. A sample
//! with active penalties is still decoded and reported as `INFEASIBLE`.

use serde::Serialize;

use super::diagnostics::{DiagnosticEvent, DiagnosticsSink, TracingSink};
use super::metrics::ScheduleMetrics;
use crate::decode::{decode, DecodeDiagnostics};
use crate::error::SolveError;
use crate::fallback::GreedyFallback;
use crate::models::{ProblemSpec, Schedule};
use crate::qubo::{build_model, BinaryModel, QuboStats};
use crate::solver::{CancelToken, Sample, SolveBudget, Solver, SolverConfig, StrategySet};

/// Backend label of results that never reached a solver.
pub const ERROR_LABEL: &str = "error";

/// Orchestrator phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Building the binary model.
    Build,
    /// Running the selected strategy.
    SolveAttempt,
    /// Decoding the returned sample.
    Decode,
    /// Running the greedy fallback.
    Fallback,
    /// Finished with a result.
    Done,
    /// Finished with an invalid spec.
    Error,
}

/// Outcome category of an optimization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// A solver returned a feasible sample.
    Success,
    /// The greedy fallback produced the schedule.
    Fallback,
    /// A solver returned a sample with active penalties.
    Infeasible,
    /// The input was rejected.
    Error,
}

/// Result of one optimization call.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Decoded or fallback schedule.
    pub schedule: Schedule,
    /// Energy of the final sample.
    pub energy: f64,
    /// Outcome category.
    pub status: Status,
    /// Producer of the final sample.
    pub backend_label: String,
    /// Final sample (absent for `ERROR`).
    pub sample: Option<Sample>,
    /// Model size summary.
    pub stats: QuboStats,
    /// Schedule metrics.
    pub metrics: ScheduleMetrics,
    /// Decode outcome counts.
    pub decode: DecodeDiagnostics,
    /// Why the solver was not used, for `FALLBACK`.
    pub solve_error: Option<SolveError>,
    /// Error message, for `ERROR`.
    pub error: Option<String>,
}

impl OptimizationResult {
    /// `ERROR` result carrying a message and no schedule.
    pub fn error(message: impl Into<String>, total_requests: usize) -> Self {
        Self {
            schedule: Schedule::new(),
            energy: 0.0,
            status: Status::Error,
            backend_label: ERROR_LABEL.to_string(),
            sample: None,
            stats: QuboStats::default(),
            metrics: ScheduleMetrics::calculate(&Schedule::new(), total_requests),
            decode: DecodeDiagnostics::default(),
            solve_error: None,
            error: Some(message.into()),
        }
    }

    /// Variables above 0.5 in the final sample.
    pub fn active_assignments(&self) -> usize {
        self.sample.as_ref().map_or(0, Sample::active_count)
    }

    /// Percentage of requests scheduled.
    pub fn success_rate(&self) -> f64 {
        self.metrics.success_rate
    }
}

/// Build → solve → decode pipeline with greedy fallback.
///
/// # Example
///
/// ```
/// use u_meeting::models::{Host, ProblemSpec, Request};
/// use u_meeting::scheduler::{MeetingOptimizer, Status};
/// use u_meeting::solver::SolverConfig;
///
/// let spec = ProblemSpec::new(
///     vec![Request::new("r1").with_importance(90.0)],
///     vec![Host::new("h1")],
/// );
/// let result = MeetingOptimizer::new(SolverConfig::disabled()).optimize(&spec);
/// assert_eq!(result.status, Status::Fallback);
/// assert_eq!(result.schedule.meeting_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MeetingOptimizer {
    config: SolverConfig,
    strategies: StrategySet,
    fallback: GreedyFallback,
}

impl MeetingOptimizer {
    /// Creates an optimizer from solver configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            strategies: StrategySet::from_config(&config),
            config,
            fallback: GreedyFallback::new(),
        }
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs one optimization call, reporting to `tracing`.
    pub fn optimize(&self, spec: &ProblemSpec) -> OptimizationResult {
        self.optimize_with(spec, &TracingSink, &CancelToken::new())
    }

    /// Runs one optimization call with an explicit sink and cancel token.
    pub fn optimize_with(
        &self,
        spec: &ProblemSpec,
        sink: &dyn DiagnosticsSink,
        cancel: &CancelToken,
    ) -> OptimizationResult {
        let total_requests = spec.requests().len();

        sink.record(DiagnosticEvent::PhaseEntered(Phase::Build));
        let model = match build_model(spec) {
            Ok(model) => model,
            Err(e) => {
                let message = e.to_string();
                sink.record(DiagnosticEvent::SpecRejected {
                    message: message.clone(),
                });
                sink.record(DiagnosticEvent::PhaseEntered(Phase::Error));
                return OptimizationResult::error(message, total_requests);
            }
        };
        sink.record(DiagnosticEvent::ModelBuilt(model.stats(0.0)));

        sink.record(DiagnosticEvent::PhaseEntered(Phase::SolveAttempt));
        let result = match self.attempt(&model, sink, cancel) {
            Ok(sample) => self.finish_decode(spec, &model, sample, sink),
            Err(e) => {
                sink.record(DiagnosticEvent::SolveFailed {
                    message: e.to_string(),
                });
                self.finish_fallback(spec, &model, e, sink)
            }
        };
        sink.record(DiagnosticEvent::PhaseEntered(Phase::Done));
        result
    }

    fn attempt(
        &self,
        model: &BinaryModel,
        sink: &dyn DiagnosticsSink,
        cancel: &CancelToken,
    ) -> Result<Sample, SolveError> {
        let strategy = self.strategies.select(model.num_variables())?;
        sink.record(DiagnosticEvent::StrategySelected {
            label: strategy.label(),
            variables: model.num_variables(),
        });
        let budget =
            SolveBudget::from_millis(self.config.time_budget_ms).with_cancel(cancel.clone());
        let sample = strategy.solve(model, &budget)?;
        sink.record(DiagnosticEvent::SampleReturned {
            energy: sample.energy,
            feasible: sample.feasible,
            elapsed_ms: sample.info.elapsed_ms,
        });
        Ok(sample)
    }

    fn finish_decode(
        &self,
        spec: &ProblemSpec,
        model: &BinaryModel,
        sample: Sample,
        sink: &dyn DiagnosticsSink,
    ) -> OptimizationResult {
        sink.record(DiagnosticEvent::PhaseEntered(Phase::Decode));
        let decoded = decode(&sample, spec);
        if decoded.diagnostics.skipped() > 0 {
            sink.record(DiagnosticEvent::DecodeSkipped(decoded.diagnostics));
        }

        let status = if sample.feasible {
            Status::Success
        } else {
            Status::Infeasible
        };
        OptimizationResult {
            metrics: ScheduleMetrics::calculate(&decoded.schedule, spec.requests().len()),
            schedule: decoded.schedule,
            energy: sample.energy,
            status,
            backend_label: sample.backend_label.clone(),
            stats: model.stats(sample.energy),
            sample: Some(sample),
            decode: decoded.diagnostics,
            solve_error: None,
            error: None,
        }
    }

    fn finish_fallback(
        &self,
        spec: &ProblemSpec,
        model: &BinaryModel,
        cause: SolveError,
        sink: &dyn DiagnosticsSink,
    ) -> OptimizationResult {
        sink.record(DiagnosticEvent::PhaseEntered(Phase::Fallback));
        let outcome = self.fallback.schedule(spec);
        sink.record(DiagnosticEvent::FallbackUsed {
            meetings: outcome.schedule.meeting_count(),
        });

        OptimizationResult {
            metrics: ScheduleMetrics::calculate(&outcome.schedule, spec.requests().len()),
            schedule: outcome.schedule,
            energy: outcome.sample.energy,
            status: Status::Fallback,
            backend_label: outcome.sample.backend_label.clone(),
            stats: model.stats(outcome.sample.energy),
            sample: Some(outcome.sample),
            decode: DecodeDiagnostics::default(),
            solve_error: Some(cause),
            error: None,
        }
    }
}
