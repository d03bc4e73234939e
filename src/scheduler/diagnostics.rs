//! Structured diagnostics channel.
//!
//! The orchestrator reports progress as [`DiagnosticEvent`]s to a
//! [`DiagnosticsSink`]. Events never become part of the result value.

use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::Phase;
use crate::decode::DecodeDiagnostics;
use crate::qubo::QuboStats;

/// One observable step of an optimization call.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// The state machine entered a phase.
    PhaseEntered(Phase),
    /// The binary model was built.
    ModelBuilt(QuboStats),
    /// The input was rejected.
    SpecRejected {
        /// Error message.
        message: String,
    },
    /// A strategy was selected for the model.
    StrategySelected {
        /// Backend label.
        label: &'static str,
        /// Variables in the model.
        variables: usize,
    },
    /// The solve attempt failed.
    SolveFailed {
        /// Error message.
        message: String,
    },
    /// The solver returned a sample.
    SampleReturned {
        /// Sample energy.
        energy: f64,
        /// Whether no penalty is active.
        feasible: bool,
        /// Solver wall-clock time.
        elapsed_ms: u64,
    },
    /// The greedy fallback produced the schedule.
    FallbackUsed {
        /// Meetings placed.
        meetings: usize,
    },
    /// Sample entries were dropped while decoding.
    DecodeSkipped(DecodeDiagnostics),
}

/// Receiver of diagnostic events.
pub trait DiagnosticsSink {
    /// Records one event.
    fn record(&self, event: DiagnosticEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::PhaseEntered(phase) => debug!(?phase, "phase entered"),
            DiagnosticEvent::ModelBuilt(stats) => info!(
                variables = stats.total_variables,
                quadratic_terms = stats.quadratic_terms,
                "model built"
            ),
            DiagnosticEvent::SpecRejected { message } => warn!(%message, "input rejected"),
            DiagnosticEvent::StrategySelected { label, variables } => {
                info!(label, variables, "strategy selected")
            }
            DiagnosticEvent::SolveFailed { message } => warn!(%message, "solve failed"),
            DiagnosticEvent::SampleReturned {
                energy,
                feasible,
                elapsed_ms,
            } => info!(energy, feasible, elapsed_ms, "sample returned"),
            DiagnosticEvent::FallbackUsed { meetings } => {
                info!(meetings, "greedy fallback used")
            }
            DiagnosticEvent::DecodeSkipped(d) => warn!(
                unparseable = d.unparseable,
                unknown_reference = d.unknown_reference,
                "decode skipped entries"
            ),
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Phases entered, in order.
    pub fn phases(&self) -> Vec<Phase> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DiagnosticEvent::PhaseEntered(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
