//! Orchestration, metrics and diagnostics.
//!
//! [`MeetingOptimizer`] composes the pipeline: build the binary model,
//! attempt one solve with size-based strategy selection, decode, and fall
//! back to the greedy scheduler on any solve failure.
//!
//! # Metrics
//!
//! [`ScheduleMetrics`] summarizes a schedule: meetings, success rate,
//! importance, conflicts and per-host utilization.
//!
//! # References
//!
//! - Lucas (2014), "Ising formulations of many NP problems"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

mod diagnostics;
mod metrics;
mod optimizer;

pub use diagnostics::{DiagnosticEvent, DiagnosticsSink, MemorySink, TracingSink};
pub use metrics::ScheduleMetrics;
pub use optimizer::{MeetingOptimizer, OptimizationResult, Phase, Status, ERROR_LABEL};
