//! Error types for the scheduling engine.
//!
//! Only [`SpecError`] is unrecoverable: the orchestrator maps it to an
//! `ERROR` result without attempting the fallback. Every [`SolveError`] is
//! absorbed by the greedy fallback and surfaces as `FALLBACK`.

use thiserror::Error;

use crate::validation::ValidationError;

/// Malformed problem input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    /// A required top-level field is absent.
    #[error("invalid spec: missing required field `{0}`")]
    MissingField(&'static str),

    /// The input failed integrity checks.
    #[error("invalid spec: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),
}

/// Failure of a single solve attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// No strategy is configured for the selected route.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The wall-clock budget ran out before the solve completed.
    #[error("solve exceeded its budget of {budget_ms} ms")]
    Timeout { budget_ms: u64 },

    /// The caller aborted the solve.
    #[error("solve cancelled")]
    Cancelled,

    /// The model exceeds what the strategy accepts.
    #[error("model with {variables} variables exceeds the strategy limit of {limit}")]
    TooLarge { variables: usize, limit: usize },

    /// Any other solver failure.
    #[error("solve failed: {0}")]
    Failed(String),
}

impl SolveError {
    /// Whether this is the `BackendUnavailable` case rather than a failed attempt.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SolveError::BackendUnavailable(_))
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
