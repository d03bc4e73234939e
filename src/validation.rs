//! Input validation for meeting scheduling problems.
//!
//! Checks structural integrity of requests, hosts and objective weights
//! before the binary model is built. Detects:
//! - Duplicate request or host IDs
//! - Negative or non-finite importance scores
//! - Non-finite objective weights and penalty floors
//!
//! All problems are collected rather than stopping at the first one.

use crate::models::{Host, ProblemConstraints, Request};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has an empty ID.
    EmptyId,
    /// Importance is negative, NaN or infinite.
    InvalidImportance,
    /// An objective weight or penalty floor is NaN or infinite.
    InvalidWeight,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling problem.
///
/// Checks:
/// 1. No empty or duplicate request IDs
/// 2. No empty or duplicate host IDs
/// 3. Every importance is finite and non-negative
/// 4. Every weight and penalty floor is finite
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    requests: &[Request],
    hosts: &[Host],
    constraints: &ProblemConstraints,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut request_ids = HashSet::new();
    for r in requests {
        if r.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Request with empty ID",
            ));
        } else if !request_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate request ID: {}", r.id),
            ));
        }

        if !r.importance.is_finite() || r.importance < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidImportance,
                format!("Request '{}' has invalid importance {}", r.id, r.importance),
            ));
        }
    }

    let mut host_ids = HashSet::new();
    for h in hosts {
        if h.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Host with empty ID",
            ));
        } else if !host_ids.insert(h.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate host ID: {}", h.id),
            ));
        }
    }

    let weights = [
        ("expertiseWeight", Some(constraints.expertise_weight)),
        ("preferredWeight", Some(constraints.preferred_weight)),
        ("preferredBonus", Some(constraints.preferred_bonus)),
        ("requestPenalty", constraints.request_penalty),
        ("hostPenalty", constraints.host_penalty),
    ];
    for (name, value) in weights {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWeight,
                    format!("Constraint '{name}' must be finite, got {v}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_requests() -> Vec<Request> {
        vec![
            Request::new("r1").with_importance(90.0),
            Request::new("r2").with_importance(0.0),
        ]
    }

    fn sample_hosts() -> Vec<Host> {
        vec![Host::new("h1").with_name("Dr. Smith"), Host::new("h2")]
    }

    #[test]
    fn test_valid_input() {
        let c = ProblemConstraints::default();
        assert!(validate_input(&sample_requests(), &sample_hosts(), &c).is_ok());
        assert!(validate_input(&[], &[], &c).is_ok());
    }

    #[test]
    fn test_duplicate_request_id() {
        let requests = vec![Request::new("r1"), Request::new("r1")];
        let errors =
            validate_input(&requests, &sample_hosts(), &ProblemConstraints::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("request")));
    }

    #[test]
    fn test_duplicate_host_id() {
        let hosts = vec![Host::new("h1"), Host::new("h1")];
        let errors =
            validate_input(&sample_requests(), &hosts, &ProblemConstraints::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("host")));
    }

    #[test]
    fn test_invalid_importance() {
        let requests = vec![
            Request::new("neg").with_importance(-1.0),
            Request::new("nan").with_importance(f64::NAN),
        ];
        let errors =
            validate_input(&requests, &sample_hosts(), &ProblemConstraints::default()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidImportance)
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_weight() {
        let c = ProblemConstraints {
            host_penalty: Some(f64::INFINITY),
            ..Default::default()
        };
        let errors = validate_input(&sample_requests(), &sample_hosts(), &c).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidWeight && e.message.contains("hostPenalty")));
    }

    #[test]
    fn test_multiple_errors() {
        let requests = vec![Request::new(""), Request::new("r1").with_importance(-5.0)];
        let hosts = vec![Host::new("h1"), Host::new("h1")];
        let errors = validate_input(&requests, &hosts, &ProblemConstraints::default()).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
