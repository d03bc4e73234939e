//! Binary model builder.
//!
//! # Objective
//!
//! For each variable (r, h, s):
//!
//! ```text
//! linear(r,h,s) = -( importance(r)
//!                    + expertise_bonus(r,h) · W_EXPERTISE
//!                    + preferred_bonus(r,s) · W_PREFERRED )
//! ```
//!
//! # Penalties
//!
//! Every pair within the same request pays `P_REQ`; every pair within the
//! same (host, slot) pays `P_HOST`. The builder derives both from the
//! linear weights so that
//!
//! ```text
//! P_HOST > P_REQ > 2 · max |linear|
//! ```
//!
//! holds for every model it returns. Configured penalties act as floors.
//! Inputs whose derived penalties overflow to infinity are rejected, since
//! the ordering cannot hold for them.
//!
//! Both families carry one uniform weight, so the builder only emits the
//! linear vector and the two penalties; pairs stay implicit in the arena.

use std::collections::HashSet;

use tracing::debug;

use super::{BinaryModel, Variable, VariableArena, VariableId};
use crate::error::SpecError;
use crate::models::{normalize_tag, Host, ProblemSpec, Request, Slot};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Amount by which `P_REQ` exceeds `2 · max |linear|`.
pub const PENALTY_MARGIN: f64 = 1.0;
/// `P_HOST / P_REQ` when no floor overrides it.
pub const HOST_PENALTY_RATIO: f64 = 1.5;

/// Expertise match between a request and a host.
///
/// | value | meaning |
/// |-------|---------|
/// | 2 | host covers every required tag |
/// | 1 | partial overlap |
/// | 0 | one side has no tags (neutral) |
/// | -1 | both sides have tags, no overlap |
pub fn expertise_bonus(request: &Request, host: &Host) -> f64 {
    let required: HashSet<String> = request.expertise.iter().map(|t| normalize_tag(t)).collect();
    let offered: HashSet<String> = host.expertise.iter().map(|t| normalize_tag(t)).collect();
    if required.is_empty() || offered.is_empty() {
        return 0.0;
    }
    let overlap = required.intersection(&offered).count();
    if overlap == required.len() {
        2.0
    } else if overlap > 0 {
        1.0
    } else {
        -1.0
    }
}

/// Builds the binary model for a problem.
///
/// # Errors
/// [`SpecError`] if `requests` or `hosts` is absent or the input fails
/// validation. Empty lists are valid and produce an empty model.
///
/// # Example
/// ```
/// use u_meeting::models::{Host, ProblemSpec, Request};
/// use u_meeting::qubo::build_model;
///
/// let spec = ProblemSpec::new(
///     vec![Request::new("r1").with_importance(90.0)],
///     vec![Host::new("h1")],
/// );
/// let model = build_model(&spec).unwrap();
/// assert_eq!(model.num_variables(), 56);
/// assert!(model.request_penalty() > 2.0 * model.max_abs_linear());
/// ```
pub fn build_model(spec: &ProblemSpec) -> Result<BinaryModel, SpecError> {
    ModelBuilder::new(spec).build()
}

/// Builder carrying the spec and its derived calendar.
#[derive(Debug)]
pub struct ModelBuilder<'a> {
    spec: &'a ProblemSpec,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder for a spec.
    pub fn new(spec: &'a ProblemSpec) -> Self {
        Self { spec }
    }

    /// Validates the spec and derives linear weights and penalties.
    pub fn build(&self) -> Result<BinaryModel, SpecError> {
        self.spec.validate()?;

        let requests = self.spec.requests();
        let hosts = self.spec.hosts();
        let arena = VariableArena::new(requests.len(), hosts.len());
        let linear = self.linear_weights(&arena);

        let max_abs = linear.iter().fold(0.0_f64, |acc, w| acc.max(w.abs()));
        let (request_penalty, host_penalty) = self.penalties(max_abs)?;

        let model = BinaryModel::from_parts(arena, linear, request_penalty, host_penalty);
        debug!(
            variables = model.num_variables(),
            quadratic_terms = model.quadratic_count(),
            request_penalty,
            host_penalty,
            "binary model built"
        );
        Ok(model)
    }

    fn linear_weights(&self, arena: &VariableArena) -> Vec<f64> {
        let constraints = &self.spec.constraints;
        let calendar = self.spec.calendar();
        let mut linear = Vec::with_capacity(arena.len());

        for request in self.spec.requests() {
            let window = calendar.preferred_window(&request.preferred_dates);
            for host in self.spec.hosts() {
                let expertise = expertise_bonus(request, host) * constraints.expertise_weight;
                for slot in Slot::all() {
                    let preferred = if window.contains(slot) {
                        constraints.preferred_bonus * constraints.preferred_weight
                    } else {
                        0.0
                    };
                    linear.push(-(request.importance + expertise + preferred));
                }
            }
        }
        linear
    }

    /// `(P_REQ, P_HOST)` for the given largest absolute linear weight.
    ///
    /// # Errors
    /// [`SpecError::Invalid`] when either penalty is not finite.
    fn penalties(&self, max_abs_linear: f64) -> Result<(f64, f64), SpecError> {
        let constraints = &self.spec.constraints;
        let request_penalty = (2.0 * max_abs_linear + PENALTY_MARGIN)
            .max(constraints.request_penalty.unwrap_or(0.0));
        let host_penalty = (request_penalty * HOST_PENALTY_RATIO)
            .max(constraints.host_penalty.unwrap_or(0.0));
        if !(request_penalty.is_finite() && host_penalty.is_finite()) {
            return Err(SpecError::Invalid(vec![ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!(
                    "Penalties overflow for largest linear weight {max_abs_linear}: \
                     importance and weights are too large"
                ),
            )]));
        }
        Ok((request_penalty, host_penalty))
    }
}

/// Variable of an id within a model built from `spec`, with its request and host.
pub(crate) fn resolve<'s>(
    spec: &'s ProblemSpec,
    arena: &VariableArena,
    id: VariableId,
) -> Option<(&'s Request, &'s Host, Variable)> {
    let var = arena.variable(id)?;
    let request = spec.requests().get(var.request)?;
    let host = spec.hosts().get(var.host)?;
    Some((request, host, var))
}
