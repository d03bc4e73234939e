//! Problem specification: the input to one optimization call.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Host, Request, SlotCalendar};
use crate::error::SpecError;
use crate::validation::validate_input;

/// Weight applied to the expertise bonus when none is configured.
pub const DEFAULT_EXPERTISE_WEIGHT: f64 = 5.0;
/// Weight applied to the preferred-date bonus when none is configured.
pub const DEFAULT_PREFERRED_WEIGHT: f64 = 1.0;
/// Bonus for a slot inside the requester's preferred window.
pub const DEFAULT_PREFERRED_BONUS: f64 = 10.0;

/// Requests, hosts and objective tuning for one optimization call.
///
/// `requests` and `hosts` are optional at the type level so that absent
/// fields can be told apart from empty lists: absent is an invalid spec,
/// empty is a valid problem with nothing to schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpec {
    /// Meeting requests, in input order.
    pub requests: Option<Vec<Request>>,
    /// Hosts, in input order.
    pub hosts: Option<Vec<Host>>,
    /// Objective weights and calendar anchoring. Absent and `null` both
    /// mean the defaults.
    #[serde(default, deserialize_with = "null_as_default")]
    pub constraints: ProblemConstraints,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Objective weights and calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemConstraints {
    /// Multiplier for the expertise bonus (-1..=2).
    pub expertise_weight: f64,
    /// Multiplier for the preferred-date bonus.
    pub preferred_weight: f64,
    /// Bonus for a slot inside the preferred window.
    pub preferred_bonus: f64,
    /// Floor for the same-request penalty. Raised as needed to keep the
    /// penalty ordering valid.
    pub request_penalty: Option<f64>,
    /// Floor for the same-host-slot penalty. Raised as needed.
    pub host_penalty: Option<f64>,
    /// Date of slot 0.
    pub base_date: Option<NaiveDate>,
}

impl Default for ProblemConstraints {
    fn default() -> Self {
        Self {
            expertise_weight: DEFAULT_EXPERTISE_WEIGHT,
            preferred_weight: DEFAULT_PREFERRED_WEIGHT,
            preferred_bonus: DEFAULT_PREFERRED_BONUS,
            request_penalty: None,
            host_penalty: None,
            base_date: None,
        }
    }
}

impl ProblemSpec {
    /// Creates a spec from complete request and host lists.
    pub fn new(requests: Vec<Request>, hosts: Vec<Host>) -> Self {
        Self {
            requests: Some(requests),
            hosts: Some(hosts),
            constraints: ProblemConstraints::default(),
        }
    }

    /// Sets the constraints.
    pub fn with_constraints(mut self, constraints: ProblemConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the calendar base date.
    pub fn with_base_date(mut self, base_date: NaiveDate) -> Self {
        self.constraints.base_date = Some(base_date);
        self
    }

    /// Requests in input order (empty if absent).
    pub fn requests(&self) -> &[Request] {
        self.requests.as_deref().unwrap_or(&[])
    }

    /// Hosts in input order (empty if absent).
    pub fn hosts(&self) -> &[Host] {
        self.hosts.as_deref().unwrap_or(&[])
    }

    /// Slot calendar for this problem.
    pub fn calendar(&self) -> SlotCalendar {
        SlotCalendar::new(
            self.constraints
                .base_date
                .unwrap_or_else(SlotCalendar::default_base_date),
        )
    }

    /// Finds a request by id.
    pub fn request(&self, id: &str) -> Option<&Request> {
        self.requests().iter().find(|r| r.id == id)
    }

    /// Finds a host by id.
    pub fn host(&self, id: &str) -> Option<&Host> {
        self.hosts().iter().find(|h| h.id == id)
    }

    /// Checks that the spec can be turned into a model.
    ///
    /// Fails if `requests` or `hosts` is absent, or if the data does not
    /// pass [`validate_input`].
    pub fn validate(&self) -> Result<(), SpecError> {
        let requests = self
            .requests
            .as_deref()
            .ok_or(SpecError::MissingField("requests"))?;
        let hosts = self
            .hosts
            .as_deref()
            .ok_or(SpecError::MissingField("hosts"))?;
        validate_input(requests, hosts, &self.constraints).map_err(SpecError::Invalid)
    }
}
