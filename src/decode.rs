//! Sample decoding.
//!
//! Turns an assignment back into calendar meetings. Decoding never fails:
//! entries that cannot be mapped to a request and host are dropped and
//! counted in [`DecodeDiagnostics`]. Feasibility is not checked here, so an
//! infeasible sample decodes into a schedule that double-books; metrics
//! report that.
//!
//! Two input forms are accepted:
//! - [`decode`]: a [`Sample`] indexed by dense variable id
//! - [`decode_keyed`]: foreign samples keyed `{requestId}_{hostId}_{slot}`

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::models::{ProblemSpec, Schedule, ScheduledMeeting, Slot, SLOT_COUNT};
use crate::qubo::{resolve, variable_key, Variable, VariableArena, VariableId};
use crate::solver::Sample;

/// Prefix some producers put in front of variable keys.
const KEY_PREFIX: &str = "x_";

/// Counts of active entries by decode outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeDiagnostics {
    /// Entries turned into meetings.
    pub decoded: usize,
    /// Entries whose shape is not a variable (bad key, bad slot, id out of range).
    pub unparseable: usize,
    /// Well-formed entries naming an unknown request or host.
    pub unknown_reference: usize,
}

impl DecodeDiagnostics {
    /// Number of dropped entries.
    pub fn skipped(&self) -> usize {
        self.unparseable + self.unknown_reference
    }
}

/// Schedule plus decode diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    /// Meetings in variable id order.
    pub schedule: Schedule,
    /// Outcome counts.
    pub diagnostics: DecodeDiagnostics,
}

/// Decodes a dense sample.
///
/// Every value above 0.5 is an active variable. Ids outside the problem's
/// variable range count as unparseable.
///
/// # Example
/// ```
/// use u_meeting::decode::decode;
/// use u_meeting::models::{Host, ProblemSpec, Request};
/// use u_meeting::solver::Sample;
/// use u_meeting::qubo::build_model;
///
/// let spec = ProblemSpec::new(vec![Request::new("r1")], vec![Host::new("h1")]);
/// let model = build_model(&spec).unwrap();
/// let mut bits = vec![false; model.num_variables()];
/// bits[9] = true;
/// let sample = Sample::evaluate(&model, &bits, "manual", 0, 0);
///
/// let decoded = decode(&sample, &spec);
/// let meeting = &decoded.schedule.meetings[0];
/// assert_eq!(meeting.date.to_string(), "2025-11-16");
/// assert_eq!(meeting.start_time.format("%H:%M").to_string(), "10:00");
/// ```
pub fn decode(sample: &Sample, spec: &ProblemSpec) -> Decoded {
    let arena = VariableArena::new(spec.requests().len(), spec.hosts().len());
    let calendar = spec.calendar();
    let mut decoded = Decoded::default();

    for id in sample.active_ids() {
        match resolve(spec, &arena, id) {
            Some((request, host, var)) => {
                decoded
                    .schedule
                    .add_meeting(ScheduledMeeting::new(request, host, var.slot, &calendar));
                decoded.diagnostics.decoded += 1;
            }
            None => decoded.diagnostics.unparseable += 1,
        }
    }

    if decoded.diagnostics.skipped() > 0 {
        warn!(unparseable = decoded.diagnostics.unparseable, "sample entries skipped");
    }
    decoded
}

/// Why a key did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyError {
    Unparseable,
    UnknownReference,
}

/// Decodes a string-keyed sample.
///
/// Keys have the form `{requestId}_{hostId}_{slot}`, optionally prefixed
/// with `x_`. Ids may themselves contain `_`; the slot is the text after the
/// last `_` and the remainder is split at the first request id that leaves
/// a known host id. Meetings come out in variable id order regardless of
/// map order.
pub fn decode_keyed<'a, I>(values: I, spec: &ProblemSpec) -> Decoded
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let arena = VariableArena::new(spec.requests().len(), spec.hosts().len());
    let calendar = spec.calendar();
    let mut diagnostics = DecodeDiagnostics::default();
    let mut active: Vec<VariableId> = Vec::new();

    for (key, value) in values {
        if value <= 0.5 {
            continue;
        }
        match parse_key(key, spec) {
            Ok(var) => active.push(arena.id_of(var)),
            Err(KeyError::Unparseable) => diagnostics.unparseable += 1,
            Err(KeyError::UnknownReference) => diagnostics.unknown_reference += 1,
        }
    }
    active.sort_unstable();
    active.dedup();

    let mut schedule = Schedule::new();
    for id in active {
        if let Some((request, host, var)) = resolve(spec, &arena, id) {
            schedule.add_meeting(ScheduledMeeting::new(request, host, var.slot, &calendar));
            diagnostics.decoded += 1;
        }
    }

    if diagnostics.skipped() > 0 {
        warn!(
            unparseable = diagnostics.unparseable,
            unknown_reference = diagnostics.unknown_reference,
            "sample entries skipped"
        );
    }
    Decoded {
        schedule,
        diagnostics,
    }
}

fn parse_key(key: &str, spec: &ProblemSpec) -> Result<Variable, KeyError> {
    if key.split('_').count() < 3 {
        return Err(KeyError::Unparseable);
    }
    let (head, slot) = key.rsplit_once('_').ok_or(KeyError::Unparseable)?;
    let slot = slot
        .parse::<usize>()
        .ok()
        .and_then(Slot::new)
        .ok_or(KeyError::Unparseable)?;

    split_ids(head, spec)
        .or_else(|| head.strip_prefix(KEY_PREFIX).and_then(|h| split_ids(h, spec)))
        .map(|(request, host)| Variable {
            request,
            host,
            slot,
        })
        .ok_or(KeyError::UnknownReference)
}

/// Positions of the request and host named by `{requestId}_{hostId}`.
fn split_ids(head: &str, spec: &ProblemSpec) -> Option<(usize, usize)> {
    spec.requests().iter().enumerate().find_map(|(r, request)| {
        let host_id = head.strip_prefix(request.id.as_str())?.strip_prefix('_')?;
        let h = spec.hosts().iter().position(|h| h.id == host_id)?;
        Some((r, h))
    })
}

/// Full solution map `{varKey: 0|1}` for output, one entry per variable.
pub fn solution_map(sample: &Sample, spec: &ProblemSpec) -> BTreeMap<String, u8> {
    let mut map = BTreeMap::new();
    for (r, request) in spec.requests().iter().enumerate() {
        for (h, host) in spec.hosts().iter().enumerate() {
            for slot in Slot::all() {
                let id = (r * spec.hosts().len() + h) * SLOT_COUNT + slot.index();
                let active = sample.assignment.get(id).is_some_and(|&v| v > 0.5);
                map.insert(variable_key(&request.id, &host.id, slot), u8::from(active));
            }
        }
    }
    map
}
