//! Schedule (solution) model.
//!
//! A schedule is the ordered list of meetings decoded from a sample. It is
//! not re-validated on construction: an infeasible sample decodes into a
//! schedule that may double-book a host, and the query helpers here make
//! that visible to metrics.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{Host, Request, Slot, SlotCalendar, SLOT_COUNT};

/// One request placed with one host in one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMeeting {
    /// Scheduled request ID.
    pub request_id: String,
    /// Assigned host ID.
    pub host_id: String,
    /// Host display name.
    pub host_name: String,
    /// Requesting attendee, `null` when unknown.
    #[serde(default)]
    pub attendee_name: Option<String>,
    /// Meeting topic, `null` when unknown.
    #[serde(default)]
    pub topic: Option<String>,
    /// Meeting date.
    pub date: NaiveDate,
    /// Start time, serialized as `HH:MM`.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End time, serialized as `HH:MM`.
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Importance of the request.
    pub importance: f64,
    /// Slot index.
    pub slot: Slot,
}

impl ScheduledMeeting {
    /// Builds a meeting from its request, host and slot.
    pub fn new(request: &Request, host: &Host, slot: Slot, calendar: &SlotCalendar) -> Self {
        let window = calendar.window_of(slot);
        Self {
            request_id: request.id.clone(),
            host_id: host.id.clone(),
            host_name: host.display_name().to_string(),
            attendee_name: request.attendee_name.clone(),
            topic: request.topic.clone(),
            date: calendar.date_of(slot),
            start_time: window.start,
            end_time: window.end,
            importance: request.importance,
            slot,
        }
    }

    /// Meeting length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Ordered list of scheduled meetings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    /// Meetings, in decode order.
    pub meetings: Vec<ScheduledMeeting>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a meeting.
    pub fn add_meeting(&mut self, meeting: ScheduledMeeting) {
        self.meetings.push(meeting);
    }

    /// Number of meetings.
    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    /// Whether no meeting is scheduled.
    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Meetings for a request (more than one only if the sample was infeasible).
    pub fn meetings_for_request(&self, request_id: &str) -> Vec<&ScheduledMeeting> {
        self.meetings
            .iter()
            .filter(|m| m.request_id == request_id)
            .collect()
    }

    /// Meetings hosted by a host.
    pub fn meetings_for_host(&self, host_id: &str) -> Vec<&ScheduledMeeting> {
        self.meetings
            .iter()
            .filter(|m| m.host_id == host_id)
            .collect()
    }

    /// Number of distinct scheduled requests.
    pub fn scheduled_request_count(&self) -> usize {
        let mut ids: Vec<&str> = self.meetings.iter().map(|m| m.request_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Extra meetings beyond the first in any (host, slot).
    pub fn host_conflicts(&self) -> usize {
        let mut occupancy: HashMap<(&str, Slot), usize> = HashMap::new();
        for m in &self.meetings {
            *occupancy.entry((m.host_id.as_str(), m.slot)).or_insert(0) += 1;
        }
        occupancy.values().map(|&n| n - 1).sum()
    }

    /// Extra meetings beyond the first for any request.
    pub fn duplicate_requests(&self) -> usize {
        self.meetings.len() - self.scheduled_request_count()
    }

    /// Whether every (host, slot) and every request appears at most once.
    pub fn is_conflict_free(&self) -> bool {
        self.host_conflicts() == 0 && self.duplicate_requests() == 0
    }

    /// Fraction of each host's slots in use, for hosts with meetings.
    pub fn utilization_by_host(&self) -> BTreeMap<String, f64> {
        let mut busy: BTreeMap<String, usize> = BTreeMap::new();
        for m in &self.meetings {
            *busy.entry(m.host_id.clone()).or_insert(0) += 1;
        }
        busy.into_iter()
            .map(|(id, n)| (id, n as f64 / SLOT_COUNT as f64))
            .collect()
    }

    /// Sum of importance over scheduled meetings.
    pub fn total_importance(&self) -> f64 {
        self.meetings.iter().map(|m| m.importance).sum()
    }
}

/// `HH:MM` serde format for times of day.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
