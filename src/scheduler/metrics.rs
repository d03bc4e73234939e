//! Schedule quality metrics.
//!
//! Computes summary indicators from a decoded schedule and its input
//! requests.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled Meetings | Meetings in the schedule |
//! | Success Rate | Distinct scheduled requests / requests × 100 |
//! | Total Importance | Sum of importance over meetings |
//! | Host Conflicts | Extra meetings sharing a (host, slot) |
//! | Duplicate Requests | Extra meetings for an already scheduled request |
//! | Utilization | Share of a host's 56 slots in use |
//!
//! Conflict counts are zero for any feasible sample; they are non-zero only
//! when an infeasible sample was decoded.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetrics {
    /// Number of meetings.
    pub scheduled_meetings: usize,
    /// Number of input requests.
    pub total_requests: usize,
    /// Percentage of requests with at least one meeting (0..=100).
    pub success_rate: f64,
    /// Sum of importance over meetings.
    pub total_importance: f64,
    /// Mean importance per meeting (0 when empty).
    pub average_importance: f64,
    /// Extra meetings sharing a (host, slot).
    pub host_conflicts: usize,
    /// Extra meetings for the same request.
    pub duplicate_requests: usize,
    /// Per-host slot utilization (0.0..=1.0).
    pub utilization_by_host: BTreeMap<String, f64>,
}

impl ScheduleMetrics {
    /// Computes metrics for a schedule of `total_requests` requests.
    pub fn calculate(schedule: &Schedule, total_requests: usize) -> Self {
        let scheduled_meetings = schedule.meeting_count();
        let success_rate = if total_requests == 0 {
            0.0
        } else {
            schedule.scheduled_request_count() as f64 / total_requests as f64 * 100.0
        };
        let total_importance = schedule.total_importance();
        let average_importance = if scheduled_meetings == 0 {
            0.0
        } else {
            total_importance / scheduled_meetings as f64
        };

        Self {
            scheduled_meetings,
            total_requests,
            success_rate,
            total_importance,
            average_importance,
            host_conflicts: schedule.host_conflicts(),
            duplicate_requests: schedule.duplicate_requests(),
            utilization_by_host: schedule.utilization_by_host(),
        }
    }

    /// Whether the schedule has neither host conflicts nor duplicates.
    pub fn is_conflict_free(&self) -> bool {
        self.host_conflicts == 0 && self.duplicate_requests == 0
    }
}
