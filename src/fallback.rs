//! Deterministic greedy fallback.
//!
//! # Algorithm
//!
//! 1. Sort requests by importance, descending; ties keep input order.
//! 2. Walk (host, slot) pairs in canonical order: hosts in input order,
//!    slots 0..56 inside each host.
//! 3. Give each request the first unoccupied pair and mark it occupied.
//! 4. Requests left without a free pair stay unscheduled.
//!
//! Energy is `-Σ importance` over scheduled requests, the same sign
//! convention as the model's linear terms.
//!
//! # Complexity
//! O(n log n + n × m × 56) where n=requests, m=hosts.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use tracing::debug;

use crate::models::{ProblemSpec, Schedule, ScheduledMeeting, Slot, SLOT_COUNT};
use crate::qubo::{Variable, VariableArena};
use crate::solver::{Sample, SolveInfo};

/// Backend name reported for fallback results.
pub const FALLBACK_LABEL: &str = "classical_greedy";

/// Schedule and sample produced without a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// Meetings in placement order (most important first).
    pub schedule: Schedule,
    /// Equivalent assignment over the problem's variables.
    pub sample: Sample,
}

/// Importance-ordered first-fit scheduler.
///
/// # Example
///
/// ```
/// use u_meeting::fallback::GreedyFallback;
/// use u_meeting::models::{Host, ProblemSpec, Request};
///
/// let spec = ProblemSpec::new(
///     vec![
///         Request::new("r1").with_importance(90.0),
///         Request::new("r2").with_importance(50.0),
///     ],
///     vec![Host::new("h1")],
/// );
/// let outcome = GreedyFallback::new().schedule(&spec);
/// assert_eq!(outcome.schedule.meeting_count(), 2);
/// assert_eq!(outcome.sample.energy, -140.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyFallback;

impl GreedyFallback {
    /// Creates the fallback scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Schedules every request it can. Never fails.
    pub fn schedule(&self, spec: &ProblemSpec) -> FallbackOutcome {
        let requests = spec.requests();
        let hosts = spec.hosts();
        let calendar = spec.calendar();
        let arena = VariableArena::new(requests.len(), hosts.len());

        let mut order: Vec<usize> = (0..requests.len()).collect();
        order.sort_by(|&a, &b| requests[b].importance.total_cmp(&requests[a].importance));

        let mut occupied = vec![false; hosts.len() * SLOT_COUNT];
        let mut bits = vec![false; arena.len()];
        let mut schedule = Schedule::new();
        let mut energy = 0.0;
        let mut scanned: u64 = 0;

        for &r in &order {
            let request = &requests[r];
            let mut placed = false;

            'hosts: for (h, host) in hosts.iter().enumerate() {
                for slot in Slot::all() {
                    scanned += 1;
                    let pair = h * SLOT_COUNT + slot.index();
                    if occupied[pair] {
                        continue;
                    }
                    occupied[pair] = true;
                    bits[arena
                        .id_of(Variable {
                            request: r,
                            host: h,
                            slot,
                        })
                        .index()] = true;
                    schedule.add_meeting(ScheduledMeeting::new(request, host, slot, &calendar));
                    energy -= request.importance;
                    placed = true;
                    break 'hosts;
                }
            }

            if !placed {
                debug!(request = %request.id, "no free host slot left");
            }
        }

        let assignment = bits.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
        FallbackOutcome {
            schedule,
            sample: Sample {
                assignment,
                energy,
                feasible: true,
                backend_label: FALLBACK_LABEL.to_string(),
                info: SolveInfo {
                    elapsed_ms: 0,
                    iterations: scanned,
                    violations: 0,
                },
            },
        }
    }
}
