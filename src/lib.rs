//! Meeting-request scheduling as a quadratic binary optimization problem.
//!
//! Assigns requests to (host, time slot) pairs by encoding the problem as a
//! penalty-weighted binary model, solving it with a configured strategy, and
//! decoding the sample into a calendar schedule. When no strategy is
//! available or a solve fails, a deterministic greedy scheduler produces the
//! schedule instead.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Request`, `Host`, `SlotCalendar`,
//!   `ProblemSpec`, `Schedule`, `ScheduledMeeting`
//! - **`validation`**: Input integrity checks (duplicate IDs, importance, weights)
//! - **`qubo`**: Variable arena, `BinaryModel`, model builder
//! - **`solver`**: Solver contract, budget, annealing/hybrid/exact strategies
//! - **`decode`**: Sample → schedule, with skip diagnostics
//! - **`fallback`**: Greedy importance-ordered scheduler
//! - **`scheduler`**: Orchestrator state machine, metrics, diagnostics sink
//! - **`api`**: JSON input/output documents
//!
//! # Pipeline
//!
//! ```text
//! ProblemSpec → BinaryModel → Sample → Schedule
//!                    └─ solve failed ─→ GreedyFallback → Schedule
//! ```
//!
//! # References
//!
//! - Lucas (2014), "Ising formulations of many NP problems"
//! - Glover, Kochenberger & Du (2019), "Quantum Bridge Analytics I: a tutorial
//!   on formulating and using QUBO models"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod api;
pub mod decode;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod models;
pub mod qubo;
pub mod scheduler;
pub mod solver;
pub mod validation;
