//! Meeting scheduling domain models.
//!
//! Provides the input types (requests, hosts, problem spec), the fixed
//! slot calendar, and the decoded schedule.
//!
//! # Domain Mapping
//!
//! | u-meeting | Binary model |
//! |-----------|--------------|
//! | Request | mutual-exclusion family |
//! | Host × Slot | conflict family |
//! | Request × Host × Slot | one binary variable |
//! | Schedule | decoded sample |

mod calendar;
mod host;
mod problem;
mod request;
mod schedule;

pub use calendar::{
    PreferredWindow, Slot, SlotCalendar, TimeWindow, HORIZON_DAYS, SLOTS_PER_DAY, SLOT_COUNT,
};
pub(crate) use host::normalize_tag;
pub use host::Host;
pub use problem::{
    ProblemConstraints, ProblemSpec, DEFAULT_EXPERTISE_WEIGHT, DEFAULT_PREFERRED_BONUS,
    DEFAULT_PREFERRED_WEIGHT,
};
pub use request::{Request, DEFAULT_IMPORTANCE};
pub use schedule::{Schedule, ScheduledMeeting};
