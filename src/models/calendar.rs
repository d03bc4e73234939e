//! Slot calendar and time window models.
//!
//! The planning horizon is one week of eight one-hour meeting windows per
//! day, anchored to a configured base date. A slot is a dense index
//! `day * 8 + time_of_day` in `[0, 56)`; it is never persisted, only derived.
//!
//! # Time Table
//!
//! | index | window |
//! |-------|--------|
//! | 0..3 | 09:00-10:00, 10:00-11:00, 11:00-12:00 |
//! | 3..8 | 13:00-14:00 .. 17:00-18:00 (after the lunch gap) |
//!
//! The slot → (date, start, end) mapping is total and invertible, and it is
//! the only place slot semantics live: the model builder, decoder and
//! fallback all go through it.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Meeting windows per day.
pub const SLOTS_PER_DAY: usize = 8;
/// Days in the planning horizon.
pub const HORIZON_DAYS: usize = 7;
/// Total slots in the horizon.
pub const SLOT_COUNT: usize = SLOTS_PER_DAY * HORIZON_DAYS;

/// Days covered by the fallback preference window.
const DEFAULT_PREFERRED_DAYS: usize = 3;

/// A time-of-day interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a window from whole hours.
    ///
    /// Hours outside `0..24` clamp to midnight; the built-in table never
    /// produces them.
    pub fn hours(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A slot index in `[0, SLOT_COUNT)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(u16);

impl Slot {
    /// Creates a slot, or `None` if the index is outside the horizon.
    pub fn new(index: usize) -> Option<Self> {
        if index < SLOT_COUNT {
            Some(Self(index as u16))
        } else {
            None
        }
    }

    /// All slots in ascending order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOT_COUNT as u16).map(Slot)
    }

    /// Dense index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Day offset from the base date.
    #[inline]
    pub fn day(self) -> usize {
        self.index() / SLOTS_PER_DAY
    }

    /// Index into the time-of-day table.
    #[inline]
    pub fn time_of_day(self) -> usize {
        self.index() % SLOTS_PER_DAY
    }
}

/// Days of the horizon a request prefers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferredWindow {
    days: [bool; HORIZON_DAYS],
}

impl PreferredWindow {
    /// A window covering no day.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the window covers the slot's day.
    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        self.days[slot.day()]
    }

    /// Whether the window covers no day at all.
    pub fn is_empty(&self) -> bool {
        !self.days.iter().any(|&d| d)
    }

    /// Number of covered days.
    pub fn day_count(&self) -> usize {
        self.days.iter().filter(|&&d| d).count()
    }
}

/// Fixed slot → calendar mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCalendar {
    /// Date of day 0.
    pub base_date: NaiveDate,
    /// Time-of-day windows, one per slot of a day.
    pub time_table: [TimeWindow; SLOTS_PER_DAY],
}

impl SlotCalendar {
    /// Base date used when the input does not configure one.
    pub fn default_base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 15).unwrap_or(NaiveDate::MIN)
    }

    /// Creates a calendar anchored at `base_date` with the standard time table.
    pub fn new(base_date: NaiveDate) -> Self {
        Self {
            base_date,
            time_table: [
                TimeWindow::hours(9, 10),
                TimeWindow::hours(10, 11),
                TimeWindow::hours(11, 12),
                TimeWindow::hours(13, 14),
                TimeWindow::hours(14, 15),
                TimeWindow::hours(15, 16),
                TimeWindow::hours(16, 17),
                TimeWindow::hours(17, 18),
            ],
        }
    }

    /// Calendar date of a slot.
    pub fn date_of(&self, slot: Slot) -> NaiveDate {
        self.base_date + Duration::days(slot.day() as i64)
    }

    /// Time window of a slot.
    pub fn window_of(&self, slot: Slot) -> TimeWindow {
        self.time_table[slot.time_of_day()]
    }

    /// Inverse mapping: the slot starting at `start` on `date`.
    ///
    /// Returns `None` for dates outside the horizon or times that do not
    /// start a window.
    pub fn slot_for(&self, date: NaiveDate, start: NaiveTime) -> Option<Slot> {
        let day = (date - self.base_date).num_days();
        if !(0..HORIZON_DAYS as i64).contains(&day) {
            return None;
        }
        let time_of_day = self.time_table.iter().position(|w| w.start == start)?;
        Slot::new(day as usize * SLOTS_PER_DAY + time_of_day)
    }

    /// Day offset of a date, if it is inside the horizon.
    pub fn day_offset(&self, date: NaiveDate) -> Option<usize> {
        let day = (date - self.base_date).num_days();
        if (0..HORIZON_DAYS as i64).contains(&day) {
            Some(day as usize)
        } else {
            None
        }
    }

    /// Resolves preferred date tags into a window over the horizon.
    ///
    /// Each tag is read as an ISO date (`YYYY-MM-DD`, extra suffix ignored)
    /// or a weekday name. No tags means no preference. Tags that all fall
    /// outside the horizon (or do not parse) select the first three days.
    pub fn preferred_window(&self, tags: &[String]) -> PreferredWindow {
        let mut window = PreferredWindow::none();
        if tags.is_empty() {
            return window;
        }

        for tag in tags {
            let tag = tag.trim();
            if let Some(date) = parse_iso_date(tag) {
                if let Some(day) = self.day_offset(date) {
                    window.days[day] = true;
                }
            } else if let Ok(weekday) = tag.parse::<Weekday>() {
                for day in 0..HORIZON_DAYS {
                    let date = self.base_date + Duration::days(day as i64);
                    if date.weekday() == weekday {
                        window.days[day] = true;
                    }
                }
            }
        }

        if window.is_empty() {
            for day in 0..DEFAULT_PREFERRED_DAYS {
                window.days[day] = true;
            }
        }
        window
    }
}

impl Default for SlotCalendar {
    fn default() -> Self {
        Self::new(Self::default_base_date())
    }
}

fn parse_iso_date(tag: &str) -> Option<NaiveDate> {
    let head = tag.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::hours(9, 10);
        assert_eq!(w.duration_minutes(), 60);
        assert!(w.contains(time(9, 0)));
        assert!(w.contains(time(9, 59)));
        assert!(!w.contains(time(10, 0))); // exclusive end
        assert!(!w.overlaps(&TimeWindow::hours(10, 11))); // touching
        assert!(w.overlaps(&TimeWindow::hours(9, 11)));
    }

    #[test]
    fn test_slot_bounds() {
        assert!(Slot::new(0).is_some());
        assert!(Slot::new(55).is_some());
        assert!(Slot::new(56).is_none());
        assert_eq!(Slot::all().count(), SLOT_COUNT);

        let s = Slot::new(19).unwrap();
        assert_eq!(s.day(), 2);
        assert_eq!(s.time_of_day(), 3);
    }

    #[test]
    fn test_slot_mapping() {
        let cal = SlotCalendar::default();
        let s0 = Slot::new(0).unwrap();
        assert_eq!(cal.date_of(s0), date(2025, 11, 15));
        assert_eq!(cal.window_of(s0).start, time(9, 0));
        assert_eq!(cal.window_of(s0).end, time(10, 0));

        let s1 = Slot::new(1).unwrap();
        assert_eq!(cal.window_of(s1).start, time(10, 0));

        // Lunch gap: the fourth window starts at 13:00
        let s3 = Slot::new(3).unwrap();
        assert_eq!(cal.window_of(s3).start, time(13, 0));

        let last = Slot::new(55).unwrap();
        assert_eq!(cal.date_of(last), date(2025, 11, 21));
        assert_eq!(cal.window_of(last).end, time(18, 0));
    }

    #[test]
    fn test_slot_mapping_is_invertible() {
        let cal = SlotCalendar::new(date(2024, 2, 26)); // crosses Feb 29
        for slot in Slot::all() {
            let back = cal.slot_for(cal.date_of(slot), cal.window_of(slot).start);
            assert_eq!(back, Some(slot));
        }
        assert_eq!(cal.slot_for(date(2024, 3, 4), time(9, 0)), None); // day 7
        assert_eq!(cal.slot_for(date(2024, 2, 26), time(12, 0)), None); // lunch
    }

    #[test]
    fn test_preferred_window_dates() {
        let cal = SlotCalendar::default();
        let w = cal.preferred_window(&["2025-11-16".into(), "2025-11-18T10:00:00Z".into()]);
        assert_eq!(w.day_count(), 2);
        assert!(!w.contains(Slot::new(0).unwrap()));
        assert!(w.contains(Slot::new(8).unwrap())); // day 1
        assert!(w.contains(Slot::new(31).unwrap())); // day 3
    }

    #[test]
    fn test_preferred_window_weekday() {
        // 2025-11-15 is a Saturday; Monday is day 2
        let cal = SlotCalendar::default();
        let w = cal.preferred_window(&["Monday".into()]);
        assert_eq!(w.day_count(), 1);
        assert!(w.contains(Slot::new(16).unwrap()));
    }

    #[test]
    fn test_preferred_window_fallback_and_empty() {
        let cal = SlotCalendar::default();
        assert!(cal.preferred_window(&[]).is_empty());

        let w = cal.preferred_window(&["2030-01-01".into(), "someday".into()]);
        assert_eq!(w.day_count(), 3);
        assert!(w.contains(Slot::new(23).unwrap()));
        assert!(!w.contains(Slot::new(24).unwrap()));
    }
}
