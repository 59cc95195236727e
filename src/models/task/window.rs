use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::utils::date::add_days;

/// Half-open `[start, end)` interval on the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn shifted(&self, by: Duration) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }

    /// Intersection with another window, `None` when they do not overlap.
    pub fn clip(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let clipped = TimeWindow {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// Inclusive range of calendar days, as laid out in the long-term and calendar grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Builds a span, pulling `end` back to `start` if it lies before it.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Number of day columns covered (always at least one).
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: add_days(self.start, days),
            end: add_days(self.end, days),
        }
    }
}
