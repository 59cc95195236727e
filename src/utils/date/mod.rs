// Date utility functions
// Visual-day arithmetic: a day begins at a configurable hour, not at midnight

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Clock time at which a visual day starts.
pub fn start_hour_time(start_hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(start_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN)
}

/// First instant of the visual day labelled `date`.
pub fn visual_day_start(date: NaiveDate, start_hour: u32) -> NaiveDateTime {
    date.and_time(start_hour_time(start_hour))
}

/// Last minute of the visual day labelled `date` (next day's start hour minus one minute).
pub fn visual_day_last_minute(date: NaiveDate, start_hour: u32) -> NaiveDateTime {
    visual_day_start(date, start_hour) + Duration::minutes(MINUTES_PER_DAY - 1)
}

/// The visual day an instant belongs to. Times before `start_hour` belong to the previous label.
pub fn visual_date_of(instant: NaiveDateTime, start_hour: u32) -> NaiveDate {
    (instant - Duration::hours(i64::from(start_hour.min(23)))).date()
}

/// Minutes since the configured visual-day start, in `0..1440`.
///
/// Clock times earlier than `start_hour` wrap to the end of the range; callers chaining
/// across days add 1440 themselves.
pub fn minutes_from_visual_midnight(time: NaiveTime, start_hour: u32) -> i64 {
    let since_midnight = i64::from(time.hour()) * 60 + i64::from(time.minute());
    (since_midnight - i64::from(start_hour.min(23)) * 60).rem_euclid(MINUTES_PER_DAY)
}

/// Signed whole-day difference `date - reference`.
pub fn day_offset(date: NaiveDate, reference: NaiveDate) -> i64 {
    (date - reference).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Minutes between two instants, as used by all hour-grid math.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_minutes()
}
