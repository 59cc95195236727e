//! Cross-boundary splitting.
//!
//! A candidate placement that straddles a visual-day boundary (hour grid) or a
//! week boundary (calendar grid) is drawn as one piece per cell. These
//! functions only compute the pieces; drawing them is the ghost pool's job.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::task::{DateSpan, TimeWindow};
use crate::utils::date::{add_days, minutes_between, visual_date_of, visual_day_start};

/// The part of a window that falls inside one visual day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DaySegment {
    /// Visual day label
    pub date: NaiveDate,
    pub window: TimeWindow,
    /// Offset of `window.start` from the visual day start
    pub start_minute: i64,
    /// Offset of `window.end` from the visual day start (at most 1440)
    pub end_minute: i64,
}

impl DaySegment {
    pub fn minutes(&self) -> i64 {
        self.end_minute - self.start_minute
    }
}

fn day_window(date: NaiveDate, start_hour: u32) -> TimeWindow {
    TimeWindow::new(
        visual_day_start(date, start_hour),
        visual_day_start(add_days(date, 1), start_hour),
    )
}

fn segment_on(window: &TimeWindow, date: NaiveDate, start_hour: u32) -> Option<DaySegment> {
    let day = day_window(date, start_hour);
    let clipped = window.clip(&day)?;
    Some(DaySegment {
        date,
        window: clipped,
        start_minute: minutes_between(day.start, clipped.start),
        end_minute: minutes_between(day.start, clipped.end),
    })
}

/// Split `window` at every visual-day boundary it crosses.
///
/// The pieces are ordered, non-empty, and their union is exactly `window`.
pub fn split_by_visual_day(window: &TimeWindow, start_hour: u32) -> Vec<DaySegment> {
    let mut segments = Vec::new();
    if window.is_empty() {
        return segments;
    }

    let mut date = visual_date_of(window.start, start_hour);
    while visual_day_start(date, start_hour) < window.end {
        if let Some(segment) = segment_on(window, date, start_hour) {
            segments.push(segment);
        }
        date = add_days(date, 1);
    }
    segments
}

/// Split `window` against the previous, current and next visual day around `current`.
///
/// Pieces outside those three days are dropped, so at most three come back.
pub fn split_around(window: &TimeWindow, current: NaiveDate, start_hour: u32) -> Vec<DaySegment> {
    [-1, 0, 1]
        .into_iter()
        .filter_map(|offset| segment_on(window, add_days(current, offset), start_hour))
        .collect()
}

/// The part of a date span that falls inside one calendar week row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekSegment {
    pub week_start: NaiveDate,
    /// Column of the first covered day (0 = first day of week)
    pub first_col: u32,
    /// Number of covered columns
    pub columns: u32,
    pub span: DateSpan,
}

/// First day of the week row containing `date`.
pub fn week_start_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_monday() as i64
        - week_start.num_days_from_monday() as i64)
        % 7;
    add_days(date, -back)
}

/// Split an inclusive day span into one piece per intersecting week row.
pub fn split_by_week(span: &DateSpan, week_start: Weekday) -> Vec<WeekSegment> {
    let mut segments = Vec::new();
    let mut row = week_start_of(span.start, week_start);

    while row <= span.end {
        let row_end = add_days(row, 6);
        let start = span.start.max(row);
        let end = span.end.min(row_end);
        segments.push(WeekSegment {
            week_start: row,
            first_col: (start - row).num_days() as u32,
            columns: ((end - start).num_days() + 1) as u32,
            span: DateSpan::new(start, end),
        });
        row = add_days(row, 7);
    }
    segments
}
