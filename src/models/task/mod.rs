// Task module
// Schedulable task record and the defaulting rules that turn its optional
// date/time fields into a concrete window

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::utils::date::{add_days, visual_day_last_minute, visual_day_start, MINUTES_PER_DAY};

mod patch;
mod window;

pub use patch::{TaskPatch, TemporalFields};
pub use window::{DateSpan, TimeWindow};

pub type TaskId = i64;

/// Implicit length of a task that has a start time but no end.
pub const DEFAULT_TIMED_MINUTES: i64 = 60;
/// Shortest window an explicit start/end pair is allowed to render as.
pub const MIN_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub deadline: Option<NaiveDate>,
    /// Unscheduled backlog item
    #[serde(default)]
    pub is_future: bool,
    pub color: Option<String>,
}

/// Which schedule fields are explicitly present.
///
/// The shape decides both what a missing field implies and which fields a
/// drag is allowed to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskShape {
    /// Backlog item without start or end
    Future,
    /// Nothing scheduled and not flagged as future
    Unscheduled,
    /// Start date only: one visual day
    AllDay,
    /// Start date and time, no end: one hour
    Timed,
    /// Explicit start and end (times optional)
    Window,
    /// End and/or deadline without a start; start is the visible window's left edge
    ImpliedStart,
}

impl Task {
    pub fn builder(id: TaskId) -> TaskBuilder {
        TaskBuilder::new(id)
    }

    pub fn shape(&self) -> TaskShape {
        let has_end = self.end_date.is_some() || self.end_time.is_some();
        match self.start_date {
            Some(_) if has_end => TaskShape::Window,
            Some(_) if self.start_time.is_some() => TaskShape::Timed,
            Some(_) => TaskShape::AllDay,
            None if self.is_future && !has_end => TaskShape::Future,
            None if has_end || self.deadline.is_some() => TaskShape::ImpliedStart,
            None => TaskShape::Unscheduled,
        }
    }

    /// Concrete wall-clock window after defaulting.
    ///
    /// `window_start` is the left-edge date of the visible range and only matters for
    /// tasks without a stored start. Returns `None` for unscheduled tasks.
    pub fn resolve_window(&self, window_start: NaiveDate, start_hour: u32) -> Option<TimeWindow> {
        let window = match self.shape() {
            TaskShape::Future | TaskShape::Unscheduled => return None,
            TaskShape::AllDay => {
                let date = self.start_date?;
                TimeWindow::new(
                    visual_day_start(date, start_hour),
                    visual_day_last_minute(date, start_hour),
                )
            }
            TaskShape::Timed => {
                let start = self.start_date?.and_time(self.start_time?);
                TimeWindow::new(start, start + Duration::minutes(DEFAULT_TIMED_MINUTES))
            }
            TaskShape::Window => {
                let date = self.start_date?;
                let start = match self.start_time {
                    Some(time) => date.and_time(time),
                    None => visual_day_start(date, start_hour),
                };
                let end = self.resolve_end(date, start, start_hour)?;
                TimeWindow::new(start, end)
            }
            TaskShape::ImpliedStart => {
                let start = visual_day_start(window_start, start_hour);
                let end = if self.end_date.is_some() || self.end_time.is_some() {
                    self.resolve_end(window_start, start, start_hour)?
                } else {
                    visual_day_last_minute(self.deadline?, start_hour)
                };
                TimeWindow::new(start, end)
            }
        };

        if window.minutes() < MIN_WINDOW_MINUTES {
            Some(TimeWindow::new(
                window.start,
                window.start + Duration::minutes(MIN_WINDOW_MINUTES),
            ))
        } else {
            Some(window)
        }
    }

    fn resolve_end(
        &self,
        fallback_date: NaiveDate,
        start: chrono::NaiveDateTime,
        start_hour: u32,
    ) -> Option<chrono::NaiveDateTime> {
        match (self.end_date, self.end_time) {
            (Some(date), Some(time)) => Some(date.and_time(time)),
            (Some(date), None) => Some(visual_day_last_minute(date, start_hour)),
            (None, Some(time)) => {
                let end = fallback_date.and_time(time);
                // A bare end time at or before the start rolls into the next day
                Some(if end <= start { end + Duration::days(1) } else { end })
            }
            (None, None) => None,
        }
    }

    /// Inclusive day range used by the long-term and calendar grids.
    pub fn resolve_span(&self, window_start: NaiveDate) -> Option<DateSpan> {
        let start = match self.shape() {
            TaskShape::Future | TaskShape::Unscheduled => return None,
            TaskShape::ImpliedStart => window_start,
            _ => self.start_date?,
        };

        let end = match (self.end_date, self.end_time, self.start_time) {
            (Some(date), _, _) => date,
            (None, Some(end), Some(begin)) if end <= begin && self.start_date.is_some() => {
                add_days(start, 1)
            }
            (None, _, _) if self.start_date.is_none() => self.deadline.unwrap_or(start),
            _ => start,
        };

        Some(DateSpan::new(start, end))
    }

    /// Whether the resolved window is a long-term task (24 hours or more).
    pub fn is_long_term(&self, window_start: NaiveDate, start_hour: u32) -> bool {
        match self.shape() {
            TaskShape::AllDay => true,
            _ => self
                .resolve_window(window_start, start_hour)
                .map_or(false, |w| w.minutes() >= MINUTES_PER_DAY),
        }
    }
}

/// True when `window` is exactly the implicit window of a start-date-only task.
pub fn is_one_day(window: &TimeWindow, start_hour: u32) -> bool {
    let date = window.start.date();
    window.start == visual_day_start(date, start_hour)
        && window.end == visual_day_last_minute(date, start_hour)
}

/// Builder for creating tasks with optional fields
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: TaskId) -> Self {
        Self {
            task: Task {
                id,
                title: String::new(),
                start_date: None,
                start_time: None,
                end_date: None,
                end_time: None,
                deadline: None,
                is_future: false,
                color: None,
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.task.title = title.into();
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.task.start_date = Some(date);
        self
    }

    pub fn start_time(mut self, time: NaiveTime) -> Self {
        self.task.start_time = Some(time);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.task.end_date = Some(date);
        self
    }

    pub fn end_time(mut self, time: NaiveTime) -> Self {
        self.task.end_time = Some(time);
        self
    }

    pub fn deadline(mut self, date: NaiveDate) -> Self {
        self.task.deadline = Some(date);
        self
    }

    pub fn future(mut self, is_future: bool) -> Self {
        self.task.is_future = is_future;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.task.color = Some(color.into());
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_shape_taxonomy() {
        assert_eq!(Task::builder(1).future(true).build().shape(), TaskShape::Future);
        assert_eq!(Task::builder(1).build().shape(), TaskShape::Unscheduled);
        assert_eq!(Task::builder(1).start_date(d(10)).build().shape(), TaskShape::AllDay);
        assert_eq!(
            Task::builder(1).start_date(d(10)).start_time(t(9, 0)).build().shape(),
            TaskShape::Timed
        );
        assert_eq!(
            Task::builder(1).start_date(d(10)).end_time(t(10, 0)).build().shape(),
            TaskShape::Window
        );
        assert_eq!(Task::builder(1).deadline(d(12)).build().shape(), TaskShape::ImpliedStart);
        assert_eq!(
            Task::builder(1).end_date(d(12)).future(true).build().shape(),
            TaskShape::ImpliedStart
        );
    }

    #[test]
    fn test_timed_task_defaults_to_one_hour() {
        let task = Task::builder(1).start_date(d(10)).start_time(t(9, 0)).build();
        let window = task.resolve_window(d(10), 5).unwrap();
        assert_eq!(window.minutes(), 60);
        assert_eq!(window.start, d(10).and_time(t(9, 0)));
    }

    #[test]
    fn test_bare_end_time_rolls_over_midnight() {
        let task = Task::builder(1)
            .start_date(d(10))
            .start_time(t(22, 0))
            .end_time(t(2, 0))
            .build();
        let window = task.resolve_window(d(10), 0).unwrap();
        assert_eq!(window.end, d(11).and_time(t(2, 0)));
        assert_eq!(task.resolve_span(d(10)), Some(DateSpan::new(d(10), d(11))));
    }

    #[test_case(0 ; "midnight start")]
    #[test_case(5 ; "early morning start")]
    #[test_case(23 ; "late evening start")]
    fn test_all_day_round_trip(start_hour: u32) {
        let task = Task::builder(1).start_date(d(10)).build();
        let window = task.resolve_window(d(1), start_hour).unwrap();
        assert!(is_one_day(&window, start_hour));
        assert_eq!(window.minutes(), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn test_implied_start_uses_window_edge() {
        let task = Task::builder(1).deadline(d(14)).build();
        let window = task.resolve_window(d(11), 0).unwrap();
        assert_eq!(window.start, d(11).and_time(t(0, 0)));
        assert_eq!(window.end, d(14).and_time(t(23, 59)));
        assert_eq!(task.resolve_span(d(11)), Some(DateSpan::new(d(11), d(14))));
    }

    #[test]
    fn test_inverted_window_is_clamped() {
        let task = Task::builder(1)
            .start_date(d(10))
            .start_time(t(9, 0))
            .end_date(d(9))
            .end_time(t(9, 0))
            .build();
        let window = task.resolve_window(d(10), 0).unwrap();
        assert_eq!(window.minutes(), MIN_WINDOW_MINUTES);
    }

    #[test]
    fn test_future_task_has_no_window() {
        let task = Task::builder(1).future(true).build();
        assert!(task.resolve_window(d(10), 0).is_none());
        assert!(task.resolve_span(d(10)).is_none());
    }
}
