use chrono::{NaiveDate, NaiveTime};

use super::Task;

/// The four schedule fields a drag may rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalFields {
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
}

impl TemporalFields {
    pub fn of(task: &Task) -> Self {
        Self {
            start_date: task.start_date,
            start_time: task.start_time,
            end_date: task.end_date,
            end_time: task.end_time,
        }
    }
}

/// Partial update sent to the task store.
///
/// `None` leaves a field untouched, `Some(None)` clears it and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub start_date: Option<Option<NaiveDate>>,
    pub start_time: Option<Option<NaiveTime>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub end_time: Option<Option<NaiveTime>>,
    pub is_future: Option<bool>,
}

impl TaskPatch {
    /// Patch containing only the fields that differ between `before` and `after`.
    pub fn between(before: &TemporalFields, after: &TemporalFields) -> Self {
        fn changed<T: PartialEq + Copy>(old: Option<T>, new: Option<T>) -> Option<Option<T>> {
            (old != new).then_some(new)
        }

        Self {
            start_date: changed(before.start_date, after.start_date),
            start_time: changed(before.start_time, after.start_time),
            end_date: changed(before.end_date, after.end_date),
            end_time: changed(before.end_time, after.end_time),
            is_future: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.start_time.is_none()
            && self.end_date.is_none()
            && self.end_time.is_none()
            && self.is_future.is_none()
    }

    pub fn start_date(mut self, value: NaiveDate) -> Self {
        self.start_date = Some(Some(value));
        self
    }

    pub fn start_time(mut self, value: NaiveTime) -> Self {
        self.start_time = Some(Some(value));
        self
    }

    pub fn end_date(mut self, value: NaiveDate) -> Self {
        self.end_date = Some(Some(value));
        self
    }

    pub fn end_time(mut self, value: NaiveTime) -> Self {
        self.end_time = Some(Some(value));
        self
    }

    pub fn is_future(mut self, value: bool) -> Self {
        self.is_future = Some(value);
        self
    }

    /// Write the patch into an in-memory task record.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(value) = self.start_date {
            task.start_date = value;
        }
        if let Some(value) = self.start_time {
            task.start_time = value;
        }
        if let Some(value) = self.end_date {
            task.end_date = value;
        }
        if let Some(value) = self.end_time {
            task.end_time = value;
        }
        if let Some(value) = self.is_future {
            task.is_future = value;
        }
    }
}
