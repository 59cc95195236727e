//! Which task fields a finished drag may write.
//!
//! A strategy produces a candidate window (hour grid) or day span (day-based
//! grids). This module turns it into the smallest `TaskPatch` that makes the
//! stored task resolve to that candidate, touching only the fields the
//! operation is allowed to change and keeping implicit fields implicit where
//! possible.

use chrono::{Duration, NaiveDateTime};

use crate::models::grid::{DragOperation, Edge, ResizeHandle};
use crate::models::settings::ViewConfig;
use crate::models::task::{DateSpan, Task, TaskPatch, TaskShape, TemporalFields, TimeWindow};
use crate::utils::date::{add_days, visual_day_last_minute, visual_day_start};

use super::snap::SNAP_MINUTES;

fn resolves_window(task: &Task, fields: &TemporalFields, window: &TimeWindow, view: &ViewConfig) -> bool {
    let mut resolved = task.clone();
    write_fields(&mut resolved, fields);
    resolved.is_future = false;
    resolved.resolve_window(view.window_start, view.day_start_hour) == Some(*window)
}

fn resolves_span(task: &Task, fields: &TemporalFields, span: &DateSpan, view: &ViewConfig) -> bool {
    let mut resolved = task.clone();
    write_fields(&mut resolved, fields);
    resolved.is_future = false;
    resolved.resolve_span(view.window_start) == Some(*span)
}

fn write_fields(task: &mut Task, fields: &TemporalFields) {
    task.start_date = fields.start_date;
    task.start_time = fields.start_time;
    task.end_date = fields.end_date;
    task.end_time = fields.end_time;
}

fn finish(task: &Task, after: &TemporalFields) -> TaskPatch {
    let mut patch = TaskPatch::between(&TemporalFields::of(task), after);
    if task.is_future && after.start_date.is_some() {
        patch.is_future = Some(false);
    }
    patch
}

/// Add end fields, least explicit first, until the fields reproduce `window`.
fn settle_end(task: &Task, after: &mut TemporalFields, window: &TimeWindow, view: &ViewConfig) {
    if resolves_window(task, after, window, view) {
        return;
    }

    let with_time = TemporalFields {
        end_time: Some(window.end.time()),
        ..*after
    };
    let with_date = TemporalFields {
        end_date: Some(window.end.date()),
        ..*after
    };
    let with_both = TemporalFields {
        end_date: Some(window.end.date()),
        end_time: Some(window.end.time()),
        ..*after
    };

    *after = [with_time, with_date]
        .into_iter()
        .find(|candidate| resolves_window(task, candidate, window, view))
        .unwrap_or(with_both);
}

/// Start instant the fields spell out, before any minimum-length padding.
fn stored_start(fields: &TemporalFields, start_hour: u32) -> Option<NaiveDateTime> {
    let date = fields.start_date?;
    Some(match fields.start_time {
        Some(time) => date.and_time(time),
        None => visual_day_start(date, start_hour),
    })
}

/// End instant of a dated end, before any minimum-length padding.
fn stored_end(fields: &TemporalFields, start_hour: u32) -> Option<NaiveDateTime> {
    let date = fields.end_date?;
    Some(match fields.end_time {
        Some(time) => date.and_time(time),
        None => visual_day_last_minute(date, start_hour),
    })
}

/// Left-edge span resize: the end stays where the task resolved before the
/// drag, and the start stops one snap unit short of it.
fn hold_end(task: &Task, after: &mut TemporalFields, original: &DateSpan, view: &ViewConfig) {
    let start_hour = view.day_start_hour;
    let Some(held) = task
        .resolve_window(view.window_start, start_hour)
        .map(|window| window.end)
    else {
        after.end_date = Some(original.end);
        return;
    };

    let latest = held - Duration::minutes(SNAP_MINUTES);
    if stored_start(after, start_hour).map_or(false, |start| start > latest) {
        log::debug!("span resize of task {} clamped to start at {}", task.id, latest);
        after.start_date = Some(latest.date());
        after.start_time = Some(latest.time());
    }

    let keeps_end = |fields: &TemporalFields| {
        let mut resolved = task.clone();
        write_fields(&mut resolved, fields);
        resolved
            .resolve_window(view.window_start, start_hour)
            .map(|window| window.end)
            == Some(held)
    };
    // A bare end time that still lands on the held instant stays bare
    if keeps_end(&*after) {
        return;
    }

    let by_label = TemporalFields {
        end_date: Some(original.end),
        ..*after
    };
    let by_instant = TemporalFields {
        end_date: Some(held.date()),
        end_time: Some(held.time()),
        ..*after
    };
    *after = if keeps_end(&by_label) { by_label } else { by_instant };
}

/// Right-edge span resize: pull a dated end that now precedes the start back
/// to one snap unit after it.
fn keep_end_after_start(after: &mut TemporalFields, start_hour: u32) {
    let (Some(start), Some(end)) = (stored_start(after, start_hour), stored_end(after, start_hour)) else {
        return;
    };
    let earliest = start + Duration::minutes(SNAP_MINUTES);
    if end < earliest {
        after.end_date = Some(earliest.date());
        after.end_time = Some(earliest.time());
    }
}

/// Patch for a drag that ended in the hour grid.
pub fn timed_patch(
    task: &Task,
    operation: DragOperation,
    window: &TimeWindow,
    view: &ViewConfig,
) -> TaskPatch {
    let before = TemporalFields::of(task);
    let mut after = before;

    let write_start = |after: &mut TemporalFields| {
        after.start_date = Some(window.start.date());
        after.start_time = Some(window.start.time());
    };
    // Explicit end fields follow the window; absent ones stay absent unless needed
    let write_existing_end = |after: &mut TemporalFields| {
        if before.end_date.is_some() {
            after.end_date = Some(window.end.date());
        }
        if before.end_time.is_some() {
            after.end_time = Some(window.end.time());
        }
    };

    match operation {
        DragOperation::Move => {
            write_start(&mut after);
            write_existing_end(&mut after);
            if task.shape() == TaskShape::Window || task.shape() == TaskShape::ImpliedStart {
                settle_end(task, &mut after, window, view);
            }
        }
        DragOperation::Resize(ResizeHandle::Top) => {
            write_start(&mut after);
            write_existing_end(&mut after);
            settle_end(task, &mut after, window, view);
        }
        DragOperation::Resize(_) => {
            if task.start_date.is_none() {
                write_start(&mut after);
            }
            after.end_time = Some(window.end.time());
            if before.end_date.is_some() {
                after.end_date = Some(window.end.date());
            }
            settle_end(task, &mut after, window, view);
        }
    }

    finish(task, &after)
}

/// Patch for a long-term task dropped onto the hour grid: every field explicit.
pub fn conversion_patch(task: &Task, window: &TimeWindow) -> TaskPatch {
    let after = TemporalFields {
        start_date: Some(window.start.date()),
        start_time: Some(window.start.time()),
        end_date: Some(window.end.date()),
        end_time: Some(window.end.time()),
    };
    finish(task, &after)
}

/// Patch for a drag that ended in the long-term strip or the calendar.
///
/// `original` is the span the task resolved to when the drag began (`None` for
/// backlog tasks being scheduled).
pub fn span_patch(
    task: &Task,
    operation: DragOperation,
    original: Option<&DateSpan>,
    span: &DateSpan,
    view: &ViewConfig,
) -> TaskPatch {
    let before = TemporalFields::of(task);
    let mut after = before;

    match (operation, original) {
        (DragOperation::Move, Some(original)) => {
            let delta = (span.start - original.start).num_days();
            after.start_date = Some(span.start);
            after.end_date = before.end_date.map(|end| add_days(end, delta));
        }
        (DragOperation::Move, None) => {
            after.start_date = Some(span.start);
        }
        (DragOperation::Resize(handle), Some(original)) if handle.edge() == Edge::Start => {
            after.start_date = Some(span.start);
            hold_end(task, &mut after, original, view);
        }
        (DragOperation::Resize(_), _) => {
            after.end_date = Some(span.end);
            keep_end_after_start(&mut after, view.day_start_hour);
        }
    }

    if !resolves_span(task, &after, span, view) && after.end_date.is_none() && span.days() > 1 {
        after.end_date = Some(span.end);
    }

    finish(task, &after)
}
