//! The renderable surface a drag runs against.
//!
//! The engine never touches widgets directly. It asks the surface for geometry
//! (day columns, week rows, header width, scroll viewport) and tells it which
//! visual affordances to show (ghosts, drop highlight, hidden or faded
//! originals).

use chrono::NaiveDate;
use egui::{Pos2, Rect, Vec2};

use crate::models::grid::{GridContext, TaskHit};
use crate::models::task::TaskId;

use super::ghost::GhostCanvas;

/// One day column of the hour grid in screen coordinates.
///
/// `rect.top()` is the visual-day start of `date` after scrolling, so it may lie
/// above the visible area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub rect: Rect,
}

/// One week row of the calendar grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeekRow {
    pub week_start: NaiveDate,
    pub rect: Rect,
}

/// The scrollable part of the hour grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollViewport {
    pub rect: Rect,
    pub offset: f32,
    pub max_offset: f32,
}

impl ScrollViewport {
    pub fn can_scroll(&self, delta: f32) -> bool {
        (delta < 0.0 && self.offset > 0.0) || (delta > 0.0 && self.offset < self.max_offset)
    }
}

/// Cell highlighted under the pointer while dragging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTarget {
    pub grid: GridContext,
    pub date: NaiveDate,
}

pub trait Surface: GhostCanvas {
    /// Task element and handle region under the pointer.
    fn hit_test(&self, pos: Pos2) -> Option<TaskHit>;

    /// Hour-grid column containing the pointer horizontally.
    fn day_column_at(&self, pos: Pos2) -> Option<DayColumn>;

    /// Hour-grid column showing `date`, if it is laid out.
    fn day_column(&self, date: NaiveDate) -> Option<DayColumn>;

    /// Rendered width of the reference header cell (one day column in the day-based grids).
    fn header_column_width(&self, grid: GridContext) -> Option<f32>;

    /// Day cell under the pointer in the long-term strip or the calendar.
    fn date_at(&self, grid: GridContext, pos: Pos2) -> Option<NaiveDate>;

    /// Calendar week row containing the pointer vertically.
    fn week_row_at(&self, pos: Pos2) -> Option<WeekRow>;

    /// Calendar week row starting at `week_start`, if it is laid out.
    fn week_row(&self, week_start: NaiveDate) -> Option<WeekRow>;

    fn scroll_viewport(&self) -> Option<ScrollViewport>;

    /// Scroll the hour grid; returns the distance actually scrolled.
    fn scroll_by(&mut self, delta: f32) -> f32;

    /// Hide every element rendering `task_id` (including segments of it).
    fn set_hidden(&mut self, task_id: TaskId, hidden: bool);

    /// Dim the original while previews live in other rows.
    fn set_faded(&mut self, task_id: TaskId, faded: bool);

    /// Visually offset the original element instead of drawing ghosts.
    fn set_translation(&mut self, task_id: TaskId, offset: Option<Vec2>);

    /// Mark the element as the active drag source.
    fn set_dragging(&mut self, task_id: TaskId, dragging: bool);

    fn set_drop_target(&mut self, target: Option<DropTarget>);
}
