//! Move and resize strategies, one per grid family.
//!
//! A strategy owns the per-gesture working state (anchor, original geometry,
//! last candidate) and implements the three-step contract used by the
//! session: `on_down` once, `on_move` for every pointer update, `on_up` to
//! produce the final patch.

use egui::Pos2;

use crate::models::grid::{DragOperation, GridContext, TaskElement};
use crate::models::settings::ViewConfig;
use crate::models::task::{DateSpan, Task, TaskPatch, TimeWindow};

use super::ghost::{GhostPool, GhostSource};
use super::surface::Surface;

mod span;
mod timeline;

pub use span::{SpanMove, SpanResize};
pub use timeline::{TimelineMove, TimelineResize};

/// Everything a strategy may touch while handling one pointer event.
pub struct DragContext<'a> {
    pub surface: &'a mut dyn Surface,
    pub ghosts: &'a mut GhostPool,
    pub view: &'a ViewConfig,
    pub task: &'a Task,
    pub element: &'a TaskElement,
}

impl DragContext<'_> {
    pub fn ghost_source(&self) -> GhostSource {
        GhostSource {
            task_id: self.element.source_id(),
            title: self.task.title.clone(),
            color: self.task.color.clone(),
        }
    }

    /// Drop all previews for this frame (pointer over no valid cell).
    pub fn hide_previews(&mut self) {
        self.ghosts.clear(&mut *self.surface);
        self.surface.set_drop_target(None);
    }
}

/// Where the task would land if the pointer were released now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    /// New wall-clock window in the hour grid
    Timed(TimeWindow),
    /// New inclusive day range in the long-term strip or calendar
    Days(DateSpan),
    /// Long-term task dropped onto the hour grid
    ConvertToTimed(TimeWindow),
}

pub trait DragStrategy {
    fn grid(&self) -> GridContext;

    fn operation(&self) -> DragOperation;

    /// Capture the grab point and the task's original geometry.
    fn on_down(&mut self, ctx: &mut DragContext<'_>, pos: Pos2);

    /// Recompute the candidate for the current pointer position and refresh previews.
    fn on_move(&mut self, ctx: &mut DragContext<'_>, pos: Pos2);

    /// Final candidate at `pos` as a patch of authorized fields.
    ///
    /// `None` means no valid placement was ever found and nothing should be written.
    fn on_up(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) -> Option<TaskPatch>;

    fn candidate(&self) -> Option<Candidate>;
}

/// Strategy for a grab in `grid` that performs `operation`.
///
/// Handles that do not belong to the grid (a top edge in the calendar, say)
/// degrade to a move.
pub fn select_strategy(grid: GridContext, operation: DragOperation) -> Box<dyn DragStrategy> {
    let operation = match operation {
        DragOperation::Resize(handle) if !handle.fits(grid) => DragOperation::Move,
        other => other,
    };

    match (grid, operation) {
        (GridContext::Timeline, DragOperation::Move) => Box::new(TimelineMove::new()),
        (GridContext::Timeline, DragOperation::Resize(handle)) => {
            Box::new(TimelineResize::new(handle))
        }
        (_, DragOperation::Move) => Box::new(SpanMove::new(grid)),
        (_, DragOperation::Resize(handle)) => Box::new(SpanResize::new(grid, handle)),
    }
}
