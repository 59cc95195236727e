// Grid module
// Identifies which coordinate space a drag happens in and which part of a
// rendered task was grabbed

use egui::Rect;

use crate::models::task::TaskId;

/// The three coordinate spaces a task can be dragged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridContext {
    /// Hour-by-hour day columns (y = time of day)
    Timeline,
    /// Whole-day strip above the timeline (x = day column)
    LongTerm,
    /// Month calendar made of week rows (x = weekday, y = week)
    Calendar,
}

impl GridContext {
    /// Hour grid uses minute snapping; the other two snap to whole days.
    pub fn is_day_based(self) -> bool {
        !matches!(self, GridContext::Timeline)
    }
}

/// Which edge of the task window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Start,
    End,
}

/// Visual handle position on a rendered task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Top edge - adjusts start time (timeline)
    Top,
    /// Bottom edge - adjusts end time (timeline)
    Bottom,
    /// Left edge - adjusts start date (long-term / calendar)
    Left,
    /// Right edge - adjusts end date (long-term / calendar)
    Right,
}

impl ResizeHandle {
    /// Returns true if this handle adjusts time (vertical drag)
    pub fn is_vertical(&self) -> bool {
        matches!(self, ResizeHandle::Top | ResizeHandle::Bottom)
    }

    /// Returns true if this handle adjusts date (horizontal drag)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, ResizeHandle::Left | ResizeHandle::Right)
    }

    /// Task edge that follows the pointer while this handle is dragged.
    pub fn edge(&self) -> Edge {
        match self {
            ResizeHandle::Top | ResizeHandle::Left => Edge::Start,
            ResizeHandle::Bottom | ResizeHandle::Right => Edge::End,
        }
    }

    /// Whether the handle belongs on a task in the given grid.
    pub fn fits(&self, grid: GridContext) -> bool {
        match grid {
            GridContext::Timeline => self.is_vertical(),
            GridContext::LongTerm | GridContext::Calendar => self.is_horizontal(),
        }
    }
}

/// Sub-region of a task element under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleRegion {
    /// Plain body: selects on click, moves once dragged
    Body,
    /// Dedicated grip: always a move
    Grip,
    /// Edge handle: resize
    Edge(ResizeHandle),
}

/// What a drag does, fixed at pointer-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOperation {
    Move,
    Resize(ResizeHandle),
}

impl DragOperation {
    pub fn from_region(region: HandleRegion) -> Self {
        match region {
            HandleRegion::Body | HandleRegion::Grip => DragOperation::Move,
            HandleRegion::Edge(handle) => DragOperation::Resize(handle),
        }
    }
}

/// A rendered task on the surface.
///
/// A task crossing a day or week boundary is drawn as several elements; each one
/// points back at the stored task through `original_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskElement {
    pub task_id: TaskId,
    pub original_id: Option<TaskId>,
    pub grid: GridContext,
    pub rect: Rect,
}

impl TaskElement {
    pub fn new(task_id: TaskId, grid: GridContext, rect: Rect) -> Self {
        Self {
            task_id,
            original_id: None,
            grid,
            rect,
        }
    }

    pub fn segment_of(mut self, original: TaskId) -> Self {
        self.original_id = Some(original);
        self
    }

    /// Id of the stored task this element renders.
    pub fn source_id(&self) -> TaskId {
        self.original_id.unwrap_or(self.task_id)
    }
}

/// Result of hit-testing the surface at a pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskHit {
    pub element: TaskElement,
    pub region: HandleRegion,
}
