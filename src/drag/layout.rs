//! A `Surface` backed by a plain description of the laid-out grids.
//!
//! The egui host rebuilds the `GridLayout` every frame and keeps the
//! `SurfaceVisuals` (ghosts, hidden/faded elements) across frames, since a
//! drag spans many frames.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use egui::{Pos2, Rect, Vec2};

use crate::models::grid::{GridContext, TaskElement, TaskHit};
use crate::models::task::TaskId;
use crate::utils::date::add_days;

use super::ghost::{Ghost, GhostCanvas, GhostId};
use super::handles::HandleRects;
use super::surface::{DayColumn, DropTarget, ScrollViewport, Surface, WeekRow};

#[derive(Clone, Debug, PartialEq)]
pub struct ElementLayout {
    pub element: TaskElement,
    pub handles: HandleRects,
}

/// The whole-day strip above the hour grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongTermStrip {
    pub rect: Rect,
    pub first_date: NaiveDate,
    pub column_width: f32,
}

impl LongTermStrip {
    pub fn column_x(&self, column: i64) -> f32 {
        self.rect.left() + column as f32 * self.column_width
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalendarLayout {
    pub rows: Vec<WeekRow>,
    pub column_width: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLayout {
    pub day_columns: Vec<DayColumn>,
    pub long_term: Option<LongTermStrip>,
    pub calendar: Option<CalendarLayout>,
    /// Paint order: later elements sit on top
    pub elements: Vec<ElementLayout>,
    pub viewport: Option<ScrollViewport>,
}

/// Drag affordances that outlive a single frame.
#[derive(Clone, Debug, Default)]
pub struct SurfaceVisuals {
    pub ghosts: BTreeMap<GhostId, Ghost>,
    next_ghost: GhostId,
    pub hidden: HashSet<TaskId>,
    pub faded: HashSet<TaskId>,
    pub dragging: HashSet<TaskId>,
    pub translations: HashMap<TaskId, Vec2>,
    pub drop_target: Option<DropTarget>,
}

impl SurfaceVisuals {
    /// Whether any drag affordance is currently shown.
    pub fn is_idle(&self) -> bool {
        self.ghosts.is_empty()
            && self.hidden.is_empty()
            && self.faded.is_empty()
            && self.dragging.is_empty()
            && self.translations.is_empty()
            && self.drop_target.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct LayoutSurface {
    layout: GridLayout,
    visuals: SurfaceVisuals,
}

impl LayoutSurface {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            visuals: SurfaceVisuals::default(),
        }
    }

    /// Swap in a fresh layout, keeping ghosts and element state.
    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn visuals(&self) -> &SurfaceVisuals {
        &self.visuals
    }

    fn in_viewport(&self, pos: Pos2) -> bool {
        self.layout
            .viewport
            .map_or(true, |viewport| viewport.rect.contains(pos))
    }
}

impl GhostCanvas for LayoutSurface {
    fn create_ghost(&mut self, ghost: Ghost) -> GhostId {
        self.visuals.next_ghost += 1;
        let id = self.visuals.next_ghost;
        self.visuals.ghosts.insert(id, ghost);
        id
    }

    fn update_ghost(&mut self, id: GhostId, ghost: Ghost) {
        self.visuals.ghosts.insert(id, ghost);
    }

    fn remove_ghost(&mut self, id: GhostId) {
        self.visuals.ghosts.remove(&id);
    }
}

impl Surface for LayoutSurface {
    fn hit_test(&self, pos: Pos2) -> Option<TaskHit> {
        self.layout.elements.iter().rev().find_map(|item| {
            if self.visuals.hidden.contains(&item.element.source_id()) {
                return None;
            }
            if item.element.grid == GridContext::Timeline && !self.in_viewport(pos) {
                return None;
            }
            let region = item.handles.region_at(item.element.rect, pos)?;
            Some(TaskHit {
                element: item.element.clone(),
                region,
            })
        })
    }

    fn day_column_at(&self, pos: Pos2) -> Option<DayColumn> {
        if !self.in_viewport(pos) {
            return None;
        }
        self.layout
            .day_columns
            .iter()
            .find(|column| column.rect.contains(pos))
            .copied()
    }

    fn day_column(&self, date: NaiveDate) -> Option<DayColumn> {
        self.layout
            .day_columns
            .iter()
            .find(|column| column.date == date)
            .copied()
    }

    fn header_column_width(&self, grid: GridContext) -> Option<f32> {
        match grid {
            GridContext::LongTerm => self.layout.long_term.map(|strip| strip.column_width),
            GridContext::Calendar => self.layout.calendar.as_ref().map(|cal| cal.column_width),
            GridContext::Timeline => self.layout.day_columns.first().map(|c| c.rect.width()),
        }
    }

    fn date_at(&self, grid: GridContext, pos: Pos2) -> Option<NaiveDate> {
        match grid {
            GridContext::LongTerm => {
                let strip = self.layout.long_term?;
                if strip.column_width <= 0.0 || !strip.rect.contains(pos) {
                    return None;
                }
                let column = ((pos.x - strip.rect.left()) / strip.column_width).floor() as i64;
                Some(add_days(strip.first_date, column))
            }
            GridContext::Calendar => {
                let width = self.layout.calendar.as_ref()?.column_width;
                let row = self.week_row_at(pos)?;
                if width <= 0.0 {
                    return None;
                }
                let column = ((pos.x - row.rect.left()) / width).floor().clamp(0.0, 6.0) as i64;
                Some(add_days(row.week_start, column))
            }
            GridContext::Timeline => self.day_column_at(pos).map(|column| column.date),
        }
    }

    fn week_row_at(&self, pos: Pos2) -> Option<WeekRow> {
        self.layout
            .calendar
            .as_ref()?
            .rows
            .iter()
            .find(|row| row.rect.contains(pos))
            .copied()
    }

    fn week_row(&self, week_start: NaiveDate) -> Option<WeekRow> {
        self.layout
            .calendar
            .as_ref()?
            .rows
            .iter()
            .find(|row| row.week_start == week_start)
            .copied()
    }

    fn scroll_viewport(&self) -> Option<ScrollViewport> {
        self.layout.viewport
    }

    fn scroll_by(&mut self, delta: f32) -> f32 {
        let Some(viewport) = self.layout.viewport.as_mut() else {
            return 0.0;
        };
        let target = (viewport.offset + delta).clamp(0.0, viewport.max_offset.max(0.0));
        let applied = target - viewport.offset;
        if applied == 0.0 {
            return 0.0;
        }
        viewport.offset = target;

        let shift = Vec2::new(0.0, -applied);
        for column in &mut self.layout.day_columns {
            column.rect = column.rect.translate(shift);
        }
        for item in &mut self.layout.elements {
            if item.element.grid == GridContext::Timeline {
                item.element.rect = item.element.rect.translate(shift);
                item.handles = HandleRects {
                    top: item.handles.top.map(|r| r.translate(shift)),
                    bottom: item.handles.bottom.map(|r| r.translate(shift)),
                    left: item.handles.left.map(|r| r.translate(shift)),
                    right: item.handles.right.map(|r| r.translate(shift)),
                };
            }
        }
        applied
    }

    fn set_hidden(&mut self, task_id: TaskId, hidden: bool) {
        if hidden {
            self.visuals.hidden.insert(task_id);
        } else {
            self.visuals.hidden.remove(&task_id);
        }
    }

    fn set_faded(&mut self, task_id: TaskId, faded: bool) {
        if faded {
            self.visuals.faded.insert(task_id);
        } else {
            self.visuals.faded.remove(&task_id);
        }
    }

    fn set_translation(&mut self, task_id: TaskId, offset: Option<Vec2>) {
        match offset {
            Some(offset) => {
                self.visuals.translations.insert(task_id, offset);
            }
            None => {
                self.visuals.translations.remove(&task_id);
            }
        }
    }

    fn set_dragging(&mut self, task_id: TaskId, dragging: bool) {
        if dragging {
            self.visuals.dragging.insert(task_id);
        } else {
            self.visuals.dragging.remove(&task_id);
        }
    }

    fn set_drop_target(&mut self, target: Option<DropTarget>) {
        self.visuals.drop_target = target;
    }
}
