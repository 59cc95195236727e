// Test fixtures - reusable grids, tasks and gesture helpers
// Provides consistent layouts across the integration test files
#![allow(dead_code)]

use std::time::Instant;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Weekday};
use egui::{Pos2, Rect, Vec2};

use task_timeline::drag::handles::HandleRects;
use task_timeline::drag::layout::{ElementLayout, GridLayout, LayoutSurface};
use task_timeline::drag::router::{InputRouter, PointerEvent, RouterOutcome};
use task_timeline::drag::session::PointerKind;
use task_timeline::drag::surface::DayColumn;
use task_timeline::drag::DragError;
use task_timeline::models::grid::{GridContext, TaskElement};
use task_timeline::models::settings::{DragSettings, ViewConfig};
use task_timeline::models::task::{Task, TaskId, TaskPatch};
use task_timeline::services::task_store::{InMemoryTaskStore, TaskStore};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Returns Mar `day`, 2024 (Mar 10 is a Sunday)
    pub fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    pub fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }
}

pub use dates::{march, time};

/// Left edge of the first hour-grid column; each column is 100px wide.
pub const COLUMN_LEFT: f32 = 100.0;
pub const COLUMN_WIDTH: f32 = 100.0;

pub fn view(start_hour: u32) -> ViewConfig {
    ViewConfig {
        zoom_level: 1.0,
        day_start_hour: start_hour,
        week_start: Weekday::Sun,
        window_start: march(10),
    }
}

/// Three day columns (Mar 10-12) at zoom 1.0 whose tops sit at `top`.
pub fn day_columns(top: f32) -> Vec<DayColumn> {
    (0..3)
        .map(|i| DayColumn {
            date: march(10 + i),
            rect: Rect::from_min_size(
                Pos2::new(COLUMN_LEFT + COLUMN_WIDTH * i as f32, top),
                Vec2::new(COLUMN_WIDTH, 1440.0),
            ),
        })
        .collect()
}

/// Hour-grid element for `task_id` in the first column.
pub fn timed_element(task_id: TaskId, top: f32, height: f32) -> ElementLayout {
    let rect = Rect::from_min_size(
        Pos2::new(COLUMN_LEFT, top),
        Vec2::new(COLUMN_WIDTH, height),
    );
    ElementLayout {
        element: TaskElement::new(task_id, GridContext::Timeline, rect),
        handles: HandleRects::for_timed_task(rect),
    }
}

pub fn timeline_surface(elements: Vec<ElementLayout>) -> LayoutSurface {
    LayoutSurface::new(GridLayout {
        day_columns: day_columns(0.0),
        elements,
        ..Default::default()
    })
}

/// Store wrapper that records every write.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: InMemoryTaskStore,
    pub writes: Vec<(TaskId, TaskPatch)>,
}

impl RecordingStore {
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            inner: InMemoryTaskStore::with_tasks(tasks),
            writes: Vec::new(),
        }
    }
}

impl TaskStore for RecordingStore {
    fn get_task(&self, id: TaskId) -> Option<Task> {
        self.inner.get_task(id)
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<()> {
        self.writes.push((id, patch.clone()));
        self.inner.update_task(id, patch)
    }
}

/// Press at the first point, move through the middle ones, release at the last.
pub fn drag(
    router: &mut InputRouter,
    surface: &mut LayoutSurface,
    store: &mut RecordingStore,
    view: &ViewConfig,
    path: &[Pos2],
) -> Result<RouterOutcome, DragError> {
    let now = Instant::now();
    let event = |pos: Pos2| PointerEvent::new(pos, PointerKind::Mouse, now);

    let (first, rest) = path.split_first().expect("path needs a press point");
    let (last, moves) = rest.split_last().expect("path needs a release point");

    router.pointer_down(surface, &*store, view, event(*first));
    for pos in moves {
        router.pointer_move(surface, view, event(*pos));
    }
    router.pointer_up(surface, store, view, event(*last))
}

pub fn router() -> InputRouter {
    InputRouter::new(DragSettings::default())
}
