// Hour-grid strategies
// Vertical drags snap to 15 minutes; the pointer's day column supplies the date

use chrono::NaiveDate;
use egui::Pos2;

use crate::drag::geometry::{instant_at, minute_to_offset, minutes_since, pointer_minutes, span_height};
use crate::drag::ghost::{mark_truncation, GhostPlacement, GhostSegment};
use crate::drag::patch::timed_patch;
use crate::drag::segments::split_around;
use crate::drag::snap::{clamp_moving_edge, snap_minutes, SNAP_MINUTES};
use crate::drag::surface::{DayColumn, DropTarget};
use crate::models::grid::{DragOperation, Edge, GridContext, ResizeHandle};
use crate::models::task::{TaskPatch, TimeWindow, DEFAULT_TIMED_MINUTES};

use super::{Candidate, DragContext, DragStrategy};

/// Column under the pointer and the pointer's minute offset from the window's left edge.
fn pointer_at(ctx: &DragContext<'_>, pos: Pos2) -> Option<(DayColumn, f32)> {
    let column = ctx.surface.day_column_at(pos)?;
    let minutes = pointer_minutes(&column, ctx.view.window_start, pos.y, ctx.view.zoom_level);
    Some((column, minutes))
}

fn window_from(ctx: &DragContext<'_>, start: i64, end: i64) -> TimeWindow {
    let reference = ctx.view.window_start;
    let start_hour = ctx.view.day_start_hour;
    TimeWindow::new(
        instant_at(reference, start_hour, start),
        instant_at(reference, start_hour, end),
    )
}

/// Draw `window` as up to three ghosts around the day column under the pointer.
pub(super) fn preview_window(ctx: &mut DragContext<'_>, window: &TimeWindow, current: NaiveDate) {
    let zoom = ctx.view.zoom_level;
    let mut segments: Vec<GhostSegment> = split_around(window, current, ctx.view.day_start_hour)
        .iter()
        .map(|piece| {
            GhostSegment::new(GhostPlacement::TimeSlot {
                date: piece.date,
                top: minute_to_offset(piece.start_minute, zoom),
                height: span_height(piece.minutes(), 1, zoom),
            })
        })
        .collect();
    // Truncation follows the full split, so a piece next to an off-screen day
    // still shows its cut edge after that day is dropped below
    mark_truncation(&mut segments);

    // Days that are not laid out get no ghost
    segments.retain(|segment| match segment.placement {
        GhostPlacement::TimeSlot { date, .. } => ctx.surface.day_column(date).is_some(),
        _ => true,
    });

    let source = ctx.ghost_source();
    ctx.ghosts.update(&mut *ctx.surface, &segments, &source);
    ctx.surface.set_drop_target(Some(DropTarget {
        grid: GridContext::Timeline,
        date: current,
    }));
}

/// Moves a task through the hour grid, keeping the grabbed edge at a fixed
/// offset from the pointer.
#[derive(Debug, Default)]
pub struct TimelineMove {
    original: Option<TimeWindow>,
    anchor: Option<Edge>,
    anchor_minutes: i64,
    duration: i64,
    origin_minutes: Option<f32>,
    candidate: Option<TimeWindow>,
}

impl TimelineMove {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor on whichever edge is closer to the grab point.
    fn grab(&mut self, ctx: &DragContext<'_>, pointer: f32) {
        self.origin_minutes = Some(pointer);
        let Some(original) = self.original else {
            return;
        };

        let reference = ctx.view.window_start;
        let start_hour = ctx.view.day_start_hour;
        let start = minutes_since(reference, start_hour, original.start);
        let end = minutes_since(reference, start_hour, original.end);

        let (anchor, minutes) = if (pointer - start as f32).abs() <= (end as f32 - pointer).abs() {
            (Edge::Start, start)
        } else {
            (Edge::End, end)
        };
        self.anchor = Some(anchor);
        self.anchor_minutes = minutes;
        self.duration = original.minutes();
        log::debug!("timeline move anchored on {:?} at minute {}", anchor, minutes);
    }
}

impl DragStrategy for TimelineMove {
    fn grid(&self) -> GridContext {
        GridContext::Timeline
    }

    fn operation(&self) -> DragOperation {
        DragOperation::Move
    }

    fn on_down(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        self.original = ctx
            .task
            .resolve_window(ctx.view.window_start, ctx.view.day_start_hour);
        if let Some((_, pointer)) = pointer_at(ctx, pos) {
            self.grab(ctx, pointer);
        }
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        let Some((column, pointer)) = pointer_at(ctx, pos) else {
            ctx.hide_previews();
            return;
        };
        if self.origin_minutes.is_none() {
            self.grab(ctx, pointer);
        }

        let window = match (self.anchor, self.origin_minutes) {
            (Some(anchor), Some(origin)) => {
                let anchored = self.anchor_minutes + snap_minutes(pointer - origin);
                match anchor {
                    Edge::Start => window_from(ctx, anchored, anchored + self.duration),
                    Edge::End => window_from(ctx, anchored - self.duration, anchored),
                }
            }
            // Backlog task: one hour starting at the snapped pointer
            _ => {
                let start = snap_minutes(pointer);
                window_from(ctx, start, start + DEFAULT_TIMED_MINUTES)
            }
        };

        log::trace!("timeline move candidate {} - {}", window.start, window.end);
        self.candidate = Some(window);
        preview_window(ctx, &window, column.date);
    }

    fn on_up(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) -> Option<TaskPatch> {
        self.on_move(ctx, pos);
        let window = self.candidate?;
        Some(timed_patch(ctx.task, DragOperation::Move, &window, ctx.view))
    }

    fn candidate(&self) -> Option<Candidate> {
        self.candidate.map(Candidate::Timed)
    }
}

/// Drags the top or bottom edge; the opposite edge stays put.
#[derive(Debug)]
pub struct TimelineResize {
    handle: ResizeHandle,
    held_minutes: i64,
    moving_minutes: i64,
    has_original: bool,
    origin_minutes: Option<f32>,
    candidate: Option<TimeWindow>,
}

impl TimelineResize {
    pub fn new(handle: ResizeHandle) -> Self {
        Self {
            handle,
            held_minutes: 0,
            moving_minutes: 0,
            has_original: false,
            origin_minutes: None,
            candidate: None,
        }
    }
}

impl DragStrategy for TimelineResize {
    fn grid(&self) -> GridContext {
        GridContext::Timeline
    }

    fn operation(&self) -> DragOperation {
        DragOperation::Resize(self.handle)
    }

    fn on_down(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        let reference = ctx.view.window_start;
        let start_hour = ctx.view.day_start_hour;
        let Some(original) = ctx.task.resolve_window(reference, start_hour) else {
            log::warn!("task {} has no window to resize", ctx.task.id);
            return;
        };

        let start = minutes_since(reference, start_hour, original.start);
        let end = minutes_since(reference, start_hour, original.end);
        (self.moving_minutes, self.held_minutes) = match self.handle.edge() {
            Edge::Start => (start, end),
            Edge::End => (end, start),
        };
        self.has_original = true;
        self.origin_minutes = pointer_at(ctx, pos).map(|(_, pointer)| pointer);
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        if !self.has_original {
            return;
        }
        let Some((column, pointer)) = pointer_at(ctx, pos) else {
            ctx.hide_previews();
            return;
        };
        let origin = *self.origin_minutes.get_or_insert(pointer);

        let edge = self.handle.edge();
        let moved = clamp_moving_edge(
            self.moving_minutes + snap_minutes(pointer - origin),
            self.held_minutes,
            edge,
            SNAP_MINUTES,
        );
        let window = match edge {
            Edge::Start => window_from(ctx, moved, self.held_minutes),
            Edge::End => window_from(ctx, self.held_minutes, moved),
        };

        log::trace!("timeline resize candidate {} - {}", window.start, window.end);
        self.candidate = Some(window);
        preview_window(ctx, &window, column.date);
    }

    fn on_up(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) -> Option<TaskPatch> {
        self.on_move(ctx, pos);
        let window = self.candidate?;
        Some(timed_patch(ctx.task, self.operation(), &window, ctx.view))
    }

    fn candidate(&self) -> Option<Candidate> {
        self.candidate.map(Candidate::Timed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::ghost::{GhostPool, Truncation};
    use crate::drag::layout::{GridLayout, LayoutSurface};
    use crate::models::grid::TaskElement;
    use crate::models::settings::ViewConfig;
    use crate::models::task::Task;
    use chrono::{NaiveTime, Weekday};
    use egui::{Rect, Vec2};
    use pretty_assertions::assert_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn view(start_hour: u32) -> ViewConfig {
        ViewConfig {
            zoom_level: 1.0,
            day_start_hour: start_hour,
            week_start: Weekday::Sun,
            window_start: d(10),
        }
    }

    /// Three 100px columns from x = 100, each 1440px tall at 1px/min.
    fn surface() -> LayoutSurface {
        let day_columns = (0..3)
            .map(|i| DayColumn {
                date: d(10 + i),
                rect: Rect::from_min_size(
                    Pos2::new(100.0 + 100.0 * i as f32, 0.0),
                    Vec2::new(100.0, 1440.0),
                ),
            })
            .collect();
        LayoutSurface::new(GridLayout {
            day_columns,
            ..Default::default()
        })
    }

    fn element(top: f32, height: f32) -> TaskElement {
        TaskElement::new(
            1,
            GridContext::Timeline,
            Rect::from_min_size(Pos2::new(100.0, top), Vec2::new(100.0, height)),
        )
    }

    fn run(
        strategy: &mut dyn DragStrategy,
        surface: &mut LayoutSurface,
        task: &Task,
        element: &TaskElement,
        view: &ViewConfig,
        path: &[Pos2],
    ) -> Option<TaskPatch> {
        let mut ghosts = GhostPool::new();
        let mut ctx = DragContext {
            surface,
            ghosts: &mut ghosts,
            view,
            task,
            element,
        };
        let (first, rest) = path.split_first()?;
        strategy.on_down(&mut ctx, *first);
        let (last, moves) = rest.split_last()?;
        for pos in moves {
            strategy.on_move(&mut ctx, *pos);
        }
        strategy.on_up(&mut ctx, *last)
    }

    fn nine_to_ten() -> Task {
        Task::builder(1)
            .start_date(d(10))
            .start_time(t(9, 0))
            .end_time(t(10, 0))
            .build()
    }

    #[test]
    fn test_move_by_two_snap_units() {
        // Start hour 5: 09:00 sits 240px below the column top
        let view = view(5);
        let mut surface = surface();
        let mut strategy = TimelineMove::new();
        let patch = run(
            &mut strategy,
            &mut surface,
            &nine_to_ten(),
            &element(240.0, 60.0),
            &view,
            &[Pos2::new(150.0, 270.0), Pos2::new(150.0, 285.0), Pos2::new(150.0, 300.0)],
        );
        assert_eq!(
            patch,
            Some(TaskPatch::default().start_time(t(9, 30)).end_time(t(10, 30)))
        );
    }

    #[test]
    fn test_grab_near_bottom_anchors_end() {
        let view = view(5);
        let mut surface = surface();
        let mut strategy = TimelineMove::new();
        let patch = run(
            &mut strategy,
            &mut surface,
            &nine_to_ten(),
            &element(240.0, 60.0),
            &view,
            &[Pos2::new(150.0, 296.0), Pos2::new(150.0, 311.0)],
        );
        assert_eq!(strategy.anchor, Some(Edge::End));
        assert_eq!(strategy.anchor_minutes, 300);
        assert_eq!(
            patch,
            Some(TaskPatch::default().start_time(t(9, 15)).end_time(t(10, 15)))
        );
    }

    #[test]
    fn test_move_into_next_column_changes_date() {
        let view = view(0);
        let mut surface = surface();
        let mut strategy = TimelineMove::new();
        let task = Task::builder(1).start_date(d(10)).start_time(t(9, 0)).build();
        let patch = run(
            &mut strategy,
            &mut surface,
            &task,
            &element(540.0, 60.0),
            &view,
            &[Pos2::new(150.0, 550.0), Pos2::new(250.0, 550.0)],
        );
        assert_eq!(patch, Some(TaskPatch::default().start_date(d(11))));
    }

    #[test]
    fn test_bottom_resize_one_unit() {
        let view = view(5);
        let mut surface = surface();
        let mut strategy = TimelineResize::new(ResizeHandle::Bottom);
        let patch = run(
            &mut strategy,
            &mut surface,
            &nine_to_ten(),
            &element(240.0, 60.0),
            &view,
            &[Pos2::new(150.0, 298.0), Pos2::new(150.0, 313.0)],
        );
        assert_eq!(patch, Some(TaskPatch::default().end_time(t(10, 15))));
    }

    #[test]
    fn test_resize_past_held_edge_clamps_to_one_unit() {
        let view = view(5);
        let mut surface = surface();
        let mut strategy = TimelineResize::new(ResizeHandle::Bottom);
        run(
            &mut strategy,
            &mut surface,
            &nine_to_ten(),
            &element(240.0, 60.0),
            &view,
            &[Pos2::new(150.0, 298.0), Pos2::new(150.0, 100.0)],
        );
        let Some(Candidate::Timed(window)) = strategy.candidate() else {
            panic!("expected a timed candidate");
        };
        assert_eq!(window.start, d(10).and_time(t(9, 0)));
        assert_eq!(window.minutes(), SNAP_MINUTES);
    }

    #[test]
    fn test_pointer_off_grid_keeps_last_candidate() {
        let view = view(5);
        let mut surface = surface();
        let mut strategy = TimelineMove::new();
        let patch = run(
            &mut strategy,
            &mut surface,
            &nine_to_ten(),
            &element(240.0, 60.0),
            &view,
            &[
                Pos2::new(150.0, 270.0),
                Pos2::new(150.0, 285.0),
                Pos2::new(20.0, 900.0),
            ],
        );
        assert_eq!(
            patch,
            Some(TaskPatch::default().start_time(t(9, 15)).end_time(t(10, 15)))
        );
        assert!(surface.visuals().ghosts.is_empty());
    }

    #[test]
    fn test_no_column_ever_means_no_patch() {
        let view = view(5);
        let mut surface = surface();
        let mut strategy = TimelineMove::new();
        let patch = run(
            &mut strategy,
            &mut surface,
            &nine_to_ten(),
            &element(240.0, 60.0),
            &view,
            &[Pos2::new(20.0, 270.0), Pos2::new(30.0, 300.0)],
        );
        assert_eq!(patch, None);
    }

    #[test]
    fn test_midnight_crossing_preview_has_two_segments() {
        let view = view(0);
        let mut surface = surface();
        let task = Task::builder(1)
            .start_date(d(10))
            .start_time(t(22, 0))
            .end_time(t(2, 0))
            .build();
        let element = element(1320.0, 120.0);
        let mut ghosts = GhostPool::new();
        let mut strategy = TimelineMove::new();
        {
            let mut ctx = DragContext {
                surface: &mut surface,
                ghosts: &mut ghosts,
                view: &view,
                task: &task,
                element: &element,
            };
            strategy.on_down(&mut ctx, Pos2::new(150.0, 1380.0));
            strategy.on_move(&mut ctx, Pos2::new(150.0, 1380.0));
        }

        let placed: Vec<_> = surface
            .visuals()
            .ghosts
            .values()
            .map(|ghost| (ghost.segment.placement, ghost.segment.truncated))
            .collect();
        assert_eq!(
            placed,
            vec![
                (
                    GhostPlacement::TimeSlot { date: d(10), top: 1320.0, height: 120.0 },
                    Truncation { start: false, end: true }
                ),
                (
                    GhostPlacement::TimeSlot { date: d(11), top: 0.0, height: 120.0 },
                    Truncation { start: true, end: false }
                ),
            ]
        );
    }

    #[test]
    fn test_piece_before_unlaid_day_keeps_cut_end() {
        let view = view(0);
        let mut surface = surface();
        // Runs into the 13th, which has no column
        let task = Task::builder(1)
            .start_date(d(12))
            .start_time(t(22, 0))
            .end_time(t(2, 0))
            .build();
        let element = TaskElement::new(
            1,
            GridContext::Timeline,
            Rect::from_min_size(Pos2::new(300.0, 1320.0), Vec2::new(100.0, 120.0)),
        );
        let mut ghosts = GhostPool::new();
        let mut strategy = TimelineMove::new();
        {
            let mut ctx = DragContext {
                surface: &mut surface,
                ghosts: &mut ghosts,
                view: &view,
                task: &task,
                element: &element,
            };
            strategy.on_down(&mut ctx, Pos2::new(350.0, 1380.0));
            strategy.on_move(&mut ctx, Pos2::new(350.0, 1380.0));
        }

        let placed: Vec<_> = surface
            .visuals()
            .ghosts
            .values()
            .map(|ghost| (ghost.segment.placement, ghost.segment.truncated))
            .collect();
        assert_eq!(
            placed,
            vec![(
                GhostPlacement::TimeSlot { date: d(12), top: 1320.0, height: 120.0 },
                Truncation { start: false, end: true }
            )]
        );
    }

    #[test]
    fn test_backlog_task_gets_one_hour_at_pointer() {
        let view = view(0);
        let mut surface = surface();
        let task = Task::builder(1).future(true).build();
        let mut strategy = TimelineMove::new();
        let patch = run(
            &mut strategy,
            &mut surface,
            &task,
            &element(0.0, 0.0),
            &view,
            &[Pos2::new(150.0, 600.0), Pos2::new(250.0, 842.0)],
        );
        assert_eq!(
            patch,
            Some(
                TaskPatch::default()
                    .start_date(d(11))
                    .start_time(t(14, 0))
                    .is_future(false)
            )
        );
    }
}
