// Day-based strategies
// Long-term strip and month calendar: horizontal drags snap to whole day
// columns, calendar rows add seven days per row crossed

use chrono::NaiveDate;
use egui::{Pos2, Vec2};

use crate::drag::geometry::{day_offset, instant_at, pointer_minutes};
use crate::drag::ghost::{mark_truncation, GhostPlacement, GhostSegment};
use crate::drag::patch::{conversion_patch, span_patch};
use crate::drag::segments::split_by_week;
use crate::drag::snap::{clamp_moving_edge, snap_day_delta, snap_minutes};
use crate::drag::surface::DropTarget;
use crate::models::grid::{DragOperation, Edge, GridContext, ResizeHandle};
use crate::models::task::{DateSpan, TaskPatch, TimeWindow, DEFAULT_TIMED_MINUTES};
use crate::utils::date::add_days;

use super::timeline::preview_window;
use super::{Candidate, DragContext, DragStrategy};

/// Where the gesture started, in the terms the day grids need.
#[derive(Clone, Copy, Debug)]
struct Grab {
    pos: Pos2,
    /// Calendar week row under the grab point
    row: Option<NaiveDate>,
}

impl Grab {
    fn at(ctx: &DragContext<'_>, pos: Pos2) -> Self {
        Self {
            pos,
            row: ctx.surface.week_row_at(pos).map(|row| row.week_start),
        }
    }
}

/// Whole days between the grab point and `pos`; `None` when the pointer is off the grid.
fn day_delta(ctx: &DragContext<'_>, grid: GridContext, grab: &Grab, pos: Pos2) -> Option<i64> {
    let width = ctx.surface.header_column_width(grid)?;
    let columns = snap_day_delta(pos.x - grab.pos.x, width)?;
    match grid {
        GridContext::Calendar => {
            let row = ctx.surface.week_row_at(pos)?;
            let origin_row = grab.row?;
            Some(day_offset(row.week_start, origin_row) + columns)
        }
        _ => {
            ctx.surface.date_at(grid, pos)?;
            Some(columns)
        }
    }
}

/// Clear translation and fading on the original element.
fn reset_original(ctx: &mut DragContext<'_>) {
    let id = ctx.element.source_id();
    ctx.surface.set_translation(id, None);
    ctx.surface.set_faded(id, false);
}

fn hide_span_previews(ctx: &mut DragContext<'_>) {
    reset_original(ctx);
    ctx.hide_previews();
}

/// Show `span` in the grid the drag started in.
///
/// `translate_by` is set for calendar moves that may shift the original element
/// instead of drawing ghosts, as long as everything stays inside one week row.
fn preview_span(
    ctx: &mut DragContext<'_>,
    grid: GridContext,
    span: &DateSpan,
    translate_by: Option<i64>,
    pointer: Pos2,
) {
    let id = ctx.element.source_id();
    let source = ctx.ghost_source();
    let target = ctx
        .surface
        .date_at(grid, pointer)
        .map(|date| DropTarget { grid, date });

    match grid {
        GridContext::Calendar => {
            let week_start = ctx.view.week_start;
            let pieces = split_by_week(span, week_start);
            let origin_row = ctx
                .surface
                .week_row_at(ctx.element.rect.center())
                .map(|row| row.week_start);
            let same_row = pieces.len() == 1 && Some(pieces[0].week_start) == origin_row;

            match (translate_by, same_row) {
                (Some(days), true) => {
                    let width = ctx.surface.header_column_width(grid).unwrap_or(0.0);
                    ctx.ghosts.clear(&mut *ctx.surface);
                    ctx.surface.set_faded(id, false);
                    ctx.surface
                        .set_translation(id, Some(Vec2::new(days as f32 * width, 0.0)));
                }
                _ => {
                    let mut segments: Vec<GhostSegment> = pieces
                        .iter()
                        .map(|piece| {
                            GhostSegment::new(GhostPlacement::Calendar {
                                week_start: piece.week_start,
                                first_col: piece.first_col,
                                columns: piece.columns,
                            })
                        })
                        .collect();
                    // Marked before unlaid rows are dropped so edge pieces keep their cut ends
                    mark_truncation(&mut segments);
                    segments.retain(|segment| match segment.placement {
                        GhostPlacement::Calendar { week_start, .. } => {
                            ctx.surface.week_row(week_start).is_some()
                        }
                        _ => true,
                    });

                    ctx.ghosts.update(&mut *ctx.surface, &segments, &source);
                    ctx.surface.set_translation(id, None);
                    ctx.surface.set_faded(id, !same_row);
                }
            }
        }
        _ => {
            let segment = GhostSegment::new(GhostPlacement::LongTerm {
                first_col: day_offset(span.start, ctx.view.window_start),
                columns: span.days(),
                lane_top: ctx.element.rect.top(),
                lane_height: ctx.element.rect.height(),
            });
            ctx.ghosts.update(&mut *ctx.surface, &[segment], &source);
        }
    }

    ctx.surface.set_drop_target(target);
}

/// Moves a day-span task by whole days. In the long-term strip the task can
/// also be dropped onto the hour grid, which turns it into a one-hour task.
#[derive(Debug)]
pub struct SpanMove {
    grid: GridContext,
    original: Option<DateSpan>,
    grab: Option<Grab>,
    candidate: Option<Candidate>,
}

impl SpanMove {
    pub fn new(grid: GridContext) -> Self {
        Self {
            grid,
            original: None,
            grab: None,
            candidate: None,
        }
    }

    /// One hour at the snapped pointer time in the hour-grid column under `pos`.
    fn conversion_at(ctx: &DragContext<'_>, pos: Pos2) -> Option<(NaiveDate, TimeWindow)> {
        let column = ctx.surface.day_column_at(pos)?;
        let minutes = pointer_minutes(&column, column.date, pos.y, ctx.view.zoom_level);
        let start = snap_minutes(minutes);
        let start_hour = ctx.view.day_start_hour;
        let window = TimeWindow::new(
            instant_at(column.date, start_hour, start),
            instant_at(column.date, start_hour, start + DEFAULT_TIMED_MINUTES),
        );
        Some((column.date, window))
    }
}

impl DragStrategy for SpanMove {
    fn grid(&self) -> GridContext {
        self.grid
    }

    fn operation(&self) -> DragOperation {
        DragOperation::Move
    }

    fn on_down(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        self.original = ctx.task.resolve_span(ctx.view.window_start);
        self.grab = Some(Grab::at(ctx, pos));
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        if self.grid == GridContext::LongTerm {
            if let Some((date, window)) = Self::conversion_at(ctx, pos) {
                log::trace!("long-term task over hour grid at {}", window.start);
                self.candidate = Some(Candidate::ConvertToTimed(window));
                reset_original(ctx);
                preview_window(ctx, &window, date);
                return;
            }
        }

        let Some(grab) = self.grab else {
            return;
        };
        let span = match (self.original, day_delta(ctx, self.grid, &grab, pos)) {
            (Some(original), Some(delta)) => original.shifted(delta),
            (None, Some(_)) => match ctx.surface.date_at(self.grid, pos) {
                Some(date) => DateSpan::single(date),
                None => return hide_span_previews(ctx),
            },
            (_, None) => return hide_span_previews(ctx),
        };

        log::trace!("{:?} move candidate {} - {}", self.grid, span.start, span.end);
        self.candidate = Some(Candidate::Days(span));
        let translate_by = self.original.map(|original| day_offset(span.start, original.start));
        preview_span(ctx, self.grid, &span, translate_by, pos);
    }

    fn on_up(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) -> Option<TaskPatch> {
        self.on_move(ctx, pos);
        match self.candidate? {
            Candidate::ConvertToTimed(window) => Some(conversion_patch(ctx.task, &window)),
            Candidate::Days(span) => Some(span_patch(
                ctx.task,
                DragOperation::Move,
                self.original.as_ref(),
                &span,
                ctx.view,
            )),
            Candidate::Timed(_) => None,
        }
    }

    fn candidate(&self) -> Option<Candidate> {
        self.candidate
    }
}

/// Drags the left or right end of a day span; the other end stays put and the
/// span never drops below one day.
#[derive(Debug)]
pub struct SpanResize {
    grid: GridContext,
    handle: ResizeHandle,
    original: Option<DateSpan>,
    grab: Option<Grab>,
    candidate: Option<DateSpan>,
}

impl SpanResize {
    pub fn new(grid: GridContext, handle: ResizeHandle) -> Self {
        Self {
            grid,
            handle,
            original: None,
            grab: None,
            candidate: None,
        }
    }
}

impl DragStrategy for SpanResize {
    fn grid(&self) -> GridContext {
        self.grid
    }

    fn operation(&self) -> DragOperation {
        DragOperation::Resize(self.handle)
    }

    fn on_down(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        self.original = ctx.task.resolve_span(ctx.view.window_start);
        if self.original.is_none() {
            log::warn!("task {} has no day span to resize", ctx.task.id);
        }
        self.grab = Some(Grab::at(ctx, pos));
    }

    fn on_move(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) {
        let (Some(original), Some(grab)) = (self.original, self.grab) else {
            return;
        };
        let Some(delta) = day_delta(ctx, self.grid, &grab, pos) else {
            return hide_span_previews(ctx);
        };

        // Offsets in days from the original start; spans are inclusive so the
        // ends may meet but not cross
        let last = original.days() - 1;
        let edge = self.handle.edge();
        let span = match edge {
            Edge::Start => {
                let moved = clamp_moving_edge(delta, last, edge, 0);
                DateSpan::new(add_days(original.start, moved), original.end)
            }
            Edge::End => {
                let moved = clamp_moving_edge(last + delta, 0, edge, 0);
                DateSpan::new(original.start, add_days(original.start, moved))
            }
        };

        log::trace!("{:?} resize candidate {} - {}", self.grid, span.start, span.end);
        self.candidate = Some(span);
        preview_span(ctx, self.grid, &span, None, pos);
    }

    fn on_up(&mut self, ctx: &mut DragContext<'_>, pos: Pos2) -> Option<TaskPatch> {
        self.on_move(ctx, pos);
        let span = self.candidate?;
        Some(span_patch(
            ctx.task,
            self.operation(),
            self.original.as_ref(),
            &span,
            ctx.view,
        ))
    }

    fn candidate(&self) -> Option<Candidate> {
        self.candidate.map(Candidate::Days)
    }
}
