//! Handle and ghost drawing.
//!
//! Visual feedback for the drag system: handle circles/bars drawn on the
//! hovered task, translucent ghosts showing where a dragged task would land,
//! and the drop-target highlight.

use chrono::Datelike;
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::drag::ghost::{Ghost, GhostPlacement, Truncation};
use crate::drag::handles::{HandleRects, HANDLE_VISUAL_SIZE};
use crate::drag::layout::GridLayout;
use crate::drag::surface::DropTarget;
use crate::models::grid::{GridContext, ResizeHandle};
use crate::utils::date::{add_days, day_offset};

/// Vertical offset of the first bar lane inside a calendar week row (below the day number).
pub const CALENDAR_LANE_TOP: f32 = 20.0;
pub const CALENDAR_LANE_HEIGHT: f32 = 18.0;

pub fn draw_handles(
    painter: &Painter,
    handles: &HandleRects,
    hovered_handle: Option<ResizeHandle>,
    color: Color32,
) {
    let draw_handle = |rect: Rect, handle: ResizeHandle| {
        let is_hovered = hovered_handle == Some(handle);

        let (center, bar_start, bar_end) = if handle.is_vertical() {
            let center_x = rect.center().x;
            let (bar_y, center_y) = match handle {
                ResizeHandle::Top => (rect.top() + 4.0, rect.top() + HANDLE_VISUAL_SIZE / 2.0 + 4.0),
                _ => (
                    rect.bottom() - 4.0,
                    rect.bottom() - HANDLE_VISUAL_SIZE / 2.0 - 4.0,
                ),
            };
            let bar_width = rect.width().min(40.0);
            (
                Pos2::new(center_x, center_y),
                Pos2::new(center_x - bar_width / 2.0, bar_y),
                Pos2::new(center_x + bar_width / 2.0, bar_y),
            )
        } else {
            let center_y = rect.center().y;
            let (bar_x, center_x) = match handle {
                ResizeHandle::Left => (rect.left() + 2.0, rect.left() + HANDLE_VISUAL_SIZE / 2.0 + 1.0),
                _ => (
                    rect.right() - 2.0,
                    rect.right() - HANDLE_VISUAL_SIZE / 2.0 - 1.0,
                ),
            };
            let bar_height = rect.height().min(14.0);
            (
                Pos2::new(center_x, center_y),
                Pos2::new(bar_x, center_y - bar_height / 2.0),
                Pos2::new(bar_x, center_y + bar_height / 2.0),
            )
        };

        let radius = if is_hovered {
            HANDLE_VISUAL_SIZE / 2.0 + 2.0
        } else {
            HANDLE_VISUAL_SIZE / 2.0
        };

        painter.line_segment(
            [bar_start, bar_end],
            Stroke::new(
                if is_hovered { 3.0 } else { 2.0 },
                if is_hovered {
                    Color32::WHITE
                } else {
                    Color32::from_rgba_unmultiplied(255, 255, 255, 180)
                },
            ),
        );
        painter.circle_filled(
            center,
            radius,
            if is_hovered {
                Color32::WHITE
            } else {
                Color32::from_rgba_unmultiplied(255, 255, 255, 220)
            },
        );
        painter.circle_stroke(
            center,
            radius,
            Stroke::new(if is_hovered { 2.0 } else { 1.5 }, color.linear_multiply(0.8)),
        );
    };

    for handle in [
        ResizeHandle::Top,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
        ResizeHandle::Right,
    ] {
        if let Some(rect) = handles.get(handle) {
            draw_handle(rect, handle);
        }
    }
}

/// Screen rect of a ghost in the current layout, if its cell is laid out.
pub fn ghost_rect(layout: &GridLayout, placement: &GhostPlacement) -> Option<Rect> {
    match *placement {
        GhostPlacement::TimeSlot { date, top, height } => {
            let column = layout.day_columns.iter().find(|c| c.date == date)?;
            Some(Rect::from_min_size(
                Pos2::new(column.rect.left() + 4.0, column.rect.top() + top),
                Vec2::new(column.rect.width() - 8.0, height),
            ))
        }
        GhostPlacement::LongTerm {
            first_col,
            columns,
            lane_top,
            lane_height,
        } => {
            let strip = layout.long_term?;
            Some(Rect::from_min_size(
                Pos2::new(strip.column_x(first_col) + 2.0, lane_top),
                Vec2::new(columns as f32 * strip.column_width - 4.0, lane_height),
            ))
        }
        GhostPlacement::Calendar {
            week_start,
            first_col,
            columns,
        } => {
            let calendar = layout.calendar.as_ref()?;
            let row = calendar.rows.iter().find(|r| r.week_start == week_start)?;
            Some(Rect::from_min_size(
                Pos2::new(
                    row.rect.left() + first_col as f32 * calendar.column_width + 2.0,
                    row.rect.top() + CALENDAR_LANE_TOP,
                ),
                Vec2::new(columns as f32 * calendar.column_width - 4.0, CALENDAR_LANE_HEIGHT),
            ))
        }
    }
}

/// Draw a ghost with a translucent fill. Cut ends get a dashed edge instead of a solid one.
pub fn draw_ghost(painter: &Painter, layout: &GridLayout, ghost: &Ghost, color: Color32) {
    let Some(rect) = ghost_rect(layout, &ghost.segment.placement) else {
        return;
    };
    let painter = match ghost.segment.placement {
        GhostPlacement::TimeSlot { .. } => match layout.viewport {
            Some(viewport) => painter.with_clip_rect(viewport.rect),
            None => painter.clone(),
        },
        _ => painter.clone(),
    };

    let fill = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 60);
    let border = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 160);
    painter.rect_filled(rect, 3.0, fill);

    let vertical = matches!(ghost.segment.placement, GhostPlacement::TimeSlot { .. });
    draw_ghost_edges(&painter, rect, vertical, ghost.segment.truncated, Stroke::new(2.0, border));

    if rect.height() >= 14.0 {
        painter.with_clip_rect(rect).text(
            rect.left_top() + Vec2::new(6.0, 2.0),
            egui::Align2::LEFT_TOP,
            &ghost.source.title,
            egui::FontId::proportional(12.0),
            border,
        );
    }
}

fn draw_ghost_edges(painter: &Painter, rect: Rect, vertical: bool, cut: Truncation, stroke: Stroke) {
    // Edges in start, end, then the two sides
    let (start, end, sides) = if vertical {
        (
            [rect.left_top(), rect.right_top()],
            [rect.left_bottom(), rect.right_bottom()],
            [[rect.left_top(), rect.left_bottom()], [rect.right_top(), rect.right_bottom()]],
        )
    } else {
        (
            [rect.left_top(), rect.left_bottom()],
            [rect.right_top(), rect.right_bottom()],
            [[rect.left_top(), rect.right_top()], [rect.left_bottom(), rect.right_bottom()]],
        )
    };

    for (edge, is_cut) in [(start, cut.start), (end, cut.end)] {
        if is_cut {
            painter.extend(Shape::dashed_line(&edge, stroke, 4.0, 3.0));
        } else {
            painter.line_segment(edge, stroke);
        }
    }
    for side in sides {
        painter.line_segment(side, stroke);
    }
}

/// Highlight rect for the cell under the pointer.
pub fn drop_target_rect(layout: &GridLayout, target: &DropTarget) -> Option<Rect> {
    match target.grid {
        GridContext::Timeline => {
            let column = layout.day_columns.iter().find(|c| c.date == target.date)?;
            Some(match layout.viewport {
                Some(viewport) => column.rect.intersect(viewport.rect),
                None => column.rect,
            })
        }
        GridContext::LongTerm => {
            let strip = layout.long_term?;
            let column = day_offset(target.date, strip.first_date);
            Some(Rect::from_min_size(
                Pos2::new(strip.column_x(column), strip.rect.top()),
                Vec2::new(strip.column_width, strip.rect.height()),
            ))
        }
        GridContext::Calendar => {
            let calendar = layout.calendar.as_ref()?;
            let row = calendar
                .rows
                .iter()
                .find(|r| target.date >= r.week_start && target.date <= add_days(r.week_start, 6))?;
            let column = day_offset(target.date, row.week_start);
            Some(Rect::from_min_size(
                Pos2::new(row.rect.left() + column as f32 * calendar.column_width, row.rect.top()),
                Vec2::new(calendar.column_width, row.rect.height()),
            ))
        }
    }
}

pub fn draw_drop_target(painter: &Painter, layout: &GridLayout, target: &DropTarget, accent: Color32) {
    if let Some(rect) = drop_target_rect(layout, target) {
        painter.rect_filled(rect, 0.0, accent.gamma_multiply(0.12));
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, accent.gamma_multiply(0.6)));
    }
}

/// Short day label used in the strip and calendar headers.
pub fn day_label(date: chrono::NaiveDate) -> String {
    format!("{} {}", date.format("%a"), date.day())
}
