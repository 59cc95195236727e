use chrono::Datelike;
use egui::{Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, Stroke, Vec2};

use super::grid_builder::{GridAreas, STRIP_HEADER, TIME_GUTTER};
use super::{grids_rect, TimelineApp};
use crate::drag::geometry::minutes_to_pixels;
use crate::drag::layout::{GridLayout, SurfaceVisuals};
use crate::drag::surface::Surface;
use crate::models::grid::{DragOperation, GridContext, HandleRegion, ResizeHandle, TaskHit};
use crate::models::settings::ViewConfig;
use crate::models::task::Task;
use crate::ui_egui::ghost_drawing::{day_label, draw_drop_target, draw_ghost, draw_handles};
use crate::utils::date::add_days;

const DEFAULT_TASK_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const GRID_LINE: Color32 = Color32::from_gray(60);
const LABEL: Color32 = Color32::from_gray(170);

/// Parse a `#RRGGBB` string.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

fn task_color(task: &Task) -> Color32 {
    task.color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(DEFAULT_TASK_COLOR)
}

impl TimelineApp {
    pub(super) fn paint(&self, ui: &egui::Ui, view: &ViewConfig, areas: &GridAreas) {
        let painter = ui.painter();
        let layout = self.surface.layout();
        let visuals = self.surface.visuals();

        paint_strip_grid(painter, layout);
        paint_hour_grid(painter, layout, areas, view);
        paint_calendar_grid(painter, layout, view);

        if let Some(target) = &visuals.drop_target {
            draw_drop_target(painter, layout, target, ui.visuals().selection.bg_fill);
        }

        self.paint_elements(painter, layout, visuals);

        for ghost in visuals.ghosts.values() {
            let color = ghost
                .source
                .color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(DEFAULT_TASK_COLOR);
            draw_ghost(painter, layout, ghost, color);
        }

        self.paint_hover(ui, layout, areas);
    }

    fn paint_elements(&self, painter: &Painter, layout: &GridLayout, visuals: &SurfaceVisuals) {
        let drag_grid = self.router.session().map(|session| session.grid());

        for item in &layout.elements {
            let id = item.element.source_id();
            if visuals.hidden.contains(&id) {
                continue;
            }
            let Some(task) = self.tasks.get(&id) else {
                continue;
            };

            let in_drag_grid = drag_grid == Some(item.element.grid);
            let mut rect = item.element.rect;
            let mut color = task_color(task);
            if in_drag_grid {
                if let Some(offset) = visuals.translations.get(&id) {
                    rect = rect.translate(*offset);
                }
                if visuals.faded.contains(&id) {
                    color = color.gamma_multiply(0.35);
                }
            }

            let painter = match (item.element.grid, layout.viewport) {
                (GridContext::Timeline, Some(viewport)) => painter.with_clip_rect(viewport.rect),
                _ => painter.clone(),
            };
            painter.rect_filled(rect, 3.0, color);

            let emphasized = (in_drag_grid && visuals.dragging.contains(&id))
                || self.selected == Some(id);
            if emphasized {
                painter.rect_stroke(rect, 3.0, Stroke::new(2.0, Color32::WHITE));
            }

            painter.with_clip_rect(rect.intersect(painter.clip_rect())).text(
                rect.left_top() + Vec2::new(6.0, 2.0),
                Align2::LEFT_TOP,
                &task.title,
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
    }

    /// Handles and cursor for the element under an idle pointer, or the drag cursor.
    fn paint_hover(&self, ui: &egui::Ui, layout: &GridLayout, areas: &GridAreas) {
        if let Some(session) = self.router.session() {
            if session.is_active() {
                ui.ctx().set_cursor_icon(cursor_for(session.operation()));
            }
            return;
        }

        let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !grids_rect(areas).contains(pos) {
            return;
        }
        let Some(TaskHit { element, region }) = self.surface.hit_test(pos) else {
            return;
        };
        let Some(item) = layout.elements.iter().find(|item| item.element == element) else {
            return;
        };

        let hovered = match region {
            HandleRegion::Edge(handle) => Some(handle),
            HandleRegion::Body | HandleRegion::Grip => None,
        };
        let color = self
            .tasks
            .get(&element.source_id())
            .map_or(DEFAULT_TASK_COLOR, task_color);
        draw_handles(ui.painter(), &item.handles, hovered, color);
        ui.ctx()
            .set_cursor_icon(cursor_for(DragOperation::from_region(region)));
    }
}

fn cursor_for(operation: DragOperation) -> CursorIcon {
    match operation {
        DragOperation::Move => CursorIcon::Grab,
        DragOperation::Resize(ResizeHandle::Top | ResizeHandle::Bottom) => CursorIcon::ResizeVertical,
        DragOperation::Resize(ResizeHandle::Left | ResizeHandle::Right) => {
            CursorIcon::ResizeHorizontal
        }
    }
}

fn paint_strip_grid(painter: &Painter, layout: &GridLayout) {
    let Some(strip) = layout.long_term else {
        return;
    };
    painter.rect_stroke(strip.rect, 0.0, Stroke::new(1.0, GRID_LINE));

    let columns = (strip.rect.width() / strip.column_width).round() as i64;
    for column in 0..columns {
        let x = strip.column_x(column);
        painter.line_segment(
            [Pos2::new(x, strip.rect.top()), Pos2::new(x, strip.rect.bottom())],
            Stroke::new(1.0, GRID_LINE),
        );
        painter.text(
            Pos2::new(x + strip.column_width / 2.0, strip.rect.top() + STRIP_HEADER / 2.0),
            Align2::CENTER_CENTER,
            day_label(add_days(strip.first_date, column)),
            FontId::proportional(12.0),
            LABEL,
        );
    }
}

fn paint_hour_grid(painter: &Painter, layout: &GridLayout, areas: &GridAreas, view: &ViewConfig) {
    let Some(viewport) = layout.viewport else {
        return;
    };
    let Some(first) = layout.day_columns.first() else {
        return;
    };

    let gutter = Rect::from_min_max(
        Pos2::new(areas.timeline.left(), viewport.rect.top()),
        Pos2::new(areas.timeline.left() + TIME_GUTTER, viewport.rect.bottom()),
    );
    let labels = painter.with_clip_rect(gutter);
    let lines = painter.with_clip_rect(viewport.rect);

    for hour in 0..24 {
        let y = first.rect.top() + minutes_to_pixels((hour * 60) as f32, view.zoom_level);
        lines.line_segment(
            [Pos2::new(viewport.rect.left(), y), Pos2::new(viewport.rect.right(), y)],
            Stroke::new(1.0, GRID_LINE),
        );
        labels.text(
            Pos2::new(gutter.right() - 6.0, y + 2.0),
            Align2::RIGHT_TOP,
            format!("{:02}:00", (view.day_start_hour + hour) % 24),
            FontId::proportional(11.0),
            LABEL,
        );
    }

    for column in &layout.day_columns {
        lines.line_segment(
            [
                Pos2::new(column.rect.left(), viewport.rect.top()),
                Pos2::new(column.rect.left(), viewport.rect.bottom()),
            ],
            Stroke::new(1.0, GRID_LINE),
        );
    }
    painter.rect_stroke(viewport.rect, 0.0, Stroke::new(1.0, GRID_LINE));
}

fn paint_calendar_grid(painter: &Painter, layout: &GridLayout, view: &ViewConfig) {
    let Some(calendar) = &layout.calendar else {
        return;
    };
    let month = view.window_start.month();

    for row in &calendar.rows {
        for column in 0..7 {
            let date = add_days(row.week_start, column);
            let cell = Rect::from_min_size(
                Pos2::new(row.rect.left() + column as f32 * calendar.column_width, row.rect.top()),
                Vec2::new(calendar.column_width, row.rect.height()),
            );
            painter.rect_stroke(cell, 0.0, Stroke::new(1.0, GRID_LINE));
            let color = if date.month() == month {
                LABEL
            } else {
                LABEL.gamma_multiply(0.4)
            };
            painter.text(
                cell.left_top() + Vec2::new(4.0, 2.0),
                Align2::LEFT_TOP,
                date.day().to_string(),
                FontId::proportional(11.0),
                color,
            );
        }
    }
}
