//! Lays out the three task grids for one frame.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use egui::{Pos2, Rect, Vec2};

use crate::drag::geometry::{minute_to_offset, minutes_to_pixels, span_height, MINUTES_PER_DAY};
use crate::drag::handles::HandleRects;
use crate::drag::layout::{CalendarLayout, ElementLayout, GridLayout, LongTermStrip};
use crate::drag::segments::{split_by_visual_day, split_by_week, week_start_of};
use crate::drag::surface::{DayColumn, ScrollViewport, WeekRow};
use crate::models::grid::{GridContext, TaskElement};
use crate::models::settings::ViewConfig;
use crate::models::task::{Task, MIN_WINDOW_MINUTES};
use crate::ui_egui::ghost_drawing::{CALENDAR_LANE_HEIGHT, CALENDAR_LANE_TOP};
use crate::utils::date::{add_days, day_offset};

/// Width of the hour labels left of the day columns.
pub const TIME_GUTTER: f32 = 56.0;
/// Day header row at the top of the long-term strip.
pub const STRIP_HEADER: f32 = 20.0;
pub const STRIP_LANE_HEIGHT: f32 = 18.0;
const STRIP_LANES: usize = 3;
const LANE_GAP: f32 = 2.0;

/// Screen regions for the strip, hour grid and month calendar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridAreas {
    pub strip: Rect,
    pub timeline: Rect,
    pub calendar: Rect,
}

impl GridAreas {
    /// Strip on top, hour grid in the middle, calendar below it.
    pub fn split(rect: Rect) -> Self {
        let strip_height = STRIP_HEADER + STRIP_LANES as f32 * (STRIP_LANE_HEIGHT + LANE_GAP) + 4.0;
        let strip = Rect::from_min_size(rect.min, Vec2::new(rect.width(), strip_height));

        let remaining = (rect.height() - strip_height).max(0.0);
        let timeline = Rect::from_min_size(
            Pos2::new(rect.left(), strip.bottom()),
            Vec2::new(rect.width(), remaining * 0.55),
        );
        let calendar = Rect::from_min_max(
            Pos2::new(rect.left(), timeline.bottom() + 8.0),
            rect.max,
        );
        Self {
            strip,
            timeline,
            calendar,
        }
    }
}

pub fn build_layout(
    areas: &GridAreas,
    tasks: &[&Task],
    view: &ViewConfig,
    visible_days: u32,
    scroll_offset: f32,
) -> GridLayout {
    let days = visible_days.max(1);
    let mut layout = GridLayout::default();

    let strip = long_term_strip(areas.strip, view.window_start, days);
    layout.long_term = Some(strip);

    let viewport = hour_viewport(areas.timeline, view.zoom_level, scroll_offset);
    layout.day_columns = day_columns(&viewport, view, days);
    layout.viewport = Some(viewport);

    let calendar = month_calendar(areas.calendar, view);

    let last_visible = add_days(view.window_start, i64::from(days) - 1);
    let mut strip_lane = 0usize;
    let mut calendar_lanes: HashMap<NaiveDate, usize> = HashMap::new();

    for task in tasks {
        if task.is_long_term(view.window_start, view.day_start_hour) {
            if let Some(item) = strip_element(task, &strip, view, last_visible, strip_lane) {
                layout.elements.push(item);
                strip_lane = (strip_lane + 1) % STRIP_LANES;
            }
        } else {
            layout
                .elements
                .extend(timeline_elements(task, &layout.day_columns, view));
        }
        layout
            .elements
            .extend(calendar_elements(task, &calendar, view, &mut calendar_lanes));
    }

    layout.calendar = Some(calendar);
    layout
}

fn long_term_strip(area: Rect, first_date: NaiveDate, days: u32) -> LongTermStrip {
    let rect = Rect::from_min_max(Pos2::new(area.left() + TIME_GUTTER, area.top()), area.max);
    LongTermStrip {
        rect,
        first_date,
        column_width: rect.width() / days as f32,
    }
}

fn hour_viewport(area: Rect, zoom_level: f32, scroll_offset: f32) -> ScrollViewport {
    let rect = Rect::from_min_max(Pos2::new(area.left() + TIME_GUTTER, area.top()), area.max);
    let day_height = minutes_to_pixels(MINUTES_PER_DAY as f32, zoom_level);
    let max_offset = (day_height - rect.height()).max(0.0);
    ScrollViewport {
        rect,
        offset: scroll_offset.clamp(0.0, max_offset),
        max_offset,
    }
}

fn day_columns(viewport: &ScrollViewport, view: &ViewConfig, days: u32) -> Vec<DayColumn> {
    let width = viewport.rect.width() / days as f32;
    let height = minutes_to_pixels(MINUTES_PER_DAY as f32, view.zoom_level);
    (0..days)
        .map(|index| DayColumn {
            date: add_days(view.window_start, i64::from(index)),
            rect: Rect::from_min_size(
                Pos2::new(
                    viewport.rect.left() + index as f32 * width,
                    viewport.rect.top() - viewport.offset,
                ),
                Vec2::new(width, height),
            ),
        })
        .collect()
}

/// Week rows covering the month of the window start.
fn month_calendar(area: Rect, view: &ViewConfig) -> CalendarLayout {
    let anchor = view.window_start;
    let first = anchor.with_day(1).unwrap_or(anchor);
    let last = add_days(
        first
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(first),
        -1,
    );

    let mut week_starts = Vec::new();
    let mut row = week_start_of(first, view.week_start);
    while row <= last {
        week_starts.push(row);
        row = add_days(row, 7);
    }

    let row_height = area.height() / week_starts.len().max(1) as f32;
    let rows = week_starts
        .into_iter()
        .enumerate()
        .map(|(index, week_start)| WeekRow {
            week_start,
            rect: Rect::from_min_size(
                Pos2::new(area.left(), area.top() + index as f32 * row_height),
                Vec2::new(area.width(), row_height),
            ),
        })
        .collect();

    CalendarLayout {
        rows,
        column_width: area.width() / 7.0,
    }
}

fn strip_element(
    task: &Task,
    strip: &LongTermStrip,
    view: &ViewConfig,
    last_visible: NaiveDate,
    lane: usize,
) -> Option<ElementLayout> {
    let span = task.resolve_span(view.window_start)?;
    if span.end < view.window_start || span.start > last_visible {
        return None;
    }
    let first = span.start.max(view.window_start);
    let last = span.end.min(last_visible);
    let column = day_offset(first, view.window_start);
    let columns = day_offset(last, first) + 1;

    let rect = Rect::from_min_size(
        Pos2::new(
            strip.column_x(column) + 2.0,
            strip.rect.top() + STRIP_HEADER + lane as f32 * (STRIP_LANE_HEIGHT + LANE_GAP),
        ),
        Vec2::new(columns as f32 * strip.column_width - 4.0, STRIP_LANE_HEIGHT),
    );
    Some(ElementLayout {
        element: TaskElement::new(task.id, GridContext::LongTerm, rect),
        handles: HandleRects::for_grid(
            GridContext::LongTerm,
            rect,
            span.start >= view.window_start,
            span.end <= last_visible,
        ),
    })
}

fn timeline_elements(task: &Task, columns: &[DayColumn], view: &ViewConfig) -> Vec<ElementLayout> {
    let Some(window) = task.resolve_window(view.window_start, view.day_start_hour) else {
        return Vec::new();
    };
    let segments = split_by_visual_day(&window, view.day_start_hour);
    let count = segments.len();

    segments
        .iter()
        .enumerate()
        .filter_map(|(index, segment)| {
            let column = columns.iter().find(|c| c.date == segment.date)?;
            let rect = Rect::from_min_size(
                Pos2::new(
                    column.rect.left() + 4.0,
                    column.rect.top() + minute_to_offset(segment.start_minute, view.zoom_level),
                ),
                Vec2::new(
                    column.rect.width() - 8.0,
                    span_height(segment.minutes(), MIN_WINDOW_MINUTES, view.zoom_level),
                ),
            );
            let mut element = TaskElement::new(task.id, GridContext::Timeline, rect);
            if count > 1 {
                element = element.segment_of(task.id);
            }
            Some(ElementLayout {
                element,
                handles: HandleRects::for_grid(
                    GridContext::Timeline,
                    rect,
                    index == 0,
                    index + 1 == count,
                ),
            })
        })
        .collect()
}

fn calendar_elements(
    task: &Task,
    calendar: &CalendarLayout,
    view: &ViewConfig,
    lanes: &mut HashMap<NaiveDate, usize>,
) -> Vec<ElementLayout> {
    let Some(span) = task.resolve_span(view.window_start) else {
        return Vec::new();
    };
    let segments = split_by_week(&span, view.week_start);
    let count = segments.len();

    segments
        .iter()
        .filter_map(|segment| {
            let row = calendar
                .rows
                .iter()
                .find(|r| r.week_start == segment.week_start)?;
            let lane = lanes.entry(segment.week_start).or_insert(0);
            let top = row.rect.top()
                + CALENDAR_LANE_TOP
                + *lane as f32 * (CALENDAR_LANE_HEIGHT + LANE_GAP);
            *lane += 1;
            if top + CALENDAR_LANE_HEIGHT > row.rect.bottom() {
                return None;
            }

            let rect = Rect::from_min_size(
                Pos2::new(
                    row.rect.left() + segment.first_col as f32 * calendar.column_width + 2.0,
                    top,
                ),
                Vec2::new(
                    segment.columns as f32 * calendar.column_width - 4.0,
                    CALENDAR_LANE_HEIGHT,
                ),
            );
            let mut element = TaskElement::new(task.id, GridContext::Calendar, rect);
            if count > 1 {
                element = element.segment_of(task.id);
            }
            Some(ElementLayout {
                element,
                handles: HandleRects::for_grid(
                    GridContext::Calendar,
                    rect,
                    segment.span.start == span.start,
                    segment.span.end == span.end,
                ),
            })
        })
        .collect()
}
