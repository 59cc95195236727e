//! Temporal geometry for the hour grid.
//!
//! Pure conversions between clock time, visual-day minutes and pixel offsets.
//! Pixel math is linear in the zoom level (pixels per minute); nothing else
//! scales.

use chrono::{Duration, NaiveDate, NaiveDateTime};

pub use crate::utils::date::{day_offset, minutes_from_visual_midnight, MINUTES_PER_DAY};
use crate::utils::date::visual_day_start;

use super::surface::DayColumn;

/// Zoom levels below this are treated as this value so pixel math never divides by zero.
pub const MIN_ZOOM: f32 = 0.05;

pub fn pixels_per_minute(zoom_level: f32) -> f32 {
    if zoom_level.is_finite() {
        zoom_level.max(MIN_ZOOM)
    } else {
        MIN_ZOOM
    }
}

pub fn minutes_per_pixel(zoom_level: f32) -> f32 {
    1.0 / pixels_per_minute(zoom_level)
}

pub fn minutes_to_pixels(minutes: f32, zoom_level: f32) -> f32 {
    minutes * pixels_per_minute(zoom_level)
}

pub fn pixels_to_minutes(pixels: f32, zoom_level: f32) -> f32 {
    pixels * minutes_per_pixel(zoom_level)
}

/// Pointer position expressed as minutes since the visual start of `reference`.
///
/// The column under the pointer supplies both the day (chained as multiples of 1440)
/// and the vertical origin, so scrolling and multi-column layouts need no extra math.
pub fn pointer_minutes(column: &DayColumn, reference: NaiveDate, y: f32, zoom_level: f32) -> f32 {
    let day_minutes = (day_offset(column.date, reference) * MINUTES_PER_DAY) as f32;
    day_minutes + pixels_to_minutes(y - column.rect.top(), zoom_level)
}

/// Instant `minutes` after the visual start of `reference`.
pub fn instant_at(reference: NaiveDate, start_hour: u32, minutes: i64) -> NaiveDateTime {
    visual_day_start(reference, start_hour) + Duration::minutes(minutes)
}

/// Minutes from the visual start of `reference` to `instant` (negative before it).
pub fn minutes_since(reference: NaiveDate, start_hour: u32, instant: NaiveDateTime) -> i64 {
    (instant - visual_day_start(reference, start_hour)).num_minutes()
}

/// Vertical pixel offset of a minute within its visual day column.
pub fn minute_to_offset(minute_of_day: i64, zoom_level: f32) -> f32 {
    minutes_to_pixels(minute_of_day.clamp(0, MINUTES_PER_DAY) as f32, zoom_level)
}

/// Height for a span of minutes, never shorter than `min_minutes`.
pub fn span_height(minutes: i64, min_minutes: i64, zoom_level: f32) -> f32 {
    minutes_to_pixels(minutes.max(min_minutes).max(0) as f32, zoom_level)
}
