//! Snap policy: rounds raw pointer deltas to the grid unit of the active context.

use crate::models::grid::{Edge, GridContext};

use super::geometry::minutes_to_pixels;

/// Hour-grid snap unit.
pub const SNAP_MINUTES: i64 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapPolicy {
    /// Round to a multiple of this many minutes
    Minutes(i64),
    /// Round to whole day columns
    Days,
}

impl SnapPolicy {
    pub fn for_grid(grid: GridContext) -> Self {
        if grid.is_day_based() {
            SnapPolicy::Days
        } else {
            SnapPolicy::Minutes(SNAP_MINUTES)
        }
    }

    /// Pixel size of one unit: minutes scaled by zoom, or the header column width.
    pub fn unit_pixels(&self, zoom_level: f32, column_width: f32) -> f32 {
        match self {
            SnapPolicy::Minutes(unit) => minutes_to_pixels(*unit as f32, zoom_level),
            SnapPolicy::Days => column_width,
        }
    }

    /// Round a raw value (minutes or day columns) to the nearest unit multiple.
    pub fn snap(&self, raw: f32) -> i64 {
        match self {
            SnapPolicy::Minutes(unit) => snap_to_unit(raw, *unit),
            SnapPolicy::Days => snap_to_unit(raw, 1),
        }
    }
}

fn snap_to_unit(raw: f32, unit: i64) -> i64 {
    if !raw.is_finite() || unit <= 0 {
        return 0;
    }
    let unit_f = unit as f32;
    (raw / unit_f).round() as i64 * unit
}

/// Nearest multiple of 15 minutes.
pub fn snap_minutes(raw_minutes: f32) -> i64 {
    snap_to_unit(raw_minutes, SNAP_MINUTES)
}

/// Whole day columns covered by a horizontal pixel delta.
///
/// `None` when the reference column has no usable width.
pub fn snap_day_delta(pixel_delta: f32, column_width: f32) -> Option<i64> {
    if !(column_width.is_finite() && column_width > 0.0) {
        return None;
    }
    Some((pixel_delta / column_width).round() as i64)
}

/// Keep the edge under the pointer at least `min_gap` away from the held edge.
///
/// Only the moving edge is adjusted; the held edge never moves.
pub fn clamp_moving_edge(moving: i64, held: i64, moving_edge: Edge, min_gap: i64) -> i64 {
    match moving_edge {
        Edge::End => moving.max(held + min_gap),
        Edge::Start => moving.min(held - min_gap),
    }
}
