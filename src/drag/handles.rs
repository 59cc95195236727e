// Resize handle hit zones
//
// - Top/Bottom handles: adjust start/end time (hour grid)
// - Left/Right handles: adjust start/end date (long-term strip, calendar)

use egui::{Pos2, Rect, Vec2};

use crate::models::grid::{GridContext, HandleRegion, ResizeHandle};

/// Size of the resize handle hit area
pub const HANDLE_SIZE: f32 = 8.0;
/// Visual size of the handle circle
pub const HANDLE_VISUAL_SIZE: f32 = 6.0;

/// Calculate handle rects for a task element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandleRects {
    pub top: Option<Rect>,
    pub bottom: Option<Rect>,
    pub left: Option<Rect>,
    pub right: Option<Rect>,
}

impl HandleRects {
    /// Handles for a task in the hour grid (top/bottom only).
    pub fn for_timed_task(rect: Rect) -> Self {
        // Short tasks keep their middle half grabbable as a body
        let zone_height = if rect.height() < HANDLE_SIZE * 4.0 {
            rect.height() / 4.0
        } else {
            HANDLE_SIZE
        };

        Self {
            top: Some(Rect::from_min_size(
                rect.left_top(),
                Vec2::new(rect.width(), zone_height),
            )),
            bottom: Some(Rect::from_min_size(
                Pos2::new(rect.left(), rect.bottom() - zone_height),
                Vec2::new(rect.width(), zone_height),
            )),
            left: None,
            right: None,
        }
    }

    /// Handles for a day-span bar (left/right only).
    ///
    /// A bar cut by a row boundary only gets a handle on the ends that are real task edges.
    pub fn for_span_task(rect: Rect, show_left: bool, show_right: bool) -> Self {
        let zone_width = if rect.width() < HANDLE_SIZE * 4.0 {
            rect.width() / 4.0
        } else {
            HANDLE_SIZE
        };

        Self {
            top: None,
            bottom: None,
            left: show_left.then(|| {
                Rect::from_min_size(rect.left_top(), Vec2::new(zone_width, rect.height()))
            }),
            right: show_right.then(|| {
                Rect::from_min_size(
                    Pos2::new(rect.right() - zone_width, rect.top()),
                    Vec2::new(zone_width, rect.height()),
                )
            }),
        }
    }

    pub fn for_grid(grid: GridContext, rect: Rect, show_start: bool, show_end: bool) -> Self {
        match grid {
            GridContext::Timeline => {
                let mut handles = Self::for_timed_task(rect);
                if !show_start {
                    handles.top = None;
                }
                if !show_end {
                    handles.bottom = None;
                }
                handles
            }
            GridContext::LongTerm | GridContext::Calendar => {
                Self::for_span_task(rect, show_start, show_end)
            }
        }
    }

    /// Check if a point hits any handle and return which one
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeHandle> {
        if self.top.map_or(false, |r| r.contains(pos)) {
            Some(ResizeHandle::Top)
        } else if self.bottom.map_or(false, |r| r.contains(pos)) {
            Some(ResizeHandle::Bottom)
        } else if self.left.map_or(false, |r| r.contains(pos)) {
            Some(ResizeHandle::Left)
        } else if self.right.map_or(false, |r| r.contains(pos)) {
            Some(ResizeHandle::Right)
        } else {
            None
        }
    }

    /// Get the rect for a specific handle
    pub fn get(&self, handle: ResizeHandle) -> Option<Rect> {
        match handle {
            ResizeHandle::Top => self.top,
            ResizeHandle::Bottom => self.bottom,
            ResizeHandle::Left => self.left,
            ResizeHandle::Right => self.right,
        }
    }

    /// Region of an element under `pos`: an edge handle, or the body.
    pub fn region_at(&self, element_rect: Rect, pos: Pos2) -> Option<HandleRegion> {
        if !element_rect.contains(pos) {
            return None;
        }
        Some(match self.hit_test(pos) {
            Some(handle) => HandleRegion::Edge(handle),
            None => HandleRegion::Body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_rects_for_timed_task() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 60.0));
        let handles = HandleRects::for_timed_task(rect);

        assert!(handles.top.is_some());
        assert!(handles.bottom.is_some());
        assert!(handles.left.is_none());
        assert!(handles.right.is_none());
    }

    #[test]
    fn test_handle_rects_for_span_task() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 20.0));
        let handles = HandleRects::for_span_task(rect, true, false);

        assert!(handles.top.is_none());
        assert!(handles.bottom.is_none());
        assert!(handles.left.is_some());
        assert!(handles.right.is_none());
    }

    #[test]
    fn test_handle_hit_test() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 60.0));
        let handles = HandleRects::for_timed_task(rect);

        assert_eq!(handles.hit_test(Pos2::new(200.0, 102.0)), Some(ResizeHandle::Top));
        assert_eq!(handles.hit_test(Pos2::new(200.0, 158.0)), Some(ResizeHandle::Bottom));
        assert_eq!(handles.hit_test(Pos2::new(200.0, 130.0)), None);
    }

    #[test]
    fn test_region_at() {
        let rect = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(100.0, 20.0));
        let handles = HandleRects::for_span_task(rect, true, true);

        assert_eq!(
            handles.region_at(rect, Pos2::new(2.0, 10.0)),
            Some(HandleRegion::Edge(ResizeHandle::Left))
        );
        assert_eq!(handles.region_at(rect, Pos2::new(50.0, 10.0)), Some(HandleRegion::Body));
        assert_eq!(handles.region_at(rect, Pos2::new(150.0, 10.0)), None);
    }

    #[test]
    fn test_short_task_keeps_body() {
        let rect = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(100.0, 15.0));
        let handles = HandleRects::for_timed_task(rect);
        assert_eq!(handles.hit_test(Pos2::new(50.0, 7.5)), None);
    }
}
