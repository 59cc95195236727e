// Auto-scroll timer
// Scrolls the hour grid while a drag hovers near its top or bottom edge

use std::time::{Duration, Instant};

use egui::Pos2;

use super::surface::ScrollViewport;

/// Signed scroll speed for a pointer at `pos`: negative scrolls up.
///
/// Zero outside the margins. Inside a margin the step grows linearly with
/// how deep the pointer sits in it, reaching `step` at the edge and beyond.
pub fn scroll_velocity(viewport: &ScrollViewport, pos: Pos2, margin: f32, step: f32) -> f32 {
    if margin <= 0.0 || !viewport.rect.x_range().contains(pos.x) {
        return 0.0;
    }

    let top_zone = viewport.rect.top() + margin;
    let bottom_zone = viewport.rect.bottom() - margin;
    let velocity = if pos.y < top_zone {
        -step * ((top_zone - pos.y) / margin).min(1.0)
    } else if pos.y > bottom_zone {
        step * ((pos.y - bottom_zone) / margin).min(1.0)
    } else {
        0.0
    };

    if viewport.can_scroll(velocity) {
        velocity
    } else {
        0.0
    }
}

/// Repeating timer state. The router owns one and polls it from `tick`.
#[derive(Debug)]
pub struct AutoScroller {
    interval: Duration,
    next_due: Option<Instant>,
}

impl AutoScroller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start or stop the timer for the current pointer position. Returns the velocity.
    pub fn evaluate(
        &mut self,
        viewport: Option<ScrollViewport>,
        pos: Pos2,
        margin: f32,
        step: f32,
        now: Instant,
    ) -> f32 {
        let velocity = viewport.map_or(0.0, |viewport| scroll_velocity(&viewport, pos, margin, step));
        if velocity == 0.0 {
            self.stop();
        } else if self.next_due.is_none() {
            log::trace!("auto-scroll started at {:.1}px per tick", velocity);
            self.next_due = Some(now);
        }
        velocity
    }

    /// True once per interval while running.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            log::trace!("auto-scroll stopped");
        }
    }
}
