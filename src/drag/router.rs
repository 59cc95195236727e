//! Pointer input router.
//!
//! Turns raw pointer events into at most one drag session at a time and
//! tells clicks, drags and long-presses apart. The router holds no
//! surface or store of its own; the host passes them in with every event.

use std::time::{Duration, Instant};

use egui::Pos2;

use crate::models::grid::{GridContext, HandleRegion};
use crate::models::settings::{DragSettings, ViewConfig};
use crate::models::task::{TaskId, TaskPatch};
use crate::services::task_store::TaskStore;

use super::autoscroll::AutoScroller;
use super::error::DragError;
use super::session::{CommitOutcome, DragSession, PointerKind};
use super::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pos: Pos2,
    pub kind: PointerKind,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(pos: Pos2, kind: PointerKind, time: Instant) -> Self {
        Self { pos, kind, time }
    }
}

/// What the router did with an event, for the host to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum RouterOutcome {
    /// Nothing to do (no task under the pointer, or a session is already running)
    Ignored,
    /// A session is waiting for the move threshold
    Pressed { task_id: TaskId },
    DragStarted { task_id: TaskId },
    Dragging { task_id: TaskId },
    /// Plain click on a task
    Selected { task_id: TaskId },
    /// Touch held in place; the host opens the task menu
    LongPress { task_id: TaskId, pos: Pos2 },
    Committed { task_id: TaskId, patch: TaskPatch },
    /// Drag ended without a write
    NoOp { task_id: TaskId },
}

pub struct InputRouter {
    settings: DragSettings,
    session: Option<DragSession>,
    autoscroll: AutoScroller,
}

impl InputRouter {
    pub fn new(settings: DragSettings) -> Self {
        let interval = Duration::from_millis(settings.auto_scroll_interval_ms.max(1));
        Self {
            settings,
            session: None,
            autoscroll: AutoScroller::new(interval),
        }
    }

    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.autoscroll.is_running()
    }

    pub fn pointer_down(
        &mut self,
        surface: &mut dyn Surface,
        store: &dyn TaskStore,
        view: &ViewConfig,
        event: PointerEvent,
    ) -> RouterOutcome {
        if self.session.is_some() {
            log::debug!("pointer down ignored: a drag is already in progress");
            return RouterOutcome::Ignored;
        }
        let Some(hit) = surface.hit_test(event.pos) else {
            return RouterOutcome::Ignored;
        };

        let task_id = hit.element.source_id();
        if hit.region == HandleRegion::Body && !self.settings.body_drag {
            return RouterOutcome::Selected { task_id };
        }
        let Some(task) = store.get_task(task_id) else {
            log::warn!("pointer down on unknown task {}", task_id);
            return RouterOutcome::Ignored;
        };

        self.session = Some(DragSession::begin(
            task, hit, event.pos, event.kind, event.time, surface, view,
        ));
        RouterOutcome::Pressed { task_id }
    }

    pub fn pointer_move(
        &mut self,
        surface: &mut dyn Surface,
        view: &ViewConfig,
        event: PointerEvent,
    ) -> RouterOutcome {
        let Some(session) = self.session.as_mut() else {
            return RouterOutcome::Ignored;
        };
        let task_id = session.task_id();
        let started =
            session.pointer_moved(surface, view, event.pos, self.settings.move_threshold_px);

        if !session.is_active() {
            return RouterOutcome::Pressed { task_id };
        }

        if session.grid() == GridContext::Timeline {
            self.autoscroll.evaluate(
                surface.scroll_viewport(),
                event.pos,
                self.settings.auto_scroll_margin_px,
                self.settings.auto_scroll_step_px,
                event.time,
            );
        }

        if started {
            RouterOutcome::DragStarted { task_id }
        } else {
            RouterOutcome::Dragging { task_id }
        }
    }

    /// Resolve the session. Cleanup has already happened when this returns an error.
    pub fn pointer_up(
        &mut self,
        surface: &mut dyn Surface,
        store: &mut dyn TaskStore,
        view: &ViewConfig,
        event: PointerEvent,
    ) -> Result<RouterOutcome, DragError> {
        let Some(mut session) = self.session.take() else {
            return Ok(RouterOutcome::Ignored);
        };
        self.autoscroll.stop();
        session.pointer_moved(surface, view, event.pos, self.settings.move_threshold_px);

        Ok(match session.commit(surface, view, store)? {
            CommitOutcome::Clicked { task_id } => RouterOutcome::Selected { task_id },
            CommitOutcome::Skipped { task_id } => RouterOutcome::NoOp { task_id },
            CommitOutcome::Committed { task_id, patch } => {
                RouterOutcome::Committed { task_id, patch }
            }
        })
    }

    /// Lost capture or a cancelled touch does not end the drag; only release does.
    pub fn pointer_cancel(&mut self, event: PointerEvent) -> RouterOutcome {
        if let Some(session) = &self.session {
            log::trace!(
                "pointer cancel at {:?} ignored for task {}",
                event.pos,
                session.task_id()
            );
        }
        RouterOutcome::Ignored
    }

    /// Drive time-based behavior: long-press detection and the auto-scroll timer.
    pub fn tick(
        &mut self,
        surface: &mut dyn Surface,
        view: &ViewConfig,
        now: Instant,
    ) -> RouterOutcome {
        let Some(session) = self.session.as_mut() else {
            return RouterOutcome::Ignored;
        };

        if !session.is_active() {
            let held = now.saturating_duration_since(session.pressed_at());
            if session.pointer_kind() == PointerKind::Touch
                && held >= Duration::from_millis(self.settings.long_press_ms)
            {
                let task_id = session.task_id();
                let pos = session.origin();
                if let Some(session) = self.session.take() {
                    session.discard(surface);
                }
                log::debug!("long press on task {}", task_id);
                return RouterOutcome::LongPress { task_id, pos };
            }
            return RouterOutcome::Ignored;
        }

        if !self.autoscroll.due(now) {
            return RouterOutcome::Ignored;
        }

        let velocity = self.autoscroll.evaluate(
            surface.scroll_viewport(),
            session.last_pointer(),
            self.settings.auto_scroll_margin_px,
            self.settings.auto_scroll_step_px,
            now,
        );
        if velocity == 0.0 || surface.scroll_by(velocity) == 0.0 {
            self.autoscroll.stop();
            return RouterOutcome::Ignored;
        }

        session.refresh(surface, view);
        RouterOutcome::Dragging {
            task_id: session.task_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::handles::HandleRects;
    use crate::drag::layout::{ElementLayout, GridLayout, LayoutSurface};
    use crate::drag::surface::DayColumn;
    use crate::models::grid::TaskElement;
    use crate::models::task::Task;
    use crate::services::task_store::InMemoryTaskStore;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use egui::{Rect, Vec2};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn view() -> ViewConfig {
        ViewConfig {
            zoom_level: 1.0,
            day_start_hour: 0,
            week_start: Weekday::Sun,
            window_start: d(10),
        }
    }

    fn fixture() -> (LayoutSurface, InMemoryTaskStore) {
        let rect = Rect::from_min_size(Pos2::new(100.0, 540.0), Vec2::new(100.0, 60.0));
        let surface = LayoutSurface::new(GridLayout {
            day_columns: vec![DayColumn {
                date: d(10),
                rect: Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(100.0, 1440.0)),
            }],
            elements: vec![ElementLayout {
                element: TaskElement::new(1, GridContext::Timeline, rect),
                handles: HandleRects::for_timed_task(rect),
            }],
            ..Default::default()
        });
        let store = InMemoryTaskStore::with_tasks([Task::builder(1)
            .start_date(d(10))
            .start_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
            .build()]);
        (surface, store)
    }

    fn at(pos: Pos2, kind: PointerKind, time: Instant) -> PointerEvent {
        PointerEvent::new(pos, kind, time)
    }

    #[test]
    fn test_press_on_empty_space_is_ignored() {
        let (mut surface, store) = fixture();
        let mut router = InputRouter::new(DragSettings::default());
        let outcome = router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 100.0), PointerKind::Mouse, Instant::now()),
        );
        assert_eq!(outcome, RouterOutcome::Ignored);
        assert!(router.is_idle());
    }

    #[test]
    fn test_second_press_is_ignored_while_dragging() {
        let (mut surface, store) = fixture();
        let mut router = InputRouter::new(DragSettings::default());
        let now = Instant::now();
        let first = router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 570.0), PointerKind::Mouse, now),
        );
        assert_eq!(first, RouterOutcome::Pressed { task_id: 1 });
        let second = router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 570.0), PointerKind::Mouse, now),
        );
        assert_eq!(second, RouterOutcome::Ignored);
    }

    #[test]
    fn test_body_press_selects_when_body_drag_disabled() {
        let (mut surface, store) = fixture();
        let settings = DragSettings {
            body_drag: false,
            ..DragSettings::default()
        };
        let mut router = InputRouter::new(settings);
        let outcome = router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 570.0), PointerKind::Mouse, Instant::now()),
        );
        assert_eq!(outcome, RouterOutcome::Selected { task_id: 1 });
        assert!(router.is_idle());
    }

    #[test]
    fn test_long_press_opens_menu_without_writing() {
        let (mut surface, store) = fixture();
        let mut router = InputRouter::new(DragSettings::default());
        let now = Instant::now();
        router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 570.0), PointerKind::Touch, now),
        );

        assert_eq!(
            router.tick(&mut surface, &view(), now + Duration::from_millis(200)),
            RouterOutcome::Ignored
        );
        assert_eq!(
            router.tick(&mut surface, &view(), now + Duration::from_millis(500)),
            RouterOutcome::LongPress {
                task_id: 1,
                pos: Pos2::new(150.0, 570.0)
            }
        );
        assert!(router.is_idle());
        assert!(surface.visuals().is_idle());
    }

    #[test]
    fn test_mouse_hold_is_not_a_long_press() {
        let (mut surface, store) = fixture();
        let mut router = InputRouter::new(DragSettings::default());
        let now = Instant::now();
        router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 570.0), PointerKind::Mouse, now),
        );
        assert_eq!(
            router.tick(&mut surface, &view(), now + Duration::from_secs(2)),
            RouterOutcome::Ignored
        );
        assert!(!router.is_idle());
    }

    #[test]
    fn test_cancel_does_not_end_drag() {
        let (mut surface, store) = fixture();
        let mut router = InputRouter::new(DragSettings::default());
        let now = Instant::now();
        router.pointer_down(
            &mut surface,
            &store,
            &view(),
            at(Pos2::new(150.0, 570.0), PointerKind::Touch, now),
        );
        router.pointer_move(&mut surface, &view(), at(Pos2::new(150.0, 600.0), PointerKind::Touch, now));
        router.pointer_cancel(at(Pos2::new(150.0, 600.0), PointerKind::Touch, now));
        assert!(router.session().map_or(false, |s| s.is_active()));
    }
}
