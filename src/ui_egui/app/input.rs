use std::time::Instant;

use egui::{Event, PointerButton, Pos2, TouchPhase};

use super::{TaskMenu, TimelineApp};
use crate::drag::router::{PointerEvent, RouterOutcome};
use crate::drag::session::PointerKind;
use crate::models::settings::ViewConfig;

enum PointerInput {
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    Cancel(PointerEvent),
}

impl TimelineApp {
    /// Feed this frame's raw pointer events to the router.
    ///
    /// Returns true when a commit changed the stored tasks.
    pub(super) fn handle_input(&mut self, ctx: &egui::Context, view: &ViewConfig) -> bool {
        let events = ctx.input(|i| i.events.clone());
        let now = Instant::now();
        let mut changed = false;

        for event in events {
            let Some(input) = self.translate(&event, now) else {
                continue;
            };
            changed |= self.route(input, view);
        }
        changed
    }

    fn translate(&mut self, event: &Event, now: Instant) -> Option<PointerInput> {
        let mouse = |pos: Pos2| PointerEvent::new(pos, PointerKind::Mouse, now);
        match event {
            Event::Touch { phase, pos, .. } => {
                let pointer = PointerEvent::new(*pos, PointerKind::Touch, now);
                Some(match phase {
                    TouchPhase::Start => {
                        self.touch_active = true;
                        PointerInput::Down(pointer)
                    }
                    TouchPhase::Move => PointerInput::Move(pointer),
                    TouchPhase::End => {
                        self.touch_active = false;
                        PointerInput::Up(pointer)
                    }
                    TouchPhase::Cancel => {
                        self.touch_active = false;
                        PointerInput::Cancel(pointer)
                    }
                })
            }
            _ if self.touch_active => None,
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } => Some(if *pressed {
                PointerInput::Down(mouse(*pos))
            } else {
                PointerInput::Up(mouse(*pos))
            }),
            Event::PointerMoved(pos) => Some(PointerInput::Move(mouse(*pos))),
            _ => None,
        }
    }

    fn route(&mut self, input: PointerInput, view: &ViewConfig) -> bool {
        let outcome = match input {
            PointerInput::Down(event) => {
                self.task_menu = None;
                self.router
                    .pointer_down(&mut self.surface, &self.store, view, event)
            }
            PointerInput::Move(event) => self.router.pointer_move(&mut self.surface, view, event),
            PointerInput::Up(event) => {
                match self
                    .router
                    .pointer_up(&mut self.surface, &mut self.store, view, event)
                {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        let err = anyhow::Error::new(err);
                        log::error!("{:#}", err);
                        self.status = Some(err.to_string());
                        self.reload_tasks();
                        return true;
                    }
                }
            }
            PointerInput::Cancel(event) => self.router.pointer_cancel(event),
        };

        let committed = matches!(outcome, RouterOutcome::Committed { .. });
        self.apply_outcome(outcome);
        committed
    }

    pub(super) fn apply_outcome(&mut self, outcome: RouterOutcome) {
        match outcome {
            RouterOutcome::Selected { task_id } => {
                self.selected = Some(task_id);
            }
            RouterOutcome::LongPress { task_id, pos } => {
                self.task_menu = Some(TaskMenu { task_id, pos });
            }
            RouterOutcome::DragStarted { task_id } => {
                log::debug!("drag started on task {}", task_id);
                self.status = None;
            }
            RouterOutcome::Committed { task_id, patch } => {
                log::info!("task {} rescheduled: {:?}", task_id, patch);
                self.selected = Some(task_id);
                self.reload_tasks();
            }
            RouterOutcome::NoOp { task_id } => {
                log::debug!("drag on task {} ended without changes", task_id);
            }
            RouterOutcome::Ignored
            | RouterOutcome::Pressed { .. }
            | RouterOutcome::Dragging { .. } => {}
        }
    }
}
