//! One drag gesture from pointer-down to release.
//!
//! The session owns everything transient about the gesture: the task
//! snapshot, the grabbed element, the chosen strategy, the ghost arena and the
//! phase. It is created by the router on a qualifying press and consumed by
//! `commit` or `discard`, which always restore the surface.

use std::time::Instant;

use egui::Pos2;

use crate::models::grid::{DragOperation, GridContext, TaskElement, TaskHit};
use crate::models::settings::ViewConfig;
use crate::models::task::{Task, TaskId, TaskPatch};
use crate::services::task_store::TaskStore;

use super::error::DragError;
use super::ghost::GhostPool;
use super::strategy::{select_strategy, Candidate, DragContext, DragStrategy};
use super::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Pressed, threshold not crossed yet
    Down,
    /// Dragging; previews follow the pointer
    Active,
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// Released before the move threshold: a selection click
    Clicked { task_id: TaskId },
    /// Dragged, but no valid placement was found or nothing changed
    Skipped { task_id: TaskId },
    Committed { task_id: TaskId, patch: TaskPatch },
}

pub struct DragSession {
    task: Task,
    element: TaskElement,
    strategy: Box<dyn DragStrategy>,
    ghosts: GhostPool,
    phase: SessionPhase,
    origin: Pos2,
    last_pointer: Pos2,
    pointer_kind: PointerKind,
    pressed_at: Instant,
}

impl DragSession {
    /// Start a session for a press on `hit`. The strategy records the grab point immediately.
    pub fn begin(
        task: Task,
        hit: TaskHit,
        pos: Pos2,
        pointer_kind: PointerKind,
        pressed_at: Instant,
        surface: &mut dyn Surface,
        view: &ViewConfig,
    ) -> Self {
        let operation = DragOperation::from_region(hit.region);
        let strategy = select_strategy(hit.element.grid, operation);
        log::debug!(
            "press on task {} in {:?}: {:?}",
            task.id,
            hit.element.grid,
            strategy.operation()
        );

        let mut session = Self {
            task,
            element: hit.element,
            strategy,
            ghosts: GhostPool::new(),
            phase: SessionPhase::Down,
            origin: pos,
            last_pointer: pos,
            pointer_kind,
            pressed_at,
        };
        let mut ctx = DragContext {
            surface,
            ghosts: &mut session.ghosts,
            view,
            task: &session.task,
            element: &session.element,
        };
        session.strategy.on_down(&mut ctx, pos);
        session
    }

    pub fn task_id(&self) -> TaskId {
        self.task.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn grid(&self) -> GridContext {
        self.strategy.grid()
    }

    pub fn operation(&self) -> DragOperation {
        self.strategy.operation()
    }

    pub fn candidate(&self) -> Option<Candidate> {
        self.strategy.candidate()
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    pub fn last_pointer(&self) -> Pos2 {
        self.last_pointer
    }

    pub fn pointer_kind(&self) -> PointerKind {
        self.pointer_kind
    }

    pub fn pressed_at(&self) -> Instant {
        self.pressed_at
    }

    /// Whether `pos` is far enough from the press point to start dragging.
    fn crosses_threshold(&self, pos: Pos2, threshold: f32) -> bool {
        (pos.x - self.origin.x).abs() >= threshold || (pos.y - self.origin.y).abs() >= threshold
    }

    /// Track a pointer move. Returns `true` on the move that activates the drag.
    pub fn pointer_moved(
        &mut self,
        surface: &mut dyn Surface,
        view: &ViewConfig,
        pos: Pos2,
        threshold: f32,
    ) -> bool {
        self.last_pointer = pos;
        let started = match self.phase {
            SessionPhase::Active => false,
            SessionPhase::Down if self.crosses_threshold(pos, threshold) => {
                log::debug!("drag started for task {}", self.task.id);
                self.phase = SessionPhase::Active;
                surface.set_dragging(self.element.source_id(), true);
                true
            }
            SessionPhase::Down => return false,
        };
        self.refresh(surface, view);
        started
    }

    /// Recompute the candidate at the last pointer position (after a programmatic scroll).
    pub fn refresh(&mut self, surface: &mut dyn Surface, view: &ViewConfig) {
        if self.phase != SessionPhase::Active {
            return;
        }
        let mut ctx = DragContext {
            surface,
            ghosts: &mut self.ghosts,
            view,
            task: &self.task,
            element: &self.element,
        };
        self.strategy.on_move(&mut ctx, self.last_pointer);
    }

    /// Finish the gesture: a click, a skipped drop, or exactly one store update.
    ///
    /// The surface is restored whether or not the update succeeds.
    pub fn commit(
        mut self,
        surface: &mut dyn Surface,
        view: &ViewConfig,
        store: &mut dyn TaskStore,
    ) -> Result<CommitOutcome, DragError> {
        let task_id = self.task.id;
        if self.phase == SessionPhase::Down {
            self.teardown(surface);
            return Ok(CommitOutcome::Clicked { task_id });
        }

        let patch = {
            let mut ctx = DragContext {
                surface: &mut *surface,
                ghosts: &mut self.ghosts,
                view,
                task: &self.task,
                element: &self.element,
            };
            self.strategy.on_up(&mut ctx, self.last_pointer)
        };

        let patch = match patch {
            Some(patch) if !patch.is_empty() => patch,
            Some(_) => {
                log::debug!("drop of task {} changed nothing", task_id);
                self.teardown(surface);
                return Ok(CommitOutcome::Skipped { task_id });
            }
            None => {
                log::warn!("no valid drop target for task {}, skipping commit", task_id);
                self.teardown(surface);
                return Ok(CommitOutcome::Skipped { task_id });
            }
        };

        // Hide the stale element until the store's re-render replaces it
        surface.set_hidden(self.element.source_id(), true);
        let result = store.update_task(task_id, &patch);
        self.teardown(surface);

        match result {
            Ok(()) => {
                log::info!("updated task {}: {:?}", task_id, patch);
                Ok(CommitOutcome::Committed { task_id, patch })
            }
            Err(source) => {
                log::error!("failed to update task {}: {:#}", task_id, source);
                Err(DragError::Store {
                    id: task_id,
                    source,
                })
            }
        }
    }

    /// End the gesture without touching the store (long-press).
    pub fn discard(mut self, surface: &mut dyn Surface) {
        log::debug!("discarding session for task {}", self.task.id);
        self.teardown(surface);
    }

    fn teardown(&mut self, surface: &mut dyn Surface) {
        let id = self.element.source_id();
        self.ghosts.clear(surface);
        surface.set_drop_target(None);
        surface.set_dragging(id, false);
        surface.set_faded(id, false);
        surface.set_translation(id, None);
        surface.set_hidden(id, false);
    }
}
