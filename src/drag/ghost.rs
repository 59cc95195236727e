//! Preview ghosts.
//!
//! A ghost is a translucent placeholder showing where the dragged task would
//! land. One dragged task may need several ghosts (one per day column or week
//! row it crosses), so ghosts live in a small arena keyed by segment index and
//! are reconciled against the requested list on every move.

use chrono::NaiveDate;

use crate::models::task::TaskId;

pub type GhostId = u64;

/// Where a ghost sits on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GhostPlacement {
    /// Hour grid: pixel offset from the day column's visual start
    TimeSlot { date: NaiveDate, top: f32, height: f32 },
    /// Long-term strip: day columns counted from the visible window's left edge
    LongTerm {
        first_col: i64,
        columns: i64,
        lane_top: f32,
        lane_height: f32,
    },
    /// Calendar: columns within one week row
    Calendar {
        week_start: NaiveDate,
        first_col: u32,
        columns: u32,
    },
}

/// Which ends of a ghost are cut by a day or week boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Truncation {
    pub start: bool,
    pub end: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSegment {
    pub placement: GhostPlacement,
    pub truncated: Truncation,
}

impl GhostSegment {
    pub fn new(placement: GhostPlacement) -> Self {
        Self {
            placement,
            truncated: Truncation::default(),
        }
    }
}

/// Task-level look shared by every ghost of one drag.
#[derive(Clone, Debug, PartialEq)]
pub struct GhostSource {
    pub task_id: TaskId,
    pub title: String,
    pub color: Option<String>,
}

/// Placeholder visual as handed to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Ghost {
    pub segment: GhostSegment,
    pub source: GhostSource,
}

/// Rendering side of the ghost pool.
pub trait GhostCanvas {
    fn create_ghost(&mut self, ghost: Ghost) -> GhostId;
    fn update_ghost(&mut self, id: GhostId, ghost: Ghost);
    fn remove_ghost(&mut self, id: GhostId);
}

/// Mark the first piece as continuing after its end, the last as continuing before
/// its start, and middle pieces as cut on both sides.
pub fn mark_truncation(segments: &mut [GhostSegment]) {
    let count = segments.len();
    if count < 2 {
        if let Some(only) = segments.first_mut() {
            only.truncated = Truncation::default();
        }
        return;
    }
    for (index, segment) in segments.iter_mut().enumerate() {
        segment.truncated = Truncation {
            start: index > 0,
            end: index + 1 < count,
        };
    }
}

/// What a reconcile pass did, mainly for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reconcile {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Arena of live ghosts keyed by segment index.
#[derive(Debug, Default)]
pub struct GhostPool {
    slots: Vec<GhostId>,
}

impl GhostPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bring the live ghosts in line with `segments`: reuse existing slots by index,
    /// create missing ones and drop the surplus.
    pub fn update<C: GhostCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        segments: &[GhostSegment],
        source: &GhostSource,
    ) -> Reconcile {
        let mut outcome = Reconcile::default();

        for (index, segment) in segments.iter().enumerate() {
            let ghost = Ghost {
                segment: *segment,
                source: source.clone(),
            };
            match self.slots.get(index) {
                Some(&id) => {
                    canvas.update_ghost(id, ghost);
                    outcome.updated += 1;
                }
                None => {
                    let id = canvas.create_ghost(ghost);
                    self.slots.push(id);
                    outcome.created += 1;
                }
            }
        }

        for id in self.slots.drain(segments.len()..) {
            canvas.remove_ghost(id);
            outcome.removed += 1;
        }

        outcome
    }

    pub fn clear<C: GhostCanvas + ?Sized>(&mut self, canvas: &mut C) {
        for id in self.slots.drain(..) {
            canvas.remove_ghost(id);
        }
    }
}
