//! Drag interaction engine.
//!
//! Turns pointer input over the three task grids (hour timeline, long-term
//! strip, month calendar) into at most one partial task update per gesture.
//! Pure parts (geometry, snapping, splitting, field authorization) have no
//! surface dependency; everything visual goes through the `Surface` trait.

pub mod autoscroll;
pub mod error;
pub mod geometry;
pub mod ghost;
pub mod handles;
pub mod layout;
pub mod patch;
pub mod router;
pub mod segments;
pub mod session;
pub mod snap;
pub mod strategy;
pub mod surface;

pub use error::DragError;
pub use ghost::{Ghost, GhostCanvas, GhostId, GhostPlacement, GhostPool, GhostSegment, GhostSource};
pub use layout::{GridLayout, LayoutSurface, SurfaceVisuals};
pub use router::{InputRouter, PointerEvent, RouterOutcome};
pub use session::{CommitOutcome, DragSession, PointerKind, SessionPhase};
pub use strategy::{Candidate, DragStrategy};
pub use surface::{DayColumn, DropTarget, ScrollViewport, Surface, WeekRow};
