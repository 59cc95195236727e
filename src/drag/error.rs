use thiserror::Error;

use crate::models::task::TaskId;

/// Failures surfaced from a finished drag.
///
/// Pointer-time problems (no cell under the pointer, inverted spans) are
/// absorbed by the engine; only the store write can fail a gesture, and by
/// then the surface has already been cleaned up.
#[derive(Debug, Error)]
pub enum DragError {
    #[error("failed to update task {id}")]
    Store {
        id: TaskId,
        #[source]
        source: anyhow::Error,
    },
}
