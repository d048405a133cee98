//! Room error types.

use thiserror::Error;

/// Errors from room operations.
///
/// Per-request game failures (bad state, invalid input) are silent
/// no-ops, not errors — these variants cover infrastructure failures
/// only.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room not found: {0}")]
    NotFound(String),

    #[error("room unavailable: {0}")]
    Unavailable(String),
}
