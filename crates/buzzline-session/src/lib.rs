//! Session layer for Buzzline.
//!
//! The [`SessionCoordinator`] sits between raw decoded client events and
//! the room actors: it enforces the identity rules (credential minting,
//! self-healing of stale ids, required-field checks) and decides whether
//! an event is forwarded to a room or silently discarded.

mod coordinator;
mod error;

pub use coordinator::{Resolution, SessionCoordinator};
pub use error::SessionError;
