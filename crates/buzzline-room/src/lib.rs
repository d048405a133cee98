//! Room engine for Buzzline.
//!
//! Each room is an isolated Tokio task (an actor) that owns its
//! authoritative game state. Serializing every mutation through the
//! actor's mailbox is what makes buzz arbitration race-free: the first
//! `buzz_init` the actor processes wins, all later ones hit the state
//! guard and become no-ops.
//!
//! Layering inside the crate:
//!
//! - [`RoomCore`] — the pure state machine: transitions, scoring,
//!   moderation. Every operation takes `now` as a parameter, so the
//!   whole machine is deterministic under test.
//! - [`RoomActor`](actor) / [`RoomHandle`] — the concurrency shell that
//!   owns a `RoomCore`, pumps its mailbox, writes through to the
//!   [`Store`](buzzline_store::Store), and fans out broadcasts.
//! - [`RoomManager`] — the registry of running rooms, keyed by label.

mod actor;
mod buzz;
mod config;
mod core;
mod error;
mod manager;
#[cfg(test)]
mod testutil;

pub use actor::{
    spawn_room, ClientSender, RoomCommand, RoomHandle, RoomStatus,
};
pub use config::RoomConfig;
pub use core::{Audience, Effects, RoomCore};
pub use error::RoomError;
pub use manager::RoomManager;
