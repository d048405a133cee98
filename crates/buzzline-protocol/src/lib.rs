//! Wire protocol for Buzzline.
//!
//! This crate defines the "language" that game clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`RoomSnapshot`], the
//!   closed [`RequestType`] enum, and the shared vocabulary enums
//!   [`GameState`], [`Category`], [`Difficulty`], [`MessageTag`]).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (text frames) and the session
//! coordinator (player context). It doesn't know about connections or rooms —
//! it only knows the shapes that travel on the wire.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Category, ClientEvent, Difficulty, GameState, MessageSnapshot,
    MessageTag, ParseEnumError, PlayerId, PlayerSnapshot, RequestType,
    RoomSnapshot, ServerEvent, UserId,
};
