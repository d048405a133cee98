//! # Buzzline
//!
//! A real-time trivia game server. Players join named rooms over
//! WebSockets, questions are "read" on a server-tracked countdown, and
//! players race to buzz in — the first buzz wins an exclusive,
//! grace-limited window to answer.
//!
//! The crate ties the layers together:
//!
//! - [`buzzline_transport`] — WebSocket listener and connections.
//! - [`buzzline_protocol`] — the JSON wire vocabulary.
//! - [`buzzline_session`] — identity resolution and credential minting.
//! - [`buzzline_room`] — the per-room actors that own game state.
//! - [`buzzline_store`] — persistence behind the [`Store`](buzzline_store::Store) trait.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use buzzline::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BuzzlineError> {
//!     let store = MemoryStore::new();
//!     let server = BuzzlineServerBuilder::new()
//!         .bind("0.0.0.0:8080")
//!         .room("lobby")
//!         .build(store)
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::BuzzlineError;
pub use server::{BuzzlineServer, BuzzlineServerBuilder};

pub mod prelude {
    pub use crate::{BuzzlineError, BuzzlineServer, BuzzlineServerBuilder};
    pub use buzzline_protocol::{
        Category, ClientEvent, Difficulty, GameState, RequestType,
        ServerEvent,
    };
    pub use buzzline_room::{RoomConfig, RoomHandle, RoomManager};
    pub use buzzline_store::{
        MemoryStore, Message, Player, Question, RoomRecord, Store, User,
    };
}
