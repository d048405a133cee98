//! Persistence layer for Buzzline.
//!
//! The [`Store`] trait is the seam between the live game and durable
//! state. Room actors hold authoritative state in memory and write
//! through to the store; on boot, a room rehydrates from it. The stock
//! backend is [`MemoryStore`]; a database-backed implementation plugs in
//! by implementing the same trait.

mod entities;
mod error;
mod memory;

pub use entities::{Message, Player, Question, RoomRecord, User};
pub use error::StoreError;
pub use memory::MemoryStore;

use std::future::Future;

use buzzline_protocol::{Category, Difficulty, UserId};

/// Durable storage for users, players, rooms, questions, and messages.
///
/// Writes are upserts unless documented otherwise. Implementations must
/// be cheaply cloneable (an `Arc` around shared state) because every room
/// actor holds its own handle.
pub trait Store: Clone + Send + Sync + 'static {
    /// Looks up a user by id. `Ok(None)` means the id is unknown.
    fn user(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Creates a user. Fails with [`StoreError::Conflict`] if the id is
    /// already taken.
    fn create_user(
        &self,
        user: User,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates an existing user.
    fn update_user(
        &self,
        user: User,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Upserts a player record.
    fn save_player(
        &self,
        player: Player,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All player records for a room, in no particular order.
    fn players_in_room(
        &self,
        label: &str,
    ) -> impl Future<Output = Result<Vec<Player>, StoreError>> + Send;

    /// Upserts a room record.
    fn save_room(
        &self,
        room: RoomRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Looks up a room record by label.
    fn room(
        &self,
        label: &str,
    ) -> impl Future<Output = Result<Option<RoomRecord>, StoreError>> + Send;

    /// Adds a question to the bank.
    fn add_question(
        &self,
        question: Question,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Looks up a question by id.
    fn question(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Question>, StoreError>> + Send;

    /// Questions matching the given filters. A `None` category matches
    /// everything.
    fn questions_matching(
        &self,
        category: Option<Category>,
        difficulty: Difficulty,
    ) -> impl Future<Output = Result<Vec<Question>, StoreError>> + Send;

    /// The entire question bank.
    fn all_questions(
        &self,
    ) -> impl Future<Output = Result<Vec<Question>, StoreError>> + Send;

    /// Appends a message to a room's feed.
    fn append_message(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Rewrites an existing message (used for report tracking).
    fn update_message(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// A room's feed in append order.
    fn messages_in_room(
        &self,
        label: &str,
    ) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send;
}
