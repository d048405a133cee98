//! Persistent game entities.
//!
//! These are the records a [`Store`](crate::Store) keeps: users (global
//! identities), players (a user's standing inside one room), the question
//! bank, the per-room message feed, and the room settings themselves.

use std::collections::HashSet;

use buzzline_protocol::{
    Category, Difficulty, GameState, MessageTag, PlayerId, UserId,
};

/// A global identity, shared across every room the user plays in.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

/// One user's standing inside one room.
///
/// A player record is created on first join and survives leaves — scores,
/// stats, and bans persist across sessions in the same room.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: PlayerId,
    pub user_id: UserId,
    pub room: String,
    pub name: String,
    pub score: i64,
    pub correct: u32,
    pub negs: u32,
    /// Set when the player buzzes; cleared for everyone when the next
    /// question starts. A locked-out player cannot buzz again.
    pub locked_out: bool,
    pub last_seen: f64,
    pub banned: bool,
}

impl Player {
    /// A fresh zero-score player for `user` in `room`.
    pub fn new(
        player_id: PlayerId,
        user: &User,
        room: &str,
        now: f64,
    ) -> Self {
        Self {
            player_id,
            user_id: user.user_id.clone(),
            room: room.to_string(),
            name: user.name.clone(),
            score: 0,
            correct: 0,
            negs: 0,
            locked_out: false,
            last_seen: now,
            banned: false,
        }
    }
}

/// A question in the bank.
///
/// `duration` is how many seconds the question takes to read in full —
/// the room's playing countdown runs for exactly this long.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub question_id: String,
    pub content: String,
    pub answer: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub points: i64,
    pub duration: f64,
}

/// An entry in a room's append-only message feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_id: String,
    pub room: String,
    pub tag: MessageTag,
    pub player_id: Option<PlayerId>,
    pub content: Option<String>,
    pub created_at: f64,
    /// Players who reported this message. A set, so repeat reports from
    /// the same player count once.
    pub reported_by: HashSet<PlayerId>,
}

impl Message {
    pub fn new(
        message_id: String,
        room: &str,
        tag: MessageTag,
        player_id: Option<PlayerId>,
        content: Option<String>,
        created_at: f64,
    ) -> Self {
        Self {
            message_id,
            room: room.to_string(),
            tag,
            player_id,
            content,
            created_at,
            reported_by: HashSet::new(),
        }
    }
}

/// Persisted room settings and clock state.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRecord {
    pub label: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub state: GameState,
    pub start_time: f64,
    pub end_time: f64,
    pub current_question_id: Option<String>,
    pub change_locked: bool,
}

impl RoomRecord {
    /// A fresh idle room with default settings.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            category: Category::Everything,
            difficulty: Difficulty::Easy,
            state: GameState::Idle,
            start_time: 0.0,
            end_time: 0.0,
            current_question_id: None,
            change_locked: false,
        }
    }
}
