//! The room state machine.
//!
//! `RoomCore` owns one room's authoritative state and implements every
//! game action as a synchronous method taking the current time as a
//! parameter. Nothing here does I/O or reads the clock, which is what
//! keeps the whole machine deterministic under test; the actor shell
//! supplies `now`, persists the dirty set, and delivers the effects.
//!
//! Time handling is deliberately poll-driven: there are no timers. The
//! `playing → idle` transition happens lazily, on the next inbound
//! event that calls [`RoomCore::refresh`] (ping, next, get_answer). A
//! room whose countdown has expired keeps reporting `playing` until a
//! client pokes it — responsiveness is bounded by client ping cadence.

use std::collections::HashMap;

use buzzline_protocol::{
    Category, Difficulty, GameState, MessageSnapshot, MessageTag, PlayerId,
    PlayerSnapshot, RoomSnapshot, ServerEvent, UserId,
};
use buzzline_store::{Message, Player, Question, RoomRecord, User};
use buzzline_text::{clean_content, generate_id};
use rand::Rng;

use crate::RoomConfig;

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Who should receive an outbound event produced by a room action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every connection attached to the room.
    Everyone,
    /// Only the connection whose request produced the event.
    Caller,
}

/// Outbound events produced by one room action, in delivery order.
pub type Effects = Vec<(Audience, ServerEvent)>;

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// The countdown phase, exclusive of contests.
///
/// The public [`GameState`] is derived: a room is in `contest` exactly
/// while a buzz is held, so the contest state is represented by
/// `buzz.is_some()` rather than a third phase value that could drift
/// out of sync with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing,
}

/// An in-flight buzz: who holds it and when they claimed it.
#[derive(Debug, Clone)]
struct BuzzState {
    player_id: PlayerId,
    started_at: f64,
}

/// State changed by the last action, to be written through to the store.
#[derive(Debug, Default)]
pub(crate) struct Dirty {
    pub room: bool,
    pub players: Vec<PlayerId>,
    pub user: Option<User>,
    pub appended: Vec<Message>,
    pub updated_message: Option<Message>,
}

/// One room's authoritative state.
pub struct RoomCore {
    label: String,
    config: RoomConfig,
    phase: Phase,
    category: Category,
    difficulty: Difficulty,
    start_time: f64,
    end_time: f64,
    current_question: Option<Question>,
    buzz: Option<BuzzState>,
    change_locked: bool,
    /// Every player who has ever joined, including banned and departed
    /// ones. The moderation ratio counts against this full set.
    players: HashMap<PlayerId, Player>,
    by_user: HashMap<UserId, PlayerId>,
    feed: Vec<Message>,
    dirty: Dirty,
}

impl RoomCore {
    /// A fresh idle room.
    pub fn new(label: &str, config: RoomConfig) -> Self {
        Self {
            label: label.to_string(),
            config,
            phase: Phase::Idle,
            category: Category::Everything,
            difficulty: Difficulty::Easy,
            start_time: 0.0,
            end_time: 0.0,
            current_question: None,
            buzz: None,
            change_locked: false,
            players: HashMap::new(),
            by_user: HashMap::new(),
            feed: Vec::new(),
            dirty: Dirty::default(),
        }
    }

    /// Rebuilds a room from persisted state.
    ///
    /// Buzz arbitration is in-memory only, so a room persisted mid-contest
    /// comes back in `playing` with the countdown as stored.
    pub fn hydrate(
        record: RoomRecord,
        players: Vec<Player>,
        messages: Vec<Message>,
        current_question: Option<Question>,
        config: RoomConfig,
    ) -> Self {
        let mut core = Self::new(&record.label, config);
        core.category = record.category;
        core.difficulty = record.difficulty;
        core.phase = match record.state {
            GameState::Idle => Phase::Idle,
            GameState::Playing | GameState::Contest => Phase::Playing,
        };
        core.start_time = record.start_time;
        core.end_time = record.end_time;
        core.current_question = current_question;
        core.change_locked = record.change_locked;
        for player in players {
            core.by_user
                .insert(player.user_id.clone(), player.player_id.clone());
            core.players.insert(player.player_id.clone(), player);
        }
        core.feed = messages;
        core
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The externally visible game state.
    pub fn state(&self) -> GameState {
        if self.buzz.is_some() {
            GameState::Contest
        } else {
            match self.phase {
                Phase::Idle => GameState::Idle,
                Phase::Playing => GameState::Playing,
            }
        }
    }

    /// The question filter for drawing the next question. `None`
    /// category means "Everything" — match any.
    pub fn question_filter(&self) -> (Option<Category>, Difficulty) {
        let category = match self.category {
            Category::Everything => None,
            other => Some(other),
        };
        (category, self.difficulty)
    }

    pub fn resolve(&self, user_id: &UserId) -> Option<PlayerId> {
        self.by_user.get(user_id).cloned()
    }

    pub fn is_banned(&self, player_id: &PlayerId) -> bool {
        self.players
            .get(player_id)
            .is_some_and(|p| p.banned)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub(crate) fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub(crate) fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub(crate) fn persistable(&self) -> RoomRecord {
        RoomRecord {
            label: self.label.clone(),
            category: self.category,
            difficulty: self.difficulty,
            state: self.state(),
            start_time: self.start_time,
            end_time: self.end_time,
            current_question_id: self
                .current_question
                .as_ref()
                .map(|q| q.question_id.clone()),
            change_locked: self.change_locked,
        }
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Opportunistic idle check: once the countdown has expired and no
    /// contest is in flight, the room drops to idle. Called from the
    /// polling actions (ping, next, get_answer) — never from a timer.
    pub fn refresh(&mut self, now: f64) {
        if self.buzz.is_none()
            && self.phase == Phase::Playing
            && now >= self.end_time
        {
            self.phase = Phase::Idle;
            self.dirty.room = true;
            tracing::debug!(room = %self.label, "countdown expired, room idle");
        }
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Finds or creates the player record for `user`, syncing the cached
    /// display name and `last_seen`. Does not announce anything.
    pub fn admit(&mut self, user: &User, now: f64) -> PlayerId {
        if let Some(player_id) = self.by_user.get(&user.user_id).cloned() {
            if let Some(player) = self.players.get_mut(&player_id) {
                player.name = user.name.clone();
                player.last_seen = now;
                self.dirty.players.push(player_id.clone());
            }
            return player_id;
        }

        let player_id = PlayerId(generate_id());
        let player = Player::new(player_id.clone(), user, &self.label, now);
        self.by_user
            .insert(user.user_id.clone(), player_id.clone());
        self.players.insert(player_id.clone(), player);
        self.dirty.players.push(player_id.clone());
        tracing::info!(
            room = %self.label,
            %player_id,
            name = %user.name,
            "player created"
        );
        player_id
    }

    /// Announces a (re)join: feed message plus a fresh snapshot for
    /// everyone.
    pub fn join(&mut self, player_id: PlayerId, now: f64) -> Effects {
        self.push_message(MessageTag::Join, Some(player_id), None, now);
        vec![self.update_everyone(now)]
    }

    /// Announces a departure. The player record persists — scores and
    /// bans survive leaving.
    pub fn leave(&mut self, player_id: PlayerId, now: f64) -> Effects {
        self.push_message(MessageTag::Leave, Some(player_id), None, now);
        vec![self.update_everyone(now)]
    }

    /// Keep-alive: runs the idle check, touches `last_seen`, and answers
    /// the caller with a snapshot plus their personal lockout flag.
    pub fn ping(&mut self, player_id: PlayerId, now: f64) -> Effects {
        self.refresh(now);
        let mut locked_out = false;
        if let Some(player) = self.players.get_mut(&player_id) {
            player.last_seen = now;
            locked_out = player.locked_out;
            self.dirty.players.push(player_id);
        }
        vec![
            (Audience::Caller, ServerEvent::Update(self.snapshot(now))),
            (Audience::Caller, ServerEvent::LockOut { locked_out }),
        ]
    }

    // -----------------------------------------------------------------------
    // Questions
    // -----------------------------------------------------------------------

    /// Starts reading the next question.
    ///
    /// No-op unless the room is idle (after the lazy idle check) and at
    /// least one candidate matches. Picks uniformly at random, resets
    /// the countdown, and unlocks every player.
    pub fn next(&mut self, candidates: &[Question], now: f64) -> Effects {
        self.refresh(now);
        if self.state() != GameState::Idle || candidates.is_empty() {
            return Vec::new();
        }

        let pick = rand::rng().random_range(0..candidates.len());
        let question = candidates[pick].clone();

        self.start_time = now;
        self.end_time = now + question.duration;
        self.phase = Phase::Playing;
        tracing::info!(
            room = %self.label,
            question = %question.question_id,
            "question started"
        );
        self.current_question = Some(question);

        for (player_id, player) in &mut self.players {
            if player.locked_out {
                player.locked_out = false;
                self.dirty.players.push(player_id.clone());
            }
        }
        self.dirty.room = true;

        vec![self.update_everyone(now)]
    }

    /// Reveals the current question's answer to the whole room, but only
    /// once the room is idle — never mid-question.
    ///
    /// A room that has never played a question adopts a random one from
    /// `fallback` so there is always something to reveal; with an empty
    /// bank the call is a no-op.
    pub fn get_answer(&mut self, fallback: &[Question], now: f64) -> Effects {
        self.refresh(now);
        if self.state() != GameState::Idle {
            return Vec::new();
        }
        if self.current_question.is_none() && !fallback.is_empty() {
            let pick = rand::rng().random_range(0..fallback.len());
            self.current_question = Some(fallback[pick].clone());
            self.dirty.room = true;
        }
        let Some(question) = &self.current_question else {
            return Vec::new();
        };
        vec![(
            Audience::Everyone,
            ServerEvent::SendAnswer { answer: question.answer.clone() },
        )]
    }

    // -----------------------------------------------------------------------
    // Settings & moderation
    // -----------------------------------------------------------------------

    /// Renames a player. Invalid names (empty after cleaning, or over
    /// the length cap) are rejected silently.
    pub fn set_name(
        &mut self,
        player_id: PlayerId,
        raw: &str,
        now: f64,
    ) -> Effects {
        let name = clean_content(raw);
        if name.is_empty() || name.chars().count() > self.config.name_max_chars
        {
            return Vec::new();
        }
        let Some(player) = self.players.get_mut(&player_id) else {
            return Vec::new();
        };
        player.name = name.clone();
        // Sync the global identity so other rooms pick up the new name.
        self.dirty.user = Some(User {
            user_id: player.user_id.clone(),
            name,
        });
        self.dirty.players.push(player_id);
        vec![self.update_everyone(now)]
    }

    /// Changes the room's category filter. No-op while `change_locked`
    /// or when the value isn't a known category.
    pub fn set_category(
        &mut self,
        player_id: PlayerId,
        raw: &str,
        now: f64,
    ) -> Effects {
        if self.change_locked {
            return Vec::new();
        }
        let Ok(category) = clean_content(raw).parse::<Category>() else {
            return Vec::new();
        };
        self.category = category;
        self.dirty.room = true;
        self.push_message(
            MessageTag::SetCategory,
            Some(player_id),
            Some(category.to_string()),
            now,
        );
        vec![self.update_everyone(now)]
    }

    /// Changes the room's difficulty filter. Same guards as
    /// [`set_category`](Self::set_category).
    pub fn set_difficulty(
        &mut self,
        player_id: PlayerId,
        raw: &str,
        now: f64,
    ) -> Effects {
        if self.change_locked {
            return Vec::new();
        }
        let Ok(difficulty) = clean_content(raw).parse::<Difficulty>() else {
            return Vec::new();
        };
        self.difficulty = difficulty;
        self.dirty.room = true;
        self.push_message(
            MessageTag::SetDifficulty,
            Some(player_id),
            Some(difficulty.to_string()),
            now,
        );
        vec![self.update_everyone(now)]
    }

    /// Zeroes the caller's score.
    pub fn reset_score(&mut self, player_id: PlayerId, now: f64) -> Effects {
        let Some(player) = self.players.get_mut(&player_id) else {
            return Vec::new();
        };
        player.score = 0;
        self.dirty.players.push(player_id.clone());
        self.push_message(MessageTag::ResetScore, Some(player_id), None, now);
        vec![self.update_everyone(now)]
    }

    /// Appends a chat message. Empty content after cleaning is dropped.
    pub fn chat(&mut self, player_id: PlayerId, raw: &str, now: f64) -> Effects {
        let content = clean_content(raw);
        if content.is_empty() {
            return Vec::new();
        }
        self.push_message(MessageTag::Chat, Some(player_id), Some(content), now);
        vec![self.update_everyone(now)]
    }

    /// Records a report against a feed message.
    ///
    /// Only chat and answered-buzz messages are reportable. Once more
    /// than `ban_ratio` of the room's players (everyone who has ever
    /// joined) have reported the message, its author is banned. There is
    /// no un-ban path. Reports never broadcast.
    pub fn report_message(
        &mut self,
        reporter: PlayerId,
        message_id: &str,
    ) -> Effects {
        if !self.players.contains_key(&reporter) {
            return Vec::new();
        }
        let Some(idx) =
            self.feed.iter().position(|m| m.message_id == message_id)
        else {
            return Vec::new();
        };
        if !self.feed[idx].tag.reportable() {
            return Vec::new();
        }

        self.feed[idx].reported_by.insert(reporter);

        let reports = self.feed[idx].reported_by.len();
        let total = self.players.len();
        if total > 0
            && reports as f64 / total as f64 > self.config.ban_ratio
        {
            if let Some(author_id) = self.feed[idx].player_id.clone() {
                if let Some(author) = self.players.get_mut(&author_id) {
                    if !author.banned {
                        author.banned = true;
                        tracing::info!(
                            room = %self.label,
                            player_id = %author_id,
                            reports,
                            total,
                            "player banned by report ratio"
                        );
                    }
                    self.dirty.players.push(author_id);
                }
            }
        }

        self.dirty.updated_message = Some(self.feed[idx].clone());
        Vec::new()
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Projects the room state into the broadcast shape.
    pub fn snapshot(&self, now: f64) -> RoomSnapshot {
        let mut players: Vec<PlayerSnapshot> = self
            .players
            .values()
            .map(|p| PlayerSnapshot {
                player_id: p.player_id.clone(),
                name: p.name.clone(),
                score: p.score,
                correct: p.correct,
                negs: p.negs,
                last_seen: p.last_seen,
            })
            .collect();
        players.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
        });

        let skip = self.feed.len().saturating_sub(self.config.feed_window);
        let messages = self.feed[skip..]
            .iter()
            .map(|m| MessageSnapshot {
                message_id: m.message_id.clone(),
                tag: m.tag,
                player_name: m
                    .player_id
                    .as_ref()
                    .and_then(|id| self.players.get(id))
                    .map(|p| p.name.clone()),
                content: m.content.clone(),
            })
            .collect();

        RoomSnapshot {
            game_state: self.state(),
            current_time: now,
            start_time: self.start_time,
            end_time: self.end_time,
            buzz_start_time: self
                .buzz
                .as_ref()
                .map_or(0.0, |b| b.started_at),
            current_question_content: self
                .current_question
                .as_ref()
                .map(|q| q.content.clone())
                .unwrap_or_default(),
            category: self
                .current_question
                .as_ref()
                .map(|q| q.category.to_string())
                .unwrap_or_default(),
            room_category: self.category,
            messages,
            difficulty: self.difficulty,
            players,
            change_locked: self.change_locked,
        }
    }

    // -----------------------------------------------------------------------
    // Internals (shared with the buzz module)
    // -----------------------------------------------------------------------

    pub(crate) fn push_message(
        &mut self,
        tag: MessageTag,
        player_id: Option<PlayerId>,
        content: Option<String>,
        now: f64,
    ) {
        let message = Message::new(
            generate_id(),
            &self.label,
            tag,
            player_id,
            content,
            now,
        );
        self.dirty.appended.push(message.clone());
        self.feed.push(message);
    }

    pub(crate) fn update_everyone(
        &self,
        now: f64,
    ) -> (Audience, ServerEvent) {
        (Audience::Everyone, ServerEvent::Update(self.snapshot(now)))
    }

    pub(crate) fn buzz_holder(&self) -> Option<(PlayerId, f64)> {
        self.buzz
            .as_ref()
            .map(|b| (b.player_id.clone(), b.started_at))
    }

    pub(crate) fn begin_contest(&mut self, player_id: PlayerId, now: f64) {
        self.buzz = Some(BuzzState { player_id, started_at: now });
    }

    pub(crate) fn end_contest(&mut self) {
        self.buzz = None;
    }

    pub(crate) fn shift_countdown(&mut self, by: f64) {
        self.start_time += by;
        self.end_time += by;
    }

    pub(crate) fn collapse_countdown(&mut self) {
        self.end_time = self.start_time;
    }

    pub(crate) fn end_time(&self) -> f64 {
        self.end_time
    }

    pub(crate) fn start_time(&self) -> f64 {
        self.start_time
    }

    pub(crate) fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub(crate) fn player_mut(
        &mut self,
        player_id: &PlayerId,
    ) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub(crate) fn mark_player(&mut self, player_id: PlayerId) {
        self.dirty.players.push(player_id);
    }

    pub(crate) fn mark_room(&mut self) {
        self.dirty.room = true;
    }
}

// =========================================================================
// Tests
// =========================================================================
