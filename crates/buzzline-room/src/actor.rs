//! Room actor: an isolated Tokio task that owns one room.
//!
//! All mutations to a room flow through its mailbox, so read-modify-write
//! sequences are serialized per room without locks — which is exactly the
//! guarantee buzz arbitration needs. Cross-room traffic never contends.
//!
//! The actor is also the persistence boundary: after every request it
//! writes the core's dirty set through to the [`Store`]. Store failures
//! are logged and swallowed — the in-memory state stays authoritative and
//! the request still completes.

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use buzzline_protocol::{GameState, RequestType, ServerEvent};
use buzzline_store::{Store, StoreError, User};
use buzzline_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::core::{Audience, Effects, RoomCore};
use crate::{RoomConfig, RoomError};

/// Channel sender for delivering outbound events to one connection.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// Seconds since the Unix epoch, as the float timestamps the game uses.
fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Commands sent to a room actor through its mailbox.
pub enum RoomCommand {
    /// Add a connection to the room's broadcast group.
    Attach {
        conn: ConnectionId,
        sender: ClientSender,
    },

    /// Remove a connection from the broadcast group. Player state is
    /// untouched — a player can ghost and reconnect later.
    Detach { conn: ConnectionId },

    /// A resolved client request.
    Request {
        conn: ConnectionId,
        user: User,
        request: RequestType,
        content: String,
    },

    /// Ask for room metadata.
    Status { reply: oneshot::Sender<RoomStatus> },

    /// Stop the actor.
    Shutdown,
}

/// Room metadata, for listings and health checks.
#[derive(Debug, Clone)]
pub struct RoomStatus {
    pub label: String,
    pub state: GameState,
    pub connections: usize,
    pub players: usize,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    label: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Adds a connection to the broadcast group.
    pub async fn attach(
        &self,
        conn: ConnectionId,
        sender: ClientSender,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Attach { conn, sender }).await
    }

    /// Removes a connection from the broadcast group.
    pub async fn detach(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Detach { conn }).await
    }

    /// Forwards a resolved client request (fire-and-forget).
    pub async fn request(
        &self,
        conn: ConnectionId,
        user: User,
        request: RequestType,
        content: String,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Request { conn, user, request, content })
            .await
    }

    /// Requests current room metadata.
    pub async fn status(&self) -> Result<RoomStatus, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Status { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.label.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.label.clone()))
    }
}

/// The actor state. Runs inside a Tokio task.
struct RoomActor<S: Store> {
    core: RoomCore,
    store: S,
    connections: HashMap<ConnectionId, ClientSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<S: Store> RoomActor<S> {
    async fn run(mut self) {
        tracing::info!(room = %self.core.label(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Attach { conn, sender } => {
                    self.connections.insert(conn, sender);
                    tracing::debug!(
                        room = %self.core.label(),
                        %conn,
                        connections = self.connections.len(),
                        "connection attached"
                    );
                }
                RoomCommand::Detach { conn } => {
                    self.connections.remove(&conn);
                    tracing::debug!(
                        room = %self.core.label(),
                        %conn,
                        connections = self.connections.len(),
                        "connection detached"
                    );
                }
                RoomCommand::Request { conn, user, request, content } => {
                    self.handle_request(conn, user, request, content).await;
                }
                RoomCommand::Status { reply } => {
                    let _ = reply.send(self.status());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(
                        room = %self.core.label(),
                        "room shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!(room = %self.core.label(), "room actor stopped");
    }

    async fn handle_request(
        &mut self,
        conn: ConnectionId,
        user: User,
        request: RequestType,
        content: String,
    ) {
        let now = unix_now();

        // Join admits (find-or-create); everything else requires an
        // existing player — no implicit membership.
        let player_id = match request {
            RequestType::Join => self.core.admit(&user, now),
            _ => match self.core.resolve(&user.user_id) {
                Some(id) => id,
                None => return,
            },
        };

        // The ban check comes after join handling: a banned player's
        // join still lands and broadcasts, and the kick fires on their
        // next request (the first ping, in practice).
        if request != RequestType::Join && self.core.is_banned(&player_id) {
            // Banned: a personal kick notice, then out of the broadcast
            // group. The request itself is never processed.
            if let Some(sender) = self.connections.get(&conn) {
                let _ = sender.send(ServerEvent::Kick);
            }
            self.connections.remove(&conn);
            tracing::info!(
                room = %self.core.label(),
                %player_id,
                "kicked banned player"
            );
            self.persist().await;
            return;
        }

        let effects = self.dispatch(player_id, request, &content, now).await;
        self.persist().await;
        self.deliver(conn, effects);
    }

    async fn dispatch(
        &mut self,
        player_id: buzzline_protocol::PlayerId,
        request: RequestType,
        content: &str,
        now: f64,
    ) -> Effects {
        match request {
            RequestType::Join => self.core.join(player_id, now),
            RequestType::Ping => self.core.ping(player_id, now),
            RequestType::Leave => self.core.leave(player_id, now),
            RequestType::GetAnswer => {
                let bank = match self.store.all_questions().await {
                    Ok(questions) => questions,
                    Err(error) => {
                        tracing::warn!(
                            room = %self.core.label(),
                            %error,
                            "question bank lookup failed"
                        );
                        Vec::new()
                    }
                };
                self.core.get_answer(&bank, now)
            }
            RequestType::SetName => {
                self.core.set_name(player_id, content, now)
            }
            RequestType::Next => {
                let (category, difficulty) = self.core.question_filter();
                let candidates = match self
                    .store
                    .questions_matching(category, difficulty)
                    .await
                {
                    Ok(questions) => questions,
                    Err(error) => {
                        tracing::warn!(
                            room = %self.core.label(),
                            %error,
                            "question lookup failed"
                        );
                        Vec::new()
                    }
                };
                self.core.next(&candidates, now)
            }
            RequestType::BuzzInit => self.core.buzz_init(player_id, now),
            RequestType::BuzzAnswer => {
                self.core.buzz_answer(player_id, content, now)
            }
            RequestType::SetCategory => {
                self.core.set_category(player_id, content, now)
            }
            RequestType::SetDifficulty => {
                self.core.set_difficulty(player_id, content, now)
            }
            RequestType::ResetScore => {
                self.core.reset_score(player_id, now)
            }
            RequestType::Chat => self.core.chat(player_id, content, now),
            RequestType::ReportMessage => {
                self.core.report_message(player_id, content.trim())
            }
            // new_user is resolved by the session layer before it
            // reaches a room; unknown types are ignored.
            RequestType::NewUser | RequestType::Unknown => Vec::new(),
        }
    }

    /// Writes the core's dirty set through to the store. Failures are
    /// logged; the in-memory state remains authoritative.
    async fn persist(&mut self) {
        let dirty = self.core.take_dirty();

        if dirty.room {
            if let Err(error) =
                self.store.save_room(self.core.persistable()).await
            {
                tracing::warn!(
                    room = %self.core.label(),
                    %error,
                    "room write-through failed"
                );
            }
        }

        let mut seen = HashSet::new();
        for player_id in dirty.players {
            if !seen.insert(player_id.clone()) {
                continue;
            }
            let Some(player) = self.core.player(&player_id) else {
                continue;
            };
            if let Err(error) =
                self.store.save_player(player.clone()).await
            {
                tracing::warn!(
                    room = %self.core.label(),
                    %player_id,
                    %error,
                    "player write-through failed"
                );
            }
        }

        if let Some(user) = dirty.user {
            if let Err(error) = self.store.update_user(user).await {
                tracing::warn!(
                    room = %self.core.label(),
                    %error,
                    "user write-through failed"
                );
            }
        }

        for message in dirty.appended {
            if let Err(error) = self.store.append_message(message).await {
                tracing::warn!(
                    room = %self.core.label(),
                    %error,
                    "message append failed"
                );
            }
        }

        if let Some(message) = dirty.updated_message {
            if let Err(error) = self.store.update_message(message).await {
                tracing::warn!(
                    room = %self.core.label(),
                    %error,
                    "message update failed"
                );
            }
        }
    }

    /// Fans effects out to their audiences. Connections whose channel
    /// has closed are pruned on the spot.
    fn deliver(&mut self, caller: ConnectionId, effects: Effects) {
        for (audience, event) in effects {
            match audience {
                Audience::Caller => {
                    if let Some(sender) = self.connections.get(&caller) {
                        let _ = sender.send(event);
                    }
                }
                Audience::Everyone => {
                    self.connections
                        .retain(|_, sender| sender.send(event.clone()).is_ok());
                }
            }
        }
    }

    fn status(&self) -> RoomStatus {
        RoomStatus {
            label: self.core.label().to_string(),
            state: self.core.state(),
            connections: self.connections.len(),
            players: self.core.player_count(),
        }
    }
}

/// Spawns a room actor and returns a handle to it.
///
/// The actor rehydrates from the store before processing its first
/// command; if nothing is persisted under `label` (or loading fails) it
/// starts fresh.
pub fn spawn_room<S: Store>(
    label: &str,
    config: RoomConfig,
    store: S,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.mailbox_size);
    let label = label.to_string();
    let handle = RoomHandle { label: label.clone(), sender: tx };

    tokio::spawn(async move {
        let core = match load_core(&label, &config, &store).await {
            Ok(Some(core)) => {
                tracing::info!(room = %label, "room rehydrated from store");
                core
            }
            Ok(None) => RoomCore::new(&label, config),
            Err(error) => {
                tracing::warn!(
                    room = %label,
                    %error,
                    "room load failed, starting fresh"
                );
                RoomCore::new(&label, config)
            }
        };
        let actor = RoomActor {
            core,
            store,
            connections: HashMap::new(),
            receiver: rx,
        };
        actor.run().await;
    });

    handle
}

async fn load_core<S: Store>(
    label: &str,
    config: &RoomConfig,
    store: &S,
) -> Result<Option<RoomCore>, StoreError> {
    let Some(record) = store.room(label).await? else {
        return Ok(None);
    };
    let players = store.players_in_room(label).await?;
    let messages = store.messages_in_room(label).await?;
    let question = match &record.current_question_id {
        Some(id) => store.question(id).await?,
        None => None,
    };
    Ok(Some(RoomCore::hydrate(
        record,
        players,
        messages,
        question,
        config.clone(),
    )))
}
