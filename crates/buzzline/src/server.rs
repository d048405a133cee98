//! `BuzzlineServer` builder and accept loop.
//!
//! The entry point for running a trivia server. It ties the layers
//! together: transport → protocol → session → room.

use std::sync::Arc;

use buzzline_protocol::{Codec, JsonCodec};
use buzzline_room::{RoomConfig, RoomManager};
use buzzline_session::SessionCoordinator;
use buzzline_store::Store;
use buzzline_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::BuzzlineError;

/// Shared server state passed to each connection handler task.
///
/// Rooms are provisioned at build time and the registry is never
/// mutated afterwards, so no lock is needed around it.
pub(crate) struct ServerState<S: Store, C: Codec> {
    pub(crate) rooms: RoomManager,
    pub(crate) sessions: SessionCoordinator<S>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Buzzline server.
///
/// # Example
///
/// ```rust,ignore
/// use buzzline::prelude::*;
///
/// let server = BuzzlineServer::builder()
///     .bind("0.0.0.0:8080")
///     .room("lobby")
///     .build(store)
///     .await?;
/// server.run().await
/// ```
pub struct BuzzlineServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    rooms: Vec<String>,
}

impl BuzzlineServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            rooms: Vec::new(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration shared by every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Provisions a room under `label`. Connections naming a room that
    /// was never provisioned are refused.
    pub fn room(mut self, label: &str) -> Self {
        self.rooms.push(label.to_string());
        self
    }

    /// Builds the server against the given store.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` — the stock wire stack.
    pub async fn build<S: Store>(
        self,
        store: S,
    ) -> Result<BuzzlineServer<S, JsonCodec>, BuzzlineError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let mut rooms = RoomManager::new(self.room_config);
        for label in &self.rooms {
            rooms.create_room(label, store.clone());
        }

        let state = Arc::new(ServerState {
            rooms,
            sessions: SessionCoordinator::new(store),
            codec: JsonCodec,
        });

        Ok(BuzzlineServer { transport, state })
    }
}

impl Default for BuzzlineServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Buzzline server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BuzzlineServer<S: Store, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<S, C>>,
}

impl<S, C> BuzzlineServer<S, C>
where
    S: Store,
    C: Codec + Clone,
{
    /// Creates a new builder.
    pub fn builder() -> BuzzlineServerBuilder {
        BuzzlineServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop: each connection gets its own handler task.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), BuzzlineError> {
        tracing::info!(rooms = self.state.rooms.room_count(), "Buzzline server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
