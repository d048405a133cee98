//! Transport abstraction layer for Buzzline.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over the
//! network protocol carrying game traffic. The game protocol is text JSON, so
//! connections deal in UTF-8 strings rather than raw byte frames.
//!
//! A connection also remembers the HTTP request path it was opened with
//! (`ws://host/game/{label}`), which the server uses to route the socket to
//! the named room.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Identifies one accepted connection for the lifetime of the process.
///
/// Ids are minted from a process-wide counter and never reused, which
/// makes them safe keys for a room's broadcast group: a stale id can
/// never collide with a newly accepted socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send and receive text messages.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends a text message to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next text message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;

    /// Returns the HTTP request path the connection was opened with.
    fn path(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_display_names_the_counter() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_keys_a_broadcast_group() {
        // The room actor keeps its broadcast group in a HashMap keyed by
        // ConnectionId; distinct ids must address distinct entries.
        use std::collections::HashMap;
        let mut group = HashMap::new();
        group.insert(ConnectionId::new(1), "alice-tx");
        group.insert(ConnectionId::new(2), "bob-tx");
        group.remove(&ConnectionId::new(1));
        assert_eq!(group.get(&ConnectionId::new(2)), Some(&"bob-tx"));
        assert!(!group.contains_key(&ConnectionId::new(1)));
    }
}
