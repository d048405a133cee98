//! Per-connection handler: room routing and the event pump.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Parse the room label from the request path (`/game/{label}`)
//!   2. Attach the connection to that room's broadcast group
//!   3. Loop: decode inbound events → resolve identity → forward to the
//!      room actor; a writer task pumps the room's outbound events back
//!      down the socket.

use std::sync::Arc;
use std::time::Duration;

use buzzline_protocol::{ClientEvent, Codec, RequestType, ServerEvent};
use buzzline_room::RoomHandle;
use buzzline_session::Resolution;
use buzzline_store::Store;
use buzzline_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::BuzzlineError;

/// A connection with no inbound traffic for this long is dropped.
/// Clients ping every second, so this is generous.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Drop guard that detaches the connection from its room when the
/// handler exits, even on panic. `Drop` is synchronous, so the async
/// detach runs as a fire-and-forget task.
struct DetachGuard {
    conn: ConnectionId,
    room: RoomHandle,
}

impl Drop for DetachGuard {
    fn drop(&mut self) {
        let conn = self.conn;
        let room = self.room.clone();
        tokio::spawn(async move {
            let _ = room.detach(conn).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<S, C>>,
) -> Result<(), BuzzlineError>
where
    S: Store,
    C: Codec + Clone,
{
    let conn_id = conn.id();

    let Some(label) = room_label_from_path(conn.path()) else {
        tracing::debug!(%conn_id, path = conn.path(), "malformed path, closing");
        let _ = conn.close().await;
        return Ok(());
    };
    let Some(room) = state.rooms.room(&label) else {
        tracing::info!(%conn_id, room = %label, "unknown room, closing");
        let _ = conn.close().await;
        return Ok(());
    };

    tracing::debug!(%conn_id, room = %label, "connection routed");

    // Outbound: the room delivers events into this channel; the writer
    // task encodes and sends them. The connection clone shares the
    // underlying socket with the reader below.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    room.attach(conn_id, tx).await?;
    let _guard = DetachGuard { conn: conn_id, room: room.clone() };

    let writer_conn = conn.clone();
    let writer_codec = state.codec.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match writer_codec.encode(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if writer_conn.send(&text).await.is_err() {
                break;
            }
        }
    });

    // Inbound loop.
    loop {
        let text =
            match tokio::time::timeout(IDLE_TIMEOUT, conn.recv()).await {
                Ok(Ok(Some(text))) => text,
                Ok(Ok(None)) => {
                    tracing::debug!(%conn_id, "connection closed cleanly");
                    break;
                }
                Ok(Err(e)) => {
                    tracing::debug!(%conn_id, error = %e, "recv error");
                    break;
                }
                Err(_) => {
                    tracing::debug!(%conn_id, "connection idle, dropping");
                    break;
                }
            };

        // Undecodable frames are dropped without a reply.
        let event: ClientEvent = match state.codec.decode(&text) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode event");
                continue;
            }
        };

        match state.sessions.resolve(event).await {
            Ok(Resolution::Forward {
                user,
                request,
                content,
                issued,
                implicit_join,
            }) => {
                if let Some(credentials) = issued {
                    // Fresh credentials go straight down this socket,
                    // before any room traffic referencing them.
                    let event = ServerEvent::NewUser {
                        user_id: credentials.user_id,
                        user_name: credentials.name,
                    };
                    if let Ok(text) = state.codec.encode(&event) {
                        if conn.send(&text).await.is_err() {
                            break;
                        }
                    }
                }
                if implicit_join {
                    room.request(
                        conn_id,
                        user.clone(),
                        RequestType::Join,
                        String::new(),
                    )
                    .await?;
                }
                room.request(conn_id, user, request, content).await?;
            }
            Ok(Resolution::Discard) => continue,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "session resolution failed");
                continue;
            }
        }
    }

    writer.abort();
    // _guard drops here → room detach fires.
    Ok(())
}

/// Extracts the room label from a request path.
///
/// Accepts `/game/{label}` and the bare `/{label}` form; query strings
/// are ignored. Anything else is refused.
pub(crate) fn room_label_from_path(path: &str) -> Option<String> {
    let path = path.split('?').next().unwrap_or(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let first = segments.next()?;
    let label = match segments.next() {
        Some(second) if first == "game" => second,
        None => first,
        Some(_) => return None,
    };
    if segments.next().is_some() {
        return None;
    }
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_label_from_game_path() {
        assert_eq!(room_label_from_path("/game/lobby").as_deref(), Some("lobby"));
    }

    #[test]
    fn test_room_label_from_bare_path() {
        assert_eq!(room_label_from_path("/lobby").as_deref(), Some("lobby"));
    }

    #[test]
    fn test_room_label_ignores_query_string() {
        assert_eq!(
            room_label_from_path("/game/lobby?token=abc").as_deref(),
            Some("lobby")
        );
    }

    #[test]
    fn test_room_label_tolerates_trailing_slash() {
        assert_eq!(room_label_from_path("/game/lobby/").as_deref(), Some("lobby"));
    }

    #[test]
    fn test_room_label_rejects_bad_paths() {
        assert_eq!(room_label_from_path("/"), None);
        assert_eq!(room_label_from_path(""), None);
        assert_eq!(room_label_from_path("/api/v1/lobby"), None);
        assert_eq!(room_label_from_path("/game/lobby/extra"), None);
    }
}
