//! Transport error types.

use thiserror::Error;

/// Errors from listening for, or talking over, a connection.
///
/// Frame-level errors keep the underlying WebSocket error as their
/// source, so logs show the real cause (handshake rejection, protocol
/// violation, reset) rather than a generic I/O wrapper.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding the listener or accepting a TCP connection failed.
    #[error("listener error: {0}")]
    Listener(#[source] std::io::Error),

    /// The HTTP upgrade to a WebSocket was rejected or failed.
    #[cfg(feature = "websocket")]
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),

    /// Sending a frame failed.
    #[cfg(feature = "websocket")]
    #[error("send failed: {0}")]
    Send(#[source] tokio_tungstenite::tungstenite::Error),

    /// Receiving a frame failed.
    #[cfg(feature = "websocket")]
    #[error("receive failed: {0}")]
    Receive(#[source] tokio_tungstenite::tungstenite::Error),
}
