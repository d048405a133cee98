//! Unified error type for the server crate.

use thiserror::Error;

/// Any error the Buzzline server can surface.
#[derive(Debug, Error)]
pub enum BuzzlineError {
    #[error(transparent)]
    Transport(#[from] buzzline_transport::TransportError),

    #[error(transparent)]
    Protocol(#[from] buzzline_protocol::ProtocolError),

    #[error(transparent)]
    Room(#[from] buzzline_room::RoomError),

    #[error(transparent)]
    Session(#[from] buzzline_session::SessionError),

    #[error(transparent)]
    Store(#[from] buzzline_store::StoreError),
}
