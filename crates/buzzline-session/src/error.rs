//! Session error types.

use thiserror::Error;

/// Errors from resolving a client event.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] buzzline_store::StoreError),
}
