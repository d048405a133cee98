//! Identity resolution for inbound client events.

use buzzline_protocol::{ClientEvent, RequestType, UserId};
use buzzline_store::{Store, User};
use buzzline_text::{generate_id, generate_name};

use crate::SessionError;

/// What to do with a decoded client event.
#[derive(Debug)]
pub enum Resolution {
    /// Hand the event to the room actor.
    Forward {
        /// The resolved (or freshly minted) identity behind the event.
        user: User,
        request: RequestType,
        content: String,
        /// Fresh credentials to return to the caller before anything
        /// else, when an identity was minted during resolution.
        issued: Option<User>,
        /// The identity was minted mid-request, so a `join` must be
        /// performed before the original request.
        implicit_join: bool,
    },
    /// Drop the event silently: malformed, or an unrecognized request
    /// type. Resilience over diagnostics — the client never hears about
    /// it.
    Discard,
}

/// Resolves client events against the user store.
///
/// One coordinator serves every connection; it is stateless apart from
/// the store handle.
#[derive(Clone)]
pub struct SessionCoordinator<S: Store> {
    store: S,
}

impl<S: Store> SessionCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Applies the identity rules to one event.
    ///
    /// - `new_user` mints credentials and turns into a `join`.
    /// - Events missing `request_type` or `user_id` are discarded.
    /// - An unknown `user_id` self-heals: a new identity is minted and
    ///   the original request proceeds under it (after an implicit
    ///   join), so a client with stale credentials recovers without
    ///   ever seeing an error.
    pub async fn resolve(
        &self,
        event: ClientEvent,
    ) -> Result<Resolution, SessionError> {
        let content = event.content_or_empty().to_string();

        let Some(request) = event.request_type else {
            return Ok(Resolution::Discard);
        };
        if request == RequestType::Unknown {
            tracing::debug!("discarding unrecognized request type");
            return Ok(Resolution::Discard);
        }

        if request == RequestType::NewUser {
            let user = self.mint_user().await?;
            return Ok(Resolution::Forward {
                user: user.clone(),
                request: RequestType::Join,
                content,
                issued: Some(user),
                implicit_join: false,
            });
        }

        let Some(user_id) = event.user_id else {
            return Ok(Resolution::Discard);
        };

        if let Some(user) = self.store.user(&user_id).await? {
            return Ok(Resolution::Forward {
                user,
                request,
                content,
                issued: None,
                implicit_join: false,
            });
        }

        // Stale or unknown identity: mint a replacement and carry on
        // with the original request under it.
        let user = self.mint_user().await?;
        tracing::info!(
            stale = %user_id,
            reissued = %user.user_id,
            "unknown user id, identity reissued"
        );
        Ok(Resolution::Forward {
            user: user.clone(),
            request,
            content,
            issued: Some(user),
            implicit_join: request != RequestType::Join,
        })
    }

    async fn mint_user(&self) -> Result<User, SessionError> {
        let user = User {
            user_id: UserId(generate_id()),
            name: generate_name(),
        };
        self.store.create_user(user.clone()).await?;
        tracing::info!(user_id = %user.user_id, name = %user.name, "user created");
        Ok(user)
    }
}

// =========================================================================
// Tests
// =========================================================================
