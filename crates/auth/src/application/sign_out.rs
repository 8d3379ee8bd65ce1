//! Sign Out Use Case
//!
//! Best-effort backend revoke, then unconditional session destruction.
//! This use case is infallible on purpose: logout must never fail visibly
//! even when the backend is down.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::parse_session_token;
use crate::domain::api::{BackendApi, SessionStore};

/// Sign out use case
pub struct SignOutUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    backend: Arc<B>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<B, S> SignOutUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    pub fn new(backend: Arc<B>, sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            backend,
            sessions,
            config,
        }
    }

    /// Sign out from the session referenced by the cookie token, if any.
    pub async fn execute(&self, session_token: Option<&str>) {
        let Some(token) = session_token else { return };
        let Ok(session_id) = parse_session_token(&self.config.session_secret, token) else {
            return;
        };

        if let Ok(Some(session)) = self.sessions.find(session_id).await {
            // Revoke errors are ignored; the session dies regardless
            if let Err(e) = self.backend.logout(&session.access_token).await {
                tracing::debug!(error = %e, "Backend revoke failed during logout");
            }
        }

        if let Err(e) = self.sessions.destroy(session_id).await {
            tracing::warn!(error = %e, session_id = %session_id, "Failed to destroy session");
        } else {
            tracing::info!(session_id = %session_id, "User signed out");
        }
    }
}
