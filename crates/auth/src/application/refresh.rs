//! Refresh Coordinator
//!
//! Exchanges the refresh token for a new access/refresh pair exactly once
//! per failed request. Side effect policy: the coordinator updates the
//! session's access token but never destroys the session itself; terminal
//! handling stays centralized in the gate.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::api::{BackendApi, SessionStore};
use crate::error::{AuthError, AuthResult};

/// Outcome of a successful refresh exchange.
///
/// The new access token is already persisted in the session; the rotated
/// refresh token is returned so the caller can reset its cookie.
#[derive(Debug, Clone)]
pub struct RotatedTokens {
    pub refresh_token: String,
}

/// Refresh coordinator
pub struct RefreshUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    backend: Arc<B>,
    sessions: Arc<S>,
}

impl<B, S> RefreshUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    pub fn new(backend: Arc<B>, sessions: Arc<S>) -> Self {
        Self { backend, sessions }
    }

    /// Attempt one refresh exchange for the given session.
    ///
    /// Absence of the refresh cookie and any backend error both come back
    /// as `RefreshFailed`; the gate decides the terminal action.
    pub async fn execute(
        &self,
        session_id: Uuid,
        refresh_token: Option<&str>,
    ) -> AuthResult<RotatedTokens> {
        let Some(refresh_token) = refresh_token else {
            tracing::debug!(session_id = %session_id, "No refresh token cookie present");
            return Err(AuthError::RefreshFailed);
        };

        let pair = match self.backend.refresh(refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = %e, "Refresh exchange denied");
                return Err(AuthError::RefreshFailed);
            }
        };

        let mut session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        session.rotate_access(pair.access_token);
        session.touch();
        self.sessions.update(&session).await?;

        tracing::info!(session_id = %session_id, "Access token refreshed");

        Ok(RotatedTokens {
            refresh_token: pair.refresh_token,
        })
    }
}
