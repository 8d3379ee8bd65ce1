//! Verify Use Case - the auth gate's per-request state machine
//!
//! Unauthenticated → Verifying → Authenticated, with at most one detour
//! through RefreshPending. A request is never handed downstream while
//! verification is in flight: the caller gets either `Authenticated` with
//! a freshly resolved profile or a terminal `Denied`.
//!
//! Session destruction happens here (the gate) and nowhere else; the
//! refresh coordinator only rotates tokens.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::refresh::RefreshUseCase;
use crate::application::token::parse_session_token;
use crate::domain::api::{BackendApi, SessionStore};
use crate::domain::entity::profile::UserProfile;
use crate::domain::entity::session::Session;
use crate::error::{AuthError, AuthResult};

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session cookie, unverifiable token, or no matching record
    NoSession,
    /// Session record past its TTL
    SessionExpired,
    /// Refresh exchange failed, or the backend rejected the refreshed
    /// token again (terminal, never retried)
    RefreshFailed,
    /// Backend failed with something other than an authorization denial
    Backend,
}

/// Gate verdict for one request
#[derive(Debug, Clone)]
pub enum Verdict {
    Authenticated {
        session_id: Uuid,
        /// Profile resolved during this request's verification pass
        profile: UserProfile,
        /// New refresh token to set on the response, when a refresh ran
        rotated_refresh: Option<String>,
    },
    Denied(DenyReason),
}

/// Verify use case
pub struct VerifyUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    backend: Arc<B>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<B, S> VerifyUseCase<B, S>
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

    pub async fn execute(
        &self,
        session_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> AuthResult<Verdict> {
        let Some(token) = session_token else {
            return Ok(Verdict::Denied(DenyReason::NoSession));
        };

        let Ok(session_id) = parse_session_token(&self.config.session_secret, token) else {
            return Ok(Verdict::Denied(DenyReason::NoSession));
        };

        let Some(session) = self.sessions.find(session_id).await? else {
            return Ok(Verdict::Denied(DenyReason::NoSession));
        };

        if session.is_expired() {
            self.sessions.destroy(session_id).await?;
            return Ok(Verdict::Denied(DenyReason::SessionExpired));
        }

        // Verifying: resolve the profile with the current access token
        match self.backend.fetch_profile(&session.access_token).await {
            Ok(profile) => {
                self.persist_profile(session, profile.clone()).await?;
                Ok(Verdict::Authenticated {
                    session_id,
                    profile,
                    rotated_refresh: None,
                })
            }
            Err(AuthError::AccessExpired) => {
                self.refresh_and_retry(session_id, refresh_token).await
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Profile verification failed");
                self.sessions.destroy(session_id).await?;
                Ok(Verdict::Denied(DenyReason::Backend))
            }
        }
    }

    /// RefreshPending: exactly one refresh attempt, then one re-verify.
    async fn refresh_and_retry(
        &self,
        session_id: Uuid,
        refresh_token: Option<&str>,
    ) -> AuthResult<Verdict> {
        let coordinator = RefreshUseCase::new(self.backend.clone(), self.sessions.clone());

        let rotated = match coordinator.execute(session_id, refresh_token).await {
            Ok(rotated) => rotated,
            Err(_) => {
                self.sessions.destroy(session_id).await?;
                return Ok(Verdict::Denied(DenyReason::RefreshFailed));
            }
        };

        // Re-enter Verifying once with the rotated access token
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        match self.backend.fetch_profile(&session.access_token).await {
            Ok(profile) => {
                self.persist_profile(session, profile.clone()).await?;
                Ok(Verdict::Authenticated {
                    session_id,
                    profile,
                    rotated_refresh: Some(rotated.refresh_token),
                })
            }
            Err(e) => {
                // A second denial after refresh is terminal, never retried
                tracing::warn!(session_id = %session_id, error = %e, "Re-verification after refresh failed");
                self.sessions.destroy(session_id).await?;
                Ok(Verdict::Denied(DenyReason::RefreshFailed))
            }
        }
    }

    async fn persist_profile(&self, mut session: Session, profile: UserProfile) -> AuthResult<()> {
        session.refresh_profile(profile);
        session.touch();
        self.sessions.update(&session).await
    }
}
