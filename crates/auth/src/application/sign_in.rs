//! Sign In Use Case
//!
//! Exchanges credentials for a profile and token pair at the backend,
//! then creates a server-side session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::sign_session_token;
use crate::domain::api::{BackendApi, Credentials, SessionStore};
use crate::domain::entity::session::Session;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthResult;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

/// Sign in output
pub struct SignInOutput {
    /// Signed token for the session cookie
    pub session_token: String,
    /// Opaque refresh token for its own cookie
    pub refresh_token: String,
    /// User id for the optional long-lived remember cookie
    pub remember_user: Option<String>,
    /// Role, for choosing the landing page
    pub role: UserRole,
}

/// Sign in use case
pub struct SignInUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    backend: Arc<B>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<B, S> SignInUseCase<B, S>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let grant = self
            .backend
            .login(&Credentials {
                email: input.email,
                password: input.password,
                remember: input.remember,
            })
            .await?;

        let role = grant.user.role;
        let remember_user = input.remember.then(|| grant.user.id.clone());

        let session = Session::new(
            grant.user,
            grant.access_token,
            self.config.session_ttl_chrono(),
        );
        self.sessions.create(&session).await?;

        let session_token = sign_session_token(&self.config.session_secret, session.session_id);

        tracing::info!(
            session_id = %session.session_id,
            role = %role,
            remember = input.remember,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            refresh_token: grant.refresh_token,
            remember_user,
            role,
        })
    }
}
