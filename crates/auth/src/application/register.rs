//! Register Use Case
//!
//! Creates a new account at the backend and signs the user straight in.
//! Mirrors sign-in's session and cookie setup, except the landing page is
//! always the default one and the submitted role is always the lowest
//! tier (enforced in the backend client, not trusted from input).

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::sign_in::SignInOutput;
use crate::application::token::sign_session_token;
use crate::domain::api::{BackendApi, NewAccount, SessionStore};
use crate::domain::entity::session::Session;
use crate::error::AuthResult;

/// Registration input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub bio: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<B, S>
where
    B: BackendApi,
    S: SessionStore,
{
    backend: Arc<B>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<B, S> RegisterUseCase<B, S>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<SignInOutput> {
        let grant = self
            .backend
            .register(&NewAccount {
                first_name: input.first_name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
                password: input.password,
                phone: input.phone,
                date_of_birth: input.date_of_birth,
                bio: input.bio,
            })
            .await?;

        let role = grant.user.role;

        let session = Session::new(
            grant.user,
            grant.access_token,
            self.config.session_ttl_chrono(),
        );
        self.sessions.create(&session).await?;

        let session_token = sign_session_token(&self.config.session_secret, session.session_id);

        tracing::info!(session_id = %session.session_id, "User registered");

        Ok(SignInOutput {
            session_token,
            refresh_token: grant.refresh_token,
            remember_user: None,
            role,
        })
    }
}
