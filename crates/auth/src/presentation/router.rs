//! Auth Router
//!
//! Public auth routes. The protected-route gates live in
//! [`crate::presentation::middleware`] and are layered by the app.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::application::config::AuthConfig;
use crate::domain::api::{BackendApi, SessionStore};
use crate::presentation::handlers::{
    self, AuthAppState,
};
use platform::rate_limit::RateLimitStore;

/// Build the public auth router.
///
/// All routes here are reachable without a session; the auth gate is
/// deliberately not layered on them.
pub fn auth_router<B, S, L>(
    backend: Arc<B>,
    sessions: Arc<S>,
    limiter: Arc<L>,
    config: Arc<AuthConfig>,
) -> Router
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let state = AuthAppState::new(backend, sessions, limiter, config);

    Router::new()
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_submit),
        )
        .route("/logout", get(handlers::logout))
        .route(
            "/forgot-password",
            get(handlers::forgot_page).post(handlers::forgot_submit),
        )
        .route(
            "/reset-password/{token}",
            get(handlers::reset_page).post(handlers::reset_submit),
        )
        .with_state(state)
}
