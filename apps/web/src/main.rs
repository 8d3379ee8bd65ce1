//! Web Server Entry Point
//!
//! Presentation tier of the coaching platform: serves the auth pages,
//! gates the protected pages and relays notifications over WebSocket.
//! Uses `anyhow` for startup errors; request-level errors go through
//! the auth/kernel error types.

mod pages;
mod ws;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::middleware::{GateState, RoleGate, require_auth, require_role, require_verified_email};
use auth::models::SessionStore;
use auth::{AuthConfig, HttpBackend, MemorySessionStore, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware::from_fn_with_state,
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::rate_limit::{MemoryRateLimiter, RateLimitConfig};
use relay::NotificationHub;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(build_auth_config()?);

    let backend_base_url =
        env::var("BACKEND_BASE_URL").unwrap_or_else(|_| "http://localhost:31113".to_string());
    let backend = Arc::new(HttpBackend::new(&backend_base_url)?);
    tracing::info!(backend = %backend_base_url, "Backend API client ready");

    let sessions = Arc::new(MemorySessionStore::new());
    let limiter = Arc::new(MemoryRateLimiter::new());
    let hub = Arc::new(NotificationHub::new());

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    match sessions.cleanup_expired().await {
        Ok(removed) => {
            tracing::info!(sessions_deleted = removed, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let gate = GateState {
        backend: backend.clone(),
        sessions: sessions.clone(),
        config: config.clone(),
    };

    // Protected pages: the auth gate wraps the whole subtree; role and
    // verification gates are layered per route on top of it
    let protected = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/verify-email", get(pages::verify_email))
        .route(
            "/interviews",
            get(pages::interviews).layer(from_fn_with_state(
                config.clone(),
                require_verified_email,
            )),
        )
        .route(
            "/premium",
            get(pages::premium).layer(from_fn_with_state(
                RoleGate::premium(config.clone()),
                require_role,
            )),
        )
        .route(
            "/admin",
            get(pages::admin).layer(from_fn_with_state(
                RoleGate::admin(config.clone()),
                require_role,
            )),
        )
        .route(
            "/ws/notifications",
            get(ws::notifications).with_state(hub.clone()),
        )
        .layer(from_fn_with_state(
            gate,
            require_auth::<HttpBackend, MemorySessionStore>,
        ))
        .with_state(config.clone());

    // Build router
    let app = Router::new()
        .route("/", get(pages::home).with_state(config.clone()))
        .merge(auth_router(backend, sessions, limiter, config.clone()))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(40922);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Build the auth configuration from the environment.
///
/// Development builds fall back to a random secret and insecure cookies;
/// production requires `SESSION_SECRET` (base64, 32 bytes) and turns
/// Secure cookies on.
fn build_auth_config() -> anyhow::Result<AuthConfig> {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let mut config = if environment == "production" {
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "SESSION_SECRET must decode to 32 bytes, got {}",
            secret_bytes.len()
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig {
            session_secret: secret,
            cookie_secure: true,
            ..AuthConfig::default()
        }
    } else {
        AuthConfig::development()
    };

    let max_attempts = env::var("AUTH_RATE_LIMIT_MAX")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(config.rate_limit.max_attempts);
    let window_secs = env::var("AUTH_RATE_LIMIT_WINDOW_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(config.rate_limit.window.as_secs());
    config.rate_limit = RateLimitConfig::new(max_attempts, window_secs);

    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
