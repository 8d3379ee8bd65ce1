//! Auth - Session and access-control core of the web tier
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, profile snapshot, backend/store traits
//! - `application/` - Use cases (login, refresh coordination, verification)
//! - `infra/` - Backend HTTP client and in-memory session store
//! - `presentation/` - Form handlers, auth/role gates, router
//!
//! ## Features
//! - Server-side sessions with HMAC-signed cookie tokens
//! - JWT access/refresh token lifecycle against a separate backend API
//! - Exactly-one refresh attempt per protected request
//! - Role-gated and email-verification-gated routes
//! - Sliding-window rate guard on sensitive flows
//!
//! ## Security Model
//! - Access tokens live only in server-side session records
//! - Refresh tokens live only in an httpOnly cookie, exchanged server-side
//! - Sessions are destroyed centrally by the auth gate, never by the
//!   refresh coordinator
//! - No backend error detail ever reaches the rendered page

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::http::HttpBackend;
pub use infra::memory::MemorySessionStore;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::api::*;
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
