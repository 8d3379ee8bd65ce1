//! Backend and Store Traits
//!
//! Interfaces the application layer depends on. The backend API and the
//! session store are both external collaborators: the HTTP implementation
//! lives in the infrastructure layer, and tests substitute mocks.

use uuid::Uuid;

use crate::domain::entity::{profile::UserProfile, session::Session};
use crate::error::AuthResult;

/// Credentials submitted to the backend login endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

/// New account submission.
///
/// There is deliberately no role field: registration always submits the
/// lowest-privilege tier regardless of anything the client sent.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub bio: Option<String>,
}

/// Profile plus token pair, as returned by login and registration.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Rotated token pair from the refresh endpoint.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Backend API contract (base URL from configuration).
///
/// Bearer-token injection happens inside the implementation; callers pass
/// the token explicitly so the trait stays stateless.
#[trait_variant::make(BackendApi: Send)]
pub trait LocalBackendApi {
    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> AuthResult<AuthGrant>;

    /// `POST /api/auth/register` (role fixed to "student")
    async fn register(&self, account: &NewAccount) -> AuthResult<AuthGrant>;

    /// `POST /api/auth/logout` (bearer auth, best-effort)
    async fn logout(&self, access_token: &str) -> AuthResult<()>;

    /// `POST /api/auth/forgot-password`
    async fn forgot_password(&self, email: &str) -> AuthResult<()>;

    /// `POST /api/auth/reset-password`
    async fn reset_password(&self, token: &str, password: &str) -> AuthResult<()>;

    /// `POST /api/auth/refresh`
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair>;

    /// `GET /api/users/profile` (bearer auth); `AccessExpired` on 401
    async fn fetch_profile(&self, access_token: &str) -> AuthResult<UserProfile>;
}

/// Session store trait.
///
/// The in-memory implementation is the single-process development mode;
/// a shared external store can replace it without changing gate logic.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Create a new session record
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find a session by ID (expired records are still returned; expiry
    /// is the gate's decision)
    async fn find(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Update a session (token rotation, profile re-fetch, activity)
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Destroy a session
    async fn destroy(&self, session_id: Uuid) -> AuthResult<()>;

    /// Remove expired records, returning how many were dropped
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
