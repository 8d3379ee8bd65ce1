//! Page Handlers
//!
//! Thin handlers for the server-rendered pages behind (and in front of)
//! the auth gate. Protected handlers read the per-request [`CurrentUser`]
//! context inserted by the gate; the view layer owns flash consumption.

use std::sync::Arc;

use auth::AuthConfig;
use auth::middleware::CurrentUser;
use auth::presentation::view::{Page, render};
use axum::Extension;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

pub async fn home(State(config): State<Arc<AuthConfig>>, headers: HeaderMap) -> Response {
    render(Page::new("home", "SSB Interview Coaching"), &headers, &config)
}

pub async fn dashboard(
    State(config): State<Arc<AuthConfig>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Response {
    let page = Page::new("dashboard", "Dashboard")
        .with_values(vec![("name", current.profile.full_name())]);
    render(page, &headers, &config)
}

pub async fn verify_email(
    State(config): State<Arc<AuthConfig>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Response {
    let page = Page::new("auth/verify-email", "Verify Your Email")
        .with_values(vec![("email", current.profile.email.clone())]);
    render(page, &headers, &config)
}

pub async fn interviews(
    State(config): State<Arc<AuthConfig>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Response {
    let page = Page::new("interviews", "My Interviews")
        .with_values(vec![("name", current.profile.full_name())]);
    render(page, &headers, &config)
}

pub async fn premium(
    State(config): State<Arc<AuthConfig>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Response {
    let page = Page::new("premium", "Premium Coaching")
        .with_values(vec![("role", current.profile.role.to_string())]);
    render(page, &headers, &config)
}

pub async fn admin(
    State(config): State<Arc<AuthConfig>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Response {
    let page = Page::new("admin/index", "Admin")
        .with_values(vec![("name", current.profile.full_name())]);
    render(page, &headers, &config)
}
