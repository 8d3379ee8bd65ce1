//! Presentation Layer
//!
//! Form DTOs, page views, gates and the router.

pub mod dto;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod view;
