//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the web tier:
//! - Cookie management
//! - Client IP identification
//! - Sliding-window rate limiting infrastructure

pub mod client;
pub mod cookie;
pub mod rate_limit;
