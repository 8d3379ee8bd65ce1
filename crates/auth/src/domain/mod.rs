//! Domain Layer
//!
//! Entities, value objects and the traits the application layer depends on.

pub mod api;
pub mod entity;
pub mod value_object;
