//! Infrastructure Layer

pub mod http;
pub mod memory;
