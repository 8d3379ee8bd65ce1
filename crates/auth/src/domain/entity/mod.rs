//! Entities

pub mod profile;
pub mod session;

pub use profile::UserProfile;
pub use session::Session;
