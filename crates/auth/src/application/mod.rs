//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod forgot_password;
pub mod refresh;
pub mod register;
pub mod reset_password;
pub mod sign_in;
pub mod sign_out;
pub mod token;
pub mod verify;

// Re-exports
pub use config::AuthConfig;
pub use forgot_password::ForgotPasswordUseCase;
pub use refresh::{RefreshUseCase, RotatedTokens};
pub use register::{RegisterInput, RegisterUseCase};
pub use reset_password::ResetPasswordUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use verify::{DenyReason, Verdict, VerifyUseCase};
