//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod list_users;
pub mod register;

// Re-exports
pub use config::UserConfig;
pub use list_users::{ListUsersInput, ListUsersOutput, ListUsersUseCase};
pub use register::{RegisterInput, RegisterUseCase};
