//! User Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entity, repository trait
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration with declarative request validation
//! - Paginated user listing
//!
//! ## Security Model
//! - Passwords hashed with Argon2id before they reach a repository
//! - Email and username are unique (checked up front and enforced by the store)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::UserConfig;
pub use error::{UserError, UserResult};
pub use infra::memory::InMemoryUserRepository;
pub use infra::postgres::PgUserRepository;
pub use presentation::router::user_router;
