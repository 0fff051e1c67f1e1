//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::User;
use crate::error::UserResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user.
    ///
    /// Fails with `EmailTaken` / `UsernameTaken` when the store already
    /// holds a conflicting row.
    async fn create(&self, user: &User) -> UserResult<()>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// Newest first
    async fn list(&self, limit: u64, offset: u64) -> UserResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> UserResult<u64>;
}
