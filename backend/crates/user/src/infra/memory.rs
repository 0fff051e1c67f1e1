//! In-Memory Repository Implementation
//!
//! Process-local store for tests and database-less runs. Enforces the same
//! uniqueness rules as the `users` table.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UserError, UserResult};

/// In-memory user repository (insertion order)
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> UserResult<()> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.has_email(&user.email)) {
            return Err(UserError::EmailTaken);
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameTaken);
        }

        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.has_email(email)).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        // Newest first, matching the PostgreSQL ordering
        Ok(users.iter().rev().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> UserResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::PasswordHasher;

    fn user(username: &str, email: &str) -> User {
        let hash = PasswordHasher::new().hash("Rahasia1!").unwrap();
        User::new(username.to_string(), email.to_string(), hash, None)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("budi", "budi@example.com")).await.unwrap();

        assert!(repo.find_by_email("BUDI@EXAMPLE.COM").await.unwrap().is_some());
        assert!(repo.find_by_username("budi").await.unwrap().is_some());
        assert!(repo.find_by_username("Budi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraints() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("budi", "budi@example.com")).await.unwrap();

        let err = repo.create(&user("ani", "Budi@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));

        let err = repo.create(&user("budi", "ani@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryUserRepository::new();
        for name in ["a", "b", "c"] {
            repo.create(&user(name, &format!("{name}@example.com")))
                .await
                .unwrap();
        }

        let page: Vec<_> = repo
            .list(2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(page, vec!["c", "b"]);

        let rest = repo.list(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].username, "a");
    }
}
