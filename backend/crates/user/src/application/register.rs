//! Register Use Case
//!
//! Creates a new user account from an already validated request.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UserError, UserResult};

const ACTION: &str = "create user";

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    hasher: Arc<PasswordHasher>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, hasher: Arc<PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    pub async fn execute(&self, input: RegisterInput) -> UserResult<User> {
        // Check uniqueness up front for a friendly error; the store still
        // enforces it for concurrent registrations.
        if self
            .repo
            .find_by_email(&input.email)
            .await
            .map_err(UserError::persist(ACTION))?
            .is_some()
        {
            return Err(UserError::EmailTaken);
        }

        if self
            .repo
            .find_by_username(&input.username)
            .await
            .map_err(UserError::persist(ACTION))?
            .is_some()
        {
            return Err(UserError::UsernameTaken);
        }

        let password_hash = self.hasher.hash(&input.password)?;

        let user = User::new(input.username, input.email, password_hash, input.phone);

        self.repo
            .create(&user)
            .await
            .map_err(UserError::persist(ACTION))?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "Rahasia1!".to_string(),
            phone: None,
        }
    }

    fn use_case(repo: &Arc<InMemoryUserRepository>) -> RegisterUseCase<InMemoryUserRepository> {
        RegisterUseCase::new(repo.clone(), Arc::new(PasswordHasher::new()))
    }

    #[tokio::test]
    async fn test_register_stores_hashed_password() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = PasswordHasher::new();

        let user = use_case(&repo)
            .execute(input("budi", "budi@example.com"))
            .await
            .unwrap();

        let stored = repo.find_by_username("budi").await.unwrap().unwrap();
        assert_eq!(stored.id, user.id);
        assert_ne!(stored.password_hash.as_phc_string(), "Rahasia1!");
        assert!(hasher.verify("Rahasia1!", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let use_case = use_case(&repo);
        use_case.execute(input("budi", "budi@example.com")).await.unwrap();

        let err = use_case
            .execute(input("budi2", "BUDI@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let use_case = use_case(&repo);
        use_case.execute(input("budi", "budi@example.com")).await.unwrap();

        let err = use_case
            .execute(input("budi", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
