//! List Users Use Case

use std::sync::Arc;

use crate::application::config::UserConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UserError, UserResult};

const ACTION: &str = "list users";

/// List users input (raw query values)
pub struct ListUsersInput {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// List users output
pub struct ListUsersOutput {
    pub users: Vec<User>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// List users use case
pub struct ListUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<UserConfig>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UserConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: ListUsersInput) -> UserResult<ListUsersOutput> {
        let (page, per_page) = self.config.page_window(input.page, input.per_page);
        let offset = (page - 1).saturating_mul(per_page);

        let total = self
            .repo
            .count()
            .await
            .map_err(UserError::persist(ACTION))?;
        let users = self
            .repo
            .list(per_page, offset)
            .await
            .map_err(UserError::persist(ACTION))?;

        Ok(ListUsersOutput {
            users,
            page,
            per_page,
            total,
        })
    }
}
