//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use std::sync::Arc;

use kernel::response::{self, Meta, Reply, STATUS_OK};
use kernel::validation::engine::Validator;
use platform::password::PasswordHasher;

use crate::application::config::UserConfig;
use crate::application::{ListUsersInput, ListUsersUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::UserRepository;
use crate::error::UserResult;
use crate::presentation::dto::{CreateUserRequest, ListQuery, UserResponse};

/// Shared state for user handlers
pub struct UserAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    /// Built once at startup and shared by every request
    pub validator: Arc<Validator>,
    pub config: Arc<UserConfig>,
    pub hasher: Arc<PasswordHasher>,
}

impl<R> Clone for UserAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            validator: self.validator.clone(),
            config: self.config.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

impl<R> UserAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, validator: Arc<Validator>, config: UserConfig) -> Self {
        let hasher = match config.pepper() {
            Some(pepper) => PasswordHasher::with_pepper(pepper),
            None => PasswordHasher::new(),
        };
        Self {
            repo: Arc::new(repo),
            validator,
            config: Arc::new(config),
            hasher: Arc::new(hasher),
        }
    }
}

// ============================================================================
// List
// ============================================================================

/// GET /api/v1/users/
pub async fn list_users<R>(
    State(state): State<UserAppState<R>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> UserResult<Reply<Vec<UserResponse>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let Query(query) = query?;

    let use_case = ListUsersUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(ListUsersInput {
            page: query.page,
            per_page: query.per_page,
        })
        .await?;

    let meta = Meta::paginate(output.page, output.per_page, output.total);
    let users = output.users.into_iter().map(UserResponse::from).collect();

    Ok(response::json_with_meta(STATUS_OK, users, meta))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/v1/users/register
pub async fn register<R>(
    State(state): State<UserAppState<R>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> UserResult<Reply<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    state.validator.validate_struct(&req)?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.hasher.clone());
    let user = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            phone: req.phone,
        })
        .await?;

    Ok(response::created(UserResponse::from(user)))
}
