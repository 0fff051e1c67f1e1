//! API DTOs (Data Transfer Objects)

use std::sync::LazyLock;

use kernel::id::UserId;
use kernel::validation::schema::{FieldSpec, Schema, Tag, Validate, tags};
use serde::{Deserialize, Serialize};

use crate::domain::entity::User;

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// Missing members decode as empty so that they are reported by the
/// `required` rule instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

const MIN_6: Tag = Tag::with_param("min", "6");

static CREATE_USER_SCHEMA: LazyLock<Schema<CreateUserRequest>> = LazyLock::new(|| {
    Schema::new(vec![
        FieldSpec::new("username", |r: &CreateUserRequest| (&r.username).into())
            .rules(&[tags::REQUIRED, tags::USERNAME]),
        FieldSpec::new("email", |r: &CreateUserRequest| (&r.email).into())
            .rules(&[tags::REQUIRED, tags::EMAIL]),
        FieldSpec::new("password", |r: &CreateUserRequest| (&r.password).into())
            .rules(&[tags::REQUIRED, MIN_6, tags::PASSWORD]),
        FieldSpec::new("phone", |r: &CreateUserRequest| (&r.phone).into())
            .alias("phone,omitempty")
            .rules(&[tags::PHONE]),
    ])
});

impl Validate for CreateUserRequest {
    fn schema() -> &'static Schema<Self> {
        &CREATE_USER_SCHEMA
    }
}

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

// ============================================================================
// List
// ============================================================================

/// `?page=&per_page=`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}
