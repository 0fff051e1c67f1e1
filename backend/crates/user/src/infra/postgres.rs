//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{UserError, UserResult};

/// Unique constraint names from the `users` migration
const EMAIL_UNIQUE: &str = "users_email_lower_key";
const USERNAME_UNIQUE: &str = "users_username_key";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation on `users` to the matching domain conflict
fn conflict_from(err: &sqlx::Error) -> Option<UserError> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    match db_err.constraint() {
        Some(EMAIL_UNIQUE) => Some(UserError::EmailTaken),
        Some(USERNAME_UNIQUE) => Some(UserError::UsernameTaken),
        _ => None,
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> UserResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                username,
                email,
                password_hash,
                phone,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.password_hash.as_phc_string())
        .bind(user.phone.as_deref())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_from(&e).unwrap_or(UserError::Database(e)))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, phone, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, phone, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn list(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, phone, created_at
            FROM users
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn count(&self) -> UserResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> UserResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            username: self.username,
            email: self.email,
            password_hash,
            phone: self.phone,
            created_at: self.created_at,
        })
    }
}
