//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

/// Registered user.
///
/// Only ever holds the password hash; the plain password never leaves the
/// registration use case.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: HashedPassword,
    /// Optional contact number, stored as entered
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id.
    pub fn new(
        username: String,
        email: String,
        password_hash: HashedPassword,
        phone: Option<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            phone: phone.filter(|p| !p.is_empty()),
            created_at: Utc::now(),
        }
    }

    /// Emails are matched case-insensitively.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}
