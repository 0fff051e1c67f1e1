//! User Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use kernel::validation::engine::Validator;

use crate::application::config::UserConfig;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, UserAppState};

/// Create the User router for any repository implementation
///
/// Production wires in [`PgUserRepository`](crate::infra::postgres::PgUserRepository);
/// tests use [`InMemoryUserRepository`](crate::infra::memory::InMemoryUserRepository).
pub fn user_router<R>(repo: R, validator: Arc<Validator>, config: UserConfig) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let state = UserAppState::new(repo, validator, config);

    Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/", get(handlers::list_users::<R>))
        .route("/users/register", post(handlers::register::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::User;
    use crate::error::{UserError, UserResult};
    use crate::infra::memory::InMemoryUserRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use kernel::validation::message::Locale;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        app_with(InMemoryUserRepository::new(), Locale::En)
    }

    fn app_with<R>(repo: R, locale: Locale) -> Router
    where
        R: UserRepository + Send + Sync + 'static,
    {
        user_router(repo, Arc::new(Validator::new(locale)), UserConfig::default())
    }

    fn register_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn budi() -> String {
        json!({
            "username": "budi",
            "email": "budi@example.com",
            "password": "Rahasia1!"
        })
        .to_string()
    }

    /// Repository whose every call fails at the storage layer
    struct BrokenRepository;

    impl UserRepository for BrokenRepository {
        async fn create(&self, _user: &User) -> UserResult<()> {
            Err(UserError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_email(&self, _email: &str) -> UserResult<Option<User>> {
            Ok(None)
        }
        async fn find_by_username(&self, _username: &str) -> UserResult<Option<User>> {
            Ok(None)
        }
        async fn list(&self, _limit: u64, _offset: u64) -> UserResult<Vec<User>> {
            Err(UserError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn count(&self) -> UserResult<u64> {
            Err(UserError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_register_created() {
        let (status, body) = send(app(), register_request(&budi())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["username"], "budi");
        assert_eq!(body["data"]["email"], "budi@example.com");
        assert!(body["data"]["id"].is_string());
        assert!(body["data"].get("password").is_none());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_register_malformed_body() {
        let (status, body) = send(app(), register_request("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Invalid request body");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_register_validation_failure() {
        let req = json!({
            "username": "ab",
            "email": "not-an-email",
            "password": "abc"
        });
        let (status, body) = send(app(), register_request(&req.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Validation failed");
        assert_eq!(
            body["error"]["fields"]["email"],
            json!(["email must be a valid email address"])
        );
        assert_eq!(
            body["error"]["fields"]["password"],
            json!([
                "password must be at least 6 characters",
                "password must be ≥8 characters with uppercase, lowercase, digit, and special character"
            ])
        );
        let details = body["error"]["details"].as_str().unwrap();
        assert!(
            details.starts_with("username must be 3–30 alphanumeric/underscore/hyphen characters")
        );
        assert!(details.contains("; email must be a valid email address"));
    }

    #[tokio::test]
    async fn test_register_missing_fields_use_required_rule() {
        let (status, body) = send(app(), register_request("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        // Every tag is evaluated, so `required` comes first, then the format rule
        assert_eq!(body["error"]["fields"]["username"][0], "username is required");
        assert_eq!(body["error"]["fields"]["email"][0], "email is required");
        assert_eq!(body["error"]["fields"]["password"][0], "password is required");
        assert!(body["error"]["fields"].get("phone").is_none());
    }

    #[tokio::test]
    async fn test_register_messages_follow_locale() {
        let app = app_with(InMemoryUserRepository::new(), Locale::Id);
        let req = register_request(r#"{"username":"budi","password":"Rahasia1!"}"#);
        let (_, body) = send(app, req).await;

        let details = body["error"]["details"].as_str().unwrap();
        assert!(details.starts_with("email wajib diisi"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflict() {
        let repo = InMemoryUserRepository::new();
        let app = app_with(repo.clone(), Locale::En);
        let (status, _) = send(app.clone(), register_request(&budi())).await;
        assert_eq!(status, StatusCode::CREATED);

        let again = json!({
            "username": "budi2",
            "email": "budi@example.com",
            "password": "Rahasia1!"
        });
        let (status, body) = send(app, register_request(&again.to_string())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "ALREADY_EXISTS");
        assert_eq!(body["error"]["message"], "Email already registered");
    }

    #[tokio::test]
    async fn test_register_repository_failure() {
        let app = app_with(BrokenRepository, Locale::En);
        let (status, body) = send(app, register_request(&budi())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "Failed to create user");
        // The cause is never exposed
        assert!(!body.to_string().contains("pool timed out"));
    }

    #[tokio::test]
    async fn test_list_users_paginated() {
        let repo = InMemoryUserRepository::new();
        let app = app_with(repo, Locale::En);
        for i in 0..3 {
            let req = json!({
                "username": format!("user{i}"),
                "email": format!("user{i}@example.com"),
                "password": "Rahasia1!"
            });
            send(app.clone(), register_request(&req.to_string())).await;
        }

        let req = Request::builder()
            .uri("/users/?page=1&per_page=2")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["username"], "user2");
        assert_eq!(
            body["meta"],
            json!({"page": 1, "per_page": 2, "total": 3, "total_pages": 2})
        );
    }

    #[tokio::test]
    async fn test_list_users_bad_query() {
        let req = Request::builder()
            .uri("/users/?page=first")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid query parameters");
    }

    #[tokio::test]
    async fn test_list_users_repository_failure() {
        let req = Request::builder().uri("/users").body(Body::empty()).unwrap();
        let (status, body) = send(app_with(BrokenRepository, Locale::En), req).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to list users");
    }
}
