//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations applied.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use serde_json::Value;
use tower::ServiceExt;

use user_directory::api::{create_router, AppState};
use user_directory::config::Config;
use user_directory::domain::{NewUser, Role, User};
use user_directory::infra::{Database, Persistence, UserRepository, UserStore};
use user_directory::services::{Claims, UserManager};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Open a fresh migrated in-memory database.
///
/// A single pooled connection keeps the in-memory database alive for the
/// whole test.
pub async fn test_database() -> Database {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let connection = SeaDatabase::connect(opt)
        .await
        .expect("Failed to open in-memory database");
    let db = Database::from_connection(connection);
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", TEST_SECRET).expect("Invalid test config")
}

/// Fixed creation time `days` after 2024-01-01.
pub fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + chrono::Duration::days(days)
}

pub async fn seed(store: &UserStore, name: &str, email: &str, role: Role, days: i64) -> User {
    store
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: Some(day(days)),
        })
        .await
        .expect("Failed to seed user")
}

/// Service wired to a real store, bypassing HTTP.
pub fn user_manager(db: &Database) -> UserManager<Persistence> {
    UserManager::new(Arc::new(Persistence::new(db.get_connection())))
}

/// Mint a bearer token for a user id.
pub fn token_for(user_id: i32) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Router and store over the same database.
pub struct TestApp {
    pub router: Router,
    pub store: UserStore,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = test_database().await;
        let store = UserStore::new(db.get_connection());
        let router = create_router(AppState::from_config(Arc::new(db), test_config()));
        Self { router, store }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    /// Send a request as `user_id`, optionally with a JSON body.
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        user_id: i32,
        body: Option<Value>,
    ) -> Response<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Invalid request");

        self.send(request).await
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

pub fn ids(body: &Value) -> Vec<i64> {
    body["users"]
        .as_array()
        .expect("users array")
        .iter()
        .map(|u| u["id"].as_i64().expect("numeric id"))
        .collect()
}
