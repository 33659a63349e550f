// ABOUTME: Shared test utilities for integration tests
// ABOUTME: In-memory database setup, user creation, and quiet logging helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

#![allow(dead_code, missing_docs, clippy::unwrap_used)]

use chrono::{DateTime, Utc};
use std::sync::Once;
use trainer_portal::{
    auth::AuthManager,
    config::environment::{MailerConfig, ServerConfig},
    context::ServerResources,
    database::Database,
    models::User,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database with migrations applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:").await.unwrap()
}

/// Configuration suitable for route tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        jwt_secret: "test-jwt-secret".to_owned(),
        jwt_expiry_hours: 24,
        mailer: MailerConfig {
            api_url: String::new(),
            api_key: String::new(),
            from_address: "coach@example.com".to_owned(),
        },
        reminder_spacing_ms: 0,
    }
}

/// Server resources around an in-memory database
pub async fn create_test_resources() -> std::sync::Arc<ServerResources> {
    let database = create_test_database().await;
    let config = test_config();
    let auth_manager = AuthManager::new(config.jwt_secret.as_bytes(), config.jwt_expiry_hours);
    std::sync::Arc::new(ServerResources::new(database, auth_manager, config))
}

/// Insert and return a user
pub async fn create_user(
    database: &Database,
    email: Option<&str>,
    display_name: &str,
    now: DateTime<Utc>,
) -> User {
    let user = User::new(email.map(ToOwned::to_owned), display_name, now);
    database.users().create(&user).await.unwrap();
    user
}

/// Insert and return an admin user
pub async fn create_admin(database: &Database, email: &str, now: DateTime<Utc>) -> User {
    let mut user = User::new(Some(email.to_owned()), "Coach", now);
    user.is_admin = true;
    database.users().create(&user).await.unwrap();
    user
}
