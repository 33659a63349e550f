// ABOUTME: Database management for the Trainer Portal
// ABOUTME: Owns the SQLite pool, runs migrations, and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Database Management
//!
//! Connection handling and schema migrations. Domain operations live in the
//! per-table manager modules ([`users`], [`plans`], [`feedback`]).

/// Feedback records, admin watermarks, and the reminder candidate query
pub mod feedback;
/// Training plan version lookup
pub mod plans;
/// User storage
pub mod users;

use crate::errors::{AppError, AppResult};
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for portal storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns a database error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// User operations
    #[must_use]
    pub fn users(&self) -> users::UsersManager {
        users::UsersManager::new(self.pool.clone())
    }

    /// Training plan operations
    #[must_use]
    pub fn plans(&self) -> plans::PlansManager {
        plans::PlansManager::new(self.pool.clone())
    }

    /// Feedback operations
    #[must_use]
    pub fn feedback(&self) -> feedback::FeedbackManager {
        feedback::FeedbackManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns a database error if a statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_plans().await?;
        self.migrate_feedback().await?;
        Ok(())
    }

    async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE,
                display_name TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_plans(&self) -> AppResult<()> {
        // One row per user; updated_at is the opaque plan-version token
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS training_plans (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                file_name TEXT,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_feedback(&self) -> AppResult<()> {
        // Feedback rows are immutable after insert; there is no update path
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS feedback (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                pdf_change_date TEXT NOT NULL,
                contact_email TEXT,
                satisfaction INTEGER NOT NULL,
                motivation INTEGER NOT NULL,
                difficulties TEXT NOT NULL,
                nutrition TEXT NOT NULL,
                sleep_hours REAL NOT NULL,
                completed_all_workouts INTEGER NOT NULL,
                wants_plan_change INTEGER NOT NULL,
                support_note TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_feedback_user_version
            ON feedback(user_id, pdf_change_date)
            ",
        )
        .execute(&self.pool)
        .await?;

        // Per-admin unread watermark
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS feedback_seen (
                admin_user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                last_seen_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
