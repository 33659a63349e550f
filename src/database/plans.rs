// ABOUTME: Training plan version lookup backing the eligibility evaluator
// ABOUTME: The plan's updated_at timestamp is the opaque version token for feedback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! Training plan storage at the boundary the feedback core consumes.
//!
//! Document upload and storage bookkeeping belong to the PDF storage
//! collaborator; the portal core only ever needs the current `updated_at`
//! of a user's plan, which changes exactly when a trainer replaces the
//! document.

use crate::database::users::parse_timestamp;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Training plan database operations manager
pub struct PlansManager {
    pool: SqlitePool,
}

impl PlansManager {
    /// Create a new plans manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current plan version token for a user, or `None` if no plan is assigned
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn current_version(&self, user_id: Uuid) -> AppResult<Option<DateTime<Utc>>> {
        let row = sqlx::query(
            r"
            SELECT updated_at FROM training_plans WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan for {user_id}: {e}")))?;

        row.map(|r| {
            let updated_at: String = r.try_get("updated_at")?;
            parse_timestamp(&updated_at)
        })
        .transpose()
    }

    /// Record a plan upload or replacement, setting a new version token
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn set_current_version(
        &self,
        user_id: Uuid,
        file_name: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO training_plans (user_id, file_name, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(user_id) DO UPDATE SET file_name = $2, updated_at = $3
            ",
        )
        .bind(user_id.to_string())
        .bind(file_name)
        .bind(updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to set plan for {user_id}: {e}")))?;

        Ok(())
    }
}
