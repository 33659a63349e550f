// ABOUTME: Core data models shared across the Trainer Portal modules
// ABOUTME: User record plus request/response building blocks with serde derives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A portal user (trainee or admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address; may be absent for legacy accounts, in which case the
    /// reminder job falls back to addresses found in the feedback history
    pub email: Option<String>,
    /// Name shown in the dashboard and in reminder emails
    pub display_name: String,
    /// Whether this user has admin privileges
    pub is_admin: bool,
    /// Inactive users cannot submit feedback and are skipped by reminders
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new active, non-admin user
    #[must_use]
    pub fn new(email: Option<String>, display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            display_name: display_name.into(),
            is_admin: false,
            is_active: true,
            created_at: now,
        }
    }
}
