// ABOUTME: Environment-variable configuration loading for server and batch binaries
// ABOUTME: Loads an optional .env file, applies defaults, and validates required secrets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

use crate::errors::{AppError, AppResult};
use std::env;
use tracing::warn;

/// Default HTTP port for the portal server
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default SQLite database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/portal.db";
/// Default JWT expiry in hours
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
/// Default spacing between reminder sends in milliseconds
const DEFAULT_REMINDER_SPACING_MS: u64 = 500;

/// Transactional mailer settings
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Mailer HTTP API endpoint
    pub api_url: String,
    /// Bearer key for the mailer API
    pub api_key: String,
    /// From address on reminder emails
    pub from_address: String,
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database URL (SQLite)
    pub database_url: String,
    /// Shared HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Mailer settings for the reminder job
    pub mailer: MailerConfig,
    /// Milliseconds between reminder sends
    pub reminder_spacing_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// An optional `.env` file is loaded first. `JWT_SECRET` is required;
    /// mailer variables are required only by the reminder binary, so they
    /// default to empty here and are re-checked where used.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is missing or a
    /// numeric variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        Ok(Self {
            http_port: parse_var("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| AppError::config("JWT_SECRET must be set"))?,
            jwt_expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            mailer: MailerConfig {
                api_url: env_var_or("MAILER_API_URL", ""),
                api_key: env_var_or("MAILER_API_KEY", ""),
                from_address: env_var_or("MAILER_FROM", "coach@trainer-portal.example"),
            },
            reminder_spacing_ms: parse_var("REMINDER_SPACING_MS", DEFAULT_REMINDER_SPACING_MS)?,
        })
    }

    /// Require the mailer configuration to be complete
    ///
    /// # Errors
    ///
    /// Returns a configuration error if endpoint or key is unset
    pub fn require_mailer(&self) -> AppResult<&MailerConfig> {
        if self.mailer.api_url.is_empty() || self.mailer.api_key.is_empty() {
            return Err(AppError::config(
                "MAILER_API_URL and MAILER_API_KEY must be set to send reminders",
            ));
        }
        Ok(&self.mailer)
    }

    /// One-line startup summary, safe to log (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database_url={} jwt_expiry_hours={} reminder_spacing_ms={}",
            self.http_port, self.database_url, self.jwt_expiry_hours, self.reminder_spacing_ms
        )
    }
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
