// ABOUTME: Notification gateway trait and the HTTP transactional-email implementation
// ABOUTME: Fire-and-forget per recipient; retries and timeouts are the provider's concern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Notification Gateway
//!
//! The reminder job talks to email through this trait so tests can
//! substitute a fake. The production implementation posts JSON to a
//! transactional-mail HTTP API.

use crate::config::environment::MailerConfig;
use crate::errors::{AppError, AppResult};
use crate::reminders::ReminderReason;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Per-call timeout for the mailer API
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound notification delivery
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Send one reminder email. Success or failure is per recipient; the
    /// caller records the outcome and moves on either way.
    async fn send_reminder(
        &self,
        to: &str,
        display_name: &str,
        reason: ReminderReason,
    ) -> AppResult<()>;
}

#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Transactional-email gateway over an HTTP mailer API
pub struct HttpEmailGateway {
    client: reqwest::Client,
    config: MailerConfig,
}

impl HttpEmailGateway {
    /// Create a gateway from mailer configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(config: MailerConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build mail client: {e}")))?;

        Ok(Self { client, config })
    }

    fn subject(reason: ReminderReason) -> &'static str {
        match reason {
            ReminderReason::FirstFeedbackDue => "How is your new training plan going?",
            ReminderReason::BiweeklyReminder => "Time for your training check-in",
        }
    }

    fn body(display_name: &str, reason: ReminderReason) -> String {
        match reason {
            ReminderReason::FirstFeedbackDue => format!(
                "Hi {display_name},\n\n\
                 you have been training on your new plan for a week now. \
                 Please take two minutes to fill in the feedback form in your \
                 dashboard so your coach can fine-tune the plan.\n\n\
                 See you in the portal!"
            ),
            ReminderReason::BiweeklyReminder => format!(
                "Hi {display_name},\n\n\
                 two weeks have passed since your last check-in. Your coach \
                 would like to hear how training is going - the feedback form \
                 in your dashboard is open again.\n\n\
                 See you in the portal!"
            ),
        }
    }
}

#[async_trait]
impl NotificationGateway for HttpEmailGateway {
    async fn send_reminder(
        &self,
        to: &str,
        display_name: &str,
        reason: ReminderReason,
    ) -> AppResult<()> {
        let request = MailRequest {
            from: &self.config.from_address,
            to,
            subject: Self::subject(reason),
            text: Self::body(display_name, reason),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::delivery_failed(format!("Mailer request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::delivery_failed(format!(
                "Mailer returned {} for {to}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Gateway that logs instead of sending; used by `send-reminders --dry-run`
pub struct DryRunGateway;

#[async_trait]
impl NotificationGateway for DryRunGateway {
    async fn send_reminder(
        &self,
        to: &str,
        display_name: &str,
        reason: ReminderReason,
    ) -> AppResult<()> {
        tracing::info!(%to, %display_name, ?reason, "dry-run: reminder not sent");
        Ok(())
    }
}
