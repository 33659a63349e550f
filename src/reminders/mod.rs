// ABOUTME: Reminder batch job: classify candidates and send spaced reminder emails
// ABOUTME: Sequential loop with per-recipient failure isolation and a sent/failed summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Reminder Batch Job
//!
//! Runs once per invocation (an external scheduler calls the
//! `send-reminders` binary, intended at most once per day). The job fetches
//! all candidates in a single query, classifies each against the eligibility
//! windows, and emails the eligible ones sequentially with a fixed spacing
//! between sends.
//!
//! There is no "already notified" ledger: the eligible set is re-derived
//! from current data on every run, so re-running inside a window re-notifies
//! the same users. The once-daily external schedule is the guard.

use crate::database::feedback::ReminderCandidate;
use crate::database::Database;
use crate::errors::AppResult;
use crate::feedback::policy::repeat_window;
use crate::notifications::NotificationGateway;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

/// Default spacing between mailer calls, respecting provider rate limits
pub const DEFAULT_SEND_SPACING: Duration = Duration::from_millis(500);

/// Why a candidate is being reminded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderReason {
    /// No feedback yet for the current plan version
    FirstFeedbackDue,
    /// Repeat window elapsed since the last feedback for the current version
    BiweeklyReminder,
}

/// Aggregate outcome of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderSummary {
    /// Reminders delivered
    pub sent: u32,
    /// Delivery attempts that failed (never fatal to the run)
    pub failed: u32,
    /// Candidates dropped for lack of a discoverable email address
    pub skipped_no_email: u32,
}

/// Reminder batch job
pub struct ReminderJob {
    spacing: Duration,
}

impl Default for ReminderJob {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_SPACING)
    }
}

impl ReminderJob {
    /// Create a job with the given inter-send spacing
    #[must_use]
    pub const fn new(spacing: Duration) -> Self {
        Self { spacing }
    }

    /// Classify a candidate at `now`, or `None` if no reminder is due.
    ///
    /// The candidate query already restricts to plans at least the first
    /// window old, so a candidate without feedback for the current version
    /// is due its first reminder unconditionally.
    #[must_use]
    pub fn classify(candidate: &ReminderCandidate, now: DateTime<Utc>) -> Option<ReminderReason> {
        match candidate.last_feedback_at {
            None => Some(ReminderReason::FirstFeedbackDue),
            Some(last) if now - last >= repeat_window() => Some(ReminderReason::BiweeklyReminder),
            Some(_) => None,
        }
    }

    /// Run the batch once.
    ///
    /// Per-recipient delivery failures are recorded and the loop continues;
    /// only the initial candidate fetch is fatal.
    ///
    /// # Errors
    ///
    /// Returns a database error if the candidate fetch fails (nothing to
    /// iterate over); this is the only infrastructure-fatal path.
    pub async fn run(
        &self,
        database: &Database,
        gateway: &dyn NotificationGateway,
        now: DateTime<Utc>,
    ) -> AppResult<ReminderSummary> {
        let candidates = database.feedback().reminder_candidates(now).await?;
        info!(count = candidates.len(), "fetched reminder candidates");

        let mut summary = ReminderSummary::default();
        let mut first_send_done = false;

        for candidate in &candidates {
            let Some(email) = candidate.email.as_deref() else {
                warn!(user_id = %candidate.user_id, "no discoverable email, skipping");
                summary.skipped_no_email += 1;
                continue;
            };

            let Some(reason) = Self::classify(candidate, now) else {
                continue;
            };

            if first_send_done {
                tokio::time::sleep(self.spacing).await;
            }
            first_send_done = true;

            match gateway
                .send_reminder(email, &candidate.display_name, reason)
                .await
            {
                Ok(()) => {
                    info!(user_id = %candidate.user_id, ?reason, "reminder sent");
                    summary.sent += 1;
                }
                Err(error) => {
                    warn!(user_id = %candidate.user_id, %error, "reminder delivery failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            sent = summary.sent,
            failed = summary.failed,
            skipped_no_email = summary.skipped_no_email,
            "reminder run complete"
        );

        Ok(summary)
    }
}
