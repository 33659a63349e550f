// ABOUTME: Feedback record storage: validated create, history queries, admin watermark
// ABOUTME: Owns the version-token relationship between a feedback row and the plan it answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Feedback Store
//!
//! Persistence for submitted coaching feedback. Rows are immutable after
//! creation; there is no edit or delete path. Each row stores
//! `pdf_change_date`, the `updated_at` of the plan version the feedback
//! answers, and queries that feed the eligibility evaluator filter by strict
//! equality on that token.

use crate::database::users::parse_timestamp;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Lowest accepted rating value
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating value
pub const RATING_MAX: u8 = 10;
/// Upper bound for reported nightly sleep
pub const SLEEP_HOURS_MAX: f64 = 24.0;

/// Self-reported nutrition habits category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionHabits {
    /// Eating according to the plan
    Balanced,
    /// Mostly on plan with occasional slips
    MostlyBalanced,
    /// No consistent pattern
    Irregular,
    /// Far off the plan
    Poor,
}

impl NutritionHabits {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::MostlyBalanced => "mostly_balanced",
            Self::Irregular => "irregular",
            Self::Poor => "poor",
        }
    }

    /// Parse from the wire/database string; unrecognized categories are
    /// rejected rather than coerced, so `create` can fail validation on them
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "balanced" => Some(Self::Balanced),
            "mostly_balanced" => Some(Self::MostlyBalanced),
            "irregular" => Some(Self::Irregular),
            "poor" => Some(Self::Poor),
            _ => None,
        }
    }
}

/// A submitted feedback record, immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Submitting user
    pub user_id: Uuid,
    /// Submission instant
    pub created_at: DateTime<Utc>,
    /// Version token of the plan this feedback answers (the plan's `updated_at`)
    pub pdf_change_date: DateTime<Utc>,
    /// Submitter's email at submission time; the reminder job's address source
    pub contact_email: Option<String>,
    /// Overall satisfaction rating, 1-10
    pub satisfaction: u8,
    /// Training motivation rating, 1-10
    pub motivation: u8,
    /// Free-text description of training difficulties
    pub difficulties: String,
    /// Nutrition habits category
    pub nutrition: NutritionHabits,
    /// Average nightly sleep in hours
    pub sleep_hours: f64,
    /// Whether all assigned workouts were completed
    pub completed_all_workouts: bool,
    /// Whether the trainee wants the plan adjusted
    pub wants_plan_change: bool,
    /// Optional free-text note on needed support
    pub support_note: Option<String>,
}

/// Request to create a feedback record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    /// Submitter's email at submission time
    pub contact_email: Option<String>,
    /// Overall satisfaction rating, 1-10
    pub satisfaction: u8,
    /// Training motivation rating, 1-10
    pub motivation: u8,
    /// Free-text description of training difficulties
    pub difficulties: String,
    /// Nutrition habits category (wire string, validated on create)
    pub nutrition: String,
    /// Average nightly sleep in hours
    pub sleep_hours: f64,
    /// Whether all assigned workouts were completed
    pub completed_all_workouts: bool,
    /// Whether the trainee wants the plan adjusted
    pub wants_plan_change: bool,
    /// Optional free-text note on needed support
    pub support_note: Option<String>,
}

/// One row of the reminder job's candidate query
#[derive(Debug, Clone)]
pub struct ReminderCandidate {
    /// Candidate user
    pub user_id: Uuid,
    /// Name used in the reminder email greeting
    pub display_name: String,
    /// Most recent known address: newest feedback `contact_email`, falling
    /// back to the user record; `None` means the candidate is skipped
    pub email: Option<String>,
    /// Current plan version token
    pub plan_updated_at: DateTime<Utc>,
    /// Newest feedback timestamp for the current plan version, if any
    pub last_feedback_at: Option<DateTime<Utc>>,
}

/// Feedback database operations manager
pub struct FeedbackManager {
    pool: SqlitePool,
}

impl FeedbackManager {
    /// Create a new feedback manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a feedback record for `user_id` answering `plan_version`.
    ///
    /// The caller derives `plan_version` from the user's current plan at
    /// submission time; client-supplied tokens are never trusted.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a rating is outside
    /// [`RATING_MIN`]..=[`RATING_MAX`], sleep hours are outside
    /// `0..=`[`SLEEP_HOURS_MAX`], or the nutrition category is unrecognized;
    /// a not-found error if `user_id` does not reference an active user; a
    /// database error if the insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        plan_version: DateTime<Utc>,
        request: &CreateFeedbackRequest,
        now: DateTime<Utc>,
    ) -> AppResult<FeedbackRecord> {
        let nutrition = validate_request(request)?;

        let active: Option<i32> = sqlx::query_scalar(
            r"
            SELECT is_active FROM users WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check user {user_id}: {e}")))?;

        match active {
            None => return Err(AppError::not_found(format!("User {user_id}"))),
            Some(0) => {
                return Err(AppError::not_found(format!("Active user {user_id}")));
            }
            Some(_) => {}
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO feedback (
                id, user_id, created_at, pdf_change_date, contact_email,
                satisfaction, motivation, difficulties, nutrition, sleep_hours,
                completed_all_workouts, wants_plan_change, support_note
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(now.to_rfc3339())
        .bind(plan_version.to_rfc3339())
        .bind(&request.contact_email)
        .bind(i64::from(request.satisfaction))
        .bind(i64::from(request.motivation))
        .bind(&request.difficulties)
        .bind(nutrition.as_str())
        .bind(request.sleep_hours)
        .bind(i32::from(request.completed_all_workouts))
        .bind(i32::from(request.wants_plan_change))
        .bind(&request.support_note)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create feedback: {e}")))?;

        Ok(FeedbackRecord {
            id,
            user_id,
            created_at: now,
            pdf_change_date: plan_version,
            contact_email: request.contact_email.clone(),
            satisfaction: request.satisfaction,
            motivation: request.motivation,
            difficulties: request.difficulties.clone(),
            nutrition,
            sleep_hours: request.sleep_hours,
            completed_all_workouts: request.completed_all_workouts,
            wants_plan_change: request.wants_plan_change,
            support_note: request.support_note.clone(),
        })
    }

    /// All feedback submitted by a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<FeedbackRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, created_at, pdf_change_date, contact_email,
                   satisfaction, motivation, difficulties, nutrition, sleep_hours,
                   completed_all_workouts, wants_plan_change, support_note
            FROM feedback
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list feedback: {e}")))?;

        rows.iter().map(row_to_feedback).collect()
    }

    /// Newest feedback answering exactly `plan_version`, or `None`.
    ///
    /// Filters by strict token equality, not "created after the version
    /// began": feedback for a superseded version that happens to follow the
    /// new version chronologically must never count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn latest_for_version(
        &self,
        user_id: Uuid,
        plan_version: DateTime<Utc>,
    ) -> AppResult<Option<FeedbackRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, created_at, pdf_change_date, contact_email,
                   satisfaction, motivation, difficulties, nutrition, sleep_hours,
                   completed_all_workouts, wants_plan_change, support_note
            FROM feedback
            WHERE user_id = $1 AND pdf_change_date = $2
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .bind(plan_version.to_rfc3339())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get latest feedback: {e}")))?;

        row.as_ref().map(row_to_feedback).transpose()
    }

    /// All feedback across users for the admin console, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_all(&self) -> AppResult<Vec<FeedbackRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, created_at, pdf_change_date, contact_email,
                   satisfaction, motivation, difficulties, nutrition, sleep_hours,
                   completed_all_workouts, wants_plan_change, support_note
            FROM feedback
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list feedback: {e}")))?;

        rows.iter().map(row_to_feedback).collect()
    }

    /// Count feedback newer than the admin's last-seen watermark
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn unread_count(&self, admin_user_id: Uuid) -> AppResult<u32> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM feedback
            WHERE created_at > COALESCE(
                (SELECT last_seen_at FROM feedback_seen WHERE admin_user_id = $1),
                ''
            )
            ",
        )
        .bind(admin_user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count unread feedback: {e}")))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Advance the admin's last-seen watermark to `now`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn mark_seen(&self, admin_user_id: Uuid, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO feedback_seen (admin_user_id, last_seen_at)
            VALUES ($1, $2)
            ON CONFLICT(admin_user_id) DO UPDATE SET last_seen_at = $2
            ",
        )
        .bind(admin_user_id.to_string())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to mark feedback seen: {e}")))?;

        Ok(())
    }

    /// Candidate rows for the reminder batch job, in one query.
    ///
    /// Selects non-admin active users whose plan version is at least the
    /// first-feedback window old, together with the newest feedback timestamp
    /// for the *current* plan version and the most recent known email
    /// address. Classification happens in the job, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn reminder_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ReminderCandidate>> {
        let cutoff = now - crate::feedback::policy::first_window();

        let rows = sqlx::query(
            r"
            SELECT u.id AS user_id,
                   u.display_name,
                   p.updated_at AS plan_updated_at,
                   COALESCE(
                       (SELECT f.contact_email FROM feedback f
                        WHERE f.user_id = u.id AND f.contact_email IS NOT NULL
                        ORDER BY f.created_at DESC LIMIT 1),
                       u.email
                   ) AS email,
                   (SELECT MAX(f.created_at) FROM feedback f
                    WHERE f.user_id = u.id AND f.pdf_change_date = p.updated_at
                   ) AS last_feedback_at
            FROM users u
            JOIN training_plans p ON p.user_id = u.id
            WHERE u.is_admin = 0 AND u.is_active = 1 AND p.updated_at <= $1
            ORDER BY u.created_at
            ",
        )
        .bind(cutoff.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch reminder candidates: {e}")))?;

        rows.iter()
            .map(|row| {
                let user_id: String = row.try_get("user_id")?;
                let plan_updated_at: String = row.try_get("plan_updated_at")?;
                let last_feedback_at: Option<String> = row.try_get("last_feedback_at")?;

                Ok(ReminderCandidate {
                    user_id: Uuid::parse_str(&user_id)
                        .map_err(|e| AppError::database(format!("Invalid user id: {e}")))?,
                    display_name: row.try_get("display_name")?,
                    email: row.try_get("email")?,
                    plan_updated_at: parse_timestamp(&plan_updated_at)?,
                    last_feedback_at: last_feedback_at
                        .as_deref()
                        .map(parse_timestamp)
                        .transpose()?,
                })
            })
            .collect()
    }
}

/// Range-check ratings and sleep hours and resolve the nutrition category
fn validate_request(request: &CreateFeedbackRequest) -> AppResult<NutritionHabits> {
    for (field, value) in [
        ("satisfaction", request.satisfaction),
        ("motivation", request.motivation),
    ] {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(AppError::out_of_range(format!(
                "{field} must be between {RATING_MIN} and {RATING_MAX}, got {value}"
            )));
        }
    }

    if !(0.0..=SLEEP_HOURS_MAX).contains(&request.sleep_hours) {
        return Err(AppError::out_of_range(format!(
            "sleep_hours must be between 0 and {SLEEP_HOURS_MAX}, got {}",
            request.sleep_hours
        )));
    }

    NutritionHabits::parse(&request.nutrition).ok_or_else(|| {
        AppError::invalid_input(format!(
            "Unrecognized nutrition category: {}",
            request.nutrition
        ))
    })
}

fn row_to_feedback(row: &SqliteRow) -> AppResult<FeedbackRecord> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;
    let pdf_change_date: String = row.try_get("pdf_change_date")?;
    let nutrition: String = row.try_get("nutrition")?;

    Ok(FeedbackRecord {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::database(format!("Invalid feedback id {id}: {e}")))?,
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AppError::database(format!("Invalid user id {user_id}: {e}")))?,
        created_at: parse_timestamp(&created_at)?,
        pdf_change_date: parse_timestamp(&pdf_change_date)?,
        contact_email: row.try_get("contact_email")?,
        satisfaction: u8::try_from(row.try_get::<i64, _>("satisfaction")?)
            .map_err(|e| AppError::database(format!("Invalid satisfaction: {e}")))?,
        motivation: u8::try_from(row.try_get::<i64, _>("motivation")?)
            .map_err(|e| AppError::database(format!("Invalid motivation: {e}")))?,
        difficulties: row.try_get("difficulties")?,
        nutrition: NutritionHabits::parse(&nutrition)
            .ok_or_else(|| AppError::database(format!("Invalid nutrition value: {nutrition}")))?,
        sleep_hours: row.try_get("sleep_hours")?,
        completed_all_workouts: row.try_get::<i32, _>("completed_all_workouts")? != 0,
        wants_plan_change: row.try_get::<i32, _>("wants_plan_change")? != 0,
        support_note: row.try_get("support_note")?,
    })
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::{FeedbackRecord, NutritionHabits};
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Minimal record answering `plan_version`, submitted at `created_at`
    pub fn feedback_at(plan_version: DateTime<Utc>, created_at: DateTime<Utc>) -> FeedbackRecord {
        FeedbackRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at,
            pdf_change_date: plan_version,
            contact_email: Some("trainee@example.com".to_owned()),
            satisfaction: 8,
            motivation: 7,
            difficulties: String::new(),
            nutrition: NutritionHabits::Balanced,
            sleep_hours: 7.5,
            completed_all_workouts: true,
            wants_plan_change: false,
            support_note: None,
        }
    }
}
