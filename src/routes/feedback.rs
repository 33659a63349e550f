// ABOUTME: Route handlers for the feedback REST API (eligibility, submission, admin)
// ABOUTME: The POST handler re-derives the plan version server-side and enforces eligibility
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! Feedback routes
//!
//! All endpoints require a bearer token. The two `/admin/` endpoints
//! additionally require the admin claim. The eligibility gate is enforced
//! here on submission too, so direct API calls cannot bypass the dashboard's
//! form gating.

use crate::{
    auth::AuthResult,
    context::ServerResources,
    database::feedback::{CreateFeedbackRequest, FeedbackRecord},
    errors::AppError,
    feedback::{evaluate, EligibilityDecision},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response for the eligibility check, in the dashboard's wire shape
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShouldShowResponse {
    /// Whether the feedback form should be shown now
    pub should_show: bool,
    /// Ineligibility reason code; absent when eligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Current plan version activation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_updated_at: Option<String>,
    /// Newest feedback for the current plan version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_feedback_at: Option<String>,
}

/// Wire representation of a stored feedback record
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Unique identifier
    pub id: String,
    /// Submission instant
    pub created_at: String,
    /// Plan version this feedback answers
    pub pdf_change_date: String,
    /// Overall satisfaction rating
    pub satisfaction: u8,
    /// Training motivation rating
    pub motivation: u8,
    /// Free-text difficulties
    pub difficulties: String,
    /// Nutrition habits category
    pub nutrition: String,
    /// Average nightly sleep in hours
    pub sleep_hours: f64,
    /// Whether all assigned workouts were completed
    pub completed_all_workouts: bool,
    /// Whether the trainee wants the plan adjusted
    pub wants_plan_change: bool,
    /// Optional support note
    pub support_note: Option<String>,
}

impl From<FeedbackRecord> for FeedbackResponse {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id.to_string(),
            created_at: record.created_at.to_rfc3339(),
            pdf_change_date: record.pdf_change_date.to_rfc3339(),
            satisfaction: record.satisfaction,
            motivation: record.motivation,
            difficulties: record.difficulties,
            nutrition: record.nutrition.as_str().to_owned(),
            sleep_hours: record.sleep_hours,
            completed_all_workouts: record.completed_all_workouts,
            wants_plan_change: record.wants_plan_change,
            support_note: record.support_note,
        }
    }
}

/// Request body for submitting feedback.
///
/// There is deliberately no plan-version field: the server derives the
/// version token from the caller's current plan at submission time.
#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackBody {
    /// Overall satisfaction rating, 1-10
    pub satisfaction: u8,
    /// Training motivation rating, 1-10
    pub motivation: u8,
    /// Free-text difficulties
    pub difficulties: String,
    /// Nutrition habits category
    pub nutrition: String,
    /// Average nightly sleep in hours
    pub sleep_hours: f64,
    /// Whether all assigned workouts were completed
    pub completed_all_workouts: bool,
    /// Whether the trainee wants the plan adjusted
    pub wants_plan_change: bool,
    /// Optional support note
    pub support_note: Option<String>,
}

/// Response for listing the caller's feedback history
#[derive(Debug, Serialize, Deserialize)]
pub struct ListFeedbackResponse {
    /// Feedback records, newest first
    pub feedbacks: Vec<FeedbackResponse>,
}

/// Response for the admin unread counter
#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    /// Feedback newer than the admin's last-seen watermark
    pub unread: u32,
}

/// Response for mark-seen
#[derive(Debug, Serialize, Deserialize)]
pub struct MarkSeenResponse {
    /// Whether the watermark was advanced
    pub success: bool,
}

/// Feedback routes handler
pub struct FeedbackRoutes;

impl FeedbackRoutes {
    /// Create all feedback routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/feedback/should-show", get(Self::handle_should_show))
            .route("/api/feedback", post(Self::handle_submit))
            .route("/api/feedback/my-feedbacks", get(Self::handle_my_feedbacks))
            .route(
                "/api/feedback/admin/mark-seen",
                post(Self::handle_admin_mark_seen),
            )
            .route(
                "/api/feedback/admin/unread-count",
                get(Self::handle_admin_unread_count),
            )
            .with_state(resources)
    }

    /// Extract and authenticate the caller from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        let header = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());
        resources.auth_manager.authenticate_header(header)
    }

    /// Authenticate and require the admin claim
    fn authenticate_admin(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        let auth = Self::authenticate(headers, resources)?;
        if !auth.is_admin {
            return Err(AppError::permission_denied("Admin access required"));
        }
        Ok(auth)
    }

    /// Current eligibility decision plus the timestamps it was derived from
    async fn current_decision(
        resources: &Arc<ServerResources>,
        auth: &AuthResult,
        now: chrono::DateTime<Utc>,
    ) -> Result<
        (
            EligibilityDecision,
            Option<chrono::DateTime<Utc>>,
            Option<FeedbackRecord>,
        ),
        AppError,
    > {
        let plan_version = resources
            .database
            .plans()
            .current_version(auth.user_id)
            .await?;

        let last_feedback = match plan_version {
            Some(version) => {
                resources
                    .database
                    .feedback()
                    .latest_for_version(auth.user_id, version)
                    .await?
            }
            None => None,
        };

        let current: Vec<FeedbackRecord> = last_feedback.clone().into_iter().collect();
        let decision = evaluate(plan_version, &current, now);

        Ok((decision, plan_version, last_feedback))
    }

    /// Handle GET /api/feedback/should-show
    async fn handle_should_show(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let (decision, plan_version, last_feedback) =
            Self::current_decision(&resources, &auth, Utc::now()).await?;

        let response = ShouldShowResponse {
            should_show: decision.should_show(),
            reason: decision.reason().map(ToOwned::to_owned),
            pdf_updated_at: plan_version.map(|dt| dt.to_rfc3339()),
            last_feedback_at: last_feedback.map(|record| record.created_at.to_rfc3339()),
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/feedback
    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<SubmitFeedbackBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let now = Utc::now();

        let (decision, plan_version, _) =
            Self::current_decision(&resources, &auth, now).await?;
        if let Some(reason) = decision.reason() {
            return Err(AppError::submission_not_open(format!(
                "Feedback is not currently due: {reason}"
            )));
        }
        // Eligible implies a plan version exists
        let plan_version = plan_version
            .ok_or_else(|| AppError::internal("Eligible decision without a plan version"))?;

        let request = CreateFeedbackRequest {
            contact_email: auth.email.clone(),
            satisfaction: body.satisfaction,
            motivation: body.motivation,
            difficulties: body.difficulties,
            nutrition: body.nutrition,
            sleep_hours: body.sleep_hours,
            completed_all_workouts: body.completed_all_workouts,
            wants_plan_change: body.wants_plan_change,
            support_note: body.support_note,
        };

        let record = resources
            .database
            .feedback()
            .create(auth.user_id, plan_version, &request, now)
            .await?;

        let response: FeedbackResponse = record.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/feedback/my-feedbacks
    async fn handle_my_feedbacks(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let feedbacks = resources
            .database
            .feedback()
            .list_for_user(auth.user_id)
            .await?;

        let response = ListFeedbackResponse {
            feedbacks: feedbacks.into_iter().map(Into::into).collect(),
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/feedback/admin/mark-seen
    async fn handle_admin_mark_seen(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate_admin(&headers, &resources)?;

        resources
            .database
            .feedback()
            .mark_seen(auth.user_id, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(MarkSeenResponse { success: true })).into_response())
    }

    /// Handle GET /api/feedback/admin/unread-count
    async fn handle_admin_unread_count(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate_admin(&headers, &resources)?;

        let unread = resources
            .database
            .feedback()
            .unread_count(auth.user_id)
            .await?;

        Ok((StatusCode::OK, Json(UnreadCountResponse { unread })).into_response())
    }
}
