// ABOUTME: Integration tests for the eligibility evaluator against the store
// ABOUTME: Covers the dated scenarios and version-reset behavior end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use trainer_portal::database::feedback::CreateFeedbackRequest;
use trainer_portal::feedback::{evaluate, EligibilityDecision};

fn date(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
}

fn feedback_request() -> CreateFeedbackRequest {
    CreateFeedbackRequest {
        contact_email: Some("trainee@example.com".to_owned()),
        satisfaction: 9,
        motivation: 8,
        difficulties: "None this cycle".to_owned(),
        nutrition: "mostly_balanced".to_owned(),
        sleep_hours: 7.0,
        completed_all_workouts: true,
        wants_plan_change: false,
        support_note: None,
    }
}

/// Fetch the caller-side inputs exactly as the routes do, then evaluate
async fn decide(
    database: &trainer_portal::database::Database,
    user_id: uuid::Uuid,
    now: DateTime<Utc>,
) -> EligibilityDecision {
    let plan_version = database.plans().current_version(user_id).await.unwrap();
    let current = match plan_version {
        Some(version) => database
            .feedback()
            .latest_for_version(user_id, version)
            .await
            .unwrap()
            .into_iter()
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };
    evaluate(plan_version, &current, now)
}

#[tokio::test]
async fn test_no_plan_yields_no_plan_reason() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;

    let decision = decide(&database, user.id, date(2024, 6, 1)).await;
    assert_eq!(decision, EligibilityDecision::NoPlan);
}

#[tokio::test]
async fn test_plan_updated_first_window_boundary() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    database
        .plans()
        .set_current_version(user.id, Some("plan.pdf"), date(2024, 1, 1))
        .await
        .unwrap();

    // one second short of 7 days
    let just_before = date(2024, 1, 8) - Duration::seconds(1);
    assert_eq!(
        decide(&database, user.id, just_before).await,
        EligibilityDecision::TooSoon
    );

    // exactly 7 days later: eligible, no reason
    let decision = decide(&database, user.id, date(2024, 1, 8)).await;
    assert!(decision.should_show());
    assert_eq!(decision.reason(), None);
}

#[tokio::test]
async fn test_repeat_window_after_submission() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let plan = date(2024, 1, 1);
    database
        .plans()
        .set_current_version(user.id, None, plan)
        .await
        .unwrap();

    database
        .feedback()
        .create(user.id, plan, &feedback_request(), date(2024, 1, 10))
        .await
        .unwrap();

    // 10 days after submission: too soon since last
    let decision = decide(&database, user.id, date(2024, 1, 20)).await;
    assert_eq!(decision, EligibilityDecision::TooSoonSinceLast);
    assert_eq!(decision.reason(), Some("too_soon_since_last"));

    // 15 days after submission: eligible again
    assert!(decide(&database, user.id, date(2024, 1, 25)).await.should_show());
}

#[tokio::test]
async fn test_plan_version_change_resets_eligibility() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let old_plan = date(2024, 1, 1);
    database
        .plans()
        .set_current_version(user.id, None, old_plan)
        .await
        .unwrap();

    // feedback for the old version, submitted late in the month
    database
        .feedback()
        .create(user.id, old_plan, &feedback_request(), date(2024, 1, 30))
        .await
        .unwrap();

    // trainer uploads a new plan on 2024-02-01; old feedback is recent but
    // answers a superseded version, so it must not suppress the new window
    let new_plan = date(2024, 2, 1);
    database
        .plans()
        .set_current_version(user.id, None, new_plan)
        .await
        .unwrap();

    assert_eq!(
        decide(&database, user.id, date(2024, 2, 5)).await,
        EligibilityDecision::TooSoon
    );
    assert!(decide(&database, user.id, date(2024, 2, 8)).await.should_show());
}

#[tokio::test]
async fn test_first_window_not_reapplied_after_feedback_exists() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let plan = date(2024, 1, 1);
    database
        .plans()
        .set_current_version(user.id, None, plan)
        .await
        .unwrap();

    // feedback on day 8; from here only the 14-day repeat window governs
    database
        .feedback()
        .create(user.id, plan, &feedback_request(), date(2024, 1, 8))
        .await
        .unwrap();

    assert_eq!(
        decide(&database, user.id, date(2024, 1, 21)).await,
        EligibilityDecision::TooSoonSinceLast
    );
    assert!(decide(&database, user.id, date(2024, 1, 22)).await.should_show());
}
