// ABOUTME: Integration tests for the feedback store
// ABOUTME: Validated create, history ordering, version filtering, admin watermark, candidates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::{DateTime, TimeZone, Utc};
use trainer_portal::database::feedback::CreateFeedbackRequest;
use trainer_portal::errors::ErrorCode;
use trainer_portal::models::User;
use uuid::Uuid;

fn date(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, 12, 0, 0).unwrap()
}

fn request() -> CreateFeedbackRequest {
    CreateFeedbackRequest {
        contact_email: Some("trainee@example.com".to_owned()),
        satisfaction: 8,
        motivation: 6,
        difficulties: "Squat depth".to_owned(),
        nutrition: "irregular".to_owned(),
        sleep_hours: 6.5,
        completed_all_workouts: false,
        wants_plan_change: true,
        support_note: Some("More mobility work please".to_owned()),
    }
}

#[tokio::test]
async fn test_create_and_read_back() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let plan = date(2024, 1, 1);

    let created = database
        .feedback()
        .create(user.id, plan, &request(), date(2024, 1, 10))
        .await
        .unwrap();

    let listed = database.feedback().list_for_user(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    let record = &listed[0];
    assert_eq!(record.id, created.id);
    assert_eq!(record.pdf_change_date, plan);
    assert_eq!(record.satisfaction, 8);
    assert_eq!(record.nutrition.as_str(), "irregular");
    assert_eq!(record.support_note.as_deref(), Some("More mobility work please"));
    assert!(record.wants_plan_change);
    assert!(!record.completed_all_workouts);
}

#[tokio::test]
async fn test_list_for_user_newest_first() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let plan = date(2024, 1, 1);

    for day in [10, 25] {
        database
            .feedback()
            .create(user.id, plan, &request(), date(2024, 1, day))
            .await
            .unwrap();
    }

    let listed = database.feedback().list_for_user(user.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at > listed[1].created_at);
}

#[tokio::test]
async fn test_list_all_spans_users_newest_first() {
    let database = common::create_test_database().await;
    let plan = date(2024, 1, 1);

    let first = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let second = common::create_user(&database, Some("b@example.com"), "B", date(2024, 1, 1)).await;

    // interleaved submissions across both users
    for (user, day) in [(&first, 10), (&second, 12), (&first, 25)] {
        database
            .feedback()
            .create(user.id, plan, &request(), date(2024, 1, day))
            .await
            .unwrap();
    }

    let listed = database.feedback().list_all().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].user_id, first.id);
    assert_eq!(listed[1].user_id, second.id);
    assert_eq!(listed[2].user_id, first.id);
    assert!(listed[0].created_at > listed[1].created_at);
    assert!(listed[1].created_at > listed[2].created_at);
}

#[tokio::test]
async fn test_latest_for_version_strict_equality() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let old_plan = date(2024, 1, 1);
    let new_plan = date(2024, 2, 1);

    // feedback for the old version created *after* the new version activated
    database
        .feedback()
        .create(user.id, old_plan, &request(), date(2024, 2, 3))
        .await
        .unwrap();

    // chronological ordering must not leak it into the new version
    let latest = database
        .feedback()
        .latest_for_version(user.id, new_plan)
        .await
        .unwrap();
    assert!(latest.is_none());

    let latest_old = database
        .feedback()
        .latest_for_version(user.id, old_plan)
        .await
        .unwrap();
    assert!(latest_old.is_some());
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let plan = date(2024, 1, 1);
    let now = date(2024, 1, 10);

    let mut bad_rating = request();
    bad_rating.motivation = 11;
    let error = database
        .feedback()
        .create(user.id, plan, &bad_rating, now)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);

    let mut bad_nutrition = request();
    bad_nutrition.nutrition = "carnivore".to_owned();
    let error = database
        .feedback()
        .create(user.id, plan, &bad_nutrition, now)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    // nothing was stored
    assert!(database.feedback().list_for_user(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_unknown_and_inactive_users() {
    let database = common::create_test_database().await;
    let now = date(2024, 1, 10);

    let error = database
        .feedback()
        .create(Uuid::new_v4(), date(2024, 1, 1), &request(), now)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    let mut inactive = User::new(Some("gone@example.com".to_owned()), "Gone", now);
    inactive.is_active = false;
    database.users().create(&inactive).await.unwrap();

    let error = database
        .feedback()
        .create(inactive.id, date(2024, 1, 1), &request(), now)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_admin_unread_watermark() {
    let database = common::create_test_database().await;
    let user = common::create_user(&database, Some("a@example.com"), "A", date(2024, 1, 1)).await;
    let admin = common::create_admin(&database, "coach@example.com", date(2024, 1, 1)).await;
    let plan = date(2024, 1, 1);

    database
        .feedback()
        .create(user.id, plan, &request(), date(2024, 1, 10))
        .await
        .unwrap();

    // never seen: everything is unread
    assert_eq!(database.feedback().unread_count(admin.id).await.unwrap(), 1);

    database
        .feedback()
        .mark_seen(admin.id, date(2024, 1, 15))
        .await
        .unwrap();
    assert_eq!(database.feedback().unread_count(admin.id).await.unwrap(), 0);

    // new feedback after the watermark shows up again
    database
        .feedback()
        .create(user.id, plan, &request(), date(2024, 1, 25))
        .await
        .unwrap();
    assert_eq!(database.feedback().unread_count(admin.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_reminder_candidates_filters_and_email_sourcing() {
    let database = common::create_test_database().await;
    let now = date(2024, 2, 1);

    // plan old enough, email only discoverable via feedback history
    let via_history =
        common::create_user(&database, None, "History", date(2024, 1, 1)).await;
    database
        .plans()
        .set_current_version(via_history.id, None, date(2024, 1, 1))
        .await
        .unwrap();
    database
        .feedback()
        .create(via_history.id, date(2024, 1, 1), &request(), date(2024, 1, 10))
        .await
        .unwrap();

    // plan too fresh: not a candidate at all
    let fresh = common::create_user(&database, Some("fresh@example.com"), "Fresh", date(2024, 1, 1)).await;
    database
        .plans()
        .set_current_version(fresh.id, None, date(2024, 1, 29))
        .await
        .unwrap();

    // admin users are never candidates
    let admin = common::create_admin(&database, "coach@example.com", date(2024, 1, 1)).await;
    database
        .plans()
        .set_current_version(admin.id, None, date(2024, 1, 1))
        .await
        .unwrap();

    // no email anywhere
    let no_email = common::create_user(&database, None, "Silent", date(2024, 1, 2)).await;
    database
        .plans()
        .set_current_version(no_email.id, None, date(2024, 1, 1))
        .await
        .unwrap();

    let candidates = database.feedback().reminder_candidates(now).await.unwrap();
    assert_eq!(candidates.len(), 2);

    let history = candidates
        .iter()
        .find(|c| c.user_id == via_history.id)
        .unwrap();
    assert_eq!(history.email.as_deref(), Some("trainee@example.com"));
    assert_eq!(history.last_feedback_at, Some(date(2024, 1, 10)));

    let silent = candidates.iter().find(|c| c.user_id == no_email.id).unwrap();
    assert!(silent.email.is_none());
    assert!(silent.last_feedback_at.is_none());
}
