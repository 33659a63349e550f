// ABOUTME: Feedback eligibility evaluator deciding whether the feedback form is due
// ABOUTME: Pure two-window temporal policy over plan-version and feedback timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Feedback Eligibility Evaluator
//!
//! Decides, for one user, whether a new feedback form should be shown now,
//! and why not if not. The policy is fixed:
//!
//! 1. No assigned plan → never eligible.
//! 2. Plan version younger than the first window → not yet eligible.
//! 3. Otherwise: eligible if no feedback exists for the current plan version,
//!    or if the newest such feedback is at least the repeat window old.
//!
//! A plan-version change resets eligibility entirely: feedback answering a
//! superseded version never suppresses the form, no matter how recent.
//! Both window boundaries are inclusive.

use crate::database::feedback::FeedbackRecord;
use crate::feedback::policy::{first_window, repeat_window};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of an eligibility evaluation.
///
/// A closed enum so every consumer (routes, reminder job) handles all cases
/// exhaustively; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityDecision {
    /// The feedback form should be shown now
    Eligible,
    /// The user has no assigned training plan yet
    NoPlan,
    /// The current plan version is younger than the first-feedback window
    TooSoon,
    /// Feedback for the current plan version exists and is younger than the repeat window
    TooSoonSinceLast,
}

impl EligibilityDecision {
    /// Whether the feedback form should be shown
    #[must_use]
    pub const fn should_show(self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Wire-format reason code; `None` when eligible (eligible decisions carry no reason)
    #[must_use]
    pub const fn reason(self) -> Option<&'static str> {
        match self {
            Self::Eligible => None,
            Self::NoPlan => Some("no_plan"),
            Self::TooSoon => Some("too_soon"),
            Self::TooSoonSinceLast => Some("too_soon_since_last"),
        }
    }
}

/// Evaluate feedback eligibility for one user at `now`.
///
/// `plan_version` is the user's current plan `updated_at`, treated as an
/// opaque version token. `feedbacks_for_current_version` must be pre-filtered
/// by the caller to feedback whose `pdf_change_date` equals `plan_version` —
/// feedback answering a prior, superseded version never counts. Passing an
/// unfiltered history silently yields a more restrictive result; this is a
/// caller contract, not a runtime-checked invariant.
///
/// The first-feedback window gates only the first submission per version.
/// Once any feedback exists for the version, only the repeat window governs.
#[must_use]
pub fn evaluate(
    plan_version: Option<DateTime<Utc>>,
    feedbacks_for_current_version: &[FeedbackRecord],
    now: DateTime<Utc>,
) -> EligibilityDecision {
    let Some(plan_updated_at) = plan_version else {
        return EligibilityDecision::NoPlan;
    };

    if now - plan_updated_at < first_window() {
        return EligibilityDecision::TooSoon;
    }

    let last_feedback = feedbacks_for_current_version
        .iter()
        .max_by_key(|record| record.created_at);

    match last_feedback {
        None => EligibilityDecision::Eligible,
        Some(record) if now - record.created_at >= repeat_window() => {
            EligibilityDecision::Eligible
        }
        Some(_) => EligibilityDecision::TooSoonSinceLast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::feedback::tests_support::feedback_at;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_plan_never_eligible() {
        let decision = evaluate(None, &[], date(2024, 1, 8));
        assert_eq!(decision, EligibilityDecision::NoPlan);
        assert!(!decision.should_show());
        assert_eq!(decision.reason(), Some("no_plan"));
    }

    #[test]
    fn test_fresh_plan_too_soon_regardless_of_history() {
        let plan = date(2024, 1, 1);
        let now = plan + Duration::days(7) - Duration::seconds(1);
        // an (incorrectly pre-filtered) old feedback does not change the outcome
        let stale = feedback_at(plan, plan - Duration::days(30));
        assert_eq!(evaluate(Some(plan), &[], now), EligibilityDecision::TooSoon);
        assert_eq!(
            evaluate(Some(plan), &[stale], now),
            EligibilityDecision::TooSoon
        );
    }

    #[test]
    fn test_first_window_boundary_inclusive() {
        let plan = date(2024, 1, 1);
        let now = plan + Duration::days(7);
        let decision = evaluate(Some(plan), &[], now);
        assert_eq!(decision, EligibilityDecision::Eligible);
        assert_eq!(decision.reason(), None);
    }

    #[test]
    fn test_repeat_window_boundary_inclusive() {
        let plan = date(2024, 1, 1);
        let submitted = date(2024, 1, 10);
        let record = feedback_at(plan, submitted);

        let just_before = submitted + Duration::days(14) - Duration::seconds(1);
        assert_eq!(
            evaluate(Some(plan), std::slice::from_ref(&record), just_before),
            EligibilityDecision::TooSoonSinceLast
        );

        let exactly = submitted + Duration::days(14);
        assert_eq!(
            evaluate(Some(plan), &[record], exactly),
            EligibilityDecision::Eligible
        );
    }

    #[test]
    fn test_newest_feedback_governs() {
        let plan = date(2024, 1, 1);
        let older = feedback_at(plan, date(2024, 1, 9));
        let newer = feedback_at(plan, date(2024, 1, 20));
        // 15 days after the older one, 4 days after the newer one
        let now = date(2024, 1, 24);
        assert_eq!(
            evaluate(Some(plan), &[older, newer], now),
            EligibilityDecision::TooSoonSinceLast
        );
    }

    #[test]
    fn test_scenario_first_feedback_exactly_seven_days() {
        // plan updated 2024-01-01; now 2024-01-08; no feedback yet
        let decision = evaluate(Some(date(2024, 1, 1)), &[], date(2024, 1, 8));
        assert!(decision.should_show());
        assert_eq!(decision.reason(), None);
    }

    #[test]
    fn test_scenario_ten_days_after_feedback() {
        // plan updated 2024-01-01; feedback 2024-01-10; now 2024-01-20
        let plan = date(2024, 1, 1);
        let record = feedback_at(plan, date(2024, 1, 10));
        let decision = evaluate(Some(plan), &[record], date(2024, 1, 20));
        assert!(!decision.should_show());
        assert_eq!(decision.reason(), Some("too_soon_since_last"));
    }

    #[test]
    fn test_scenario_fifteen_days_after_feedback() {
        // plan updated 2024-01-01; feedback 2024-01-10; now 2024-01-25
        let plan = date(2024, 1, 1);
        let record = feedback_at(plan, date(2024, 1, 10));
        assert!(evaluate(Some(plan), &[record], date(2024, 1, 25)).should_show());
    }

    #[test]
    fn test_version_change_resets_eligibility() {
        // New plan activated 2024-02-01; feedback for the old version was
        // submitted yesterday but the caller filters it out, so 7 days after
        // the new version the user is eligible again.
        let new_plan = date(2024, 2, 1);
        assert_eq!(
            evaluate(Some(new_plan), &[], new_plan + Duration::days(7)),
            EligibilityDecision::Eligible
        );
    }
}
