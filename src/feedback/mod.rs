// ABOUTME: Feedback domain module grouping the time policy and eligibility evaluator
// ABOUTME: Pure decision logic; persistence lives in database::feedback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

/// Pure eligibility evaluation over plan and feedback timestamps
pub mod eligibility;
/// Fixed time windows and date arithmetic
pub mod policy;

pub use eligibility::{evaluate, EligibilityDecision};
pub use policy::{FIRST_WINDOW_DAYS, REPEAT_WINDOW_DAYS};
