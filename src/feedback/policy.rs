// ABOUTME: Time policy constants and pure arithmetic for feedback eligibility windows
// ABOUTME: Computes day counts and progress fractions over UTC timestamps, no I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Feedback Time Policy
//!
//! Two fixed durations define the whole eligibility policy:
//!
//! - [`FIRST_WINDOW_DAYS`]: days after a plan update before the first
//!   feedback for that plan version is due.
//! - [`REPEAT_WINDOW_DAYS`]: days after the last feedback for the current
//!   plan version before another is due.
//!
//! All arithmetic is over UTC timestamps. Nothing here performs I/O or reads
//! the system clock; callers inject `now`.

use chrono::{DateTime, Duration, Utc};

/// Days a plan version must be active before the first feedback is due
pub const FIRST_WINDOW_DAYS: i64 = 7;

/// Days since the last feedback for the current plan version before another is due
pub const REPEAT_WINDOW_DAYS: i64 = 14;

const SECS_PER_DAY: i64 = 86_400;

/// The first-feedback window as a `chrono` duration
#[must_use]
pub fn first_window() -> Duration {
    Duration::days(FIRST_WINDOW_DAYS)
}

/// The repeat-feedback window as a `chrono` duration
#[must_use]
pub fn repeat_window() -> Duration {
    Duration::days(REPEAT_WINDOW_DAYS)
}

/// Whole days remaining until `target`, rounded up.
///
/// Negative when `target` has already passed. A target 1 second in the
/// future still counts as 1 remaining day.
#[must_use]
pub fn days_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (target - now).num_seconds();
    (secs + SECS_PER_DAY - 1).div_euclid(SECS_PER_DAY)
}

/// Fraction of `total` already elapsed, clamped to `[0, 1]`.
///
/// Used only for progress-bar rendering in the dashboard; eligibility
/// decisions never consult this value.
#[must_use]
pub fn progress_fraction(elapsed: Duration, total: Duration) -> f64 {
    let total_secs = total.num_seconds();
    if total_secs <= 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = elapsed.num_seconds() as f64 / total_secs as f64;
    fraction.clamp(0.0, 1.0)
}
