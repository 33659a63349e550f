// ABOUTME: Route module organization for Trainer Portal HTTP endpoints
// ABOUTME: Thin handlers per domain delegating to the database managers and evaluator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! Route modules for the portal's REST surface.

/// Feedback eligibility, submission, history, and admin endpoints
pub mod feedback;
/// Health check and readiness routes
pub mod health;

pub use feedback::FeedbackRoutes;
pub use health::HealthRoutes;
