// ABOUTME: Library entry point for the Trainer Portal backend
// ABOUTME: Feedback eligibility core, reminder scheduling, and the REST surface around them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

#![deny(unsafe_code)]

//! # Trainer Portal
//!
//! Backend for a personal-trainer client portal: authenticated trainees
//! check whether a coaching-feedback form is due, submit feedback about
//! their current training plan, and browse their history; a scheduled batch
//! job emails reminders to trainees whose feedback is due.
//!
//! The core is the feedback eligibility policy in [`feedback`]: a plan
//! update opens a first feedback window after 7 days, and each submitted
//! feedback re-opens the window 14 days later, always scoped to the current
//! plan version. [`reminders`] applies the same policy across all users and
//! delivers reminder emails through the [`notifications`] gateway.

/// Bearer-token validation for authenticated endpoints
pub mod auth;
/// Environment-based configuration
pub mod config;
/// Shared dependency-injection container for handlers and binaries
pub mod context;
/// SQLite storage: users, training plans, feedback
pub mod database;
/// Unified error handling
pub mod errors;
/// Feedback time policy and eligibility evaluator
pub mod feedback;
/// Logging configuration
pub mod logging;
/// Core data models
pub mod models;
/// Notification gateway for outbound email
pub mod notifications;
/// Reminder batch job
pub mod reminders;
/// HTTP route handlers
pub mod routes;
