// ABOUTME: Configuration module for the Trainer Portal
// ABOUTME: Environment-variable driven; no config files beyond an optional .env
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

/// Environment-based server configuration
pub mod environment;

pub use environment::{MailerConfig, ServerConfig};
