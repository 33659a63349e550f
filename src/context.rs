// ABOUTME: Dependency-injection container shared by route handlers and binaries
// ABOUTME: Clients are constructed once at process entry and passed by parameter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! Shared server resources.
//!
//! Everything stateful the handlers need lives here, constructed at process
//! entry and handed to the router as `Arc<ServerResources>`. Tests build the
//! same container around an in-memory database and a throwaway secret.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;

/// Container for all shared server dependencies
pub struct ServerResources {
    /// Database connection pool and managers
    pub database: Database,
    /// Bearer-token validation
    pub auth_manager: AuthManager,
    /// Loaded configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the server's dependencies
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        Self {
            database,
            auth_manager,
            config,
        }
    }
}
