// ABOUTME: HTTP server binary for the Trainer Portal REST API
// ABOUTME: Wires config, database, auth, and routes, then serves with request tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Trainer Portal Server Binary
//!
//! Starts the portal REST API: feedback eligibility, submission, history,
//! and the admin unread endpoints, plus health probes.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use trainer_portal::{
    auth::AuthManager,
    config::environment::ServerConfig,
    context::ServerResources,
    database::Database,
    logging,
    routes::{FeedbackRoutes, HealthRoutes},
};

#[derive(Parser)]
#[command(name = "portal-server")]
#[command(about = "Trainer Portal - client portal REST API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Trainer Portal server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized");

    let auth_manager = AuthManager::new(config.jwt_secret.as_bytes(), config.jwt_expiry_hours);
    let http_port = config.http_port;

    let resources = Arc::new(ServerResources::new(database, auth_manager, config));

    let app = HealthRoutes::routes()
        .merge(FeedbackRoutes::routes(resources))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;
    info!("Listening on port {http_port}");

    axum::serve(listener, app).await?;

    Ok(())
}
