// ABOUTME: Reminder batch job binary, invoked by an external once-daily scheduler
// ABOUTME: Exits 0 on a clean run (even with per-recipient failures), 1 on infrastructure failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! # Feedback Reminder Job
//!
//! Scans all trainees with an assigned plan, applies the eligibility
//! windows, and emails everyone whose feedback is currently due.
//!
//! Usage:
//! ```bash
//! # Send reminders (uses DATABASE_URL and MAILER_* from environment)
//! cargo run --bin send-reminders
//!
//! # Override database URL
//! cargo run --bin send-reminders -- --database-url sqlite:./data/portal.db
//!
//! # Log the would-be recipients without sending
//! cargo run --bin send-reminders -- --dry-run
//! ```
//!
//! Individual delivery failures are counted in the summary but never change
//! the exit code; only a failed candidate fetch or broken configuration does.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use trainer_portal::{
    config::environment::ServerConfig,
    database::Database,
    logging,
    notifications::{DryRunGateway, HttpEmailGateway, NotificationGateway},
    reminders::ReminderJob,
};

#[derive(Parser)]
#[command(name = "send-reminders")]
#[command(about = "Trainer Portal feedback reminder job")]
struct Args {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Log recipients instead of sending email
    #[arg(long)]
    dry_run: bool,
}

async fn run(args: Args) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let gateway: Box<dyn NotificationGateway> = if args.dry_run {
        info!("Dry run: reminders will be logged, not sent");
        Box::new(DryRunGateway)
    } else {
        let mailer = config.require_mailer()?.clone();
        Box::new(HttpEmailGateway::new(mailer)?)
    };

    let database = Database::new(&config.database_url).await?;

    let job = ReminderJob::new(Duration::from_millis(config.reminder_spacing_ms));
    let summary = job.run(&database, gateway.as_ref(), Utc::now()).await?;

    info!(
        "Reminder run finished: {} sent, {} failed, {} skipped (no email)",
        summary.sent, summary.failed, summary.skipped_no_email
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_from_env() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Reminder run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
