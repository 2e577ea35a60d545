// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! linkpost - a moderated content-relay bot.
//!
//! Binary entry point. Each subcommand is one long-running service role (or
//! the administrator provisioning path); roles share the database but run as
//! independent processes.

mod admin;
mod bot;
mod processor;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// linkpost - a moderated content-relay bot.
#[derive(Parser, Debug)]
#[command(name = "linkpost", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the chat-facing role: update polling, moderation, scheduler.
    Bot,
    /// Run the enrichment role: claim and process submitted links.
    Processor,
    /// Manage the administrator set.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// Register (or rename) an administrator by platform user id.
    Add { user_id: i64, display_name: String },
    /// List registered administrators.
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration problems are the one startup-fatal error class.
    let config = match linkpost_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            linkpost_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Bot => bot::run_bot(config).await,
        Commands::Processor => processor::run_processor(config).await,
        Commands::Admin { action } => admin::run_admin(config, action).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal");
        eprintln!("linkpost: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Block until SIGINT or SIGTERM.
pub(crate) async fn wait_for_shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
