// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # NeuroChat CLI
//!
//! The `neurochat` binary runs the product resolution engine in-process.
//!
//! ## Commands
//!
//! - `neurochat resolve "<text>"` - Recommend products for a request
//! - `neurochat feedback` - Rate a recommended product
//! - `neurochat business add|list` - Local business listings
//! - `neurochat analytics summary|patterns` - Usage and learning reports
//! - `neurochat config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use neurochat_cli::commands::{
    self, AnalyticsCommand, BusinessCommand, ConfigCommand, FeedbackArgs, ResolveArgs,
};
use neurochat_core::domain::config::ResolverConfigManifest;

/// NeuroChat - emotion-aware product recommendations
#[derive(Parser)]
#[command(name = "neurochat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "NEUROCHAT_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, env = "NEUROCHAT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend products for a shopping request
    #[command(name = "resolve")]
    Resolve(ResolveArgs),

    /// Record feedback on a recommended product
    #[command(name = "feedback")]
    Feedback(FeedbackArgs),

    /// Manage local business listings
    #[command(name = "business")]
    Business {
        #[command(subcommand)]
        command: BusinessCommand,
    },

    /// Recommendation analytics
    #[command(name = "analytics")]
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    };

    // Config commands report load errors themselves
    let loaded = ResolverConfigManifest::load_or_default(cli.config.clone());
    let logging = match &loaded {
        Ok(config) => config.logging(),
        Err(_) => ResolverConfigManifest::default().logging(),
    };
    init_logging(
        cli.log_level.as_deref().unwrap_or(&logging.level),
        &logging.format,
    )?;

    match command {
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
        Commands::Resolve(args) => {
            let config = loaded.context("Failed to load configuration")?;
            commands::resolve::handle_command(args, &config).await
        }
        Commands::Feedback(args) => {
            let config = loaded.context("Failed to load configuration")?;
            commands::feedback::handle_command(args, &config).await
        }
        Commands::Business { command } => {
            let config = loaded.context("Failed to load configuration")?;
            commands::business::handle_command(command, &config).await
        }
        Commands::Analytics { command } => {
            let config = loaded.context("Failed to load configuration")?;
            commands::analytics::handle_command(command, &config).await
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
