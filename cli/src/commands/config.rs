// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use neurochat_core::domain::config::{ResolverConfigManifest, StorageKind};
use neurochat_core::domain::repository::StorageBackend;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective manifest as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./neurochat-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate {
            output,
            examples,
            force,
        } => generate(output, examples, force).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, as_yaml: bool) -> Result<()> {
    let config = ResolverConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. NEUROCHAT_CONFIG_PATH: {}",
            std::env::var("NEUROCHAT_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./neurochat-config.yaml");
        println!("  4. ~/.neurochat/config.yaml");
        println!("  5. /etc/neurochat/config.yaml");
        println!();
    }

    if as_yaml {
        print!(
            "{}",
            serde_yaml::to_string(&config).context("Failed to serialize configuration")?
        );
        return Ok(());
    }

    let spec = &config.spec;
    println!("{} {}", "Current configuration:".bold(), config.metadata.name);
    println!();

    println!("{}", "LLM Providers:".bold());
    if spec.llm_providers.is_empty() {
        println!("  {}", "(none - generation tiers are skipped)".dimmed());
    }
    for provider in &spec.llm_providers {
        let state = if provider.enabled {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        println!("  {} ({}, {})", provider.name.bold(), provider.provider_type, state);
        println!("    Endpoint: {}", provider.endpoint);
        for model in &provider.models {
            println!("      - {} → {}", model.alias, model.model);
        }
    }
    if let Some(fallback) = &spec.llm_selection.fallback_provider {
        println!("  Fallback provider: {}", fallback);
    }
    println!(
        "  Retries: {} (base delay {} ms)",
        spec.llm_selection.max_retries, spec.llm_selection.retry_delay_ms
    );
    println!();

    let resolution = &spec.resolution;
    println!("{}", "Resolution:".bold());
    println!("  Strategy timeout: {} ms", resolution.strategy_timeout_ms);
    println!(
        "  Pattern trusted after: more than {} success(es)",
        resolution.pattern_min_successes
    );
    println!("  Minimum generated: {}", resolution.min_generated);
    println!("  Max candidates: {}", resolution.max_candidates);
    println!("  Generation model alias: {}", resolution.generation_model);
    println!(
        "  Catalog: {:?} ({})",
        resolution.catalog, resolution.catalog_endpoint
    );
    println!();

    println!("{}", "Pricing:".bold());
    println!("  1 USD = ₹{}", spec.pricing.usd_to_inr);
    println!();

    println!("{}", "Web Search:".bold());
    println!(
        "  {} ({})",
        if spec.search.enabled { "enabled" } else { "disabled" },
        spec.search.endpoint
    );
    println!();

    println!("{}", "Storage:".bold());
    match (spec.storage.backend, spec.storage.backend()) {
        (StorageKind::Sled, StorageBackend::Sled { path }) => {
            println!("  sled at {}", path.display())
        }
        _ => println!("  in-memory"),
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ResolverConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }

    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
