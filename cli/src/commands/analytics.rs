// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Recommendation analytics
//!
//! Commands: summary, patterns

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use neurochat_core::domain::config::ResolverConfigManifest;

use crate::embedded::Engine;

#[derive(Subcommand)]
pub enum AnalyticsCommand {
    /// Strategy usage and feedback over a trailing window
    Summary {
        /// Window length in days
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(0..=36500))]
        days: i64,

        #[arg(long)]
        json: bool,
    },

    /// Most reinforced request patterns
    Patterns {
        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(command: AnalyticsCommand, config: &ResolverConfigManifest) -> Result<()> {
    let engine = Engine::from_config(config)?;
    let recorder = engine.service.recorder();

    match command {
        AnalyticsCommand::Summary { days, json } => {
            let summary = recorder
                .summary(days)
                .await
                .context("Failed to read analytics")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!(
                "{} {} resolution(s) since {}",
                "Analytics:".bold(),
                summary.total_resolutions,
                summary.since.format("%Y-%m-%d %H:%M UTC")
            );
            println!();
            println!(
                "{:<20} {:>6} {:>10} {:>12} {:>9}",
                "STRATEGY", "COUNT", "AVG ITEMS", "AVG LATENCY", "SUCCESS"
            );
            for usage in &summary.strategies {
                println!(
                    "{:<20} {:>6} {:>10.1} {:>9.0} ms {:>8.0}%",
                    usage.strategy.as_str(),
                    usage.count,
                    usage.avg_candidates,
                    usage.avg_latency_ms,
                    usage.success_rate * 100.0
                );
            }

            if !summary.feedback.is_empty() {
                println!();
                println!("{}", "Feedback:".bold());
                for entry in &summary.feedback {
                    println!(
                        "  {:<14} {:<20} {}",
                        entry.kind.as_str(),
                        entry.strategy.map(|s| s.as_str()).unwrap_or("-"),
                        entry.count
                    );
                }
            }
            Ok(())
        }
        AnalyticsCommand::Patterns { limit, json } => {
            let patterns = recorder
                .top_patterns(limit)
                .await
                .context("Failed to read patterns")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
                return Ok(());
            }

            if patterns.is_empty() {
                println!("{}", "No patterns learned yet.".yellow());
                return Ok(());
            }

            for pattern in patterns {
                println!(
                    "{:>4}x  {} [{}] -> {}",
                    pattern.success_count,
                    pattern.signature.as_str().bold(),
                    pattern.emotion,
                    pattern.categories.join(", ")
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct AnalyticsCli {
        #[command(subcommand)]
        command: AnalyticsCommand,
    }

    fn parse_days(days: &str) -> Option<i64> {
        let cli = AnalyticsCli::try_parse_from(["analytics", "summary", "--days", days]).ok()?;
        match cli.command {
            AnalyticsCommand::Summary { days, .. } => Some(days),
            AnalyticsCommand::Patterns { .. } => None,
        }
    }

    #[test]
    fn test_summary_days_are_bounded() {
        assert_eq!(parse_days("30"), Some(30));
        assert_eq!(parse_days("36500"), Some(36500));
        assert_eq!(parse_days("200000000"), None);
        assert_eq!(parse_days("-1"), None);
    }
}
