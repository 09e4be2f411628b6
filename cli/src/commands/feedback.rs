// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `neurochat feedback` - rate a recommended product

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use neurochat_core::application::FeedbackSubmission;
use neurochat_core::domain::{
    analytics::FeedbackKind, candidate::StrategyId, config::ResolverConfigManifest,
    emotion::EmotionClassifier, request::EmotionReading,
};

use crate::embedded::Engine;

#[derive(Args)]
pub struct FeedbackArgs {
    /// The request the product was recommended for
    #[arg(short, long)]
    pub query: String,

    /// Product name as shown
    #[arg(short, long)]
    pub product: String,

    /// perfect_match, good or not_relevant
    #[arg(short, long, value_parser = parse_kind)]
    pub kind: FeedbackKind,

    /// Emotion label of the original request; classified when omitted
    #[arg(short, long)]
    pub emotion: Option<String>,

    /// Tier that produced the product (e.g. semantic_generation)
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<StrategyId>,

    /// Product category (repeatable); used to reinforce the pattern
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,
}

fn parse_kind(value: &str) -> Result<FeedbackKind, String> {
    value.parse()
}

fn parse_strategy(value: &str) -> Result<StrategyId, String> {
    StrategyId::parse(value).ok_or_else(|| format!("unknown strategy '{}'", value))
}

pub async fn handle_command(args: FeedbackArgs, config: &ResolverConfigManifest) -> Result<()> {
    let engine = Engine::from_config(config)?;

    let emotion = match &args.emotion {
        Some(label) => EmotionReading::new(label, 1.0),
        None => engine.classifier.classify(&args.query).await,
    };

    let record = engine
        .service
        .record_feedback(FeedbackSubmission {
            request_text: args.query,
            emotion,
            product_name: args.product,
            kind: args.kind,
            strategy: args.strategy,
            categories: args.categories,
        })
        .await
        .context("Failed to store feedback")?;

    println!(
        "{}",
        format!(
            "✓ Recorded '{}' feedback for {}",
            record.kind, record.product_name
        )
        .green()
    );
    if record.kind == FeedbackKind::PerfectMatch {
        println!(
            "{}",
            "  Pattern reinforced for similar requests".dimmed()
        );
    }

    Ok(())
}
