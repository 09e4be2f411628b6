// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `neurochat resolve` - run one request through the cascade

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use neurochat_core::domain::{
    config::ResolverConfigManifest,
    emotion::EmotionClassifier,
    price::Price,
    request::{EmotionReading, ShoppingRequest},
    resolution::{ResolutionResult, TierOutcome},
};

use crate::embedded::Engine;

#[derive(Args)]
pub struct ResolveArgs {
    /// What the shopper is looking for, in their own words
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Emotion label; classified from the text when omitted
    #[arg(short, long)]
    pub emotion: Option<String>,

    /// Confidence for --emotion (0.0-1.0)
    #[arg(long, default_value_t = 0.8, requires = "emotion")]
    pub confidence: f64,

    /// Upper price limit in rupees
    #[arg(short, long, value_name = "RUPEES")]
    pub budget: Option<f64>,

    /// Category hint (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_command(args: ResolveArgs, config: &ResolverConfigManifest) -> Result<()> {
    let engine = Engine::from_config(config)?;

    let emotion = match &args.emotion {
        Some(label) => EmotionReading::new(label, args.confidence),
        None => engine.classifier.classify(&args.text).await,
    };

    let mut request = ShoppingRequest::new(args.text.clone(), emotion)
        .with_category_hints(args.categories.iter().cloned());
    if let Some(budget) = args.budget {
        let budget = Price::inr(budget).context("Budget must be a finite number")?;
        request = request.with_budget(budget);
    }

    let result = engine.service.resolve(&request).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print_result(&request, &result);
    }

    Ok(())
}

fn print_result(request: &ShoppingRequest, result: &ResolutionResult) {
    let emotion = request.emotion();
    println!(
        "{} {} ({:.0}% confidence)",
        "Mood:".bold(),
        emotion.label.cyan(),
        emotion.confidence * 100.0
    );
    println!("{}", result.message.bold());
    println!();

    for (idx, candidate) in result.candidates.iter().enumerate() {
        println!(
            "{:>2}. {}  {}",
            idx + 1,
            candidate.name.bold(),
            candidate.price.display().green()
        );
        if !candidate.description.is_empty() {
            println!("    {}", candidate.description.dimmed());
        }
        println!("    Category: {}", candidate.categories.join(", "));
        if let Some(seller) = &candidate.seller {
            println!("    Seller: {}", seller);
        }
        if let Some(url) = &candidate.source_url {
            println!("    Link: {}", url.underline());
        }
        if !candidate.context_tags.is_empty() {
            println!("    Context: {}", candidate.context_tags.join(", ").dimmed());
        }
    }

    println!();
    println!("{}", "Tiers:".bold());
    for attempt in &result.attempts {
        let outcome = match attempt.outcome {
            TierOutcome::Found => attempt.outcome.as_str().green(),
            TierOutcome::NoResult | TierOutcome::Rejected => attempt.outcome.as_str().yellow(),
            TierOutcome::Failed | TierOutcome::TimedOut => attempt.outcome.as_str().red(),
        };
        print!(
            "  {:<20} {:<10} {:>6} ms",
            attempt.strategy.as_str(),
            outcome,
            attempt.latency_ms
        );
        match &attempt.detail {
            Some(detail) => println!("  {}", detail.dimmed()),
            None => println!(),
        }
    }
    println!(
        "{}",
        format!("Resolved by {} in {} ms", result.strategy.label(), result.latency_ms).dimmed()
    );
}
