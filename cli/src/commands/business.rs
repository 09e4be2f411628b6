// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local business listings
//!
//! Commands: add, list

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use neurochat_core::domain::{
    business::{BusinessProduct, NewBusinessProduct},
    config::ResolverConfigManifest,
    price::Price,
};

use crate::embedded::Engine;

#[derive(Subcommand)]
pub enum BusinessCommand {
    /// Register a product for the local-business tier
    Add {
        /// Business display name
        #[arg(long)]
        business: String,

        /// Contact email; listings are grouped by it
        #[arg(long)]
        email: String,

        /// Product name
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Price in rupees
        #[arg(long, value_name = "RUPEES")]
        price: f64,

        #[arg(long)]
        category: String,

        /// Emotion the product suits (repeatable)
        #[arg(long = "emotion", value_name = "EMOTION", required = true)]
        emotions: Vec<String>,

        #[arg(long, default_value_t = 1)]
        stock: u32,
    },

    /// List a business's products, newest first
    List {
        /// Contact email used at registration
        #[arg(long)]
        email: String,
    },
}

pub async fn handle_command(command: BusinessCommand, config: &ResolverConfigManifest) -> Result<()> {
    let engine = Engine::from_config(config)?;

    match command {
        BusinessCommand::Add {
            business,
            email,
            name,
            description,
            price,
            category,
            emotions,
            stock,
        } => {
            if name.trim().is_empty() {
                anyhow::bail!("Product name must not be empty");
            }
            if category.trim().is_empty() {
                anyhow::bail!("Category must not be empty");
            }
            let price = Price::inr(price).context("Price must be a finite number")?;

            let product = BusinessProduct::register(NewBusinessProduct {
                business_name: business,
                business_email: email,
                name,
                description,
                price,
                category,
                target_emotions: emotions,
                stock,
            });
            let id = product.id;
            let name = product.name.clone();
            engine
                .directory
                .add(product)
                .await
                .context("Failed to store product")?;

            println!("{}", format!("✓ Product added: {} ({})", name, id.0).green());
            Ok(())
        }
        BusinessCommand::List { email } => {
            let products = engine
                .directory
                .list_by_business(&email)
                .await
                .context("Failed to list products")?;

            if products.is_empty() {
                println!("{}", "No products registered for this business.".yellow());
                return Ok(());
            }

            println!(
                "{:<36} {:<28} {:>10} {:<18} {:>5} EMOTIONS",
                "ID", "NAME", "PRICE", "CATEGORY", "STOCK"
            );
            for product in products {
                println!(
                    "{:<36} {:<28} {:>10} {:<18} {:>5} {}",
                    product.id.0,
                    product.name,
                    product.price.display(),
                    product.category,
                    product.stock,
                    product.target_emotions.join(",")
                );
            }
            Ok(())
        }
    }
}
