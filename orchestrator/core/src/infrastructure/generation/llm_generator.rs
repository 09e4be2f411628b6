// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! LLM-backed product generator
//!
//! Turns a [`GenerationBrief`] into a prompt, sends it through the
//! [`ProviderRegistry`] under the configured model alias and reads back a
//! JSON array of products. Models often wrap JSON in markdown fences or add
//! a sentence around it; the parser tolerates both.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::candidate::RawCandidate;
use crate::domain::generation::{
    BriefKind, CapabilityError, GenerationBrief, ProductGenerator, CATALOG_CATEGORIES, UNCATEGORIZED,
};
use crate::domain::llm::GenerationOptions;
use crate::domain::price::PriceInput;
use crate::infrastructure::llm::ProviderRegistry;

const SYSTEM_PROMPT: &str = "You are a shopping assistant for the Indian market. \
Recommend real, purchasable products and answer with a JSON array only.";

const MAX_TITLE_CHARS: usize = 80;
const MAX_DESCRIPTION_CHARS: usize = 200;

pub struct LlmProductGenerator {
    registry: Arc<ProviderRegistry>,
    model_alias: String,
}

impl LlmProductGenerator {
    pub fn new(registry: Arc<ProviderRegistry>, model_alias: impl Into<String>) -> Self {
        Self {
            registry,
            model_alias: model_alias.into(),
        }
    }

    fn prompt(brief: &GenerationBrief) -> String {
        let mut prompt = match &brief.kind {
            BriefKind::FreeText { text } => format!(
                "A shopper who feels {emotion} is looking for: \"{text}\"\n\n\
                 Suggest {limit} realistic products that match this need.",
                emotion = brief.emotion,
                limit = brief.limit,
            ),
            BriefKind::Categories { categories } => format!(
                "A shopper who feels {emotion} has liked products from these categories before: {cats}\n\n\
                 Suggest {limit} realistic products, only from those categories.",
                emotion = brief.emotion,
                cats = categories.join(", "),
                limit = brief.limit,
            ),
            BriefKind::Ambient { text, context } => format!(
                "A shopper wrote: \"{text}\"\n\
                 They feel {emotion}. It is {context} in India.\n\n\
                 Suggest {limit} realistic products that suit both the request and the moment \
                 (season, festivals, time of day).",
                emotion = brief.emotion,
                limit = brief.limit,
            ),
        };

        if let Some(budget) = brief.budget {
            prompt.push_str(&format!("\nEvery price must be at most {}.", budget.display()));
        }

        prompt.push_str(&format!(
            "\n\nAnswer with a JSON array where each item has:\n\
             - title: clear product name\n\
             - price: price in Indian rupees as a number\n\
             - description: 100-150 characters on the product and its benefits\n\
             - category: the best fit among: {categories}\n\
             Example: [{{\"title\": \"Product\", \"price\": 2499, \"description\": \"...\", \"category\": \"home-decoration\"}}]",
            categories = CATALOG_CATEGORIES.join(", "),
        ));
        prompt
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedProduct {
    #[serde(alias = "name")]
    title: String,
    price: GeneratedPrice,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedPrice {
    Number(f64),
    Text(String),
}

impl From<GeneratedPrice> for PriceInput {
    fn from(price: GeneratedPrice) -> Self {
        match price {
            GeneratedPrice::Number(value) => PriceInput::inr(value),
            // Bare numbers in text are rupees already
            GeneratedPrice::Text(text) => PriceInput::text(text),
        }
    }
}

/// Extract the JSON array from a model reply
pub(crate) fn parse_products(reply: &str) -> Result<Vec<RawCandidate>, CapabilityError> {
    let start = reply
        .find('[')
        .ok_or_else(|| CapabilityError::Malformed("reply contains no JSON array".into()))?;
    let end = reply
        .rfind(']')
        .filter(|end| *end > start)
        .ok_or_else(|| CapabilityError::Malformed("unterminated JSON array".into()))?;

    let items: Vec<serde_json::Value> = serde_json::from_str(&reply[start..=end])
        .map_err(|e| CapabilityError::Malformed(e.to_string()))?;

    let products = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<GeneratedProduct>(item) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!("Skipping unreadable generated product: {}", e);
                None
            }
        })
        .map(|product| {
            let category = product
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            RawCandidate::new(
                truncate(&product.title, MAX_TITLE_CHARS),
                category,
                product.price.into(),
            )
            .with_description(truncate(&product.description, MAX_DESCRIPTION_CHARS))
        })
        .collect();

    Ok(products)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

#[async_trait]
impl ProductGenerator for LlmProductGenerator {
    async fn generate(&self, brief: &GenerationBrief) -> Result<Vec<RawCandidate>, CapabilityError> {
        if !self.registry.has_alias(&self.model_alias) {
            return Err(CapabilityError::NotConfigured(format!(
                "no LLM provider serves model alias '{}'",
                self.model_alias
            )));
        }

        let options = GenerationOptions {
            system: Some(SYSTEM_PROMPT.to_string()),
            json_output: true,
            ..GenerationOptions::default()
        };
        let response = self
            .registry
            .generate(&self.model_alias, &Self::prompt(brief), &options)
            .await?;

        debug!(
            provider = %response.provider,
            model = %response.model,
            tokens = response.usage.total_tokens,
            "Product generation completed"
        );

        let mut products = parse_products(&response.text)?;
        products.truncate(brief.limit);
        Ok(products)
    }
}
