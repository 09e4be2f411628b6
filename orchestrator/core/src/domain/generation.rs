// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Product Generation Capability
//!
//! Generating tiers describe what they want as a [`GenerationBrief`] and hand
//! it to a [`ProductGenerator`]. Adapters decide how to satisfy the brief: an
//! LLM writes products from scratch, a catalog looks categories up.

use async_trait::async_trait;

use super::ambient::AmbientContext;
use super::llm::LLMError;
use super::price::Price;

/// Category slugs the product catalogs understand
pub const CATALOG_CATEGORIES: &[&str] = &[
    "furniture",
    "beauty",
    "laptops",
    "smartphones",
    "mens-shirts",
    "womens-dresses",
    "fragrances",
    "home-decoration",
    "groceries",
    "sports-accessories",
    "sunglasses",
    "kitchen-accessories",
    "mens-watches",
    "womens-jewellery",
    "skin-care",
];

/// Given to generated products that arrive without a category
pub const UNCATEGORIZED: &str = "general";

pub fn is_catalog_category(category: &str) -> bool {
    CATALOG_CATEGORIES.contains(&category)
}

/// Labels that say nothing about what a product is; never worth remembering
pub fn is_placeholder_category(category: &str) -> bool {
    category.trim().is_empty() || category.eq_ignore_ascii_case(UNCATEGORIZED)
}

#[derive(Debug, Clone, PartialEq)]
pub enum BriefKind {
    /// Products matching the shopper's own words
    FreeText { text: String },
    /// Products from already-known categories
    Categories { categories: Vec<String> },
    /// Products suited to the current season, festival and time of day
    Ambient { text: String, context: AmbientContext },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationBrief {
    pub kind: BriefKind,
    pub emotion: String,
    pub budget: Option<Price>,
    pub limit: usize,
}

impl GenerationBrief {
    pub fn free_text(text: impl Into<String>, emotion: impl Into<String>, limit: usize) -> Self {
        Self {
            kind: BriefKind::FreeText { text: text.into() },
            emotion: emotion.into(),
            budget: None,
            limit,
        }
    }

    pub fn categories(categories: Vec<String>, emotion: impl Into<String>, limit: usize) -> Self {
        Self {
            kind: BriefKind::Categories { categories },
            emotion: emotion.into(),
            budget: None,
            limit,
        }
    }

    pub fn ambient(
        text: impl Into<String>,
        context: AmbientContext,
        emotion: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            kind: BriefKind::Ambient {
                text: text.into(),
                context,
            },
            emotion: emotion.into(),
            budget: None,
            limit,
        }
    }

    pub fn with_budget(mut self, budget: Option<Price>) -> Self {
        self.budget = budget;
        self
    }
}

/// Failure of an external capability (generator, search, classifier)
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("Capability not configured: {0}")]
    NotConfigured(String),

    #[error("Brief not supported by this generator: {0}")]
    Unsupported(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Llm(#[from] LLMError),
}

impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        CapabilityError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait ProductGenerator: Send + Sync {
    async fn generate(
        &self,
        brief: &GenerationBrief,
    ) -> Result<Vec<super::candidate::RawCandidate>, CapabilityError>;

    /// Whether a category brief naming `category` can be answered
    fn serves_category(&self, category: &str) -> bool {
        !is_placeholder_category(category)
    }
}
