// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! FakeStore catalog adapter
//!
//! A smaller secondary catalog, consulted when DummyJSON has nothing for a
//! category. FakeStore only knows four broad departments, so catalog slugs
//! are mapped onto them; products keep the slug they were asked for.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::domain::candidate::RawCandidate;
use crate::domain::generation::{
    is_catalog_category, BriefKind, CapabilityError, GenerationBrief, ProductGenerator,
};
use crate::domain::price::PriceInput;

const DEFAULT_DEPARTMENT: &str = "electronics";
const MAX_TITLE_CHARS: usize = 80;
const MAX_DESCRIPTION_CHARS: usize = 200;

const DEPARTMENTS: &[(&str, &str)] = &[
    ("beauty", "electronics"),
    ("furniture", "men's clothing"),
    ("laptops", "electronics"),
    ("smartphones", "electronics"),
    ("mens-shirts", "men's clothing"),
    ("womens-dresses", "women's clothing"),
    ("womens-jewellery", "jewelery"),
    ("fragrances", "electronics"),
    ("home-decoration", "electronics"),
];

pub struct FakeStoreCatalog {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct StoreProduct {
    title: String,
    price: f64,
    #[serde(default)]
    description: String,
}

impl FakeStoreCatalog {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// FakeStore department for a catalog slug
    pub fn department_for(category: &str) -> &'static str {
        DEPARTMENTS
            .iter()
            .find(|(slug, _)| *slug == category)
            .map(|(_, department)| *department)
            .unwrap_or(DEFAULT_DEPARTMENT)
    }

    async fn fetch_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<RawCandidate>, CapabilityError> {
        let url = format!(
            "{}/products/category/{}",
            self.endpoint.trim_end_matches('/'),
            Self::department_for(category)
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "NeuroChat/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CapabilityError::Transport(format!(
                "store department for '{}' returned HTTP {}",
                category,
                response.status()
            )));
        }

        let products: Vec<StoreProduct> = response
            .json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;

        Ok(products
            .into_iter()
            .take(limit)
            .map(|product| {
                RawCandidate::new(
                    truncate(&product.title, MAX_TITLE_CHARS),
                    category,
                    PriceInput::usd(product.price),
                )
                .with_description(truncate(&product.description, MAX_DESCRIPTION_CHARS))
                .with_seller("Alternative Store")
            })
            .collect())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

#[async_trait]
impl ProductGenerator for FakeStoreCatalog {
    async fn generate(&self, brief: &GenerationBrief) -> Result<Vec<RawCandidate>, CapabilityError> {
        let categories = match &brief.kind {
            BriefKind::Categories { categories } => categories,
            _ => {
                return Err(CapabilityError::Unsupported(
                    "the store only answers category briefs".into(),
                ))
            }
        };
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let per_category = brief.limit.div_ceil(categories.len()).max(1);
        let mut products = Vec::new();
        let mut last_error = None;

        for category in categories {
            match self.fetch_category(category, per_category).await {
                Ok(found) => products.extend(found),
                Err(e) => {
                    warn!(category = %category, "Store lookup failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if products.is_empty() => Err(e),
            _ => {
                products.truncate(brief.limit);
                Ok(products)
            }
        }
    }

    fn serves_category(&self, category: &str) -> bool {
        is_catalog_category(category)
    }
}
