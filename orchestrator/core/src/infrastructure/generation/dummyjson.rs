// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! DummyJSON catalog adapter
//!
//! Answers category briefs from `GET {endpoint}/products/category/{slug}`.
//! Catalog prices are USD; conversion happens in the validator. A category
//! that comes back empty or fails is retried against an optional secondary
//! catalog.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::candidate::RawCandidate;
use crate::domain::generation::{
    is_catalog_category, BriefKind, CapabilityError, GenerationBrief, ProductGenerator,
};
use crate::domain::price::PriceInput;

/// Products taken from the secondary catalog per missing category
const SECONDARY_PER_CATEGORY: usize = 2;

pub struct DummyJsonCatalog {
    client: Client,
    endpoint: String,
    secondary: Option<Arc<dyn ProductGenerator>>,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    products: Vec<CatalogProduct>,
}

#[derive(Debug, Deserialize)]
struct CatalogProduct {
    title: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
}

impl DummyJsonCatalog {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn ProductGenerator>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    async fn fetch_secondary(
        &self,
        category: &str,
        emotion: &str,
    ) -> Option<Result<Vec<RawCandidate>, CapabilityError>> {
        let secondary = self.secondary.as_ref()?;
        debug!(category = %category, "Trying secondary catalog");
        let brief =
            GenerationBrief::categories(vec![category.to_string()], emotion, SECONDARY_PER_CATEGORY);
        Some(secondary.generate(&brief).await)
    }

    async fn fetch_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<RawCandidate>, CapabilityError> {
        let url = format!(
            "{}/products/category/{}",
            self.endpoint.trim_end_matches('/'),
            category
        );

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .header("User-Agent", "NeuroChat/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CapabilityError::Transport(format!(
                "catalog category '{}' returned HTTP {}",
                category,
                response.status()
            )));
        }

        let page: CatalogPage = response
            .json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;

        Ok(page
            .products
            .into_iter()
            .take(limit)
            .map(|product| {
                let raw = RawCandidate::new(
                    product.title,
                    product.category.unwrap_or_else(|| category.to_string()),
                    PriceInput::usd(product.price),
                )
                .with_description(product.description);
                match product.brand {
                    Some(brand) => raw.with_seller(brand),
                    None => raw,
                }
            })
            .collect())
    }
}

#[async_trait]
impl ProductGenerator for DummyJsonCatalog {
    async fn generate(&self, brief: &GenerationBrief) -> Result<Vec<RawCandidate>, CapabilityError> {
        let categories = match &brief.kind {
            BriefKind::Categories { categories } if !categories.is_empty() => categories,
            BriefKind::Categories { .. } => return Ok(Vec::new()),
            _ => {
                return Err(CapabilityError::Unsupported(
                    "the catalog only answers category briefs".into(),
                ))
            }
        };

        let per_category = brief.limit.div_ceil(categories.len()).max(1);
        let mut products = Vec::new();
        let mut last_error = None;

        for category in categories {
            let primary = match self.fetch_category(category, per_category).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(category = %category, "Catalog lookup failed: {}", e);
                    last_error = Some(e);
                    Vec::new()
                }
            };
            if !primary.is_empty() {
                products.extend(primary);
                continue;
            }

            match self.fetch_secondary(category, &brief.emotion).await {
                Some(Ok(found)) => products.extend(found),
                Some(Err(e)) => {
                    warn!(category = %category, "Secondary catalog lookup failed: {}", e);
                    last_error = Some(e);
                }
                None => {}
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
