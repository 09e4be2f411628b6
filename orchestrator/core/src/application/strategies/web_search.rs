// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tier 4: real listings from a web search, kept only when they quote a rupee price

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::candidate::{RawCandidate, StrategyId};
use crate::domain::price::{PriceInput, PriceNormalizer};
use crate::domain::request::ShoppingRequest;
use crate::domain::search::{SearchHit, WebSearch};
use crate::domain::strategy::{ResolutionContext, ResolutionStrategy, StrategyError, StrategyOutcome};

use super::DeterministicFallback;

const MAX_TITLE_CHARS: usize = 80;
const MAX_DESCRIPTION_CHARS: usize = 180;

pub struct WebSearchStrategy {
    search: Arc<dyn WebSearch>,
}

impl WebSearchStrategy {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }

    pub fn query_for(text: &str) -> String {
        format!("{} buy online price India", text.trim())
    }

    /// Strip retailer suffixes ("Foo | Amazon.in", "Foo - Flipkart") and cap length
    pub fn clean_title(title: &str) -> String {
        let mut end = title.len();
        for sep in ["|", " - "] {
            if let Some(pos) = title.find(sep) {
                end = end.min(pos);
            }
        }
        title[..end].trim().chars().take(MAX_TITLE_CHARS).collect::<String>().trim().to_string()
    }

    /// Hits carry no category of their own; they inherit the request's best guess
    fn to_candidate(hit: &SearchHit, category: &str) -> Option<RawCandidate> {
        let link = hit.link.trim();
        if link.is_empty() {
            return None;
        }
        let price = PriceNormalizer::find_price_mention(&hit.snippet)
            .or_else(|| PriceNormalizer::find_price_mention(&hit.title))?;
        let title = Self::clean_title(&hit.title);
        if title.is_empty() {
            return None;
        }

        let description: String = hit.snippet.chars().take(MAX_DESCRIPTION_CHARS).collect();

        Some(
            RawCandidate::new(title, category, PriceInput::text(price))
                .with_description(description.trim())
                .with_source_url(link),
        )
    }
}

#[async_trait]
impl ResolutionStrategy for WebSearchStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::WebSearch
    }

    async fn resolve(
        &self,
        request: &ShoppingRequest,
        ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError> {
        if request.text().trim().is_empty() {
            return Ok(StrategyOutcome::no_result("empty request"));
        }

        let query = Self::query_for(request.text());
        let hits = self.search.search(&query, ctx.max_candidates.max(10)).await?;

        let category = DeterministicFallback::guess_category(request);
        let raw: Vec<RawCandidate> = hits
            .iter()
            .filter_map(|hit| Self::to_candidate(hit, &category))
            .take(ctx.max_candidates)
            .collect();

        Ok(StrategyOutcome::require_at_least(raw, ctx.min_generated))
    }
}
