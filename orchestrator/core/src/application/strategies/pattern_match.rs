// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tier 2: reuse categories that satisfied similar requests before

use async_trait::async_trait;
use neurochat_cortex::CortexService;
use std::sync::Arc;
use tracing::debug;

use crate::domain::candidate::StrategyId;
use crate::domain::generation::{GenerationBrief, ProductGenerator};
use crate::domain::request::ShoppingRequest;
use crate::domain::strategy::{ResolutionContext, ResolutionStrategy, StrategyError, StrategyOutcome};

/// How many remembered categories are turned into a brief
const PATTERN_CATEGORIES: usize = 2;
/// Candidates requested per remembered category
const PER_CATEGORY: usize = 3;

pub struct PatternMatchStrategy {
    cortex: Arc<dyn CortexService>,
    generator: Arc<dyn ProductGenerator>,
    min_successes: u64,
}

impl PatternMatchStrategy {
    pub fn new(
        cortex: Arc<dyn CortexService>,
        generator: Arc<dyn ProductGenerator>,
        min_successes: u64,
    ) -> Self {
        Self {
            cortex,
            generator,
            min_successes,
        }
    }
}

#[async_trait]
impl ResolutionStrategy for PatternMatchStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::PatternMatch
    }

    async fn resolve(
        &self,
        request: &ShoppingRequest,
        _ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError> {
        let pattern = match self
            .cortex
            .recall(request.text(), &request.emotion().label)
            .await?
        {
            Some(pattern) => pattern,
            None => return Ok(StrategyOutcome::no_result("no remembered pattern")),
        };

        if !pattern.is_proven(self.min_successes) {
            debug!(
                signature = %pattern.signature,
                success_count = pattern.success_count,
                "Pattern below trust threshold"
            );
            return Ok(StrategyOutcome::no_result(format!(
                "pattern seen {} time(s), need more than {}",
                pattern.success_count, self.min_successes
            )));
        }

        let categories: Vec<String> = pattern
            .categories
            .iter()
            .filter(|category| self.generator.serves_category(category))
            .take(PATTERN_CATEGORIES)
            .cloned()
            .collect();
        if categories.is_empty() {
            return Ok(StrategyOutcome::no_result("pattern has no catalog categories"));
        }

        let limit = categories.len() * PER_CATEGORY;
        let brief = GenerationBrief::categories(categories, &request.emotion().label, limit)
            .with_budget(request.budget());
        let raw = self.generator.generate(&brief).await?;

        Ok(StrategyOutcome::require_at_least(raw, 1))
    }
}
