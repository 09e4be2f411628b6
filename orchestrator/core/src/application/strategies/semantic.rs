// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tier 3: generate products straight from the shopper's words

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::candidate::StrategyId;
use crate::domain::generation::{GenerationBrief, ProductGenerator};
use crate::domain::request::ShoppingRequest;
use crate::domain::strategy::{ResolutionContext, ResolutionStrategy, StrategyError, StrategyOutcome};

/// Requests this short or shorter carry too little meaning to generate from
const MIN_TEXT_CHARS: usize = 3;

pub struct SemanticGenerationStrategy {
    generator: Arc<dyn ProductGenerator>,
}

impl SemanticGenerationStrategy {
    pub fn new(generator: Arc<dyn ProductGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ResolutionStrategy for SemanticGenerationStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::SemanticGeneration
    }

    async fn resolve(
        &self,
        request: &ShoppingRequest,
        ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError> {
        let text = request.text().trim();
        if text.chars().count() <= MIN_TEXT_CHARS {
            return Ok(StrategyOutcome::no_result("request too short"));
        }

        let brief = GenerationBrief::free_text(text, &request.emotion().label, ctx.max_candidates)
            .with_budget(request.budget());
        let raw = self.generator.generate(&brief).await?;

        Ok(StrategyOutcome::require_at_least(raw, ctx.min_generated))
    }
}
