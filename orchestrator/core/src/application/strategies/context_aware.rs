// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tier 5: generate for the moment (season, festival, time of day) rather than the words

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::ambient::AmbientContext;
use crate::domain::candidate::StrategyId;
use crate::domain::generation::{GenerationBrief, ProductGenerator};
use crate::domain::request::ShoppingRequest;
use crate::domain::strategy::{ResolutionContext, ResolutionStrategy, StrategyError, StrategyOutcome};

pub struct ContextAwareStrategy {
    generator: Arc<dyn ProductGenerator>,
}

impl ContextAwareStrategy {
    pub fn new(generator: Arc<dyn ProductGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ResolutionStrategy for ContextAwareStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::ContextAware
    }

    async fn resolve(
        &self,
        request: &ShoppingRequest,
        ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError> {
        let ambient = AmbientContext::at(ctx.now);
        let tags = ambient.tags();

        let brief = GenerationBrief::ambient(
            request.text().trim(),
            ambient,
            &request.emotion().label,
            ctx.max_candidates,
        )
        .with_budget(request.budget());

        let raw = self
            .generator
            .generate(&brief)
            .await?
            .into_iter()
            .map(|mut candidate| {
                if candidate.context_tags.is_empty() {
                    candidate.context_tags = tags.clone();
                }
                candidate
            })
            .collect();

        Ok(StrategyOutcome::require_at_least(raw, 1))
    }
}
