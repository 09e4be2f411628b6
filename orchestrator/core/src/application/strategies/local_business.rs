// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tier 1: products registered by local businesses

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::domain::business::BusinessQuery;
use crate::domain::candidate::StrategyId;
use crate::domain::repository::BusinessDirectory;
use crate::domain::request::ShoppingRequest;
use crate::domain::strategy::{ResolutionContext, ResolutionStrategy, StrategyError, StrategyOutcome};

pub const LOCAL_BUSINESS_LIMIT: usize = 6;

pub struct LocalBusinessStrategy {
    directory: Arc<dyn BusinessDirectory>,
}

impl LocalBusinessStrategy {
    pub fn new(directory: Arc<dyn BusinessDirectory>) -> Self {
        Self { directory }
    }

    fn query_for(request: &ShoppingRequest) -> BusinessQuery {
        let mut terms = request.keywords();
        terms.extend(request.category_hints().iter().cloned());
        BusinessQuery {
            emotion: request.emotion().label.clone(),
            terms,
            limit: LOCAL_BUSINESS_LIMIT,
        }
    }
}

#[async_trait]
impl ResolutionStrategy for LocalBusinessStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::LocalBusiness
    }

    async fn resolve(
        &self,
        request: &ShoppingRequest,
        _ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError> {
        let query = Self::query_for(request);
        if query.terms.is_empty() {
            return Ok(StrategyOutcome::no_result("no searchable words in request"));
        }

        // an unreachable directory reads the same as an empty one
        let products = match self.directory.search(&query).await {
            Ok(products) => products,
            Err(e) => {
                warn!("Business directory lookup failed: {}", e);
                return Ok(StrategyOutcome::no_result(format!("directory unavailable: {}", e)));
            }
        };

        if products.is_empty() {
            return Ok(StrategyOutcome::no_result("no matching local products"));
        }

        Ok(StrategyOutcome::Found(
            products.iter().map(|p| p.to_raw_candidate()).collect(),
        ))
    }
}
