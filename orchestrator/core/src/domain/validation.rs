// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Candidate Validation
//!
//! Turns raw tier output into [`Candidate`]s. A raw candidate survives only if
//! it has a non-blank name, a price the [`PriceNormalizer`] can read, a price
//! at or below the request budget (when one is set) and at least one
//! non-blank category. Rejected candidates are dropped, never repaired.
//!
//! An empty result is not an error: the orchestrator reads it as "this tier
//! had no result" and moves on.

use tracing::debug;

use super::candidate::{Candidate, RawCandidate, StrategyId};
use super::price::{Price, PriceNormalizer};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("candidate has no name")]
    EmptyName,

    #[error("price {0:?} has no numeric value")]
    UnparseablePrice(String),

    #[error("price {price} exceeds budget {budget}")]
    OverBudget { price: Price, budget: Price },

    #[error("candidate has no category")]
    NoCategory,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateValidator {
    normalizer: PriceNormalizer,
}

impl CandidateValidator {
    pub fn new(normalizer: PriceNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &PriceNormalizer {
        &self.normalizer
    }

    /// Keep the subset of `raw` that satisfies every structural and budget rule
    pub fn validate(
        &self,
        raw: Vec<RawCandidate>,
        budget: Option<Price>,
        source: StrategyId,
    ) -> Vec<Candidate> {
        raw.into_iter()
            .filter_map(|candidate| {
                let name = candidate.name.clone();
                match self.check(candidate, budget, source) {
                    Ok(valid) => Some(valid),
                    Err(rejection) => {
                        debug!(strategy = %source, candidate = %name, "Dropped candidate: {}", rejection);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn check(
        &self,
        raw: RawCandidate,
        budget: Option<Price>,
        source: StrategyId,
    ) -> Result<Candidate, Rejection> {
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }

        let price = self
            .normalizer
            .normalize(&raw.price)
            .ok_or_else(|| Rejection::UnparseablePrice(format!("{:?}", raw.price)))?;

        if let Some(budget) = budget {
            if price.amount() > budget.amount() {
                return Err(Rejection::OverBudget { price, budget });
            }
        }

        let mut categories: Vec<String> = Vec::new();
        for category in &raw.categories {
            let category = category.trim().to_lowercase();
            if !category.is_empty() && !categories.contains(&category) {
                categories.push(category);
            }
        }
        if categories.is_empty() {
            return Err(Rejection::NoCategory);
        }

        Ok(Candidate {
            name: name.to_string(),
            description: raw.description.trim().to_string(),
            categories,
            price,
            source,
            source_url: raw.source_url.filter(|url| !url.trim().is_empty()),
            context_tags: raw.context_tags,
            seller: raw.seller,
        })
    }
}
