// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Resolution Strategy Interface
//!
//! Every cascade tier implements [`ResolutionStrategy`]. A tier answers with
//! either a non-empty raw candidate list ([`StrategyOutcome::Found`]) or an
//! explicit [`StrategyOutcome::NoResult`]; it never reports "nothing found" as
//! an empty `Found`. Collaborator failures come back as [`StrategyError`] and
//! the orchestrator treats them exactly like `NoResult`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neurochat_cortex::CortexError;

use super::candidate::{RawCandidate, StrategyId};
use super::generation::CapabilityError;
use super::repository::RepositoryError;
use super::request::ShoppingRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Found(Vec<RawCandidate>),
    NoResult(String),
}

impl StrategyOutcome {
    /// `Found` when `raw` holds at least `min` candidates, `NoResult` otherwise
    pub fn require_at_least(raw: Vec<RawCandidate>, min: usize) -> Self {
        if raw.is_empty() || raw.len() < min {
            StrategyOutcome::NoResult(format!("{} candidate(s), need at least {}", raw.len(), min.max(1)))
        } else {
            StrategyOutcome::Found(raw)
        }
    }

    pub fn no_result(reason: impl Into<String>) -> Self {
        StrategyOutcome::NoResult(reason.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("External capability failed: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Directory lookup failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Pattern store failed: {0}")]
    PatternStore(#[from] CortexError),
}

/// Per-resolution ambient values shared by every tier
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub now: DateTime<Utc>,
    /// Minimum raw candidates a generating tier must return to count as a hit
    pub min_generated: usize,
    /// How many candidates a tier should aim for
    pub max_candidates: usize,
}

impl ResolutionContext {
    pub fn new(min_generated: usize, max_candidates: usize) -> Self {
        Self {
            now: Utc::now(),
            min_generated,
            max_candidates,
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    fn id(&self) -> StrategyId;

    async fn resolve(
        &self,
        request: &ShoppingRequest,
        ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError>;
}
