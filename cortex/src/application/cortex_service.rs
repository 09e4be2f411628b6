// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # CortexService: Resolution Pattern Learning
//!
//! Every successful resolution is generalized into a [`QuerySignature`] and
//! stored as a [`Pattern`] keyed by (signature, emotion). Repeat successes
//! reinforce the same entry: the counter grows by one and the category set
//! absorbs whatever categories the winning tier produced.
//!
//! Callers never generalize text themselves; `learn` and `recall` both go
//! through [`QuerySignature::generalize`] so the two sides always agree.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{CortexEvent, Pattern, PatternKey, QuerySignature};
use crate::infrastructure::{CortexError, PatternRepository};

/// Event bus trait for publishing domain events
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: CortexEvent) -> Result<(), CortexError>;
}

/// Publishes events to the tracing subscriber only
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventBus;

#[async_trait]
impl EventBus for TracingEventBus {
    async fn publish(&self, event: CortexEvent) -> Result<(), CortexError> {
        info!(event_type = event.event_type(), "{:?}", event);
        Ok(())
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventBus;

#[async_trait]
impl EventBus for NullEventBus {
    async fn publish(&self, _event: CortexEvent) -> Result<(), CortexError> {
        Ok(())
    }
}

#[async_trait]
pub trait CortexService: Send + Sync {
    /// Record a successful resolution of `request_text` for `emotion`
    async fn learn(
        &self,
        request_text: &str,
        emotion: &str,
        categories: &[String],
    ) -> Result<Pattern, CortexError>;

    /// Find the pattern learned for the generalized form of `request_text`
    async fn recall(&self, request_text: &str, emotion: &str) -> Result<Option<Pattern>, CortexError>;

    /// Most reinforced patterns, for analytics
    async fn top_patterns(&self, limit: usize) -> Result<Vec<Pattern>, CortexError>;
}

pub struct StandardCortexService {
    pattern_repo: Arc<dyn PatternRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl StandardCortexService {
    pub fn new(pattern_repo: Arc<dyn PatternRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            pattern_repo,
            event_bus,
        }
    }

    fn key_for(request_text: &str, emotion: &str) -> PatternKey {
        PatternKey::new(QuerySignature::generalize(request_text), emotion)
    }
}

#[async_trait]
impl CortexService for StandardCortexService {
    async fn learn(
        &self,
        request_text: &str,
        emotion: &str,
        categories: &[String],
    ) -> Result<Pattern, CortexError> {
        let key = Self::key_for(request_text, emotion);
        let pattern = self.pattern_repo.upsert(&key, categories).await?;

        let event = if pattern.success_count == 1 {
            CortexEvent::PatternDiscovered {
                pattern_id: pattern.id,
                signature: pattern.signature.to_string(),
                emotion: pattern.emotion.clone(),
                categories: pattern.categories.clone(),
                timestamp: Utc::now(),
            }
        } else {
            CortexEvent::PatternReinforced {
                pattern_id: pattern.id,
                old_count: pattern.success_count - 1,
                new_count: pattern.success_count,
                categories: pattern.categories.clone(),
                timestamp: Utc::now(),
            }
        };
        // Events are best effort once the upsert is stored
        if let Err(e) = self.event_bus.publish(event).await {
            warn!(signature = %pattern.signature, "Failed to publish cortex event: {}", e);
        }

        Ok(pattern)
    }

    async fn recall(&self, request_text: &str, emotion: &str) -> Result<Option<Pattern>, CortexError> {
        self.pattern_repo.lookup(&Self::key_for(request_text, emotion)).await
    }

    async fn top_patterns(&self, limit: usize) -> Result<Vec<Pattern>, CortexError> {
        self.pattern_repo.top(limit).await
    }
}
