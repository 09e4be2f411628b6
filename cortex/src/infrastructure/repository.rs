// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository interface for pattern memory
//! Defines the storage contract every pattern backend must honor

use async_trait::async_trait;
use crate::domain::{Pattern, PatternKey};

/// Durable mapping from (signature, emotion) to proven categories.
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Create the pattern with a counter of 1, or increment the existing
    /// counter and union its categories. Atomic per key.
    async fn upsert(&self, key: &PatternKey, categories: &[String]) -> Result<Pattern, CortexError>;

    /// Find the pattern stored under `key`
    async fn lookup(&self, key: &PatternKey) -> Result<Option<Pattern>, CortexError>;

    /// Most reinforced patterns first, ties broken by recency
    async fn top(&self, limit: usize) -> Result<Vec<Pattern>, CortexError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for CortexError {
    fn from(err: sled::Error) -> Self {
        CortexError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CortexError {
    fn from(err: serde_json::Error) -> Self {
        CortexError::Serialization(err.to_string())
    }
}

/// Ordering shared by all backends for [`PatternRepository::top`].
pub(crate) fn rank_patterns(mut patterns: Vec<Pattern>, limit: usize) -> Vec<Pattern> {
    patterns.sort_by(|a, b| {
        b.success_count
            .cmp(&a.success_count)
            .then_with(|| b.last_updated.cmp(&a.last_updated))
    });
    patterns.truncate(limit);
    patterns
}
