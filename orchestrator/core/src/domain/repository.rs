// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for the data the resolution engine owns, one trait
//! per aggregate, implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `BusinessDirectory` | `BusinessProduct` | `InMemoryBusinessDirectory`, `SledBusinessDirectory` |
//! | `AnalyticsLog` | `AnalyticsRecord`, `FeedbackRecord` | `InMemoryAnalyticsLog`, `SledAnalyticsLog` |
//!
//! Patterns live in `neurochat-cortex` behind its own `PatternRepository`.
//! The backend is chosen from `spec.storage` in the resolver config.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::analytics::{AnalyticsRecord, FeedbackRecord};
use super::business::{BusinessProduct, BusinessQuery};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    InMemory,
    Sled { path: PathBuf },
}

#[async_trait]
pub trait BusinessDirectory: Send + Sync {
    async fn add(&self, product: BusinessProduct) -> Result<(), RepositoryError>;

    /// Active products matching the query, newest first, at most `query.limit`
    async fn search(&self, query: &BusinessQuery) -> Result<Vec<BusinessProduct>, RepositoryError>;

    /// Active products of one business, newest first
    async fn list_by_business(&self, email: &str) -> Result<Vec<BusinessProduct>, RepositoryError>;
}

/// Append-only analytics and feedback log
#[async_trait]
pub trait AnalyticsLog: Send + Sync {
    async fn append(&self, record: AnalyticsRecord) -> Result<(), RepositoryError>;

    async fn append_feedback(&self, record: FeedbackRecord) -> Result<(), RepositoryError>;

    /// Records at or after `since`, oldest first
    async fn records_since(&self, since: DateTime<Utc>) -> Result<Vec<AnalyticsRecord>, RepositoryError>;

    async fn feedback_since(&self, since: DateTime<Utc>) -> Result<Vec<FeedbackRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for RepositoryError {
    fn from(err: sled::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Newest first, then truncate
pub(crate) fn newest_first(mut products: Vec<BusinessProduct>, limit: usize) -> Vec<BusinessProduct> {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    products.truncate(limit);
    products
}
