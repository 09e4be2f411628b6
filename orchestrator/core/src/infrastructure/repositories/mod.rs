// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository traits declared in
//! `crate::domain::repository`.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve business listings and analytics
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **InMemoryBusinessDirectory** / **InMemoryAnalyticsLog**: mutex-guarded
//!   collections for tests and throwaway runs
//! - **SledBusinessDirectory** / **SledAnalyticsLog**: embedded sled trees,
//!   sharing one database with the pattern store

pub mod sled_store;

pub use sled_store::{SledAnalyticsLog, SledBusinessDirectory};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::domain::analytics::{AnalyticsRecord, FeedbackRecord};
use crate::domain::business::{BusinessProduct, BusinessQuery};
use crate::domain::repository::{newest_first, AnalyticsLog, BusinessDirectory, RepositoryError};

#[derive(Clone, Default)]
pub struct InMemoryBusinessDirectory {
    products: Arc<Mutex<Vec<BusinessProduct>>>,
}

impl InMemoryBusinessDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusinessDirectory for InMemoryBusinessDirectory {
    async fn add(&self, product: BusinessProduct) -> Result<(), RepositoryError> {
        self.products.lock().push(product);
        Ok(())
    }

    async fn search(&self, query: &BusinessQuery) -> Result<Vec<BusinessProduct>, RepositoryError> {
        let matches = self
            .products
            .lock()
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        Ok(newest_first(matches, query.limit))
    }

    async fn list_by_business(&self, email: &str) -> Result<Vec<BusinessProduct>, RepositoryError> {
        let email = email.trim().to_lowercase();
        let owned = self
            .products
            .lock()
            .iter()
            .filter(|p| p.active && p.business_email == email)
            .cloned()
            .collect();
        Ok(newest_first(owned, usize::MAX))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAnalyticsLog {
    records: Arc<Mutex<Vec<AnalyticsRecord>>>,
    feedback: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl InMemoryAnalyticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Snapshot of every resolution record, oldest first
    pub fn records(&self) -> Vec<AnalyticsRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl AnalyticsLog for InMemoryAnalyticsLog {
    async fn append(&self, record: AnalyticsRecord) -> Result<(), RepositoryError> {
        self.records.lock().push(record);
        Ok(())
    }

    async fn append_feedback(&self, record: FeedbackRecord) -> Result<(), RepositoryError> {
        self.feedback.lock().push(record);
        Ok(())
    }

    async fn records_since(&self, since: DateTime<Utc>) -> Result<Vec<AnalyticsRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| r.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn feedback_since(&self, since: DateTime<Utc>) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        Ok(self
            .feedback
            .lock()
            .iter()
            .filter(|f| f.timestamp >= since)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::business::NewBusinessProduct;
    use crate::domain::price::Price;

    fn listing(email: &str, name: &str, emotions: &[&str]) -> BusinessProduct {
        BusinessProduct::register(NewBusinessProduct {
            business_name: "Shop".into(),
            business_email: email.into(),
            name: name.into(),
            description: String::new(),
            price: Price::inr(100.0).unwrap(),
            category: "home-decoration".into(),
            target_emotions: emotions.iter().map(|e| e.to_string()).collect(),
            stock: 1,
        })
    }

    #[tokio::test]
    async fn test_directory_search_is_newest_first_and_limited() {
        let directory = InMemoryBusinessDirectory::new();
        for i in 0..8 {
            let mut product = listing("a@shop.in", &format!("Candle {}", i), &["stressed"]);
            product.created_at = Utc::now() + chrono::Duration::seconds(i);
            directory.add(product).await.unwrap();
        }
        directory.add(listing("a@shop.in", "Lamp", &["happy"])).await.unwrap();

        let query = BusinessQuery {
            emotion: "stressed".into(),
            terms: vec!["candle".into()],
            limit: 6,
        };
        let found = directory.search(&query).await.unwrap();
        assert_eq!(found.len(), 6);
        assert_eq!(found[0].name, "Candle 7");
    }

    #[tokio::test]
    async fn test_list_by_business_normalizes_email() {
        let directory = InMemoryBusinessDirectory::new();
        directory.add(listing("Owner@Shop.in", "Lamp", &["happy"])).await.unwrap();
        directory.add(listing("other@shop.in", "Mat", &["happy"])).await.unwrap();

        let owned = directory.list_by_business(" OWNER@shop.in ").await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "Lamp");
    }
}
