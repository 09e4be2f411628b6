// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-memory pattern repository for tests and ephemeral runs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Pattern, PatternKey};
use crate::infrastructure::repository::{rank_patterns, CortexError, PatternRepository};

#[derive(Clone, Default)]
pub struct InMemoryPatternRepository {
    patterns: Arc<Mutex<HashMap<PatternKey, Pattern>>>,
}

impl InMemoryPatternRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.lock().is_empty()
    }
}

#[async_trait]
impl PatternRepository for InMemoryPatternRepository {
    async fn upsert(&self, key: &PatternKey, categories: &[String]) -> Result<Pattern, CortexError> {
        // read-increment-write happens under a single lock acquisition
        let mut patterns = self.patterns.lock();
        let pattern = patterns
            .entry(key.clone())
            .and_modify(|existing| existing.reinforce(categories))
            .or_insert_with(|| Pattern::new(key.clone(), categories));
        Ok(pattern.clone())
    }

    async fn lookup(&self, key: &PatternKey) -> Result<Option<Pattern>, CortexError> {
        Ok(self.patterns.lock().get(key).cloned())
    }

    async fn top(&self, limit: usize) -> Result<Vec<Pattern>, CortexError> {
        let all: Vec<Pattern> = self.patterns.lock().values().cloned().collect();
        Ok(rank_patterns(all, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuerySignature;

    fn key(text: &str) -> PatternKey {
        PatternKey::new(QuerySignature::generalize(text), "stressed")
    }

    #[tokio::test]
    async fn test_upsert_creates_then_increments() {
        let repo = InMemoryPatternRepository::new();
        let first = repo.upsert(&key("relax"), &["fragrances".to_string()]).await.unwrap();
        assert_eq!(first.success_count, 1);

        let second = repo.upsert(&key("relax"), &["beauty".to_string()]).await.unwrap();
        assert_eq!(second.success_count, 2);
        assert_eq!(second.id, first.id);
        assert_eq!(second.categories, vec!["fragrances", "beauty"]);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_keyed_by_emotion() {
        let repo = InMemoryPatternRepository::new();
        repo.upsert(&key("relax"), &["fragrances".to_string()]).await.unwrap();

        let other = PatternKey::new(QuerySignature::generalize("relax"), "happy");
        assert!(repo.lookup(&other).await.unwrap().is_none());
        assert!(repo.lookup(&key("RELAX")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_top_orders_by_success_count() {
        let repo = InMemoryPatternRepository::new();
        repo.upsert(&key("candles"), &[]).await.unwrap();
        for _ in 0..3 {
            repo.upsert(&key("tea"), &[]).await.unwrap();
        }

        let top = repo.top(1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].signature.as_str(), "tea");
        assert_eq!(top[0].success_count, 3);
    }
}
