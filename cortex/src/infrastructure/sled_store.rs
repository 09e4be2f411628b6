// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Sled-backed pattern repository
//!
//! Patterns are stored as JSON under `emotion \x1f signature` in the
//! `patterns` tree. Upserts go through `update_and_fetch`, which sled retries
//! as a compare-and-swap loop, so concurrent successes never lose a count.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::domain::{Pattern, PatternKey};
use crate::infrastructure::repository::{rank_patterns, CortexError, PatternRepository};

const PATTERN_TREE: &str = "patterns";

#[derive(Clone)]
pub struct SledPatternRepository {
    tree: sled::Tree,
}

impl SledPatternRepository {
    /// Open (or create) a standalone database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CortexError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    /// Use the `patterns` tree of an already opened database
    pub fn from_db(db: &sled::Db) -> Result<Self, CortexError> {
        Ok(Self {
            tree: db.open_tree(PATTERN_TREE)?,
        })
    }

    fn decode(bytes: &[u8]) -> Result<Pattern, CortexError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl PatternRepository for SledPatternRepository {
    async fn upsert(&self, key: &PatternKey, categories: &[String]) -> Result<Pattern, CortexError> {
        let mut failure: Option<CortexError> = None;

        let stored = self.tree.update_and_fetch(key.storage_key(), |current| {
            failure = None;
            let next = match current {
                Some(bytes) => match Self::decode(bytes) {
                    Ok(mut pattern) => {
                        pattern.reinforce(categories);
                        pattern
                    }
                    Err(e) => {
                        failure = Some(e);
                        return Some(bytes.to_vec());
                    }
                },
                None => Pattern::new(key.clone(), categories),
            };

            match serde_json::to_vec(&next) {
                Ok(encoded) => Some(encoded),
                Err(e) => {
                    failure = Some(e.into());
                    current.map(|bytes| bytes.to_vec())
                }
            }
        })?;

        if let Some(e) = failure {
            return Err(e);
        }

        let bytes = stored.ok_or_else(|| {
            CortexError::Storage(format!("pattern vanished during upsert: {}", key.signature))
        })?;
        let pattern = Self::decode(&bytes)?;
        debug!(
            signature = %pattern.signature,
            emotion = %pattern.emotion,
            success_count = pattern.success_count,
            "Pattern upserted"
        );

        Ok(pattern)
    }

    async fn lookup(&self, key: &PatternKey) -> Result<Option<Pattern>, CortexError> {
        match self.tree.get(key.storage_key())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn top(&self, limit: usize) -> Result<Vec<Pattern>, CortexError> {
        let mut all = Vec::new();
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            all.push(Self::decode(&bytes)?);
        }
        Ok(rank_patterns(all, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuerySignature;

    #[tokio::test]
    async fn test_patterns_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let key = PatternKey::new(QuerySignature::generalize("relax after work"), "stressed");

        {
            let repo = SledPatternRepository::open(dir.path()).unwrap();
            repo.upsert(&key, &["fragrances".to_string()]).await.unwrap();
            repo.upsert(&key, &["beauty".to_string()]).await.unwrap();
        }

        let repo = SledPatternRepository::open(dir.path()).unwrap();
        let pattern = repo.lookup(&key).await.unwrap().unwrap();
        assert_eq!(pattern.success_count, 2);
        assert_eq!(pattern.categories, vec!["fragrances", "beauty"]);
    }
}
