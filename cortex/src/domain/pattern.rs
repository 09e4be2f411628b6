// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::signature::QuerySignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternId(pub Uuid);

impl PatternId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PatternId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique key of a pattern: one entry per (signature, emotion).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    pub signature: QuerySignature,
    pub emotion: String,
}

impl PatternKey {
    pub fn new(signature: QuerySignature, emotion: &str) -> Self {
        Self {
            signature,
            emotion: normalize_emotion(emotion),
        }
    }

    /// Byte key used by ordered key/value stores. The separator cannot occur in
    /// a generalized signature.
    pub fn storage_key(&self) -> Vec<u8> {
        format!("{}\u{1f}{}", self.emotion, self.signature).into_bytes()
    }
}

/// Categories that satisfied a generalized request for one emotion.
///
/// # Invariants
///
/// - `success_count` starts at 1 and is never decremented.
/// - `categories` is deduplicated, lowercase and keeps first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: PatternId,
    pub signature: QuerySignature,
    pub emotion: String,
    pub categories: Vec<String>,
    pub success_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Pattern {
    pub fn new(key: PatternKey, categories: &[String]) -> Self {
        let now = Utc::now();
        let mut pattern = Self {
            id: PatternId::new(),
            signature: key.signature,
            emotion: key.emotion,
            categories: Vec::new(),
            success_count: 1,
            created_at: now,
            last_updated: now,
        };
        pattern.merge_categories(categories);
        pattern
    }

    pub fn key(&self) -> PatternKey {
        PatternKey {
            signature: self.signature.clone(),
            emotion: self.emotion.clone(),
        }
    }

    /// Record one more successful resolution for this key.
    pub fn reinforce(&mut self, categories: &[String]) {
        self.success_count = self.success_count.saturating_add(1);
        self.merge_categories(categories);
        self.last_updated = Utc::now();
    }

    /// A pattern is proven once its counter is strictly above `threshold`.
    pub fn is_proven(&self, threshold: u64) -> bool {
        self.success_count > threshold
    }

    fn merge_categories(&mut self, categories: &[String]) {
        for category in categories {
            let category = category.trim().to_lowercase();
            if !category.is_empty() && !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
    }
}

pub fn normalize_emotion(emotion: &str) -> String {
    emotion.trim().to_lowercase()
}
