// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shopping request value object
//!
//! A request is built once (text, emotion, optional budget and category
//! hints) and is read-only from then on: every tier sees the same request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::price::Price;

const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "need", "want", "something", "some", "that", "this", "help",
    "feel", "feeling", "i'm", "im", "me", "my", "really", "very", "just", "get", "buy", "looking",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emotion label plus classifier confidence (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub label: String,
    pub confidence: f64,
}

impl EmotionReading {
    pub const NEUTRAL: &'static str = "neutral";

    pub fn new(label: &str, confidence: f64) -> Self {
        let label = label.trim().to_lowercase();
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label: if label.is_empty() {
                Self::NEUTRAL.to_string()
            } else {
                label
            },
            confidence,
        }
    }

    pub fn neutral() -> Self {
        Self::new(Self::NEUTRAL, 0.3)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingRequest {
    id: RequestId,
    text: String,
    emotion: EmotionReading,
    budget: Option<Price>,
    category_hints: Vec<String>,
    created_at: DateTime<Utc>,
}

impl ShoppingRequest {
    pub fn new(text: impl Into<String>, emotion: EmotionReading) -> Self {
        Self {
            id: RequestId::new(),
            text: text.into(),
            emotion,
            budget: None,
            category_hints: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_budget(mut self, budget: Price) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_category_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.category_hints = hints
            .into_iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn emotion(&self) -> &EmotionReading {
        &self.emotion
    }

    pub fn budget(&self) -> Option<Price> {
        self.budget
    }

    pub fn category_hints(&self) -> &[String] {
        &self.category_hints
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Lowercase content words of the request, used for keyword matching
    pub fn keywords(&self) -> Vec<String> {
        self.text
            .to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
            .filter(|w| w.chars().count() >= 3)
            .filter(|w| !STOPWORDS.contains(w))
            .map(str::to_string)
            .collect()
    }
}
