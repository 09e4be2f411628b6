// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Products registered by local businesses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::candidate::RawCandidate;
use super::price::{Price, PriceInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessProductId(pub Uuid);

impl BusinessProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BusinessProductId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProduct {
    pub id: BusinessProductId,
    pub business_name: String,
    pub business_email: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub target_emotions: Vec<String>,
    pub stock: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration form for a new listing
#[derive(Debug, Clone)]
pub struct NewBusinessProduct {
    pub business_name: String,
    pub business_email: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub target_emotions: Vec<String>,
    pub stock: u32,
}

impl BusinessProduct {
    pub fn register(form: NewBusinessProduct) -> Self {
        Self {
            id: BusinessProductId::new(),
            business_name: form.business_name.trim().to_string(),
            business_email: form.business_email.trim().to_lowercase(),
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            price: form.price,
            category: form.category.trim().to_lowercase(),
            target_emotions: form
                .target_emotions
                .iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            stock: form.stock,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn targets(&self, emotion: &str) -> bool {
        let emotion = emotion.trim().to_lowercase();
        self.target_emotions.iter().any(|e| *e == emotion)
    }

    /// Case-insensitive substring match of any term against name, description or category
    pub fn matches_any(&self, terms: &[String]) -> bool {
        let name = self.name.to_lowercase();
        let description = self.description.to_lowercase();
        terms.iter().map(|t| t.to_lowercase()).any(|term| {
            !term.is_empty()
                && (name.contains(&term) || description.contains(&term) || self.category.contains(&term))
        })
    }

    pub fn to_raw_candidate(&self) -> RawCandidate {
        RawCandidate::new(&self.name, &self.category, PriceInput::from(self.price))
            .with_description(&self.description)
            .with_seller(&self.business_name)
    }
}

/// Lookup criteria for the local-business tier
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessQuery {
    pub emotion: String,
    pub terms: Vec<String>,
    pub limit: usize,
}

impl BusinessQuery {
    pub fn matches(&self, product: &BusinessProduct) -> bool {
        product.active && product.targets(&self.emotion) && product.matches_any(&self.terms)
    }
}
