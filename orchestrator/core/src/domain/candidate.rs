// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Product candidates, before and after validation

use serde::{Deserialize, Serialize};
use std::fmt;

use super::price::{Price, PriceInput};

/// Identifier of a resolution tier, in cascade order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    LocalBusiness,
    PatternMatch,
    SemanticGeneration,
    WebSearch,
    ContextAware,
    Fallback,
}

impl StrategyId {
    pub const ALL: [StrategyId; 6] = [
        StrategyId::LocalBusiness,
        StrategyId::PatternMatch,
        StrategyId::SemanticGeneration,
        StrategyId::WebSearch,
        StrategyId::ContextAware,
        StrategyId::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::LocalBusiness => "local_business",
            StrategyId::PatternMatch => "pattern_match",
            StrategyId::SemanticGeneration => "semantic_generation",
            StrategyId::WebSearch => "web_search",
            StrategyId::ContextAware => "context_aware",
            StrategyId::Fallback => "fallback",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategyId::LocalBusiness => "Local Business",
            StrategyId::PatternMatch => "Historical Pattern",
            StrategyId::SemanticGeneration => "Semantic AI",
            StrategyId::WebSearch => "Web Search",
            StrategyId::ContextAware => "Context AI",
            StrategyId::Fallback => "Safety Fallback",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated strategy output. Prices are still in whatever form the
/// collaborator produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub price: PriceInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}

impl RawCandidate {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: PriceInput) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            categories: vec![category.into()],
            price,
            source_url: None,
            context_tags: Vec::new(),
            seller: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_context_tags(mut self, tags: Vec<String>) -> Self {
        self.context_tags = tags;
        self
    }

    pub fn with_seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = Some(seller.into());
        self
    }
}

/// A validated recommendation: canonical price, at least one category.
/// Produced by [`super::validation::CandidateValidator`], or by the safety
/// fallback from its own fixed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub price: Price,
    pub source: StrategyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}
