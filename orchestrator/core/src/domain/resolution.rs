// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Outcome of a single resolution run

use serde::{Deserialize, Serialize};
use std::fmt;

use super::candidate::{Candidate, StrategyId};
use super::request::RequestId;

/// What happened when the orchestrator tried one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierOutcome {
    /// At least one candidate survived validation
    Found,
    /// The tier explicitly had nothing to offer
    NoResult,
    /// The tier produced output but every candidate was filtered out
    Rejected,
    /// A collaborator call failed
    Failed,
    /// The tier exceeded its time budget
    TimedOut,
}

impl TierOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierOutcome::Found => "found",
            TierOutcome::NoResult => "no_result",
            TierOutcome::Rejected => "rejected",
            TierOutcome::Failed => "failed",
            TierOutcome::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for TierOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAttempt {
    pub strategy: StrategyId,
    pub outcome: TierOutcome,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A candidate list that cannot be empty
#[derive(Debug, Clone, PartialEq)]
pub struct NonEmptyCandidates {
    head: Candidate,
    tail: Vec<Candidate>,
}

impl NonEmptyCandidates {
    pub fn new(head: Candidate, tail: Vec<Candidate>) -> Self {
        Self { head, tail }
    }

    pub fn from_vec(mut candidates: Vec<Candidate>) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        let head = candidates.remove(0);
        Some(Self { head, tail: candidates })
    }

    pub fn first(&self) -> &Candidate {
        &self.head
    }

    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        let mut all = Vec::with_capacity(1 + self.tail.len());
        all.push(self.head);
        all.extend(self.tail);
        all
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub request_id: RequestId,
    pub candidates: Vec<Candidate>,
    pub strategy: StrategyId,
    pub attempts: Vec<TierAttempt>,
    pub latency_ms: u64,
    /// True iff a tier other than the safety fallback won
    pub success: bool,
    pub message: String,
}

impl ResolutionResult {
    /// Categories of the surfaced candidates, first-seen order, deduplicated
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for category in self.candidates.iter().flat_map(|c| c.categories.iter()) {
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
        seen
    }
}

/// Human-facing summary line for a resolution
pub fn summary_message(strategy: StrategyId, count: usize, emotion: &str) -> String {
    match strategy {
        StrategyId::Fallback => format!(
            "Showing {} popular pick(s) while we learn what suits a {} mood",
            count, emotion
        ),
        other => format!(
            "Found {} recommendation(s) for a {} mood via {}",
            count,
            emotion,
            other.label()
        ),
    }
}
