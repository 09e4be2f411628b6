// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Resolution Analytics
//!
//! Append-only records written once per resolution and once per piece of
//! shopper feedback, plus the pure aggregation used by the summary report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::candidate::StrategyId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub id: Uuid,
    pub request_text: String,
    pub emotion: String,
    pub strategy: StrategyId,
    pub candidate_count: usize,
    pub latency_ms: u64,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    PerfectMatch,
    Good,
    NotRelevant,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::PerfectMatch => "perfect_match",
            FeedbackKind::Good => "good",
            FeedbackKind::NotRelevant => "not_relevant",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "perfect_match" | "perfect" => Ok(FeedbackKind::PerfectMatch),
            "good" => Ok(FeedbackKind::Good),
            "not_relevant" => Ok(FeedbackKind::NotRelevant),
            other => Err(format!(
                "unknown feedback kind '{}' (expected perfect_match, good or not_relevant)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub request_text: String,
    pub emotion: String,
    pub product_name: String,
    pub kind: FeedbackKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyId>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyUsage {
    pub strategy: StrategyId,
    pub count: usize,
    pub avg_candidates: f64,
    pub avg_latency_ms: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCount {
    pub kind: FeedbackKind,
    pub strategy: Option<StrategyId>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub since: DateTime<Utc>,
    pub total_resolutions: usize,
    /// Most used strategy first
    pub strategies: Vec<StrategyUsage>,
    pub feedback: Vec<FeedbackCount>,
}

impl AnalyticsSummary {
    /// Aggregate everything at or after `since`
    pub fn compute(
        records: &[AnalyticsRecord],
        feedback: &[FeedbackRecord],
        since: DateTime<Utc>,
    ) -> Self {
        #[derive(Default)]
        struct Acc {
            count: usize,
            candidates: usize,
            latency: u64,
            successes: usize,
        }

        let mut per_strategy: BTreeMap<StrategyId, Acc> = BTreeMap::new();
        let mut total = 0;
        for record in records.iter().filter(|r| r.timestamp >= since) {
            total += 1;
            let acc = per_strategy.entry(record.strategy).or_default();
            acc.count += 1;
            acc.candidates += record.candidate_count;
            acc.latency = acc.latency.saturating_add(record.latency_ms);
            if record.success {
                acc.successes += 1;
            }
        }

        let mut strategies: Vec<StrategyUsage> = per_strategy
            .into_iter()
            .map(|(strategy, acc)| {
                let n = acc.count as f64;
                StrategyUsage {
                    strategy,
                    count: acc.count,
                    avg_candidates: acc.candidates as f64 / n,
                    avg_latency_ms: acc.latency as f64 / n,
                    success_rate: acc.successes as f64 / n,
                }
            })
            .collect();
        // stable sort keeps cascade order among ties
        strategies.sort_by(|a, b| b.count.cmp(&a.count));

        let mut per_kind: BTreeMap<(FeedbackKind, Option<StrategyId>), usize> = BTreeMap::new();
        for record in feedback.iter().filter(|f| f.timestamp >= since) {
            *per_kind.entry((record.kind, record.strategy)).or_default() += 1;
        }
        let feedback = per_kind
            .into_iter()
            .map(|((kind, strategy), count)| FeedbackCount { kind, strategy, count })
            .collect();

        Self {
            since,
            total_resolutions: total,
            strategies,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(strategy: StrategyId, count: usize, latency: u64, age_days: i64) -> AnalyticsRecord {
        AnalyticsRecord {
            id: Uuid::new_v4(),
            request_text: "q".into(),
            emotion: "neutral".into(),
            strategy,
            candidate_count: count,
            latency_ms: latency,
            success: strategy != StrategyId::Fallback,
            timestamp: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_summary_groups_and_windows() {
        let records = vec![
            record(StrategyId::SemanticGeneration, 6, 100, 0),
            record(StrategyId::SemanticGeneration, 4, 300, 1),
            record(StrategyId::Fallback, 3, 10, 2),
            record(StrategyId::LocalBusiness, 1, 5, 30),
        ];
        let since = Utc::now() - Duration::days(7);
        let summary = AnalyticsSummary::compute(&records, &[], since);

        assert_eq!(summary.total_resolutions, 3);
        assert_eq!(summary.strategies.len(), 2);
        let semantic = &summary.strategies[0];
        assert_eq!(semantic.strategy, StrategyId::SemanticGeneration);
        assert_eq!(semantic.count, 2);
        assert!((semantic.avg_candidates - 5.0).abs() < f64::EPSILON);
        assert!((semantic.avg_latency_ms - 200.0).abs() < f64::EPSILON);
        assert!((semantic.success_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(summary.strategies[1].success_rate, 0.0);
    }

    #[test]
    fn test_feedback_breakdown() {
        let fb = |kind, strategy| FeedbackRecord {
            id: Uuid::new_v4(),
            request_text: "q".into(),
            emotion: "happy".into(),
            product_name: "p".into(),
            kind,
            strategy,
            timestamp: Utc::now(),
        };
        let feedback = vec![
            fb(FeedbackKind::Good, Some(StrategyId::WebSearch)),
            fb(FeedbackKind::Good, Some(StrategyId::WebSearch)),
            fb(FeedbackKind::NotRelevant, None),
        ];
        let summary = AnalyticsSummary::compute(&[], &feedback, Utc::now() - Duration::days(1));
        assert_eq!(summary.feedback.len(), 2);
        assert_eq!(
            summary.feedback[0],
            FeedbackCount {
                kind: FeedbackKind::Good,
                strategy: Some(StrategyId::WebSearch),
                count: 2
            }
        );
    }

    #[test]
    fn test_feedback_kind_parsing() {
        assert_eq!("perfect-match".parse::<FeedbackKind>(), Ok(FeedbackKind::PerfectMatch));
        assert_eq!("NOT_RELEVANT".parse::<FeedbackKind>(), Ok(FeedbackKind::NotRelevant));
        assert!("meh".parse::<FeedbackKind>().is_err());
    }
}
