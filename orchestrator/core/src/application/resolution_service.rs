// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Resolution Orchestrator
//!
//! Drives the cascade for one [`ShoppingRequest`]:
//!
//! 1. Tiers run strictly in order, each under its own timeout.
//! 2. Errors and timeouts are downgraded to "no result" and the next tier runs.
//! 3. Raw output is normalized and validated; the first tier with at least
//!    one valid candidate wins and later tiers are never called.
//! 4. When every tier comes up empty the [`DeterministicFallback`] answers.
//!
//! A non-fallback win is learned into the pattern store, and every
//! resolution is appended to the analytics log. Neither side effect can fail
//! the resolution.

use chrono::Utc;
use neurochat_cortex::CortexService;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::analytics_recorder::AnalyticsRecorder;
use super::strategies::{
    ContextAwareStrategy, DeterministicFallback, LocalBusinessStrategy, PatternMatchStrategy,
    SemanticGenerationStrategy, WebSearchStrategy,
};
use crate::domain::analytics::{FeedbackKind, FeedbackRecord};
use crate::domain::candidate::{Candidate, StrategyId};
use crate::domain::config::ResolutionConfig;
use crate::domain::generation::{is_placeholder_category, ProductGenerator};
use crate::domain::repository::{BusinessDirectory, RepositoryError};
use crate::domain::request::{EmotionReading, ShoppingRequest};
use crate::domain::resolution::{summary_message, ResolutionResult, TierAttempt, TierOutcome};
use crate::domain::search::WebSearch;
use crate::domain::strategy::{ResolutionContext, ResolutionStrategy, StrategyOutcome};
use crate::domain::validation::CandidateValidator;

pub const ATTEMPTS_METRIC: &str = "neurochat_strategy_attempts_total";
pub const LATENCY_METRIC: &str = "neurochat_resolution_latency_ms";

#[derive(Debug, Clone)]
pub struct ResolutionSettings {
    pub strategy_timeout: Duration,
    pub min_generated: usize,
    pub max_candidates: usize,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self::from(&ResolutionConfig::default())
    }
}

impl From<&ResolutionConfig> for ResolutionSettings {
    fn from(config: &ResolutionConfig) -> Self {
        Self {
            strategy_timeout: Duration::from_millis(config.strategy_timeout_ms),
            min_generated: config.min_generated,
            max_candidates: config.max_candidates.max(1),
        }
    }
}

/// Ordered tiers 1 to 5. The safety fallback is held separately by the service.
#[derive(Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn ResolutionStrategy>>,
}

/// Collaborators of the standard cascade
pub struct ChainDependencies {
    pub directory: Arc<dyn BusinessDirectory>,
    pub cortex: Arc<dyn CortexService>,
    /// Answers category briefs for the pattern tier
    pub catalog: Arc<dyn ProductGenerator>,
    /// Answers free-text and ambient briefs
    pub generator: Arc<dyn ProductGenerator>,
    pub search: Arc<dyn WebSearch>,
    pub pattern_min_successes: u64,
}

impl StrategyChain {
    pub fn standard(deps: ChainDependencies) -> Self {
        Self::new()
            .then(Arc::new(LocalBusinessStrategy::new(deps.directory)))
            .then(Arc::new(PatternMatchStrategy::new(
                deps.cortex,
                deps.catalog,
                deps.pattern_min_successes,
            )))
            .then(Arc::new(SemanticGenerationStrategy::new(deps.generator.clone())))
            .then(Arc::new(WebSearchStrategy::new(deps.search)))
            .then(Arc::new(ContextAwareStrategy::new(deps.generator)))
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, strategy: Arc<dyn ResolutionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn ids(&self) -> Vec<StrategyId> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Shopper feedback on one surfaced product
#[derive(Debug, Clone)]
pub struct FeedbackSubmission {
    pub request_text: String,
    pub emotion: EmotionReading,
    pub product_name: String,
    pub kind: FeedbackKind,
    pub strategy: Option<StrategyId>,
    /// Categories of the product; guessed from the request when empty
    pub categories: Vec<String>,
}

pub struct ResolutionServiceBuilder {
    chain: StrategyChain,
    cortex: Arc<dyn CortexService>,
    recorder: AnalyticsRecorder,
    validator: CandidateValidator,
    fallback: DeterministicFallback,
    settings: ResolutionSettings,
}

impl ResolutionServiceBuilder {
    pub fn validator(mut self, validator: CandidateValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn settings(mut self, settings: ResolutionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> ResolutionService {
        ResolutionService {
            chain: self.chain,
            cortex: self.cortex,
            recorder: self.recorder,
            validator: self.validator,
            fallback: self.fallback,
            settings: self.settings,
        }
    }
}

pub struct ResolutionService {
    chain: StrategyChain,
    cortex: Arc<dyn CortexService>,
    recorder: AnalyticsRecorder,
    validator: CandidateValidator,
    fallback: DeterministicFallback,
    settings: ResolutionSettings,
}

impl ResolutionService {
    pub fn builder(
        chain: StrategyChain,
        cortex: Arc<dyn CortexService>,
        recorder: AnalyticsRecorder,
    ) -> ResolutionServiceBuilder {
        ResolutionServiceBuilder {
            chain,
            cortex,
            recorder,
            validator: CandidateValidator::default(),
            fallback: DeterministicFallback::new(),
            settings: ResolutionSettings::default(),
        }
    }

    pub fn settings(&self) -> &ResolutionSettings {
        &self.settings
    }

    pub fn recorder(&self) -> &AnalyticsRecorder {
        &self.recorder
    }

    pub async fn resolve(&self, request: &ShoppingRequest) -> ResolutionResult {
        let started = Instant::now();
        let ctx = ResolutionContext::new(self.settings.min_generated, self.settings.max_candidates);
        let mut attempts = Vec::with_capacity(self.chain.len() + 1);
        let mut winner: Option<(StrategyId, Vec<Candidate>)> = None;

        for strategy in &self.chain.strategies {
            let tier_started = Instant::now();
            let id = strategy.id();
            let (outcome, detail, candidates) = self.run_tier(strategy.as_ref(), request, &ctx).await;

            metrics::counter!(ATTEMPTS_METRIC, "strategy" => id.as_str(), "outcome" => outcome.as_str())
                .increment(1);
            debug!(strategy = %id, outcome = %outcome, "Tier finished");
            attempts.push(TierAttempt {
                strategy: id,
                outcome,
                latency_ms: elapsed_ms(tier_started),
                detail,
            });

            if let Some(candidates) = candidates {
                winner = Some((id, candidates));
                break;
            }
        }

        let (strategy, mut candidates) = match winner {
            Some(found) => found,
            None => {
                let tier_started = Instant::now();
                let picks = self.fallback.resolve(request).into_vec();
                metrics::counter!(
                    ATTEMPTS_METRIC,
                    "strategy" => StrategyId::Fallback.as_str(),
                    "outcome" => TierOutcome::Found.as_str()
                )
                .increment(1);
                attempts.push(TierAttempt {
                    strategy: StrategyId::Fallback,
                    outcome: TierOutcome::Found,
                    latency_ms: elapsed_ms(tier_started),
                    detail: None,
                });
                (StrategyId::Fallback, picks)
            }
        };
        candidates.truncate(self.settings.max_candidates.max(1));

        let latency_ms = elapsed_ms(started);
        metrics::histogram!(LATENCY_METRIC, "strategy" => strategy.as_str()).record(latency_ms as f64);

        let success = strategy != StrategyId::Fallback;
        let result = ResolutionResult {
            request_id: request.id(),
            message: summary_message(strategy, candidates.len(), &request.emotion().label),
            candidates,
            strategy,
            attempts,
            latency_ms,
            success,
        };

        info!(
            request_id = %result.request_id,
            strategy = %result.strategy,
            candidates = result.candidates.len(),
            latency_ms = result.latency_ms,
            "Resolution complete"
        );

        if success {
            self.learn(request, &result).await;
        }
        self.recorder.record_resolution(request, &result).await;

        result
    }

    async fn run_tier(
        &self,
        strategy: &dyn ResolutionStrategy,
        request: &ShoppingRequest,
        ctx: &ResolutionContext,
    ) -> (TierOutcome, Option<String>, Option<Vec<Candidate>>) {
        let id = strategy.id();
        match tokio::time::timeout(self.settings.strategy_timeout, strategy.resolve(request, ctx)).await {
            Ok(Ok(StrategyOutcome::Found(raw))) => {
                let produced = raw.len();
                let valid = self.validator.validate(raw, request.budget(), id);
                if valid.is_empty() {
                    (
                        TierOutcome::Rejected,
                        Some(format!("all {} candidate(s) failed validation", produced)),
                        None,
                    )
                } else {
                    (TierOutcome::Found, None, Some(valid))
                }
            }
            Ok(Ok(StrategyOutcome::NoResult(reason))) => (TierOutcome::NoResult, Some(reason), None),
            Ok(Err(e)) => {
                warn!(strategy = %id, "Tier failed, falling through: {}", e);
                (TierOutcome::Failed, Some(e.to_string()), None)
            }
            Err(_) => {
                warn!(
                    strategy = %id,
                    timeout_ms = self.settings.strategy_timeout.as_millis() as u64,
                    "Tier timed out, falling through"
                );
                (
                    TierOutcome::TimedOut,
                    Some(format!("no answer within {:?}", self.settings.strategy_timeout)),
                    None,
                )
            }
        }
    }

    async fn learn(&self, request: &ShoppingRequest, result: &ResolutionResult) {
        let categories: Vec<String> = result
            .categories()
            .into_iter()
            .filter(|category| !is_placeholder_category(category))
            .collect();
        if categories.is_empty() {
            debug!(
                request_id = %result.request_id,
                "Winning products carry no real category; nothing to learn"
            );
            return;
        }
        match self
            .cortex
            .learn(request.text(), &request.emotion().label, &categories)
            .await
        {
            Ok(pattern) => debug!(
                signature = %pattern.signature,
                success_count = pattern.success_count,
                "Pattern reinforced"
            ),
            Err(e) => warn!(request_id = %result.request_id, "Failed to learn pattern: {}", e),
        }
    }

    /// Store feedback; a perfect match also reinforces the request's pattern
    pub async fn record_feedback(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackRecord, RepositoryError> {
        let record = FeedbackRecord {
            id: Uuid::new_v4(),
            request_text: submission.request_text.clone(),
            emotion: submission.emotion.label.clone(),
            product_name: submission.product_name.trim().to_string(),
            kind: submission.kind,
            strategy: submission.strategy,
            timestamp: Utc::now(),
        };
        self.recorder.record_feedback(record.clone()).await?;

        if submission.kind == FeedbackKind::PerfectMatch {
            let named: Vec<String> = submission
                .categories
                .iter()
                .filter(|category| !is_placeholder_category(category))
                .cloned()
                .collect();
            let categories = if named.is_empty() {
                let request = ShoppingRequest::new(&submission.request_text, submission.emotion.clone());
                vec![DeterministicFallback::guess_category(&request)]
            } else {
                named
            };
            if let Err(e) = self
                .cortex
                .learn(&submission.request_text, &submission.emotion.label, &categories)
                .await
            {
                warn!("Failed to reinforce pattern from feedback: {}", e);
            }
        }

        Ok(record)
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}
