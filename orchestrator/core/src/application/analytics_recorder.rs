// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Analytics Recorder
//!
//! Writes one [`AnalyticsRecord`] per resolution and one [`FeedbackRecord`]
//! per piece of shopper feedback. Writes issued by the resolution path never
//! fail the resolution; the summary side is read-only.

use chrono::{DateTime, Duration, Utc};
use neurochat_cortex::{CortexError, CortexService, Pattern};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsRecord, AnalyticsSummary, FeedbackRecord};
use crate::domain::repository::{AnalyticsLog, RepositoryError};
use crate::domain::request::ShoppingRequest;
use crate::domain::resolution::ResolutionResult;

#[derive(Clone)]
pub struct AnalyticsRecorder {
    log: Arc<dyn AnalyticsLog>,
    cortex: Arc<dyn CortexService>,
}

impl AnalyticsRecorder {
    pub fn new(log: Arc<dyn AnalyticsLog>, cortex: Arc<dyn CortexService>) -> Self {
        Self { log, cortex }
    }

    /// Append the record for a finished resolution; failures are logged only
    pub async fn record_resolution(&self, request: &ShoppingRequest, result: &ResolutionResult) {
        let record = AnalyticsRecord {
            id: Uuid::new_v4(),
            request_text: request.text().to_string(),
            emotion: request.emotion().label.clone(),
            strategy: result.strategy,
            candidate_count: result.candidates.len(),
            latency_ms: result.latency_ms,
            success: result.success,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.log.append(record).await {
            warn!(request_id = %result.request_id, "Failed to append analytics record: {}", e);
        }
    }

    pub async fn record_feedback(&self, record: FeedbackRecord) -> Result<(), RepositoryError> {
        self.log.append_feedback(record).await
    }

    /// Per-strategy and feedback aggregates over the trailing `days`; a
    /// window reaching past the representable range covers everything
    pub async fn summary(&self, days: i64) -> Result<AnalyticsSummary, RepositoryError> {
        let since = Duration::try_days(days.max(0))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let records = self.log.records_since(since).await?;
        let feedback = self.log.feedback_since(since).await?;
        Ok(AnalyticsSummary::compute(&records, &feedback, since))
    }

    pub async fn top_patterns(&self, limit: usize) -> Result<Vec<Pattern>, CortexError> {
        self.cortex.top_patterns(limit).await
    }
}
