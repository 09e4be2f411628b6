// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Emotion classification capability

use async_trait::async_trait;

use super::request::EmotionReading;

/// Maps free text to an emotion label. Classifiers never fail; when they
/// cannot tell they answer neutral.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> EmotionReading;
}
