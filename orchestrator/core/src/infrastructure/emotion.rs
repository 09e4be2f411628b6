// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Keyword polarity emotion classifier
//!
//! Scores the text against a small weighted lexicon, then refines the sign
//! of the polarity into a label using cue words. Negators ("not", "never")
//! flip and dampen the next scored word.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::emotion::EmotionClassifier;
use crate::domain::request::EmotionReading;

const POSITIVE_THRESHOLD: f64 = 0.3;
const NEGATIVE_THRESHOLD: f64 = -0.3;
const UNEASY_THRESHOLD: f64 = -0.1;
const NEUTRAL_CONFIDENCE: f64 = 0.3;

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("amazing", 0.8),
        ("awesome", 0.8),
        ("fantastic", 0.8),
        ("thrilled", 0.9),
        ("excited", 0.7),
        ("love", 0.6),
        ("great", 0.6),
        ("happy", 0.7),
        ("glad", 0.5),
        ("good", 0.5),
        ("nice", 0.4),
        ("celebrate", 0.6),
        ("celebrating", 0.6),
        ("wonderful", 0.8),
        ("joy", 0.7),
        ("sad", -0.7),
        ("unhappy", -0.6),
        ("lonely", -0.6),
        ("depressed", -0.8),
        ("miserable", -0.8),
        ("bad", -0.5),
        ("terrible", -0.8),
        ("awful", -0.8),
        ("hate", -0.7),
        ("stress", -0.6),
        ("stressed", -0.7),
        ("stressful", -0.7),
        ("overwhelmed", -0.7),
        ("pressure", -0.4),
        ("anxious", -0.6),
        ("worried", -0.5),
        ("frustrated", -0.7),
        ("frustrating", -0.7),
        ("annoyed", -0.6),
        ("irritated", -0.6),
        ("upset", -0.6),
        ("angry", -0.7),
        ("tired", -0.5),
        ("exhausted", -0.7),
        ("sleepy", -0.4),
        ("drained", -0.6),
        ("confused", -0.2),
        ("unsure", -0.2),
        ("lost", -0.2),
        ("undecided", -0.15),
        ("hmm", -0.1),
    ]
    .into_iter()
    .collect()
});

const NEGATORS: &[&str] = &["not", "no", "never", "hardly", "isn't", "don't", "didn't", "wasn't"];

const EXCITED_CUES: &[&str] = &["excited", "thrilled", "amazing", "fantastic"];
const STRESSED_CUES: &[&str] = &["stress", "overwhelm", "pressure", "busy", "anxious", "deadline"];
const FRUSTRATED_CUES: &[&str] = &["frustrat", "annoyed", "irritat", "upset", "angry"];
const TIRED_CUES: &[&str] = &["tired", "exhausted", "worn out", "sleepy", "drained"];

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconEmotionClassifier;

impl LexiconEmotionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Mean weight of the scored words, in [-1, 1]. Zero when nothing scored.
    pub fn polarity(text: &str) -> f64 {
        let lower = text.to_lowercase();
        let mut total = 0.0;
        let mut scored = 0usize;
        let mut negate = false;

        for token in lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
        {
            if NEGATORS.contains(&token) {
                negate = true;
                continue;
            }
            if let Some(weight) = LEXICON.get(token) {
                total += if negate { -0.5 * weight } else { *weight };
                scored += 1;
            }
            negate = false;
        }

        if scored == 0 {
            0.0
        } else {
            (total / scored as f64).clamp(-1.0, 1.0)
        }
    }

    pub fn classify_text(text: &str) -> EmotionReading {
        let polarity = Self::polarity(text);
        let lower = text.to_lowercase();
        let mentions = |cues: &[&str]| cues.iter().any(|cue| lower.contains(cue));

        let label = if polarity > POSITIVE_THRESHOLD {
            if mentions(EXCITED_CUES) {
                "excited"
            } else {
                "happy"
            }
        } else if polarity < NEGATIVE_THRESHOLD {
            if mentions(STRESSED_CUES) {
                "stressed"
            } else if mentions(FRUSTRATED_CUES) {
                "frustrated"
            } else if mentions(TIRED_CUES) {
                "tired"
            } else {
                "sad"
            }
        } else if polarity < UNEASY_THRESHOLD {
            "confused"
        } else {
            return EmotionReading::new(EmotionReading::NEUTRAL, NEUTRAL_CONFIDENCE);
        };

        EmotionReading::new(label, polarity.abs())
    }
}

#[async_trait]
impl EmotionClassifier for LexiconEmotionClassifier {
    async fn classify(&self, text: &str) -> EmotionReading {
        Self::classify_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> String {
        LexiconEmotionClassifier::classify_text(text).label
    }

    #[test]
    fn test_labels() {
        assert_eq!(label("I'm so excited about the trip, it's amazing"), "excited");
        assert_eq!(label("feeling happy today, want a nice gift"), "happy");
        assert_eq!(label("work stress is overwhelming, I'm stressed"), "stressed");
        assert_eq!(label("so frustrated with my old phone"), "frustrated");
        assert_eq!(label("exhausted after the night shift"), "tired");
        assert_eq!(label("feeling sad and lonely"), "sad");
        assert_eq!(label("I'm confused about which laptop"), "confused");
    }

    #[test]
    fn test_neutral_default() {
        let reading = LexiconEmotionClassifier::classify_text("need a phone case");
        assert_eq!(reading.label, "neutral");
        assert_eq!(reading.confidence, 0.3);
    }

    #[test]
    fn test_negation_dampens() {
        assert!(LexiconEmotionClassifier::polarity("not happy") < 0.0);
        assert_eq!(label("not bad at all"), "neutral");
    }

    #[tokio::test]
    async fn test_trait_classify() {
        let reading = LexiconEmotionClassifier::new().classify("feeling sad").await;
        assert_eq!(reading.label, "sad");
        assert!(reading.confidence > 0.3);
    }
}
