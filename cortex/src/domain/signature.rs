// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Query Signatures
//!
//! A [`QuerySignature`] is the learning key derived from free request text.
//! Generalization is pure and deterministic:
//!
//! 1. lowercase
//! 2. strip currency amounts (`₹500`, `rs. 1,200`, `$20`, `300 rupees`)
//! 3. strip punctuation (intra-word `'` and `-` survive)
//! 4. drop any token that still carries a digit
//! 5. collapse whitespace
//!
//! so budget phrasing never splits otherwise identical requests.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static PREFIXED_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:₹|\brs\.?|\binr\b|\$|\busd\b)\s*\d[\d,]*(?:\.\d+)?").expect("valid regex")
});

static SUFFIXED_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[\d,]*(?:\.\d+)?\s*(?:rupees?|rs|inr|dollars?|usd|bucks)\b\.?")
        .expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySignature(String);

impl QuerySignature {
    /// Generalize raw request text into its signature.
    pub fn generalize(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let without_prefixed = PREFIXED_AMOUNT.replace_all(&lowered, " ");
        let without_amounts = SUFFIXED_AMOUNT.replace_all(&without_prefixed, " ");

        let cleaned: String = without_amounts
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '\'' || c == '-' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let tokens: Vec<&str> = cleaned
            .split_whitespace()
            .map(|token| token.trim_matches(|c| c == '\'' || c == '-'))
            .filter(|token| !token.is_empty())
            .filter(|token| !token.chars().any(|c| c.is_ascii_digit()))
            .collect();

        Self(tokens.join(" "))
    }

    /// Wrap an already generalized signature (e.g. when loading from storage).
    pub fn from_generalized(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_text_does_not_change_signature() {
        assert_eq!(
            QuerySignature::generalize("Relax ₹500 work stress"),
            QuerySignature::generalize("relax work stress")
        );
    }

    #[test]
    fn test_case_and_whitespace_are_normalized() {
        let sig = QuerySignature::generalize("  Need   SOMETHING\tcalming \n");
        assert_eq!(sig.as_str(), "need something calming");
    }

    #[test]
    fn test_currency_forms_are_stripped() {
        for text in [
            "gift under rs. 1,200",
            "gift under Rs 1200",
            "gift under 1200 rupees",
            "gift under $15",
            "gift under INR 999.50",
        ] {
            assert_eq!(QuerySignature::generalize(text).as_str(), "gift under", "{text}");
        }
    }

    #[test]
    fn test_numeric_tokens_are_stripped() {
        let sig = QuerySignature::generalize("2 candles, 500ml oil & 3rd-gen lamp");
        assert_eq!(sig.as_str(), "candles oil lamp");
    }

    #[test]
    fn test_intra_word_punctuation_survives() {
        let sig = QuerySignature::generalize("I'm stressed -- need a self-care kit!");
        assert_eq!(sig.as_str(), "i'm stressed need a self-care kit");
    }

    #[test]
    fn test_generalization_is_idempotent() {
        let once = QuerySignature::generalize("Relax after ₹500 work stress!!");
        let twice = QuerySignature::generalize(once.as_str());
        assert_eq!(once, twice);
    }
}
