// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Price Normalization
//!
//! Every candidate price, whatever tier produced it, passes through
//! [`PriceNormalizer`] before it can reach a caller. The canonical currency is
//! the Indian rupee; foreign amounts are converted at one fixed rate.
//!
//! Text parsing rules:
//!
//! - thousands separators are dropped, then the first numeric substring wins
//! - its currency is the marker right next to it (`₹1,299`, `$15`, `15 USD`,
//!   `450 rupees`); without one, any rupee marker in the text means INR, else
//!   any `$`, `USD` or `dollar` marker means USD, else INR
//! - text with no numeric substring yields `None`, which the validator drops
//!
//! Full precision is kept in [`Price::amount`]; only [`Price::display`] rounds.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_USD_TO_INR: f64 = 83.0;

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(₹|\brs\.?|\binr|\$|\busd)\s*$").expect("valid regex")
});

static TRAILING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(rupees?\b|inr\b|rs\b|usd\b|dollars?\b)").expect("valid regex")
});

static RUPEE_SYMBOL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"₹\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));

static RS_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\brs\.?\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));

static RUPEES_WORD_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*rupees?\b").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
}

/// A canonical (INR, non-negative, finite) price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price {
    amount: f64,
}

impl Price {
    pub const CURRENCY: Currency = Currency::Inr;

    /// Build a canonical price. Negative amounts clamp to zero; non-finite
    /// amounts are rejected.
    pub fn inr(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Some(Self {
            amount: amount.max(0.0),
        })
    }

    pub fn zero() -> Self {
        Self { amount: 0.0 }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whole rupees, as shown to users
    pub fn rounded(&self) -> u64 {
        self.amount.round() as u64
    }

    /// `₹1,23,457` style rendering with Indian digit grouping
    pub fn display(&self) -> String {
        format!("₹{}", group_indian(self.rounded()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Any price representation a strategy may emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Amount { value: f64, currency: Currency },
    Text(String),
}

impl PriceInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn inr(value: f64) -> Self {
        Self::Amount {
            value,
            currency: Currency::Inr,
        }
    }

    pub fn usd(value: f64) -> Self {
        Self::Amount {
            value,
            currency: Currency::Usd,
        }
    }
}

impl From<Price> for PriceInput {
    fn from(price: Price) -> Self {
        Self::inr(price.amount())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceNormalizer {
    usd_to_inr: f64,
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_USD_TO_INR)
    }
}

impl PriceNormalizer {
    pub fn new(usd_to_inr: f64) -> Self {
        Self { usd_to_inr }
    }

    pub fn usd_to_inr(&self) -> f64 {
        self.usd_to_inr
    }

    pub fn normalize(&self, input: &PriceInput) -> Option<Price> {
        match input {
            PriceInput::Amount { value, currency } => self.convert(*value, *currency),
            PriceInput::Text(text) => self.parse_text(text),
        }
    }

    fn convert(&self, value: f64, currency: Currency) -> Option<Price> {
        match currency {
            Currency::Inr => Price::inr(value),
            Currency::Usd => Price::inr(value * self.usd_to_inr),
        }
    }

    fn parse_text(&self, text: &str) -> Option<Price> {
        let lowered = text.to_lowercase().replace(',', "");
        let number = FIRST_NUMBER.find(&lowered)?;
        let value: f64 = number.as_str().parse().ok()?;

        let currency = adjacent_currency(&lowered[..number.start()], &lowered[number.end()..])
            .unwrap_or_else(|| mentioned_currency(&lowered));
        self.convert(value, currency)
    }

    /// Pull the first rupee-marked amount (`₹1,299`, `Rs. 450`, `300 rupees`)
    /// out of free text, e.g. a search snippet.
    pub fn find_price_mention(text: &str) -> Option<String> {
        [&*RUPEE_SYMBOL_MENTION, &*RS_MENTION, &*RUPEES_WORD_MENTION]
            .iter()
            .find_map(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|amount| format!("₹{}", amount.as_str()))
    }
}

fn marker_currency(marker: &str) -> Currency {
    if marker.contains('$') || marker.starts_with("usd") || marker.starts_with("dollar") {
        Currency::Usd
    } else {
        Currency::Inr
    }
}

/// Currency of the marker touching the amount, if any; a rupee marker on
/// either side wins
fn adjacent_currency(before: &str, after: &str) -> Option<Currency> {
    let leading = LEADING_MARKER
        .captures(before)
        .and_then(|caps| caps.get(1))
        .map(|m| marker_currency(m.as_str()));
    let trailing = TRAILING_MARKER
        .captures(after)
        .and_then(|caps| caps.get(1))
        .map(|m| marker_currency(m.as_str()));

    match (leading, trailing) {
        (Some(Currency::Inr), _) | (_, Some(Currency::Inr)) => Some(Currency::Inr),
        (leading, trailing) => leading.or(trailing),
    }
}

fn mentioned_currency(text: &str) -> Currency {
    let rupee = text.contains('₹')
        || text.contains("rupee")
        || text.contains("inr")
        || RS_MENTION.is_match(text);
    if rupee {
        Currency::Inr
    } else if text.contains('$') || text.contains("usd") || text.contains("dollar") {
        Currency::Usd
    } else {
        Currency::Inr
    }
}

fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
