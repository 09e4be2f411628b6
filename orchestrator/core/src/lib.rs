// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `neurochat-core`: Cascading Product Resolution
//!
//! Turns a shopping request plus an emotion reading into a short list of
//! product recommendations by trying resolution tiers in a fixed order until
//! one produces valid candidates.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | request/candidate model, prices, validator, strategy contract, config |
//! | [`application`] | Application | `ResolutionService`, the six tiers, `AnalyticsRecorder` |
//! | [`infrastructure`] | Infrastructure | LLM providers, catalog, web search, classifier, repositories |

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
