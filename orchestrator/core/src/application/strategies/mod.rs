// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! The six resolution tiers, in cascade order

pub mod local_business;
pub mod pattern_match;
pub mod semantic;
pub mod web_search;
pub mod context_aware;
pub mod fallback;

pub use context_aware::ContextAwareStrategy;
pub use fallback::DeterministicFallback;
pub use local_business::LocalBusinessStrategy;
pub use pattern_match::PatternMatchStrategy;
pub use semantic::SemanticGenerationStrategy;
pub use web_search::WebSearchStrategy;
