// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod emotion;
pub mod generation;
pub mod llm;
pub mod repositories;
pub mod web_search;

pub use emotion::LexiconEmotionClassifier;
pub use generation::{DummyJsonCatalog, FakeStoreCatalog, LlmProductGenerator};
pub use web_search::GoogleCustomSearch;
