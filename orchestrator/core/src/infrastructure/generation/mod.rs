// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Product generation adapters

pub mod dummyjson;
pub mod fakestore;
pub mod llm_generator;

pub use dummyjson::DummyJsonCatalog;
pub use fakestore::FakeStoreCatalog;
pub use llm_generator::LlmProductGenerator;
