// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer for the pattern memory bounded context

pub mod repository;
pub mod in_memory;
pub mod sled_store;

pub use repository::{CortexError, PatternRepository};
pub use in_memory::InMemoryPatternRepository;
pub use sled_store::SledPatternRepository;
