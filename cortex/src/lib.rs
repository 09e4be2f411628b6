// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `neurochat-cortex`: Resolution Pattern Memory
//!
//! Remembers which product categories satisfied a generalized shopping
//! request for a given emotion, so the resolution cascade can short-circuit
//! on proven patterns instead of calling costlier generation tiers.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Pattern`, `QuerySignature`, `CortexEvent` |
//! | [`application`] | Application | `CortexService` learning loop |
//! | [`infrastructure`] | Infrastructure | `PatternRepository` + in-memory and sled stores |
//!
//! Patterns are never deleted or decayed here; retention is an operator concern.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
pub use application::*;
pub use infrastructure::*;
