// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain types for the pattern memory bounded context.

pub mod pattern;
pub mod signature;
pub mod events;

pub use pattern::*;
pub use signature::*;
pub use events::*;
