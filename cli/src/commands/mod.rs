// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the NeuroChat CLI

pub mod analytics;
pub mod business;
pub mod config;
pub mod feedback;
pub mod resolve;

pub use self::analytics::AnalyticsCommand;
pub use self::business::BusinessCommand;
pub use self::config::ConfigCommand;
pub use self::feedback::FeedbackArgs;
pub use self::resolve::ResolveArgs;
