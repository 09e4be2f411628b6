// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod analytics_recorder;
pub mod repository_factory;
pub mod resolution_service;
pub mod strategies;

pub use analytics_recorder::AnalyticsRecorder;
pub use repository_factory::{create_repositories, Repositories};
pub use resolution_service::{
    ChainDependencies, FeedbackSubmission, ResolutionService, ResolutionServiceBuilder,
    ResolutionSettings, StrategyChain,
};
