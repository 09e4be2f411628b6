// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application services for the pattern memory bounded context

pub mod cortex_service;

pub use cortex_service::{CortexService, EventBus, NullEventBus, StandardCortexService, TracingEventBus};
