// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain model of the resolution engine: requests, candidates, prices,
//! the strategy contract and the capability interfaces tiers consume.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure types and traits; no I/O

pub mod ambient;
pub mod analytics;
pub mod business;
pub mod candidate;
pub mod config;
pub mod emotion;
pub mod generation;
pub mod llm;
pub mod price;
pub mod repository;
pub mod request;
pub mod resolution;
pub mod search;
pub mod strategy;
pub mod validation;
