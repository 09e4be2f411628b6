// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations based on the storage backend
//! configuration. The sled backend opens one database and hands each
//! repository its own tree, so patterns, listings and analytics share a
//! directory and a lock.

use anyhow::Context;
use neurochat_cortex::{InMemoryPatternRepository, PatternRepository, SledPatternRepository};
use std::sync::Arc;
use tracing::info;

use crate::domain::repository::{AnalyticsLog, BusinessDirectory, StorageBackend};
use crate::infrastructure::repositories::{
    InMemoryAnalyticsLog, InMemoryBusinessDirectory, SledAnalyticsLog, SledBusinessDirectory,
};

/// Every persistent store the resolution engine needs
#[derive(Clone)]
pub struct Repositories {
    pub patterns: Arc<dyn PatternRepository>,
    pub directory: Arc<dyn BusinessDirectory>,
    pub analytics: Arc<dyn AnalyticsLog>,
}

/// Creates all repositories for the configured backend
pub fn create_repositories(backend: &StorageBackend) -> anyhow::Result<Repositories> {
    match backend {
        StorageBackend::InMemory => {
            info!("Using in-memory storage; nothing survives this process");
            Ok(Repositories {
                patterns: Arc::new(InMemoryPatternRepository::new()),
                directory: Arc::new(InMemoryBusinessDirectory::new()),
                analytics: Arc::new(InMemoryAnalyticsLog::new()),
            })
        }
        StorageBackend::Sled { path } => {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create storage directory {:?}", path))?;
            let db = sled::open(path)
                .with_context(|| format!("Failed to open sled database at {:?}", path))?;
            info!("Opened sled storage at {:?}", path);

            Ok(Repositories {
                patterns: Arc::new(
                    SledPatternRepository::from_db(&db).context("Failed to open pattern store")?,
                ),
                directory: Arc::new(
                    SledBusinessDirectory::from_db(&db)
                        .context("Failed to open business directory")?,
                ),
                analytics: Arc::new(
                    SledAnalyticsLog::from_db(&db).context("Failed to open analytics log")?,
                ),
            })
        }
    }
}
