// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process engine wiring
//!
//! Builds the resolution service and its collaborators from a loaded
//! configuration manifest.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use neurochat_core::{
    application::{
        create_repositories, AnalyticsRecorder, ChainDependencies, ResolutionService,
        ResolutionSettings, StrategyChain,
    },
    domain::{
        config::{CatalogSource, ResolverConfigManifest},
        emotion::EmotionClassifier,
        generation::ProductGenerator,
        price::PriceNormalizer,
        repository::BusinessDirectory,
        validation::CandidateValidator,
    },
    infrastructure::{
        llm::ProviderRegistry, DummyJsonCatalog, FakeStoreCatalog, GoogleCustomSearch,
        LexiconEmotionClassifier, LlmProductGenerator,
    },
};
use neurochat_cortex::{CortexService, StandardCortexService, TracingEventBus};

pub struct Engine {
    pub service: ResolutionService,
    pub directory: Arc<dyn BusinessDirectory>,
    pub classifier: Arc<dyn EmotionClassifier>,
}

impl Engine {
    pub fn from_config(config: &ResolverConfigManifest) -> Result<Self> {
        config
            .validate()
            .context("Configuration validation failed")?;
        let spec = &config.spec;

        let repositories = create_repositories(&spec.storage.backend())
            .context("Failed to initialize storage")?;

        let cortex: Arc<dyn CortexService> = Arc::new(StandardCortexService::new(
            repositories.patterns.clone(),
            Arc::new(TracingEventBus),
        ));

        let registry = Arc::new(ProviderRegistry::from_config(spec));
        let generator: Arc<dyn ProductGenerator> = Arc::new(LlmProductGenerator::new(
            registry,
            spec.resolution.generation_model.clone(),
        ));
        let catalog: Arc<dyn ProductGenerator> = match spec.resolution.catalog {
            CatalogSource::Llm => generator.clone(),
            CatalogSource::DummyJson => {
                let primary = DummyJsonCatalog::new(spec.resolution.catalog_endpoint.clone());
                match &spec.resolution.secondary_catalog_endpoint {
                    Some(endpoint) => {
                        let secondary = Arc::new(FakeStoreCatalog::new(endpoint.clone()));
                        Arc::new(primary.with_secondary(secondary))
                    }
                    None => Arc::new(primary),
                }
            }
        };
        let search = Arc::new(GoogleCustomSearch::from_config(&spec.search));
        if !search.is_configured() {
            info!("Web search credentials not set; the web search tier will be skipped");
        }

        let chain = StrategyChain::standard(ChainDependencies {
            directory: repositories.directory.clone(),
            cortex: cortex.clone(),
            catalog,
            generator,
            search,
            pattern_min_successes: spec.resolution.pattern_min_successes,
        });
        info!("Resolution chain: {:?}", chain.ids());

        let normalizer = PriceNormalizer::new(spec.pricing.usd_to_inr);
        let recorder = AnalyticsRecorder::new(repositories.analytics.clone(), cortex.clone());
        let service = ResolutionService::builder(chain, cortex, recorder)
            .validator(CandidateValidator::new(normalizer))
            .settings(ResolutionSettings::from(&spec.resolution))
            .build();

        Ok(Self {
            service,
            directory: repositories.directory,
            classifier: Arc::new(LexiconEmotionClassifier::new()),
        })
    }
}
