// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Model Alias Resolution and Provider Management
//
// Manages LLM providers and resolves model aliases to concrete adapters.
// Retries transient failures with exponential backoff, then hands the
// prompt to the fallback provider if one is configured.

use crate::domain::config::{resolve_env_ref, LLMProviderConfig, LLMSelection, ResolverConfigSpec};
use crate::domain::llm::{GenerationOptions, GenerationResponse, LLMError, LLMProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gemini::GeminiAdapter;
use super::ollama::OllamaAdapter;
use super::openai::OpenAIAdapter;

struct AliasBinding {
    provider_name: String,
    provider: Arc<dyn LLMProvider>,
}

/// Registry for managing LLM providers and resolving model aliases
pub struct ProviderRegistry {
    /// First model of each provider, used when the provider is the fallback
    providers: HashMap<String, Arc<dyn LLMProvider>>,
    aliases: HashMap<String, AliasBinding>,
    fallback_provider: Option<String>,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl ProviderRegistry {
    /// Create provider registry from the resolver configuration
    pub fn from_config(config: &ResolverConfigSpec) -> Self {
        let mut registry = Self::empty(&config.llm_selection);

        info!("Initializing LLM provider registry");

        for provider_config in &config.llm_providers {
            if !provider_config.enabled {
                info!("Provider '{}' disabled, skipping", provider_config.name);
                continue;
            }

            if let Err(e) = registry.register(provider_config) {
                warn!("Failed to initialize provider '{}': {}", provider_config.name, e);
            }
        }

        if registry.providers.is_empty() {
            warn!("No LLM providers configured - generation tiers will report no result");
        }

        registry
    }

    /// Registry with no providers; every alias lookup fails
    pub fn empty(selection: &LLMSelection) -> Self {
        Self {
            providers: HashMap::new(),
            aliases: HashMap::new(),
            fallback_provider: selection.fallback_provider.clone(),
            max_retries: selection.max_retries.max(1),
            retry_delay_ms: selection.retry_delay_ms,
        }
    }

    /// Bind an alias to an already-built provider
    pub fn with_provider(
        mut self,
        provider_name: impl Into<String>,
        alias: impl Into<String>,
        provider: Arc<dyn LLMProvider>,
    ) -> Self {
        let provider_name = provider_name.into();
        self.providers
            .entry(provider_name.clone())
            .or_insert_with(|| provider.clone());
        self.aliases.insert(
            alias.into(),
            AliasBinding {
                provider_name,
                provider,
            },
        );
        self
    }

    fn register(&mut self, config: &LLMProviderConfig) -> anyhow::Result<()> {
        let api_key = match &config.api_key {
            Some(key) => resolve_env_ref(key)?,
            // Local providers run without auth
            None => String::new(),
        };

        if config.models.is_empty() {
            anyhow::bail!("No models configured");
        }

        for model_config in &config.models {
            let provider = Self::create_provider(config, &api_key, &model_config.model)?;
            info!(
                "Mapping alias '{}' -> {} ({})",
                model_config.alias, model_config.model, config.name
            );
            self.providers
                .entry(config.name.clone())
                .or_insert_with(|| provider.clone());
            self.aliases.insert(
                model_config.alias.clone(),
                AliasBinding {
                    provider_name: config.name.clone(),
                    provider,
                },
            );
        }

        Ok(())
    }

    fn create_provider(
        config: &LLMProviderConfig,
        api_key: &str,
        model: &str,
    ) -> anyhow::Result<Arc<dyn LLMProvider>> {
        let provider: Arc<dyn LLMProvider> = match config.provider_type.as_str() {
            // OpenAI-compatible APIs (LM Studio, vLLM, etc.) share the adapter
            "openai" | "openai-compatible" => Arc::new(OpenAIAdapter::new(
                config.endpoint.clone(),
                api_key.to_string(),
                model.to_string(),
            )),
            "ollama" => Arc::new(OllamaAdapter::new(config.endpoint.clone(), model.to_string())),
            "gemini" => Arc::new(GeminiAdapter::new(
                config.endpoint.clone(),
                api_key.to_string(),
                model.to_string(),
            )),
            other => anyhow::bail!("Unsupported provider type: {}", other),
        };

        Ok(provider)
    }

    /// Generate text using a model alias
    pub async fn generate(
        &self,
        alias: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let binding = self
            .aliases
            .get(alias)
            .ok_or_else(|| LLMError::ModelNotFound(format!("Model alias '{}' not found", alias)))?;

        let mut last_error = None;

        for attempt in 0..self.max_retries {
            match binding.provider.generate(prompt, options).await {
                Ok(response) => {
                    debug!("Generation successful on attempt {}", attempt + 1);
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        "Generation failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.max_retries,
                        e
                    );
                    let retryable = e.is_retryable();
                    last_error = Some(e);

                    if !retryable || attempt + 1 == self.max_retries {
                        break;
                    }

                    tokio::time::sleep(tokio::time::Duration::from_millis(
                        self.retry_delay_ms * 2_u64.pow(attempt),
                    ))
                    .await;
                }
            }
        }

        if let Some(fallback) = &self.fallback_provider {
            if fallback != &binding.provider_name {
                if let Some(fallback_provider) = self.providers.get(fallback) {
                    info!("Trying fallback provider: {}", fallback);
                    return fallback_provider.generate(prompt, options).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LLMError::Provider("Unknown error".into())))
    }

    /// Check health of all providers
    pub async fn health_check_all(&self) -> HashMap<String, Result<(), LLMError>> {
        let mut results = HashMap::new();

        for (name, provider) in &self.providers {
            info!("Health checking provider: {}", name);
            results.insert(name.clone(), provider.health_check().await);
        }

        results
    }

    pub fn available_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.aliases.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
