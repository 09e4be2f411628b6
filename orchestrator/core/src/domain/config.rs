// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Resolver Configuration Types
//
// Kubernetes-style manifest (apiVersion/kind/metadata/spec) for the
// resolution engine:
// - LLM provider configuration and model aliases
// - Cascade tuning (timeouts, thresholds, candidate limits)
// - Pricing, web search credentials, storage backend
// - Observability settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::price::DEFAULT_USD_TO_INR;
use super::repository::StorageBackend;

pub const API_VERSION: &str = "neurochat.ai/v1";
pub const KIND: &str = "ResolverConfig";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Environment variable not set: {0}")]
    MissingEnv(String),
}

/// Top-level resolver configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfigManifest {
    /// API version (must be "neurochat.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ResolverConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ResolverConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfigSpec {
    #[serde(default)]
    pub llm_providers: Vec<LLMProviderConfig>,

    #[serde(default)]
    pub llm_selection: LLMSelection,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMProviderConfig {
    /// Unique provider name (e.g., "ollama-local", "openai")
    pub name: String,

    /// "openai", "openai-compatible", "ollama" or "gemini"
    #[serde(rename = "type")]
    pub provider_type: String,

    pub endpoint: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Alias referenced by `resolution.generation_model`
    pub alias: String,

    /// Actual model identifier for the provider API
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_provider: Option<String>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff between retries
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

/// Where category-seeded briefs are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Ask the configured LLM to write products for the categories
    Llm,
    /// Look categories up in the DummyJSON product catalog (USD prices)
    DummyJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Per-tier time budget
    #[serde(default = "default_strategy_timeout")]
    pub strategy_timeout_ms: u64,

    /// A pattern is trusted once its success counter is strictly above this
    #[serde(default = "default_pattern_min_successes")]
    pub pattern_min_successes: u64,

    /// Minimum raw candidates the semantic and web search tiers need
    #[serde(default = "default_min_generated")]
    pub min_generated: usize,

    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Model alias used by the LLM product generator
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSource,

    #[serde(default = "default_catalog_endpoint")]
    pub catalog_endpoint: String,

    /// FakeStore-compatible catalog tried when a DummyJSON category is empty
    #[serde(
        default = "default_secondary_catalog_endpoint",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_catalog_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_usd_to_inr")]
    pub usd_to_inr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Google API key (supports "env:VAR_NAME")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Programmable Search Engine id (supports "env:VAR_NAME")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    InMemory,
    Sled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_kind")]
    pub backend: StorageKind,

    /// Database directory for the sled backend; defaults under the user data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    500
}

fn default_strategy_timeout() -> u64 {
    8000
}

fn default_pattern_min_successes() -> u64 {
    2
}

fn default_min_generated() -> usize {
    3
}

fn default_max_candidates() -> usize {
    6
}

fn default_generation_model() -> String {
    "default".to_string()
}

fn default_catalog() -> CatalogSource {
    CatalogSource::DummyJson
}

fn default_catalog_endpoint() -> String {
    "https://dummyjson.com".to_string()
}

fn default_secondary_catalog_endpoint() -> Option<String> {
    Some("https://fakestoreapi.com".to_string())
}

fn default_usd_to_inr() -> f64 {
    DEFAULT_USD_TO_INR
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_storage_kind() -> StorageKind {
    StorageKind::Sled
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LLMSelection {
    fn default() -> Self {
        Self {
            fallback_provider: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            strategy_timeout_ms: default_strategy_timeout(),
            pattern_min_successes: default_pattern_min_successes(),
            min_generated: default_min_generated(),
            max_candidates: default_max_candidates(),
            generation_model: default_generation_model(),
            catalog: default_catalog(),
            catalog_endpoint: default_catalog_endpoint(),
            secondary_catalog_endpoint: default_secondary_catalog_endpoint(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            usd_to_inr: default_usd_to_inr(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_search_endpoint(),
            api_key: Some("env:GOOGLE_SEARCH_API_KEY".to_string()),
            engine_id: Some("env:GOOGLE_SEARCH_ENGINE_ID".to_string()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_kind(),
            path: None,
        }
    }
}

impl StorageConfig {
    pub fn backend(&self) -> StorageBackend {
        match self.backend {
            StorageKind::InMemory => StorageBackend::InMemory,
            StorageKind::Sled => {
                let path = self
                    .path
                    .as_ref()
                    .map(|p| expand_home(p))
                    .or_else(|| dirs::data_local_dir().map(|d| d.join("neurochat")))
                    .unwrap_or_else(|| PathBuf::from(".neurochat-data"));
                StorageBackend::Sled { path }
            }
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Resolve a config value that may be written as "env:VAR_NAME"
pub fn resolve_env_ref(value: &str) -> Result<String, ConfigError> {
    match value.strip_prefix("env:") {
        Some(var_name) => {
            std::env::var(var_name).map_err(|_| ConfigError::MissingEnv(var_name.to_string()))
        }
        None => Ok(value.to_string()),
    }
}

impl Default for ResolverConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "neurochat".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: ResolverConfigSpec::default(),
        }
    }
}

impl ResolverConfigManifest {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Discover configuration file using precedence order
    /// 1. NEUROCHAT_CONFIG_PATH environment variable
    /// 2. ./neurochat-config.yaml (working directory)
    /// 3. ~/.neurochat/config.yaml (user home)
    /// 4. /etc/neurochat/config.yaml (system, Unix) or C:\ProgramData\NeuroChat\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("NEUROCHAT_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./neurochat-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".neurochat").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/neurochat/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\NeuroChat\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path fails hard when missing or invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::warn!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overrides from an arbitrary variable source
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("NEUROCHAT_USD_TO_INR") {
            match val.trim().parse::<f64>() {
                Ok(rate) => {
                    tracing::info!("Environment override: NEUROCHAT_USD_TO_INR={}", rate);
                    self.spec.pricing.usd_to_inr = rate;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for NEUROCHAT_USD_TO_INR: '{}'. Expected a number. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("NEUROCHAT_STRATEGY_TIMEOUT_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => {
                    tracing::info!("Environment override: NEUROCHAT_STRATEGY_TIMEOUT_MS={}", ms);
                    self.spec.resolution.strategy_timeout_ms = ms;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for NEUROCHAT_STRATEGY_TIMEOUT_MS: '{}'. Expected milliseconds. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("NEUROCHAT_STORAGE_PATH") {
            if !val.trim().is_empty() {
                tracing::info!("Environment override: NEUROCHAT_STORAGE_PATH={}", val);
                self.spec.storage.backend = StorageKind::Sled;
                self.spec.storage.path = Some(val.trim().to_string());
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.api_version != API_VERSION {
            return invalid(format!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version, API_VERSION
            ));
        }
        if self.kind != KIND {
            return invalid(format!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND));
        }
        if self.metadata.name.is_empty() {
            return invalid("metadata.name cannot be empty".to_string());
        }

        for provider in &self.spec.llm_providers {
            if provider.name.is_empty() {
                return invalid("LLM provider name cannot be empty".to_string());
            }
            if provider.endpoint.is_empty() {
                return invalid(format!(
                    "LLM provider endpoint cannot be empty for: {}",
                    provider.name
                ));
            }
            if !matches!(
                provider.provider_type.as_str(),
                "openai" | "openai-compatible" | "ollama" | "gemini"
            ) {
                return invalid(format!(
                    "Unsupported provider type '{}' for: {}",
                    provider.provider_type, provider.name
                ));
            }
            if provider.models.is_empty() {
                return invalid(format!(
                    "LLM provider must have at least one model: {}",
                    provider.name
                ));
            }
            for model in &provider.models {
                if model.alias.is_empty() {
                    return invalid(format!(
                        "Model alias cannot be empty in provider: {}",
                        provider.name
                    ));
                }
                if model.model.is_empty() {
                    return invalid(format!(
                        "Model identifier cannot be empty for alias: {}",
                        model.alias
                    ));
                }
            }
        }

        if let Some(fallback) = &self.spec.llm_selection.fallback_provider {
            if !self.spec.llm_providers.iter().any(|p| &p.name == fallback) {
                return invalid(format!(
                    "Fallback provider '{}' not found in llm_providers",
                    fallback
                ));
            }
        }

        let rate = self.spec.pricing.usd_to_inr;
        if !rate.is_finite() || rate <= 0.0 {
            return invalid(format!("pricing.usd_to_inr must be positive, got {}", rate));
        }

        let resolution = &self.spec.resolution;
        if resolution.strategy_timeout_ms == 0 {
            return invalid("resolution.strategy_timeout_ms must be greater than zero".to_string());
        }
        if resolution.max_candidates == 0 {
            return invalid("resolution.max_candidates must be at least 1".to_string());
        }
        if resolution.generation_model.is_empty() {
            return invalid("resolution.generation_model cannot be empty".to_string());
        }

        if self.spec.storage.backend == StorageKind::Sled {
            if let Some(path) = &self.spec.storage.path {
                if path.trim().is_empty() {
                    return invalid("storage.path cannot be blank".to_string());
                }
            }
        }

        Ok(())
    }

    pub fn logging(&self) -> LoggingConfig {
        self.spec
            .observability
            .as_ref()
            .and_then(|o| o.logging.clone())
            .unwrap_or_else(|| LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str) -> LLMProviderConfig {
        LLMProviderConfig {
            name: name.to_string(),
            provider_type: "ollama".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            enabled: true,
            models: vec![ModelConfig {
                alias: "default".to_string(),
                model: "llama3.2".to_string(),
            }],
        }
    }

    #[test]
    fn test_default_manifest() {
        let manifest = ResolverConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, KIND);
        assert!(!manifest.metadata.name.is_empty());
        assert_eq!(manifest.spec.resolution.strategy_timeout_ms, 8000);
        assert_eq!(manifest.spec.resolution.pattern_min_successes, 2);
        assert_eq!(manifest.spec.resolution.max_candidates, 6);
        assert_eq!(manifest.spec.pricing.usd_to_inr, 83.0);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut manifest = ResolverConfigManifest::default();
        manifest.metadata.name = "test-resolver".to_string();
        manifest.spec.llm_providers = vec![provider("ollama")];
        manifest.spec.llm_selection.fallback_provider = Some("ollama".to_string());
        manifest.spec.storage = StorageConfig {
            backend: StorageKind::InMemory,
            path: None,
        };

        let yaml = serde_yaml::to_string(&manifest).unwrap();
        let parsed = ResolverConfigManifest::from_yaml_str(&yaml).unwrap();

        assert_eq!(parsed.metadata.name, "test-resolver");
        assert_eq!(parsed.spec.llm_providers.len(), 1);
        assert_eq!(parsed.spec.storage.backend, StorageKind::InMemory);
        assert_eq!(parsed.spec.resolution.catalog, CatalogSource::DummyJson);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_secondary_catalog_can_be_disabled() {
        let yaml = r#"
apiVersion: neurochat.ai/v1
kind: ResolverConfig
metadata:
  name: primary-only
spec:
  resolution:
    secondary_catalog_endpoint: null
"#;
        let manifest = ResolverConfigManifest::from_yaml_str(yaml).unwrap();
        assert!(manifest.spec.resolution.secondary_catalog_endpoint.is_none());
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let yaml = r#"
apiVersion: neurochat.ai/v1
kind: ResolverConfig
metadata:
  name: minimal
spec:
  resolution:
    max_candidates: 4
  storage:
    backend: in-memory
"#;
        let manifest = ResolverConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.spec.resolution.max_candidates, 4);
        assert_eq!(manifest.spec.resolution.min_generated, 3);
        assert_eq!(
            manifest.spec.resolution.secondary_catalog_endpoint.as_deref(),
            Some("https://fakestoreapi.com")
        );
        assert_eq!(manifest.spec.storage.backend(), StorageBackend::InMemory);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut manifest = ResolverConfigManifest::default();
        manifest.api_version = "v2".to_string();
        assert!(matches!(manifest.validate(), Err(ConfigError::Invalid(_))));

        let mut manifest = ResolverConfigManifest::default();
        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());

        let mut manifest = ResolverConfigManifest::default();
        manifest.spec.pricing.usd_to_inr = 0.0;
        assert!(manifest.validate().is_err());

        let mut manifest = ResolverConfigManifest::default();
        manifest.spec.resolution.strategy_timeout_ms = 0;
        assert!(manifest.validate().is_err());

        let mut manifest = ResolverConfigManifest::default();
        manifest.spec.llm_selection.fallback_provider = Some("missing".to_string());
        assert!(manifest.validate().is_err());

        let mut manifest = ResolverConfigManifest::default();
        let mut bad = provider("anthropic");
        bad.provider_type = "anthropic".to_string();
        manifest.spec.llm_providers = vec![bad];
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut manifest = ResolverConfigManifest::default();
        let vars: HashMap<&str, &str> = HashMap::from([
            ("NEUROCHAT_USD_TO_INR", "84.5"),
            ("NEUROCHAT_STRATEGY_TIMEOUT_MS", "250"),
            ("NEUROCHAT_STORAGE_PATH", "/tmp/neurochat-test"),
        ]);
        manifest.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(manifest.spec.pricing.usd_to_inr, 84.5);
        assert_eq!(manifest.spec.resolution.strategy_timeout_ms, 250);
        assert_eq!(
            manifest.spec.storage.backend(),
            StorageBackend::Sled {
                path: PathBuf::from("/tmp/neurochat-test")
            }
        );
    }

    #[test]
    fn test_invalid_env_override_is_ignored() {
        let mut manifest = ResolverConfigManifest::default();
        manifest.apply_overrides_from(|k| {
            (k == "NEUROCHAT_USD_TO_INR").then(|| "eighty".to_string())
        });
        assert_eq!(manifest.spec.pricing.usd_to_inr, 83.0);
    }

    #[test]
    fn test_resolve_env_ref_literal() {
        assert_eq!(resolve_env_ref("plain-key").unwrap(), "plain-key");
        assert!(matches!(
            resolve_env_ref("env:NEUROCHAT_SURELY_UNSET_VARIABLE_42"),
            Err(ConfigError::MissingEnv(_))
        ));
    }
}
