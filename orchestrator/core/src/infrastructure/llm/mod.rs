// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each adapter translates between the domain `LLMProvider` interface and one
// vendor API.

pub mod openai;
pub mod ollama;
pub mod gemini;
pub mod registry;

pub use gemini::GeminiAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAIAdapter;
pub use registry::ProviderRegistry;

use crate::domain::llm::LLMError;

/// Map a non-success HTTP status to the domain error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String, model: &str) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::Authentication(body),
        429 => LLMError::RateLimit,
        404 => LLMError::ModelNotFound(model.to_string()),
        500..=599 => LLMError::Network(format!("HTTP {}: {}", status, body)),
        _ => LLMError::Provider(format!("HTTP {}: {}", status, body)),
    }
}
