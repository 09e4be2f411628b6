// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Google Custom Search JSON API adapter
//!
//! Searches are localized to India (`gl=in`, `hl=en`). The API caps a
//! page at 10 results.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::domain::config::{resolve_env_ref, SearchConfig};
use crate::domain::generation::CapabilityError;
use crate::domain::search::{SearchHit, WebSearch};

const MAX_RESULTS_PER_PAGE: usize = 10;

pub struct GoogleCustomSearch {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchHit>,
}

impl GoogleCustomSearch {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        engine_id: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            engine_id: engine_id.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Credentials given as `env:VAR` are read now; unset variables leave
    /// the adapter unconfigured rather than failing startup.
    pub fn from_config(config: &SearchConfig) -> Self {
        let resolve = |value: &Option<String>, what: &str| {
            value.as_deref().and_then(|v| match resolve_env_ref(v) {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    warn!("Web search {} unavailable: {}", what, e);
                    None
                }
            })
        };

        if !config.enabled {
            return Self::new(config.endpoint.clone(), None, None);
        }

        Self::new(
            config.endpoint.clone(),
            resolve(&config.api_key, "API key"),
            resolve(&config.engine_id, "engine id"),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }
}

#[async_trait]
impl WebSearch for GoogleCustomSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, CapabilityError> {
        let (api_key, engine_id) = match (&self.api_key, &self.engine_id) {
            (Some(key), Some(cx)) => (key, cx),
            _ => {
                return Err(CapabilityError::NotConfigured(
                    "web search API key or engine id missing".into(),
                ))
            }
        };

        let num = limit.clamp(1, MAX_RESULTS_PER_PAGE).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", api_key.as_str()),
                ("cx", engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("gl", "in"),
                ("hl", "en"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CapabilityError::Transport(format!(
                "search returned HTTP {}",
                response.status()
            )));
        }

        let page: SearchPage = response
            .json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;

        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_search_sends_localized_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "k".into()),
                Matcher::UrlEncoded("cx".into(), "cx1".into()),
                Matcher::UrlEncoded("q".into(), "yoga mat buy online price India".into()),
                Matcher::UrlEncoded("num".into(), "10".into()),
                Matcher::UrlEncoded("gl".into(), "in".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"kind":"customsearch#search","items":[
                    {"title":"Yoga Mat | Shop","snippet":"Now ₹799 only","link":"https://shop.example/mat"},
                    {"title":"No snippet"}
                ]}"#,
            )
            .create_async()
            .await;

        let search = GoogleCustomSearch::new(
            format!("{}/customsearch/v1", server.url()),
            Some("k".into()),
            Some("cx1".into()),
        );
        let hits = search
            .search("yoga mat buy online price India", 25)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].link, "https://shop.example/mat");
        assert!(hits[1].snippet.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_not_configured() {
        let search = GoogleCustomSearch::new("http://127.0.0.1:9", Some("k".into()), None);
        assert!(!search.is_configured());
        let err = search.search("anything", 5).await.unwrap_err();
        assert!(matches!(err, CapabilityError::NotConfigured(_)));
    }

    #[test]
    fn test_disabled_config_has_no_credentials() {
        let config = SearchConfig {
            enabled: false,
            api_key: Some("literal-key".into()),
            engine_id: Some("literal-cx".into()),
            ..SearchConfig::default()
        };
        assert!(!GoogleCustomSearch::from_config(&config).is_configured());
    }

    #[test]
    fn test_literal_credentials_from_config() {
        let config = SearchConfig {
            api_key: Some("literal-key".into()),
            engine_id: Some("literal-cx".into()),
            ..SearchConfig::default()
        };
        assert!(GoogleCustomSearch::from_config(&config).is_configured());
    }
}
