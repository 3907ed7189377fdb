//! Registry client implementation
//!
//! Two endpoints are used: a keyword search and a per-version download
//! descriptor pointing at the archive and its SHA256.

use serde::{Deserialize, Serialize};

use crate::config::urls;
use crate::error::InstallError;

/// A component listed by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub author: String,
}

/// Where to fetch a component archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDownload {
    /// Archive URL
    pub url: String,
    /// Expected SHA256 of the archive
    pub file_hash: String,
}

/// Registry client for components
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a registry client with the default URL
    pub fn new() -> Self {
        Self::with_url(urls::COMPONENT_REGISTRY)
    }

    /// Create a registry client with a custom base URL
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Search URL for a keyword
    pub fn search_url(&self, keyword: &str) -> String {
        format!("{}/{}/{keyword}", self.base_url, urls::SEARCH_PATH)
    }

    /// Download descriptor URL for a component version
    pub fn download_url(&self, name: &str, version: &str) -> String {
        format!("{}/{}/{name}:{version}.zip", self.base_url, urls::DOWNLOAD_PATH)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, InstallError> {
        tracing::debug!("GET {url}");
        let registry_err = |e: &dyn std::fmt::Display| InstallError::Registry {
            error: format!("{url}: {e}"),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| registry_err(&e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(registry_err(&format!("HTTP {}", response.status())));
        }

        response.json::<T>().await.map(Some).map_err(|e| registry_err(&e))
    }

    /// Search components by keyword. Unknown keywords yield an empty list.
    pub async fn search(&self, keyword: &str) -> Result<Vec<ComponentEntry>, InstallError> {
        Ok(self
            .get_json::<Vec<ComponentEntry>>(&self.search_url(keyword))
            .await?
            .unwrap_or_default())
    }

    /// Resolve the archive of a component version
    pub async fn download_info(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ComponentDownload, InstallError> {
        self.get_json(&self.download_url(name, version))
            .await?
            .ok_or_else(|| InstallError::NotFound {
                name: name.to_string(),
            })
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_urls() {
        let client = RegistryClient::with_url("http://registry.local/");
        assert_eq!(
            client.search_url("log"),
            "http://registry.local/api/component/search/log"
        );
        assert_eq!(
            client.download_url("log", "last"),
            "http://registry.local/api/component/download/log:last.zip"
        );
    }

    #[tokio::test]
    async fn test_search_lists_components() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/component/search/lo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "log", "version": "1.2.0", "license": "MIT", "author": "dev"},
                {"name": "lora", "version": "0.3.1"}
            ])))
            .mount(&server)
            .await;

        let results = RegistryClient::with_url(server.uri()).search("lo").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "log");
        assert_eq!(results[1].license, "");
    }

    #[tokio::test]
    async fn test_search_not_found_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let results = RegistryClient::with_url(server.uri()).search("none").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_download_info_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = RegistryClient::with_url(server.uri())
            .download_info("ghost", "last")
            .await;
        assert!(matches!(result, Err(InstallError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_server_error_is_registry_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = RegistryClient::with_url(server.uri()).search("x").await;
        assert!(matches!(result, Err(InstallError::Registry { .. })));
    }
}
