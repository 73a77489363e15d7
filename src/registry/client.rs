use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Client for the backend-URL registry collaborator.
pub struct RegistryClient {
    http: reqwest::Client,
    registry_url: String,
}

#[derive(Debug, Deserialize)]
struct BackendUrlResponse {
    backend_url: String,
}

impl RegistryClient {
    pub fn new(registry_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            registry_url: registry_url.into(),
        }
    }

    /// Fetch the currently registered backend URL.
    pub async fn fetch_backend_url(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.registry_url)
            .send()
            .await
            .context("Failed to reach backend registry")?
            .error_for_status()
            .context("Backend registry returned an error")?;

        let payload: BackendUrlResponse = response
            .json()
            .await
            .context("Invalid registry response")?;

        info!("Resolved backend URL: {}", payload.backend_url);
        Ok(payload.backend_url)
    }

    /// Publish a backend URL to the registry.
    pub async fn publish_backend_url(&self, backend_url: &str) -> Result<()> {
        self.http
            .post(&self.registry_url)
            .json(&serde_json::json!({ "backend_url": backend_url }))
            .send()
            .await
            .context("Failed to reach backend registry")?
            .error_for_status()
            .context("Backend registry rejected the URL")?;

        info!("Published backend URL: {}", backend_url);
        Ok(())
    }
}
