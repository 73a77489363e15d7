use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use super::{AccessToken, AuthProvider, Profile};

/// HTTP client for the external auth API.
///
/// Signup takes JSON; login is OAuth2 password-grant form encoding; profile
/// and logout are bearer-authenticated.
pub struct HttpAuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl AuthProvider for HttpAuthClient {
    async fn signup(&self, username: &str, email: &str, password: &str) -> Result<AccessToken> {
        let response = self
            .http
            .post(self.endpoint("/signup"))
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .context("Failed to reach auth service")?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Signup failed: {}", detail);
        }

        info!("Signed up user {}", username);
        response.json().await.context("Invalid signup response")
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let response = self
            .http
            .post(self.endpoint("/login"))
            .form(&[
                ("username", username),
                ("password", password),
                ("grant_type", ""),
                ("scope", ""),
                ("client_id", ""),
                ("client_secret", ""),
            ])
            .send()
            .await
            .context("Failed to reach auth service")?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Login failed: {}", detail);
        }

        info!("Logged in user {}", username);
        response.json().await.context("Invalid login response")
    }

    async fn profile(&self, token: &AccessToken) -> Result<Profile> {
        let response = self
            .http
            .get(self.endpoint("/profile"))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("Failed to reach auth service")?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to fetch profile: {}", detail);
        }

        response.json().await.context("Invalid profile response")
    }

    async fn logout(&self, token: &AccessToken) -> Result<()> {
        self.http
            .post(self.endpoint("/logout"))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("Failed to reach auth service")?
            .error_for_status()
            .context("Logout failed")?;
        Ok(())
    }
}
