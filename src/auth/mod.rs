//! Auth collaborator
//!
//! Thin client for the external auth API, plus an in-memory mock mirroring
//! the local-storage variant. No security guarantees anywhere: this exists
//! so sign-in flows work against either backend.

mod client;
mod mock;

pub use client::HttpAuthClient;
pub use mock::MockAuth;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A signed-in user's profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
}

/// Bearer token issued on signup or login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Authentication collaborator seam.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    async fn signup(&self, username: &str, email: &str, password: &str) -> Result<AccessToken>;
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken>;
    async fn profile(&self, token: &AccessToken) -> Result<Profile>;
    async fn logout(&self, token: &AccessToken) -> Result<()>;
}
