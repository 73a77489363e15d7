use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AccessToken, AuthProvider, Profile};

/// In-memory stand-in for the auth collaborator.
///
/// Passwords are stored in plain text and tokens never expire; this is a
/// mock for working offline, not an authentication system.
#[derive(Debug, Default)]
pub struct MockAuth {
    inner: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    /// username → (email, password)
    users: HashMap<String, (String, String)>,
    /// token → username
    tokens: HashMap<String, String>,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

fn issue_token(tokens: &mut HashMap<String, String>, username: &str) -> AccessToken {
    let token = Uuid::new_v4().to_string();
    tokens.insert(token.clone(), username.to_string());
    AccessToken {
        access_token: token,
        token_type: "bearer".to_string(),
    }
}

#[async_trait::async_trait]
impl AuthProvider for MockAuth {
    async fn signup(&self, username: &str, email: &str, password: &str) -> Result<AccessToken> {
        let mut state = self.inner.lock().await;
        if state.users.contains_key(username) {
            anyhow::bail!("Signup failed: username already taken");
        }
        state
            .users
            .insert(username.to_string(), (email.to_string(), password.to_string()));
        Ok(issue_token(&mut state.tokens, username))
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let mut state = self.inner.lock().await;
        match state.users.get(username) {
            Some((_, stored)) if stored == password => {
                Ok(issue_token(&mut state.tokens, username))
            }
            _ => anyhow::bail!("Login failed: invalid credentials"),
        }
    }

    async fn profile(&self, token: &AccessToken) -> Result<Profile> {
        let state = self.inner.lock().await;
        let username = state
            .tokens
            .get(&token.access_token)
            .ok_or_else(|| anyhow::anyhow!("Failed to fetch profile: unknown token"))?;
        let (email, _) = state
            .users
            .get(username)
            .ok_or_else(|| anyhow::anyhow!("Failed to fetch profile: unknown user"))?;
        Ok(Profile {
            username: username.clone(),
            email: email.clone(),
        })
    }

    async fn logout(&self, token: &AccessToken) -> Result<()> {
        let mut state = self.inner.lock().await;
        state.tokens.remove(&token.access_token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_login_profile_logout_flow() {
        let auth = MockAuth::new();

        let token = auth.signup("ada", "ada@example.com", "secret").await.unwrap();
        let profile = auth.profile(&token).await.unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.email, "ada@example.com");

        auth.logout(&token).await.unwrap();
        assert!(auth.profile(&token).await.is_err());

        let token = auth.login("ada", "secret").await.unwrap();
        assert!(auth.profile(&token).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_signup_and_bad_password_fail() {
        let auth = MockAuth::new();
        auth.signup("ada", "ada@example.com", "secret").await.unwrap();

        assert!(auth.signup("ada", "other@example.com", "pw").await.is_err());
        assert!(auth.login("ada", "wrong").await.is_err());
        assert!(auth.login("nobody", "secret").await.is_err());
    }
}
