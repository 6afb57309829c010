use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A verified identity as reported by the external provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Provider-issued stable subject id.
    pub sub: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Failure verifying an external identity token.
///
/// Every variant surfaces as an authentication failure to the caller;
/// the split exists so logs distinguish a bad token from a dead provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity token rejected: {0}")]
    Rejected(String),
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

/// External identity verification, injected into the auth handlers so tests
/// can substitute a stub provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an opaque identity token and return the identity it proves.
    ///
    /// Must not have side effects; user records are managed by the caller.
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityError>;
}

/// Response shape of Google's `tokeninfo` endpoint (relevant fields only).
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Verifies Google ID tokens against the `tokeninfo` endpoint.
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleIdentityProvider {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        // Google answers 4xx for expired, malformed, and revoked tokens alike.
        if !response.status().is_success() {
            return Err(IdentityError::Rejected(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(format!("malformed provider response: {e}")))?;

        let display_name = match info.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => info.email.clone(),
        };

        Ok(ExternalIdentity {
            sub: info.sub,
            email: info.email,
            display_name,
            avatar_url: info.picture,
        })
    }
}
