//! Facebook Graph API access token verifier.

use reqwest::Client;
use serde::Deserialize;

use super::{async_trait, SigninVerifier, VerificationData};
use crate::config::ProviderConfig;
use crate::error::{ProviderType, SigninError, SigninResult};

/// Facebook Graph API base URL.
const GRAPH_ENDPOINT: &str = "https://graph.facebook.com";

/// Profile fields requested from `/me`.
#[derive(Debug, Deserialize)]
struct FacebookProfile {
    email: Option<String>,
}

/// Graph API error envelope.
#[derive(Debug, Deserialize)]
struct FacebookErrorBody {
    error: Option<FacebookErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct FacebookErrorDetail {
    message: Option<String>,
}

/// Verifier for Facebook SDK access tokens.
#[derive(Clone)]
pub struct FacebookVerifier {
    graph_endpoint: String,
    http_client: Client,
}

impl FacebookVerifier {
    /// Create a verifier against the real Graph API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph_endpoint: GRAPH_ENDPOINT.to_string(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the Graph API base URL, for tests against a stub server.
    #[must_use]
    pub fn with_graph_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graph_endpoint = endpoint.into();
        self
    }
}

impl Default for FacebookVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SigninVerifier for FacebookVerifier {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Facebook
    }

    async fn verify(
        &self,
        _config: &ProviderConfig,
        data: &VerificationData,
    ) -> SigninResult<String> {
        let access_token =
            data.access_token
                .as_deref()
                .ok_or_else(|| SigninError::MissingVerificationData {
                    provider: ProviderType::Facebook,
                    message: "Missing Facebook access token".to_string(),
                })?;

        let response = self
            .http_client
            .get(format!("{}/me", self.graph_endpoint))
            .query(&[("fields", "email"), ("access_token", access_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            let body: FacebookErrorBody = response.json().await.unwrap_or(FacebookErrorBody {
                error: None,
            });
            let message = body
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Failed to verify Facebook access token".to_string());
            return Err(SigninError::ProfileFetchFailed {
                provider: ProviderType::Facebook,
                message,
            });
        }

        let profile: FacebookProfile = response.json().await?;
        profile.email.ok_or(SigninError::EmailUnavailable {
            provider: ProviderType::Facebook,
        })
    }
}
