//! Discord OAuth2 authorization code verifier.

use reqwest::Client;
use serde::Deserialize;

use super::{async_trait, SigninVerifier, VerificationData};
use crate::config::ProviderConfig;
use crate::error::{ProviderType, SigninError, SigninResult};

/// Discord API base URL.
const API_ENDPOINT: &str = "https://discord.com/api/v10";

/// Discord token response.
#[derive(Debug, Deserialize)]
struct DiscordTokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

/// Discord user profile (`/users/@me`).
#[derive(Debug, Deserialize)]
struct DiscordUser {
    email: Option<String>,
}

/// Verifier for Discord OAuth2 authorization codes.
#[derive(Clone)]
pub struct DiscordVerifier {
    api_endpoint: String,
    http_client: Client,
}

impl DiscordVerifier {
    /// Create a verifier against the real Discord API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_endpoint: API_ENDPOINT.to_string(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the API base URL, for tests against a stub server.
    #[must_use]
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }
}

impl Default for DiscordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SigninVerifier for DiscordVerifier {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Discord
    }

    async fn verify(
        &self,
        config: &ProviderConfig,
        data: &VerificationData,
    ) -> SigninResult<String> {
        let code = data
            .code
            .as_deref()
            .ok_or_else(|| SigninError::MissingVerificationData {
                provider: ProviderType::Discord,
                message: "Missing Discord authorization code".to_string(),
            })?;

        let mut params = vec![("grant_type", "authorization_code"), ("code", code)];
        if let Some(redirect_uri) = config.redirect_uri.as_deref() {
            params.push(("redirect_uri", redirect_uri));
        }

        // Client credentials go in the Basic auth header, not the form body.
        let response = self
            .http_client
            .post(format!("{}/oauth2/token", self.api_endpoint))
            .basic_auth(&config.client_id, config.client_secret.as_deref())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let token: DiscordTokenResponse = response.json().await?;

        if !status.is_success() {
            return Err(SigninError::TokenExchangeFailed {
                provider: ProviderType::Discord,
                description: token
                    .error_description
                    .unwrap_or_else(|| "Failed to exchange Discord code for token".to_string()),
            });
        }

        let access_token = token.access_token.ok_or(SigninError::TokenExchangeFailed {
            provider: ProviderType::Discord,
            description: "Failed to exchange Discord code for token".to_string(),
        })?;

        let profile: DiscordUser = self
            .http_client
            .get(format!("{}/users/@me", self.api_endpoint))
            .bearer_auth(&access_token)
            .send()
            .await?
            .json()
            .await?;

        profile.email.ok_or(SigninError::EmailUnavailable {
            provider: ProviderType::Discord,
        })
    }
}
