//! Sign in with Apple ID token verifier.

use reqwest::Client;
use serde::Deserialize;

use super::{async_trait, SigninVerifier, VerificationData};
use crate::config::ProviderConfig;
use crate::error::{ProviderType, SigninError, SigninResult};

/// Apple token verification endpoint.
const VERIFY_ENDPOINT: &str = "https://appleid.apple.com/auth/verify";

/// Verification response from Apple.
#[derive(Debug, Deserialize)]
struct AppleVerifyResponse {
    #[serde(default)]
    success: bool,
    email: Option<String>,
    error: Option<String>,
}

/// Verifier for Apple ID tokens produced by the AppleID JS SDK.
#[derive(Clone)]
pub struct AppleVerifier {
    verify_endpoint: String,
    http_client: Client,
}

impl AppleVerifier {
    /// Create a verifier against the real Apple endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            verify_endpoint: VERIFY_ENDPOINT.to_string(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the verification endpoint, for tests against a stub server.
    #[must_use]
    pub fn with_verify_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.verify_endpoint = endpoint.into();
        self
    }
}

impl Default for AppleVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SigninVerifier for AppleVerifier {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Apple
    }

    async fn verify(
        &self,
        config: &ProviderConfig,
        data: &VerificationData,
    ) -> SigninResult<String> {
        let id_token =
            data.id_token
                .as_deref()
                .ok_or_else(|| SigninError::MissingVerificationData {
                    provider: ProviderType::Apple,
                    message: "Missing Apple ID token".to_string(),
                })?;

        let params = [
            ("id_token", id_token),
            ("client_id", config.client_id.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.verify_endpoint)
            .form(&params)
            .send()
            .await?;

        let result: AppleVerifyResponse = response.json().await?;

        // Apple reports validity in the body; HTTP success alone means nothing.
        if !result.success {
            return Err(SigninError::VerificationRejected {
                provider: ProviderType::Apple,
                reason: result
                    .error
                    .unwrap_or_else(|| "Invalid Apple signin".to_string()),
            });
        }

        result.email.ok_or(SigninError::EmailUnavailable {
            provider: ProviderType::Apple,
        })
    }
}
