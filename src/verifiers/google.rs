//! Google ID token verifier.

use reqwest::Client;
use serde::Deserialize;

use super::{async_trait, SigninVerifier, VerificationData};
use crate::config::ProviderConfig;
use crate::error::{ProviderType, SigninError, SigninResult};

/// Google token introspection endpoint.
const TOKENINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";

/// Claims returned by the tokeninfo endpoint.
///
/// Both fields are optional: an invalid token yields an error body with
/// neither claim, which the audience check then rejects.
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: Option<String>,
    email: Option<String>,
}

/// Verifier for Google ID tokens issued by Google Identity Services.
#[derive(Clone)]
pub struct GoogleVerifier {
    tokeninfo_endpoint: String,
    http_client: Client,
}

impl GoogleVerifier {
    /// Create a verifier against the real Google endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokeninfo_endpoint: TOKENINFO_ENDPOINT.to_string(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the tokeninfo endpoint, for tests against a stub server.
    #[must_use]
    pub fn with_tokeninfo_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tokeninfo_endpoint = endpoint.into();
        self
    }
}

impl Default for GoogleVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SigninVerifier for GoogleVerifier {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Google
    }

    async fn verify(
        &self,
        config: &ProviderConfig,
        data: &VerificationData,
    ) -> SigninResult<String> {
        // Google Identity Services delivers the ID token as `credential`;
        // older clients sent it as `code`.
        let id_token = data
            .credential
            .as_deref()
            .or(data.code.as_deref())
            .ok_or_else(|| SigninError::MissingVerificationData {
                provider: ProviderType::Google,
                message: "Missing Google ID token".to_string(),
            })?;

        let response = self
            .http_client
            .get(&self.tokeninfo_endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        let payload: GoogleTokenInfo = response.json().await?;

        // The audience check comes first: an email claim means nothing if the
        // token was minted for a different client.
        if payload.aud.as_deref() != Some(config.client_id.as_str()) {
            return Err(SigninError::AudienceMismatch {
                provider: ProviderType::Google,
            });
        }

        payload.email.ok_or(SigninError::EmailUnavailable {
            provider: ProviderType::Google,
        })
    }
}
