//! GitHub OAuth2 authorization code verifier.
//!
//! The only multi-step verifier: exchange the code for a token, fetch the
//! profile, and when the profile email is hidden fall back to the
//! `/user/emails` endpoint with a primary-and-verified selection policy.

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{async_trait, SigninVerifier, VerificationData};
use crate::config::ProviderConfig;
use crate::error::{ProviderType, SigninError, SigninResult};

/// GitHub OAuth2 endpoints.
const TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
const API_ENDPOINT: &str = "https://api.github.com";

/// GitHub requires a User-Agent on all API requests.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GitHub token response. `error` is set on failed exchanges even when the
/// endpoint answers HTTP 200.
#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GitHub user profile (`/user`).
#[derive(Debug, Deserialize)]
struct GithubUser {
    email: Option<String>,
    message: Option<String>,
}

/// Entry from the `/user/emails` endpoint.
#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Pick the best email from the `/user/emails` response: primary and
/// verified first, then any verified address.
fn select_email(emails: Vec<GithubEmail>) -> Option<String> {
    let mut verified = None;
    for entry in emails {
        if !entry.verified {
            continue;
        }
        if entry.primary {
            return Some(entry.email);
        }
        if verified.is_none() {
            verified = Some(entry.email);
        }
    }
    verified
}

/// Verifier for GitHub OAuth2 authorization codes.
#[derive(Clone)]
pub struct GithubVerifier {
    token_endpoint: String,
    api_endpoint: String,
    http_client: Client,
}

impl GithubVerifier {
    /// Create a verifier against the real GitHub endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            api_endpoint: API_ENDPOINT.to_string(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the token endpoint, for tests against a stub server.
    #[must_use]
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    /// Override the API base URL, for tests against a stub server.
    #[must_use]
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    async fn exchange_code(
        &self,
        config: &ProviderConfig,
        client_secret: &str,
        code: &str,
        code_verifier: Option<&str>,
    ) -> SigninResult<String> {
        let mut params = vec![
            ("client_id", config.client_id.as_str()),
            ("client_secret", client_secret),
            ("code", code),
        ];
        if let Some(redirect_uri) = config.redirect_uri.as_deref() {
            params.push(("redirect_uri", redirect_uri));
        }
        if let Some(verifier) = code_verifier {
            params.push(("code_verifier", verifier));
        }

        let response = self
            .http_client
            .post(&self.token_endpoint)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let token: GithubTokenResponse = response.json().await?;

        // GitHub signals a failed exchange via an error field under HTTP 200.
        if !status.is_success() || token.error.is_some() {
            return Err(SigninError::TokenExchangeFailed {
                provider: ProviderType::Github,
                description: token
                    .error_description
                    .unwrap_or_else(|| "Failed to exchange GitHub code for token".to_string()),
            });
        }

        token.access_token.ok_or(SigninError::TokenExchangeFailed {
            provider: ProviderType::Github,
            description: "Failed to exchange GitHub code for token".to_string(),
        })
    }

    async fn fetch_verified_email(&self, access_token: &str) -> SigninResult<Option<String>> {
        let response = self
            .http_client
            .get(format!("{}/user/emails", self.api_endpoint))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "GitHub emails endpoint failed, no fallback email available"
            );
            return Ok(None);
        }

        let emails: Vec<GithubEmail> = response.json().await?;
        Ok(select_email(emails))
    }
}

impl Default for GithubVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SigninVerifier for GithubVerifier {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Github
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
                provider: ProviderType::Github,
                message: "Missing GitHub authorization code".to_string(),
            })?;

        let client_secret = match (config.client_id.is_empty(), config.client_secret.as_deref()) {
            (false, Some(secret)) if !secret.is_empty() => secret,
            _ => {
                return Err(SigninError::ConfigurationError {
                    provider: ProviderType::Github,
                    message: "GitHub clientId and clientSecret are required".to_string(),
                })
            }
        };

        let access_token = self
            .exchange_code(config, client_secret, code, data.code_verifier.as_deref())
            .await?;

        let response = self
            .http_client
            .get(format!("{}/user", self.api_endpoint))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&access_token)
            .send()
            .await?;

        let status = response.status();
        let profile: GithubUser = response.json().await?;

        if !status.is_success() {
            return Err(SigninError::ProfileFetchFailed {
                provider: ProviderType::Github,
                message: profile
                    .message
                    .unwrap_or_else(|| "Failed to fetch GitHub profile".to_string()),
            });
        }

        if let Some(email) = profile.email {
            return Ok(email);
        }

        // Profile email is hidden for users with a private email setting.
        self.fetch_verified_email(&access_token)
            .await?
            .ok_or(SigninError::EmailUnavailable {
                provider: ProviderType::Github,
            })
    }
}
