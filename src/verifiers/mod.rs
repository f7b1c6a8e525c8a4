//! Provider verifier implementations.
//!
//! Each verifier exchanges or validates a client-supplied credential against
//! one provider's HTTP API and extracts a verified email. Verifiers are
//! stateless between calls: a verification is a linear sequence of at most
//! three dependent requests ending in exactly one [`SigninOutcome`] shape.

pub mod apple;
pub mod discord;
pub mod facebook;
pub mod github;
pub mod google;

use std::collections::HashMap;
use std::sync::Arc;

pub use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProviderConfig, Services};
use crate::error::{ProviderType, SigninResult};
use crate::outcome::SigninOutcome;

/// Client-produced verification payload.
///
/// Which field is populated depends on the provider's sign-in flow: Google
/// sends an ID token as `credential`, Facebook an `accessToken`, Apple an
/// `id_token`, Discord and GitHub an authorization `code` (GitHub optionally
/// with a PKCE `codeVerifier`). Unpopulated fields are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationData {
    /// ID token from Google Identity Services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Provider access token (Facebook).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// ID token from Sign in with Apple.
    #[serde(default, rename = "id_token", skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// OAuth2 authorization code (Discord, GitHub).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// PKCE code verifier accompanying `code` (GitHub).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<String>,
}

impl VerificationData {
    /// Payload carrying a Google ID token.
    #[must_use]
    pub fn from_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            ..Self::default()
        }
    }

    /// Payload carrying a provider access token.
    #[must_use]
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }

    /// Payload carrying an Apple ID token.
    #[must_use]
    pub fn from_id_token(id_token: impl Into<String>) -> Self {
        Self {
            id_token: Some(id_token.into()),
            ..Self::default()
        }
    }

    /// Payload carrying an OAuth2 authorization code.
    #[must_use]
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Attach a PKCE code verifier to a code payload.
    #[must_use]
    pub fn with_code_verifier(mut self, code_verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(code_verifier.into());
        self
    }
}

/// Trait for provider verifier implementations.
#[async_trait]
pub trait SigninVerifier: Send + Sync {
    /// Get the provider this verifier handles.
    fn provider_type(&self) -> ProviderType;

    /// Verify the supplied credential against the provider and return the
    /// associated email address.
    async fn verify(
        &self,
        config: &ProviderConfig,
        data: &VerificationData,
    ) -> SigninResult<String>;
}

/// Registry mapping each provider to its verifier.
///
/// The default registry talks to the real provider hosts. Tests substitute
/// verifiers pointed at stub servers via [`SigninVerifiers::with_verifier`].
#[derive(Clone)]
pub struct SigninVerifiers {
    verifiers: HashMap<ProviderType, Arc<dyn SigninVerifier>>,
}

impl SigninVerifiers {
    /// Registry with the default verifier for every known provider.
    #[must_use]
    pub fn new() -> Self {
        let mut verifiers: HashMap<ProviderType, Arc<dyn SigninVerifier>> = HashMap::new();
        verifiers.insert(
            ProviderType::Google,
            Arc::new(google::GoogleVerifier::new()),
        );
        verifiers.insert(
            ProviderType::Facebook,
            Arc::new(facebook::FacebookVerifier::new()),
        );
        verifiers.insert(ProviderType::Apple, Arc::new(apple::AppleVerifier::new()));
        verifiers.insert(
            ProviderType::Discord,
            Arc::new(discord::DiscordVerifier::new()),
        );
        verifiers.insert(
            ProviderType::Github,
            Arc::new(github::GithubVerifier::new()),
        );
        Self { verifiers }
    }

    /// Replace the verifier for its provider.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn SigninVerifier>) -> Self {
        self.verifiers.insert(verifier.provider_type(), verifier);
        self
    }

    /// Verify a sign-in against one of the caller's enabled services.
    ///
    /// Never returns an error: unknown or unconfigured services and any
    /// verifier fault are all flattened into [`SigninOutcome::Rejected`].
    pub async fn verify(
        &self,
        services: &Services,
        service: &str,
        data: &VerificationData,
    ) -> SigninOutcome {
        let Ok(provider) = service.parse::<ProviderType>() else {
            debug!(service, "unknown sign-in service requested");
            return SigninOutcome::rejected("Unsupported service");
        };
        let Some(config) = services.get(provider) else {
            debug!(%provider, "sign-in service not enabled");
            return SigninOutcome::rejected("Unsupported service");
        };
        let Some(verifier) = self.verifiers.get(&provider) else {
            debug!(%provider, "no verifier registered");
            return SigninOutcome::rejected("Unsupported service");
        };

        verifier.verify(config, data).await.into()
    }
}

impl Default for SigninVerifiers {
    fn default() -> Self {
        Self::new()
    }
}

// Re-export verifiers
pub use apple::AppleVerifier;
pub use discord::DiscordVerifier;
pub use facebook::FacebookVerifier;
pub use github::GithubVerifier;
pub use google::GoogleVerifier;
