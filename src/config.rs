//! Caller-supplied provider configuration.
//!
//! Configuration is immutable for the lifetime of a verification call and is
//! never persisted by this crate. Which providers appear in [`Services`] is a
//! deployment decision; every provider is always compiled in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ProviderType;

/// Static configuration for one sign-in provider.
///
/// Field names serialize as the camelCase JSON keys callers supply
/// (`clientId`, `clientSecret`, `redirectUri`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// OAuth2/OIDC client identifier issued by the provider.
    pub client_id: String,
    /// Client secret, required by providers doing a code exchange
    /// (Discord, GitHub).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Redirect URI registered with the provider, echoed during the code
    /// exchange where the provider requires it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

impl ProviderConfig {
    /// Create a configuration with only a client ID.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: None,
        }
    }

    /// Set the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }
}

/// The set of providers enabled by the caller, keyed by provider.
///
/// Deserializes from the JSON shape `{"google": {"clientId": ...}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Services {
    providers: HashMap<ProviderType, ProviderConfig>,
}

impl Services {
    /// Empty service set; every verification against it is unsupported.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a provider with the given configuration.
    #[must_use]
    pub fn enable(mut self, provider: ProviderType, config: ProviderConfig) -> Self {
        self.providers.insert(provider, config);
        self
    }

    /// Configuration for a provider, if enabled.
    #[must_use]
    pub fn get(&self, provider: ProviderType) -> Option<&ProviderConfig> {
        self.providers.get(&provider)
    }

    /// Whether the provider is enabled.
    #[must_use]
    pub fn contains(&self, provider: ProviderType) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Enabled providers, in no particular order.
    pub fn enabled(&self) -> impl Iterator<Item = ProviderType> + '_ {
        self.providers.keys().copied()
    }
}
