//! Sign-in verification error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Google,
    Facebook,
    Apple,
    Discord,
    Github,
}

impl ProviderType {
    /// All providers this crate knows how to verify.
    pub const ALL: [ProviderType; 5] = [
        ProviderType::Google,
        ProviderType::Facebook,
        ProviderType::Apple,
        ProviderType::Discord,
        ProviderType::Github,
    ];

    /// Human-readable provider name used in error messages.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderType::Google => "Google",
            ProviderType::Facebook => "Facebook",
            ProviderType::Apple => "Apple",
            ProviderType::Discord => "Discord",
            ProviderType::Github => "GitHub",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::Google => write!(f, "google"),
            ProviderType::Facebook => write!(f, "facebook"),
            ProviderType::Apple => write!(f, "apple"),
            ProviderType::Discord => write!(f, "discord"),
            ProviderType::Github => write!(f, "github"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = SigninError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(ProviderType::Google),
            "facebook" => Ok(ProviderType::Facebook),
            "apple" => Ok(ProviderType::Apple),
            "discord" => Ok(ProviderType::Discord),
            "github" => Ok(ProviderType::Github),
            _ => Err(SigninError::UnsupportedService),
        }
    }
}

/// Sign-in verification errors.
///
/// Display strings are part of the caller-facing contract: the dispatcher
/// flattens any of these into `{"success":false,"error":<display>}`.
#[derive(Debug, Error)]
pub enum SigninError {
    /// Requested provider is unknown or not present in the caller's
    /// configured services.
    #[error("Unsupported service")]
    UnsupportedService,

    /// Required provider configuration is missing.
    #[error("{message}")]
    ConfigurationError {
        provider: ProviderType,
        message: String,
    },

    /// Required field absent from the client-supplied verification data.
    #[error("{message}")]
    MissingVerificationData {
        provider: ProviderType,
        message: String,
    },

    /// The provider rejected the code/token exchange.
    #[error("{description}")]
    TokenExchangeFailed {
        provider: ProviderType,
        description: String,
    },

    /// The ID token's `aud` claim does not match the configured client ID.
    #[error("Mismatch in clientID and \"aud\" value.")]
    AudienceMismatch { provider: ProviderType },

    /// The provider's own verification endpoint rejected the credential.
    #[error("{reason}")]
    VerificationRejected {
        provider: ProviderType,
        reason: String,
    },

    /// Fetching the user profile failed after a successful exchange.
    #[error("{message}")]
    ProfileFetchFailed {
        provider: ProviderType,
        message: String,
    },

    /// Exchange succeeded but no usable email address exists.
    #[error("{}", email_unavailable_message(.provider))]
    EmailUnavailable { provider: ProviderType },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error")]
    Unknown,
}

/// Google reports a bare "Email not found"; the others name the provider.
fn email_unavailable_message(provider: &ProviderType) -> String {
    match provider {
        ProviderType::Google => "Email not found".to_string(),
        other => format!("Email not available from {}", other.display_name()),
    }
}

impl SigninError {
    /// Stable machine-readable code for the error category.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            SigninError::UnsupportedService => "unsupported_service",
            SigninError::ConfigurationError { .. } => "configuration_error",
            SigninError::MissingVerificationData { .. } => "missing_verification_data",
            SigninError::TokenExchangeFailed { .. } => "token_exchange_failed",
            SigninError::AudienceMismatch { .. } => "audience_mismatch",
            SigninError::VerificationRejected { .. } => "verification_rejected",
            SigninError::ProfileFetchFailed { .. } => "profile_fetch_failed",
            SigninError::EmailUnavailable { .. } => "email_unavailable",
            SigninError::HttpError(_) => "http_error",
            SigninError::JsonError(_) => "json_error",
            SigninError::Unknown => "unknown_error",
        }
    }

    /// Provider this error originated from, when attributable.
    #[must_use]
    pub fn provider(&self) -> Option<ProviderType> {
        match self {
            SigninError::ConfigurationError { provider, .. }
            | SigninError::MissingVerificationData { provider, .. }
            | SigninError::TokenExchangeFailed { provider, .. }
            | SigninError::AudienceMismatch { provider }
            | SigninError::VerificationRejected { provider, .. }
            | SigninError::ProfileFetchFailed { provider, .. }
            | SigninError::EmailUnavailable { provider } => Some(*provider),
            _ => None,
        }
    }
}

/// Result type alias for sign-in verification operations.
pub type SigninResult<T> = Result<T, SigninError>;
