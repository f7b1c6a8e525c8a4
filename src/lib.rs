//! Server-side "sign-in with X" verification.
//!
//! This crate exchanges a provider-issued credential (ID token,
//! authorization code, or access token) for a verified email address.
//! Supported providers: Google, Facebook, Apple, Discord, GitHub.
//!
//! Each verification is a one-shot, stateless operation: one to three
//! sequential HTTP calls against the provider's API, normalized into a
//! single result shape regardless of what went wrong. The dispatcher never
//! panics and never returns a language-level error; callers handle exactly
//! one failure channel.
//!
//! # Example
//!
//! ```rust,no_run
//! use signin_verify::{verify_signin, ProviderConfig, ProviderType, Services, VerificationData};
//!
//! # async fn example() {
//! let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("client-id"));
//! let data = VerificationData::from_credential("google-id-token");
//!
//! let outcome = verify_signin(&services, "google", &data).await;
//! if let Some(email) = outcome.email() {
//!     println!("verified as {email}");
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod outcome;
pub mod verifiers;

pub use config::{ProviderConfig, Services};
pub use error::{ProviderType, SigninError, SigninResult};
pub use outcome::SigninOutcome;
pub use verifiers::{
    AppleVerifier, DiscordVerifier, FacebookVerifier, GithubVerifier, GoogleVerifier,
    SigninVerifier, SigninVerifiers, VerificationData,
};

/// Verify a sign-in against one of the caller's enabled services.
///
/// `service` names the provider the client signed in with; `services` maps
/// enabled providers to their configuration. Unknown or unconfigured
/// services yield `{"success":false,"error":"Unsupported service"}` without
/// any network I/O; any verifier fault is flattened into the same rejected
/// shape.
///
/// Uses the default verifier registry against the real provider hosts. To
/// substitute verifiers (e.g. pointed at stub servers), build a
/// [`SigninVerifiers`] registry and call [`SigninVerifiers::verify`].
pub async fn verify_signin(
    services: &Services,
    service: &str,
    data: &VerificationData,
) -> SigninOutcome {
    SigninVerifiers::new().verify(services, service, data).await
}
