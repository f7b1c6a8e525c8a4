//! Dispatcher integration tests.

use std::sync::Arc;

use signin_verify::{
    GoogleVerifier, ProviderConfig, ProviderType, Services, SigninOutcome, SigninVerifiers,
    VerificationData,
};
use wiremock::MockServer;

use super::mock_server::setup_google_tokeninfo;

#[tokio::test]
async fn test_unknown_service_makes_no_network_calls() {
    let server = MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = SigninVerifiers::new().with_verifier(Arc::new(
        GoogleVerifier::new().with_tokeninfo_endpoint(format!("{}/tokeninfo", server.uri())),
    ));
    let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("abc"));

    let outcome = registry
        .verify(&services, "myspace", &VerificationData::default())
        .await;

    assert_eq!(outcome, SigninOutcome::rejected("Unsupported service"));
}

#[tokio::test]
async fn test_unconfigured_service_is_unsupported() {
    let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("abc"));

    let outcome = SigninVerifiers::new()
        .verify(&services, "github", &VerificationData::default())
        .await;

    assert_eq!(outcome, SigninOutcome::rejected("Unsupported service"));
}

#[tokio::test]
async fn test_end_to_end_google_verification() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, "tok", "abc", Some("a@b.com")).await;

    let registry = SigninVerifiers::new().with_verifier(Arc::new(
        GoogleVerifier::new().with_tokeninfo_endpoint(format!("{}/tokeninfo", server.uri())),
    ));
    let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("abc"));

    let outcome = registry
        .verify(&services, "google", &VerificationData::from_credential("tok"))
        .await;

    assert_eq!(outcome, SigninOutcome::verified("a@b.com"));
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({"success": true, "email": "a@b.com"})
    );
}

#[tokio::test]
async fn test_end_to_end_google_audience_mismatch() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, "tok", "xyz", Some("a@b.com")).await;

    let registry = SigninVerifiers::new().with_verifier(Arc::new(
        GoogleVerifier::new().with_tokeninfo_endpoint(format!("{}/tokeninfo", server.uri())),
    ));
    let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("abc"));

    let outcome = registry
        .verify(&services, "google", &VerificationData::from_credential("tok"))
        .await;

    assert_eq!(
        outcome,
        SigninOutcome::rejected("Mismatch in clientID and \"aud\" value.")
    );
}

#[tokio::test]
async fn test_verifier_fault_becomes_rejected_outcome() {
    // Unroutable endpoint: the HTTP error must flatten into a rejection,
    // never a panic or a second failure channel.
    let registry = SigninVerifiers::new().with_verifier(Arc::new(
        GoogleVerifier::new().with_tokeninfo_endpoint("http://127.0.0.1:1/tokeninfo"),
    ));
    let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("abc"));

    let outcome = registry
        .verify(&services, "google", &VerificationData::from_credential("tok"))
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.error().is_some());
}

#[tokio::test]
async fn test_dispatch_is_idempotent() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, "tok", "abc", Some("a@b.com")).await;

    let registry = SigninVerifiers::new().with_verifier(Arc::new(
        GoogleVerifier::new().with_tokeninfo_endpoint(format!("{}/tokeninfo", server.uri())),
    ));
    let services = Services::new().enable(ProviderType::Google, ProviderConfig::new("abc"));
    let data = VerificationData::from_credential("tok");

    let first = registry.verify(&services, "google", &data).await;
    let second = registry.verify(&services, "google", &data).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_services_deserialized_from_json_config() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, "tok", "abc", Some("a@b.com")).await;

    let services: Services =
        serde_json::from_str(r#"{"google": {"clientId": "abc"}}"#).unwrap();
    let registry = SigninVerifiers::new().with_verifier(Arc::new(
        GoogleVerifier::new().with_tokeninfo_endpoint(format!("{}/tokeninfo", server.uri())),
    ));

    let outcome = registry
        .verify(&services, "google", &VerificationData::from_credential("tok"))
        .await;

    assert_eq!(outcome.email(), Some("a@b.com"));
}
