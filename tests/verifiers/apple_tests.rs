//! Apple verifier integration tests.

use signin_verify::{AppleVerifier, SigninVerifier, VerificationData};
use wiremock::MockServer;

use super::common::{test_config, TEST_EMAIL, TEST_ID_TOKEN};
use super::mock_server::setup_apple_verify;

fn verifier_for(server: &MockServer) -> AppleVerifier {
    AppleVerifier::new().with_verify_endpoint(format!("{}/auth/verify", server.uri()))
}

#[tokio::test]
async fn test_apple_happy_path() {
    let server = MockServer::start().await;
    setup_apple_verify(&server, true, Some(TEST_EMAIL), None).await;

    let email = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_id_token(TEST_ID_TOKEN))
        .await
        .unwrap();

    assert_eq!(email, TEST_EMAIL);
}

#[tokio::test]
async fn test_apple_rejection_surfaces_provider_error() {
    let server = MockServer::start().await;
    setup_apple_verify(&server, false, None, Some("id_token expired")).await;

    let err = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_id_token(TEST_ID_TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "id_token expired");
}

#[tokio::test]
async fn test_apple_rejection_without_error_detail() {
    let server = MockServer::start().await;
    setup_apple_verify(&server, false, None, None).await;

    let err = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_id_token(TEST_ID_TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid Apple signin");
}

#[tokio::test]
async fn test_apple_success_without_email() {
    let server = MockServer::start().await;
    setup_apple_verify(&server, true, None, None).await;

    let err = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_id_token(TEST_ID_TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Email not available from Apple");
}
