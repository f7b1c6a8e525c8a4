//! Google verifier integration tests.

use signin_verify::{GoogleVerifier, ProviderConfig, SigninVerifier, VerificationData};
use wiremock::MockServer;

use super::common::{test_config, TEST_CLIENT_ID, TEST_EMAIL, TEST_ID_TOKEN};
use super::mock_server::setup_google_tokeninfo;

fn verifier_for(server: &MockServer) -> GoogleVerifier {
    GoogleVerifier::new().with_tokeninfo_endpoint(format!("{}/tokeninfo", server.uri()))
}

#[tokio::test]
async fn test_google_happy_path() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, TEST_ID_TOKEN, TEST_CLIENT_ID, Some(TEST_EMAIL)).await;

    let email = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_credential(TEST_ID_TOKEN))
        .await
        .unwrap();

    assert_eq!(email, TEST_EMAIL);
}

#[tokio::test]
async fn test_google_audience_mismatch_wins_over_present_email() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, TEST_ID_TOKEN, "some-other-client", Some(TEST_EMAIL)).await;

    let err = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_credential(TEST_ID_TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Mismatch in clientID and \"aud\" value.");
}

#[tokio::test]
async fn test_google_missing_email_claim() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, TEST_ID_TOKEN, TEST_CLIENT_ID, None).await;

    let err = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_credential(TEST_ID_TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Email not found");
}

#[tokio::test]
async fn test_google_accepts_legacy_code_field() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, TEST_ID_TOKEN, TEST_CLIENT_ID, Some(TEST_EMAIL)).await;

    let email = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_code(TEST_ID_TOKEN))
        .await
        .unwrap();

    assert_eq!(email, TEST_EMAIL);
}

#[tokio::test]
async fn test_google_invalid_token_error_body_is_mismatch() {
    // An invalid token produces an error body with no `aud` claim at all.
    let server = MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/tokeninfo"))
        .respond_with(
            wiremock::ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_token"})),
        )
        .mount(&server)
        .await;

    let err = verifier_for(&server)
        .verify(&test_config(), &VerificationData::from_credential("garbage"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Mismatch in clientID and \"aud\" value.");
}

#[tokio::test]
async fn test_google_is_idempotent_over_stable_response() {
    let server = MockServer::start().await;
    setup_google_tokeninfo(&server, TEST_ID_TOKEN, TEST_CLIENT_ID, Some(TEST_EMAIL)).await;

    let verifier = verifier_for(&server);
    let config = ProviderConfig::new(TEST_CLIENT_ID);
    let data = VerificationData::from_credential(TEST_ID_TOKEN);

    let first = verifier.verify(&config, &data).await.unwrap();
    let second = verifier.verify(&config, &data).await.unwrap();
    assert_eq!(first, second);
}
