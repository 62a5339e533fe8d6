//! Common test utilities for integration tests.

use std::time::Duration;
use twilio_client::TwilioClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Basic credentials of the root account used by [`test_client`]
pub const ROOT_AUTH: &str = "Basic QUNyb290OnJvb3QtdG9rZW4=";

/// Basic credentials of subaccount AC2 (token "sub-token")
pub const AC2_AUTH: &str = "Basic QUMyOnN1Yi10b2tlbg==";

/// Create a root-account client configured for a mock server.
pub fn test_client(mock_server: &MockServer) -> TwilioClient {
    TwilioClient::new("ACroot", "root-token", Duration::from_secs(5))
        .unwrap()
        .with_base_urls(mock_server.uri(), mock_server.uri())
}

pub fn number_json(sid: &str, account_sid: &str) -> serde_json::Value {
    serde_json::json!({
        "sid": sid,
        "account_sid": account_sid,
        "phone_number": "+33612345678",
        "friendly_name": "Boutique",
        "address_sid": null,
        "bundle_sid": null
    })
}

/// Mount the local and mobile listings of an account.
pub async fn mount_numbers(
    mock_server: &MockServer,
    account_sid: &str,
    local: Vec<serde_json::Value>,
    mobile: Vec<serde_json::Value>,
) {
    for (segment, numbers) in [("Local", local), ("Mobile", mobile)] {
        Mock::given(method("GET"))
            .and(path(format!(
                "/2010-04-01/Accounts/{}/IncomingPhoneNumbers/{}.json",
                account_sid, segment
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "incoming_phone_numbers": numbers,
                "next_page_uri": null
            })))
            .mount(mock_server)
            .await;
    }
}

/// Mount the account fetch that hands out AC2's auth token.
pub async fn mount_target_account(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/2010-04-01/Accounts/AC2.json"))
        .and(header("Authorization", ROOT_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sid": "AC2",
            "friendly_name": "Target",
            "status": "active",
            "owner_account_sid": "ACroot",
            "auth_token": "sub-token"
        })))
        .mount(mock_server)
        .await;
}
