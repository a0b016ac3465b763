#![allow(dead_code)]

use std::io::Write;

use serde_json::{json, Value};
use tempfile::NamedTempFile;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wb_catalog_export::storage::ServiceAccountKey;

pub const ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_rsa_key.pem");

/// Service-account key whose token endpoint lives on the mock server.
pub fn service_account(server: &MockServer) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "exporter@test-project.iam.gserviceaccount.com".to_string(),
        private_key: TEST_PRIVATE_KEY.to_string(),
        token_uri: format!("{}/token", server.uri()),
    }
}

/// The same key written to a temporary JSON file.
pub fn credentials_file(server: &MockServer) -> NamedTempFile {
    let key = service_account(server);
    let mut file = NamedTempFile::new().expect("failed to create credentials file");
    let contents = json!({
        "type": "service_account",
        "client_email": key.client_email,
        "private_key": key.private_key,
        "token_uri": key.token_uri,
    });
    write!(file, "{contents}").expect("failed to write credentials file");
    file
}

pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant-type%3Ajwt-bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub fn cards(ids: std::ops::Range<i64>) -> Value {
    let cards: Vec<Value> = ids
        .map(|id| {
            json!({
                "nmID": id,
                "imtID": id + 1_000_000,
                "title": format!("Товар {id}"),
                "brand": "Acme",
                "vendorCode": format!("SKU-{id}"),
                "createdAt": "2024-05-01T10:00:00.000000Z",
                "updatedAt": "2024-05-02T11:30:00.000000Z"
            })
        })
        .collect();
    json!({ "cards": cards, "cursor": { "total": cards.len() } })
}
