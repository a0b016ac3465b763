use std::path::Path;
use chrono::Utc;
use http::StatusCode;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use crate::clients::HttpClient;
use crate::error::{Error, Result};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account key file that token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read(path)
            .map_err(|e| Error::backend(&format!("cannot read credentials file {}", path.display()), e))?;
        serde_json::from_slice(&contents)
            .map_err(|e| Error::backend("invalid service account credentials", e))
    }

    /// Signed RS256 assertion for the JWT-bearer grant.
    pub fn assertion(&self, issued_at: i64) -> Result<String> {
        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::backend("invalid service account private key", e))?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| Error::backend("failed to sign token assertion", e))
    }
}

pub async fn fetch_access_token(client: &HttpClient, key: &ServiceAccountKey) -> Result<String> {
    let assertion = key.assertion(Utc::now().timestamp())?;

    debug!(
        client_email = %key.client_email,
        token_uri = %key.token_uri,
        "Requesting access token"
    );

    let request = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]);

    let response = client
        .send(request)
        .await
        .map_err(|e| Error::backend("token request failed", e))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::backend("token response unreadable", e))?;

    if status != StatusCode::OK {
        let body_str = String::from_utf8_lossy(&body);
        error!(
            status = status.as_u16(),
            body = %body_str,
            "Token exchange rejected"
        );
        return Err(Error::Backend(format!(
            "token exchange failed: {}, {}",
            status, body_str
        )));
    }

    let token: TokenResponse = serde_json::from_slice(&body)
        .map_err(|e| Error::backend("invalid token response", e))?;

    Ok(token.access_token)
}
