use rquest::{Client, Response, RequestBuilder};
use rquest_util::Emulation;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use crate::error::{Error, Result};
use tracing::debug;

/// `rquest` client that stamps a fixed set of headers onto every request.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_headers(HeaderMap::new())
    }

    pub fn with_headers(headers: HeaderMap) -> Result<Self> {
        debug!(
            emulation = ?Emulation::Chrome133,
            header_count = headers.len(),
            "Creating client with emulation"
        );

        let client = Client::builder()
            .emulation(Emulation::Chrome133)
            .build()?;

        Ok(Self { client, headers })
    }

    /// Adds a header whose value is kept out of debug output.
    pub fn with_secret_header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| Error::Configuration(format!("invalid value for header {}: {}", name, e)))?;
        value.set_sensitive(true);
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        debug!(url = url, "Creating GET request");
        self.apply_headers(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        debug!(url = url, "Creating POST request");
        self.apply_headers(self.client.post(url))
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        debug!(url = url, "Creating PUT request");
        self.apply_headers(self.client.put(url))
    }

    fn apply_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }
        request
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;

        debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "Response received"
        );

        Ok(response)
    }
}

/// JSON request body with the matching content type.
pub fn json_body<T: serde::Serialize>(request: RequestBuilder, body: &T) -> Result<RequestBuilder> {
    let bytes = serde_json::to_vec(body)?;
    Ok(request
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(bytes))
}
