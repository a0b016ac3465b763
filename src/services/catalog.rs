use async_trait::async_trait;
use http::StatusCode;
use http::header::AUTHORIZATION;
use tracing::{debug, error};
use crate::clients::HttpClient;
use crate::clients::http::json_body;
use crate::error::{Error, Result};
use crate::models::{CardsListRequest, CardsListResponse, CatalogCard};

/// One page of the remote product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<CatalogCard>>;
}

pub struct WildberriesCatalog {
    client: HttpClient,
    url: String,
}

impl WildberriesCatalog {
    pub fn new(url: &str, api_token: &str) -> Result<Self> {
        let client = HttpClient::new()?.with_secret_header(AUTHORIZATION, api_token)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for WildberriesCatalog {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<CatalogCard>> {
        let request = json_body(self.client.post(&self.url), &CardsListRequest { offset, limit })?;
        let response = self.client.send(request).await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            offset = offset,
            limit = limit,
            "Catalog response received"
        );

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = %body,
                "Catalog request failed"
            );
            return Err(Error::RemoteApi { status, body });
        }

        let body = response.bytes().await?;
        let page: CardsListResponse = serde_json::from_slice(&body).map_err(|e| {
            let body_str = String::from_utf8_lossy(&body);
            error!(
                error = %e,
                body = %body_str,
                "Failed to parse catalog page"
            );
            Error::from(e)
        })?;

        Ok(page.into_cards())
    }
}
