use serde::{Deserialize, Serialize};
use super::card::CatalogCard;

#[derive(Debug, Serialize)]
pub struct CardsListRequest {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct CardsListResponse {
    #[serde(default)]
    pub cards: Option<Vec<CatalogCard>>,
}

impl CardsListResponse {
    pub fn into_cards(self) -> Vec<CatalogCard> {
        self.cards.unwrap_or_default()
    }
}
