use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One product card from the content API. Only the six exported keys are
/// kept; a key with an unexpected JSON type is read as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogCard {
    #[serde(rename = "nmID", default, deserialize_with = "lenient_id")]
    pub nm_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: Option<String>,
    #[serde(rename = "imtID", default, deserialize_with = "lenient_id")]
    pub imt_id: Option<i64>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
