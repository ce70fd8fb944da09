use serde::{Deserialize, Serialize};

/// Payload `code` the API uses for success
pub const SUCCESS_CODE: i64 = 200;

/// One entry of the tag dictionary endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DictEntry {
    /// Tag code as it appears in a record's `tags` field
    #[serde(default)]
    pub dict_value: String,
    /// Human-readable label
    #[serde(default)]
    pub dict_label: String,
}

impl DictEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            dict_value: value.into(),
            dict_label: label.into(),
        }
    }
}

/// Response of the tag dictionary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictResponse {
    pub code: i64,
    #[serde(default)]
    pub data: Vec<DictEntry>,
}

/// One record of the paginated list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    /// Source identifier
    pub id: u64,
    /// Raw passage text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub barrage: String,
    /// Comma-separated tag codes
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: String,
}

impl RawRecord {
    pub fn new(id: u64, barrage: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id,
            barrage: barrage.into(),
            tags: tags.into(),
        }
    }
}

/// `data` object of a page response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageData {
    #[serde(default)]
    pub list: Vec<RawRecord>,
}

/// Response of the paginated list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub code: i64,
    #[serde(default)]
    pub data: PageData,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
