use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ExtractionError;

/// Structured reading of a free-text search request.
///
/// Every field is always present after extraction; unset strings are `""`
/// and unset lists are empty, never missing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIntent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub main_query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exact_phrases: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site_filter: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclude_words: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_range: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchIntent {
    pub fn new(main_query: impl Into<String>) -> SearchIntent {
        SearchIntent {
            main_query: main_query.into(),
            ..Default::default()
        }
    }

    /// Parse a model reply. The trimmed reply must be exactly one JSON object
    /// of the intent schema; unknown keys are ignored.
    pub fn from_reply(reply: &str) -> Result<SearchIntent, ExtractionError> {
        let content = reply.trim();
        serde_json::from_str::<SearchIntent>(content).map_err(|e| {
            ExtractionError::MalformedIntent {
                reason: e.to_string(),
                raw: content.to_string(),
            }
        })
    }
}
