use serde::{Deserialize, Serialize};

use crate::intent::SearchIntent;

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchResponse {
    pub search_url: String,
    pub intent: SearchIntent,
}
