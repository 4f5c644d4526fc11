use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::intent::SearchIntent;
use crate::llm::LanguageModel;

pub const SYSTEM_INSTRUCTION: &str = r#"You analyze web search requests. Extract the search parameters and reply with ONLY a JSON object of this exact shape:
{
    "main_query": "the core search terms",
    "exact_phrases": ["phrase that must match exactly"],
    "site_filter": "example.com",
    "file_type": "pdf",
    "exclude_words": ["word to exclude"],
    "date_range": "2024"
}
Always include all six fields. Use [] for empty lists and "" for empty strings. Do not add any text before or after the JSON."#;

/// Turns free text into a [`SearchIntent`] with one language-model call.
#[derive(Clone)]
pub struct IntentExtractor {
    model: Arc<dyn LanguageModel>,
    temperature: f32,
}

impl IntentExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    /// Extract an intent from `text`. Racing `cancel` aborts the in-flight
    /// model call and yields [`ExtractionError::Transport`].
    pub async fn extract(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchIntent, ExtractionError> {
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("intent extraction canceled");
                return Err(ExtractionError::canceled());
            }
            reply = self.model.complete(SYSTEM_INSTRUCTION, text, self.temperature) => reply?,
        };

        debug!(reply = %reply, "model reply");
        SearchIntent::from_reply(&reply)
    }
}
