use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::ExtractionError;
use crate::extractor::IntentExtractor;
use crate::intent::SearchIntent;
use crate::query_builder;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchOutcome {
    pub search_url: String,
    pub intent: SearchIntent,
}

/// Free text in, search URL out: extract the intent, then render it.
#[derive(Clone)]
pub struct SearchPipeline {
    extractor: IntentExtractor,
}

impl SearchPipeline {
    pub fn new(extractor: IntentExtractor) -> Self {
        Self { extractor }
    }

    pub async fn handle(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, ExtractionError> {
        let intent = self
            .extractor
            .extract(text, cancel)
            .await
            .inspect_err(|e| error!(kind = e.kind(), "error analyzing prompt: {e}"))?;

        let search_url = query_builder::build(&intent);
        info!(%search_url, "built search url");

        Ok(SearchOutcome { search_url, intent })
    }
}
