pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod intent;
pub mod llm;
pub mod query_builder;
pub mod search;

pub use error::{ExtractionError, ProviderError};
pub use extractor::IntentExtractor;
pub use intent::SearchIntent;
pub use search::{SearchOutcome, SearchPipeline};
