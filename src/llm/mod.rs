use async_trait::async_trait;

use crate::error::ProviderError;

pub mod openai;

pub use openai::OpenAiChat;

/// A language model that answers one system + user exchange with text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}
