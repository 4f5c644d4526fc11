use thiserror::Error;

/// Failure reported by a language-model capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network failure, timeout or cancellation before a reply arrived.
    #[error("{0}")]
    Transport(String),

    /// The provider answered with an explicit error (quota, auth, ...).
    #[error("{0}")]
    Rejected(String),

    /// The provider answered but offered no result candidates.
    #[error("no response choices from provider")]
    Empty,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Terminal failure of intent extraction. Nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider rejected request: {0}")]
    ProviderRejected(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("error parsing intent JSON: {reason}\nContent: {raw}")]
    MalformedIntent { reason: String, raw: String },
}

impl ExtractionError {
    pub fn canceled() -> Self {
        ExtractionError::Transport("request canceled".to_string())
    }

    /// Short, stable name of the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Transport(_) => "transport",
            ExtractionError::ProviderRejected(_) => "provider_rejected",
            ExtractionError::EmptyResponse => "empty_response",
            ExtractionError::MalformedIntent { .. } => "malformed_intent",
        }
    }
}

impl From<ProviderError> for ExtractionError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Transport(msg) => ExtractionError::Transport(msg),
            ProviderError::Rejected(msg) => ExtractionError::ProviderRejected(msg),
            ProviderError::Empty => ExtractionError::EmptyResponse,
        }
    }
}

#[test]
fn test_provider_error_maps_to_extraction_kind() {
    assert_eq!(
        ExtractionError::from(ProviderError::Transport("reset".into())),
        ExtractionError::Transport("reset".into())
    );
    assert_eq!(
        ExtractionError::from(ProviderError::Rejected("quota".into())),
        ExtractionError::ProviderRejected("quota".into())
    );
    assert_eq!(
        ExtractionError::from(ProviderError::Empty),
        ExtractionError::EmptyResponse
    );
    assert_eq!(ExtractionError::canceled().kind(), "transport");
}
