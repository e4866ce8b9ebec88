use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat service error types
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("{0}")]
    HospitalApi(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body returned alongside error statuses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
