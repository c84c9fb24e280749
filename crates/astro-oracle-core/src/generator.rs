//! LLM Gateway contract: one text generation per call, failures returned as values.

use async_trait::async_trait;
use thiserror::Error;

use crate::prompts::PromptMessage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Integration switched off or no API key configured.
    #[error("gemini_disabled_or_missing_key")]
    Disabled,

    /// The model answered but produced no text.
    #[error("gemini_empty_output")]
    EmptyOutput,

    #[error("gemini_timeout")]
    Timeout,

    /// Transport, HTTP or decoding failure, rendered as `<class>: <message>`.
    #[error("gemini_error: {0}")]
    Transport(String),
}

impl GenerationError {
    /// Stable kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Disabled => "llm_disabled",
            Self::EmptyOutput => "llm_empty_output",
            Self::Timeout => "llm_timeout",
            Self::Transport(_) => "llm_error",
        }
    }
}

/// A hosted (or scripted) text model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier reported by diagnostics.
    fn model(&self) -> &str;

    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, GenerationError>;
}
