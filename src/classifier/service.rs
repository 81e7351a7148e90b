//! Completion service seam
//!
//! The batch classifier talks to the language model only through
//! [`CompletionService`], so tests can swap in deterministic stubs.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while calling the completion service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse service response: {0}")]
    Parse(String),

    #[error("Service returned no completion")]
    EmptyReply,
}

/// A single prompt sent to the completion service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier, e.g. "gpt-4o"
    pub model: String,

    /// Full prompt text: instructions followed by the page previews
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on reply length (tokens)
    pub max_tokens: u32,
}

/// External text-generation service used for classification
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one prompt and returns the reply text
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError>;
}
