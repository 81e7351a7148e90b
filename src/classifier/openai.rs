//! OpenAI chat completions client
//!
//! A minimal REST client covering the two calls a scan needs: chat
//! completions for classification and the model listing for the CLI.

use crate::classifier::service::{CompletionRequest, CompletionService, ServiceError};
use crate::config::ClassifierConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens in completion (for older models)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Maximum completion tokens (for o1, o3, gpt-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

impl ChatRequest {
    /// Builds a single-message request from a classification prompt
    pub fn from_completion(request: CompletionRequest) -> Self {
        let (max_tokens, max_completion_tokens) = if uses_max_completion_tokens(&request.model) {
            (None, Some(request.max_tokens))
        } else {
            (Some(request.max_tokens), None)
        };

        Self {
            model: request.model,
            messages: vec![Message::user(request.prompt)],
            temperature: Some(request.temperature),
            max_tokens,
            max_completion_tokens,
        }
    }
}

/// Check if a model requires max_completion_tokens instead of max_tokens.
pub fn uses_max_completion_tokens(model: &str) -> bool {
    model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("gpt-5")
        || model.contains("-o1")
        || model.contains("-o3")
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChoiceRaw>,
}

#[derive(Debug, Deserialize)]
struct ChoiceRaw {
    message: MessageRaw,
}

#[derive(Debug, Deserialize)]
struct MessageRaw {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListRaw {
    data: Vec<ModelRaw>,
}

#[derive(Debug, Deserialize)]
struct ModelRaw {
    id: String,
}

/// OpenAI-compatible API client
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client for the public OpenAI API with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Builds a client from the classifier configuration
    ///
    /// Reads the API key from the configured environment variable and applies
    /// the configured base URL and request timeout.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ServiceError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ServiceError::Config(format!("{} not set", config.api_key_env)))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(api_key)
            .with_http_client(http_client)
            .with_base_url(&config.api_base_url))
    }

    /// Set a custom base URL (for Azure, proxies, local gateways, etc.)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the underlying HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat completion and returns the first choice's content
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<String, ServiceError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Chat completion request failed: {}", e);
                ServiceError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        tracing::debug!(
            "Chat completion with {} took {} ms",
            request.model,
            start.elapsed().as_millis()
        );

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ServiceError::EmptyReply)
    }

    /// Lists the GPT model identifiers available to this key, sorted
    pub async fn list_models(&self) -> Result<Vec<String>, ServiceError> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let list: ModelListRaw = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        let mut models: Vec<String> = list
            .data
            .into_iter()
            .map(|model| model.id)
            .filter(|id| id.starts_with("gpt"))
            .collect();
        models.sort();

        Ok(models)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError> {
        let chat_request = ChatRequest::from_completion(request);
        self.chat_completion(&chat_request).await
    }
}
