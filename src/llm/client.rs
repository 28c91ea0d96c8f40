//! Core [`ChatModel`] trait and [`ApiClient`] implementation.
//!
//! `ApiClient` calls any OpenAI-compatible `/chat/completions` endpoint.
//! All connection details come from [`ModelConfig`]; nothing is hardcoded.
//! One `ApiClient` exists per call site (reply generation, each translation
//! direction, prompt enhancement) so each can be routed independently.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use thiserror::Error;

use crate::config::ModelConfig;
use crate::llm::sse;

// ---------------------------------------------------------------------------
// ChatError
// ---------------------------------------------------------------------------

/// Errors that can occur during a model invocation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("model request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// One message in the wire format shared by all OpenAI-compatible endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatModel trait
// ---------------------------------------------------------------------------

/// A finite, single-pass sequence of reply text chunks.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Async trait for LLM invocation.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn ChatModel>`).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `messages` and return the complete reply text.
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;

    /// Send `messages` and return a stream of reply text chunks.
    async fn stream(&self, messages: &[ChatMessage]) -> Result<ReplyStream, ChatError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/chat/completions` endpoint.
///
/// Works with Upstage Solar, OpenAI, Groq, Ollama (OpenAI mode), vLLM — any
/// provider that speaks the OpenAI chat-completions wire format.
pub struct ApiClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl ApiClient {
    /// Build an `ApiClient` from a call-site config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &ModelConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn request_body(&self, messages: &[ChatMessage], stream: bool) -> serde_json::Value {
        let wire: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role, "content": m.content }))
            .collect();

        serde_json::json!({
            "model":       self.config.model,
            "messages":    wire,
            "stream":      stream,
            "temperature": self.config.temperature,
        })
    }

    /// POST to `{base_url}/chat/completions`, attaching the
    /// `Authorization: Bearer …` header **only** when `config.api_key` is a
    /// non-empty string — safe for local providers with no authentication.
    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response, ChatError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut req = self.client.post(&url).json(body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatError::Request(format!("HTTP {status}: {detail}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatModel for ApiClient {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let body = self.request_body(messages, false);
        let response = self.post(&body).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ChatError::EmptyResponse)?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        Ok(content)
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<ReplyStream, ChatError> {
        let body = self.request_body(messages, true);
        let response = self.post(&body).await?;
        Ok(sse::delta_stream(response.bytes_stream()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
