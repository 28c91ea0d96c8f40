//! Optional LLM-driven prompt rewriting.
//!
//! When the "Enhance prompt" toggle is on, the raw prompt is sent to a second
//! model together with the conversation so far, and the model may answer with
//! `{"enhanced_prompt": "<rewritten prompt>"}`.  The response is untrusted:
//! the rewritten prompt is used only when the field is present and non-empty;
//! anything else means "no enhancement" and the original prompt stands.
//!
//! Enhancement is an optional stage, so the orchestrator treats any
//! transport error here as "no enhancement" rather than aborting the turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::chat::session::ConversationTurn;
use crate::config::ModelConfig;
use crate::llm::{ApiClient, ChatError, ChatMessage, ChatModel};

// ---------------------------------------------------------------------------
// Enhancement prompt
// ---------------------------------------------------------------------------

const ENHANCE_INSTRUCTION: &str = "\
You are a prompt engineer. Rewrite the user's prompt below so it is clearer,
more specific, and more likely to get a useful answer, using the conversation
history for context. Keep the user's language and intent unchanged.
Respond with a single JSON object:
{\"enhanced_prompt\": \"rewritten prompt here\"}";

/// Build the full enhancement prompt: instruction + history + raw prompt.
fn build_prompt(prompt: &str, history: &[ConversationTurn]) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(ENHANCE_INSTRUCTION);

    if !history.is_empty() {
        out.push_str("\n\nConversation so far:\n");
        for turn in history {
            out.push_str(&format!("{}: {}\n", turn.role.as_str(), turn.text));
        }
    }

    out.push_str(&format!("\nPrompt to rewrite:\n{}\n", prompt));
    out
}

// ---------------------------------------------------------------------------
// Structured response parsing
// ---------------------------------------------------------------------------

/// Loosely-typed response shape; `enhanced_prompt` is optional.
#[derive(Debug, Deserialize)]
struct EnhancedPrompt {
    #[serde(default)]
    enhanced_prompt: Option<String>,
}

/// Pull a usable `enhanced_prompt` value out of raw model text.
///
/// Absence of the field, an empty value, or unparseable output all mean
/// "no enhancement" — never an error.
fn extract_enhanced(raw: &str) -> Option<String> {
    let parsed: EnhancedPrompt = serde_json::from_str(raw).ok()?;
    let value = parsed.enhanced_prompt?;
    if value.trim().is_empty() {
        return None;
    }
    Some(value)
}

// ---------------------------------------------------------------------------
// PromptEnhancer trait / ApiEnhancer
// ---------------------------------------------------------------------------

/// External collaborator that may rewrite a raw prompt.
#[async_trait]
pub trait PromptEnhancer: Send + Sync {
    /// Returns `Ok(Some(rewritten))` when the model produced a usable
    /// rewrite, `Ok(None)` when it did not.
    async fn enhance(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Option<String>, ChatError>;
}

/// [`PromptEnhancer`] backed by a configured model endpoint.
pub struct ApiEnhancer {
    model: Arc<dyn ChatModel>,
}

impl ApiEnhancer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(Arc::new(ApiClient::from_config(config)))
    }
}

#[async_trait]
impl PromptEnhancer for ApiEnhancer {
    async fn enhance(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Option<String>, ChatError> {
        let full = build_prompt(prompt, history);
        let raw = self.model.invoke(&[ChatMessage::user(full)]).await?;
        Ok(extract_enhanced(&raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ReplyStream;

    struct FixedModel(String);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn invoke(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
            Ok(self.0.clone())
        }

        async fn stream(&self, _messages: &[ChatMessage]) -> Result<ReplyStream, ChatError> {
            unimplemented!("enhancement never streams")
        }
    }

    // ---- extract_enhanced ---

    #[test]
    fn usable_value_is_extracted() {
        let raw = r#"{"enhanced_prompt": "Explain X step by step"}"#;
        assert_eq!(extract_enhanced(raw), Some("Explain X step by step".into()));
    }

    #[test]
    fn missing_field_means_no_enhancement() {
        assert_eq!(extract_enhanced(r#"{"something_else": "x"}"#), None);
    }

    #[test]
    fn empty_value_means_no_enhancement() {
        assert_eq!(extract_enhanced(r#"{"enhanced_prompt": "  "}"#), None);
    }

    #[test]
    fn unparseable_output_means_no_enhancement() {
        assert_eq!(extract_enhanced("I refuse to answer in JSON"), None);
    }

    // ---- build_prompt ---

    #[test]
    fn prompt_includes_history_and_raw_prompt() {
        let history = vec![
            ConversationTurn::user("สวัสดี"),
            ConversationTurn::assistant("Hi!"),
        ];
        let full = build_prompt("ช่วยอธิบาย", &history);

        assert!(full.contains("Conversation so far:"));
        assert!(full.contains("user: สวัสดี"));
        assert!(full.contains("assistant: Hi!"));
        assert!(full.contains("Prompt to rewrite:\nช่วยอธิบาย"));
    }

    #[test]
    fn prompt_omits_history_section_when_empty() {
        let full = build_prompt("hello", &[]);
        assert!(!full.contains("Conversation so far:"));
        assert!(full.contains("Prompt to rewrite:\nhello"));
    }

    // ---- ApiEnhancer ---

    #[tokio::test]
    async fn enhancer_returns_usable_rewrite() {
        let enhancer = ApiEnhancer::new(Arc::new(FixedModel(
            r#"{"enhanced_prompt": "better prompt"}"#.into(),
        )));
        let result = enhancer.enhance("prompt", &[]).await.unwrap();
        assert_eq!(result, Some("better prompt".into()));
    }

    #[tokio::test]
    async fn enhancer_returns_none_for_unusable_response() {
        let enhancer = ApiEnhancer::new(Arc::new(FixedModel("nope".into())));
        let result = enhancer.enhance("prompt", &[]).await.unwrap();
        assert_eq!(result, None);
    }
}
