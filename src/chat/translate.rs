//! Korean↔Thai translation via templated model calls.
//!
//! Each direction builds a fixed few-shot prompt (three worked examples,
//! carried over verbatim from the source deployment) and asks the model to
//! answer with a single JSON object `{"translation": "<text>"}`.
//!
//! The two directions are routed to **separate** configured models — a
//! deliberate asymmetry in the source deployment, preserved here as a
//! per-direction mapping in [`TranslationConfig`](crate::config::TranslationConfig).
//!
//! Parse failure does not abort the turn: the raw model output is returned
//! as the translation with `parse_failed` set, so the caller can surface a
//! notice while the pipeline continues.

use std::sync::Arc;

use serde::Deserialize;

use crate::config::TranslationConfig;
use crate::llm::{ApiClient, ChatError, ChatMessage, ChatModel};

// ---------------------------------------------------------------------------
// Few-shot templates
// ---------------------------------------------------------------------------

const KOREAN_TO_THAI_TEMPLATE: &str = "\
You are a language translator. Translate the following text from Korean to Thai.
Here are some examples:

Korean: 안녕하세요
{\"translation\": \"สวัสดีครับ/ค่ะ\"}

Korean: 감사합니다
{\"translation\": \"ขอบคุณครับ/ค่ะ\"}

Korean: 맛있어요
{\"translation\": \"อร่อยครับ/ค่ะ\"}

Now translate this:
---
Korean: {text}
---
Response format:
{\"translation\": \"Thai translation here\"}";

const THAI_TO_KOREAN_TEMPLATE: &str = "\
You are a language translator. Translate the following text from Thai to Korean.
Here are some examples:

Thai: สวัสดีครับ/ค่ะ
{\"translation\": \"안녕하세요\"}

Thai: ขอบคุณครับ/ค่ะ
{\"translation\": \"감사합니다\"}

Thai: อร่อยครับ/ค่ะ
{\"translation\": \"맛있어요\"}

Now translate this:
---
Thai: {text}
---
Response format:
{\"translation\": \"Korean translation here\"}";

/// Substitute the input into a few-shot template.
///
/// `str::replace` scans only the template, so braces or markers inside the
/// user text are never re-expanded.
fn render(template: &str, text: &str) -> String {
    template.replace("{text}", text)
}

// ---------------------------------------------------------------------------
// Structured response parsing
// ---------------------------------------------------------------------------

/// Required shape of the model's structured response.
#[derive(Debug, Deserialize)]
struct TranslationResult {
    translation: String,
}

/// Parse `{"translation": "..."}` out of raw model text.
fn extract_translation(raw: &str) -> Option<String> {
    serde_json::from_str::<TranslationResult>(raw)
        .ok()
        .map(|r| r.translation)
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Outcome of one translation call.
///
/// On parse failure `text` holds the raw unparsed model output — translation
/// never silently disappears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Best-effort translated text (raw model output on parse failure).
    pub text: String,
    /// `true` when the model's response was not the expected JSON object and
    /// the caller should surface a non-fatal notice.
    pub parse_failed: bool,
}

impl Translation {
    fn from_raw(raw: String) -> Self {
        match extract_translation(&raw) {
            Some(text) => Self {
                text,
                parse_failed: false,
            },
            None => {
                log::warn!("translation response was not valid JSON; using raw text");
                Self {
                    text: raw,
                    parse_failed: true,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// Wraps the two directed translation operations.
pub struct Translator {
    korean_to_thai: Arc<dyn ChatModel>,
    thai_to_korean: Arc<dyn ChatModel>,
}

impl Translator {
    /// Build from explicit model handles (useful for tests).
    pub fn new(korean_to_thai: Arc<dyn ChatModel>, thai_to_korean: Arc<dyn ChatModel>) -> Self {
        Self {
            korean_to_thai,
            thai_to_korean,
        }
    }

    /// Build one [`ApiClient`] per direction from config.
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(
            Arc::new(ApiClient::from_config(&config.korean_to_thai)),
            Arc::new(ApiClient::from_config(&config.thai_to_korean)),
        )
    }

    /// Translate Korean text to Thai.
    ///
    /// Errors only on transport failure; a malformed model response comes
    /// back as a `parse_failed` [`Translation`].
    pub async fn korean_to_thai(&self, text: &str) -> Result<Translation, ChatError> {
        let prompt = render(KOREAN_TO_THAI_TEMPLATE, text);
        let raw = self
            .korean_to_thai
            .invoke(&[ChatMessage::user(prompt)])
            .await?;
        Ok(Translation::from_raw(raw))
    }

    /// Translate Thai text to Korean.
    pub async fn thai_to_korean(&self, text: &str) -> Result<Translation, ChatError> {
        let prompt = render(THAI_TO_KOREAN_TEMPLATE, text);
        let raw = self
            .thai_to_korean
            .invoke(&[ChatMessage::user(prompt)])
            .await?;
        Ok(Translation::from_raw(raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::llm::ReplyStream;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed raw response and records the prompt it received.
    struct FixedModel {
        response: String,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl FixedModel {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.into(),
                seen: std::sync::Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
            self.seen
                .lock()
                .unwrap()
                .push(messages[0].content.clone());
            Ok(self.response.clone())
        }

        async fn stream(&self, _messages: &[ChatMessage]) -> Result<ReplyStream, ChatError> {
            unimplemented!("translation never streams")
        }
    }

    /// Always fails with a transport error.
    struct FailModel;

    #[async_trait]
    impl ChatModel for FailModel {
        async fn invoke(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
            Err(ChatError::Request("connection refused".into()))
        }

        async fn stream(&self, _messages: &[ChatMessage]) -> Result<ReplyStream, ChatError> {
            Err(ChatError::Request("connection refused".into()))
        }
    }

    fn translator(k2t: Arc<dyn ChatModel>, t2k: Arc<dyn ChatModel>) -> Translator {
        Translator::new(k2t, t2k)
    }

    // -----------------------------------------------------------------------
    // Template tests
    // -----------------------------------------------------------------------

    #[test]
    fn korean_to_thai_template_has_few_shot_examples() {
        let prompt = render(KOREAN_TO_THAI_TEMPLATE, "안녕");
        assert!(prompt.contains("from Korean to Thai"));
        assert!(prompt.contains("안녕하세요"));
        assert!(prompt.contains("สวัสดีครับ/ค่ะ"));
        assert!(prompt.contains("감사합니다"));
        assert!(prompt.contains("맛있어요"));
        assert!(prompt.contains("Korean: 안녕"));
        assert!(prompt.contains("Response format:"));
        assert!(!prompt.contains("{text}"));
    }

    #[test]
    fn thai_to_korean_template_has_few_shot_examples() {
        let prompt = render(THAI_TO_KOREAN_TEMPLATE, "สวัสดี");
        assert!(prompt.contains("from Thai to Korean"));
        assert!(prompt.contains("ขอบคุณครับ/ค่ะ"));
        assert!(prompt.contains("Thai: สวัสดี"));
        assert!(prompt.contains("{\"translation\": \"Korean translation here\"}"));
    }

    #[test]
    fn render_does_not_expand_markers_in_user_text() {
        let prompt = render(KOREAN_TO_THAI_TEMPLATE, "weird {text} input");
        assert!(prompt.contains("Korean: weird {text} input"));
    }

    // -----------------------------------------------------------------------
    // Parsing tests
    // -----------------------------------------------------------------------

    #[test]
    fn extracts_translation_field() {
        assert_eq!(
            extract_translation(r#"{"translation": "สวัสดี"}"#),
            Some("สวัสดี".into())
        );
    }

    #[test]
    fn rejects_non_json() {
        assert_eq!(extract_translation("not json"), None);
    }

    #[test]
    fn rejects_json_without_translation_field() {
        assert_eq!(extract_translation(r#"{"other": "x"}"#), None);
    }

    // -----------------------------------------------------------------------
    // Operation tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn korean_to_thai_returns_parsed_translation() {
        let t = translator(
            FixedModel::new(r#"{"translation": "สวัสดี"}"#),
            FixedModel::new("unused"),
        );
        let result = t.korean_to_thai("안녕").await.unwrap();
        assert_eq!(result.text, "สวัสดี");
        assert!(!result.parse_failed);
    }

    #[tokio::test]
    async fn malformed_output_falls_back_to_raw_text() {
        let t = translator(FixedModel::new("not json"), FixedModel::new("unused"));
        let result = t.korean_to_thai("안녕").await.unwrap();
        assert_eq!(result.text, "not json");
        assert!(result.parse_failed);
    }

    #[tokio::test]
    async fn non_empty_input_yields_non_empty_output_even_on_parse_failure() {
        let t = translator(FixedModel::new("ขอโทษ ไม่เข้าใจ"), FixedModel::new("unused"));
        let result = t.korean_to_thai("감사합니다").await.unwrap();
        assert!(!result.text.is_empty());
    }

    #[tokio::test]
    async fn directions_route_to_their_own_model() {
        let k2t = FixedModel::new(r#"{"translation": "k2t"}"#);
        let t2k = FixedModel::new(r#"{"translation": "t2k"}"#);
        let t = translator(k2t.clone(), t2k.clone());

        assert_eq!(t.korean_to_thai("안녕").await.unwrap().text, "k2t");
        assert_eq!(t.thai_to_korean("สวัสดี").await.unwrap().text, "t2k");

        // Each model saw exactly its own direction's prompt.
        let k2t_seen = k2t.seen.lock().unwrap();
        assert_eq!(k2t_seen.len(), 1);
        assert!(k2t_seen[0].contains("from Korean to Thai"));
        let t2k_seen = t2k.seen.lock().unwrap();
        assert_eq!(t2k_seen.len(), 1);
        assert!(t2k_seen[0].contains("from Thai to Korean"));
    }

    #[tokio::test]
    async fn transport_failure_propagates_as_error() {
        let t = translator(Arc::new(FailModel), Arc::new(FailModel));
        assert!(t.korean_to_thai("안녕").await.is_err());
    }
}
