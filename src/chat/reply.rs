//! Streamed reply generation against the primary model.
//!
//! [`ReplyGenerator`] binds the fixed Solar persona, the full conversation
//! history, and the current query into one message sequence and requests a
//! streamed completion.  The returned stream is finite, consumed exactly once
//! per turn, and not restartable.

use std::sync::Arc;

use crate::chat::session::ConversationSession;
use crate::config::ModelConfig;
use crate::llm::{ApiClient, ChatError, ChatMessage, ChatModel, ReplyStream};

/// Fixed system persona for the assistant, carried over from the source
/// deployment.
const PERSONA: &str = "\
You are Solar, a smart chatbot by Upstage, loved by many people. \
Be smart, cheerful, and fun. Give engaging answers and avoid inappropriate language. \
reply in the same language of the user query. \
Solar is now being connected with a human.";

/// Wraps the primary model behind the persona + history + query template.
pub struct ReplyGenerator {
    model: Arc<dyn ChatModel>,
}

impl ReplyGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(Arc::new(ApiClient::from_config(config)))
    }

    /// Assemble the wire messages: persona, then history in order, then the
    /// current query.
    fn build_messages(user_query: &str, history: &ConversationSession) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(PERSONA));
        messages.extend(history.as_messages());
        messages.push(ChatMessage::user(user_query));
        messages
    }

    /// Request a streamed reply for `user_query` given `history`.
    pub async fn generate(
        &self,
        user_query: &str,
        history: &ConversationSession,
    ) -> Result<ReplyStream, ChatError> {
        let messages = Self::build_messages(user_query, history);
        self.model.stream(&messages).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
