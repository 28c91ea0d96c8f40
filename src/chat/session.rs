//! Conversation history for one chat session.
//!
//! [`ConversationSession`] is an append-only, insertion-ordered log of
//! [`ConversationTurn`]s.  It is created empty when a session starts, owned
//! exclusively by the orchestrator (never a process-wide singleton), appended
//! to twice per turn — once for the user submission, once for the finished
//! assistant reply — and discarded when the session ends.

use crate::llm::ChatMessage;

// ---------------------------------------------------------------------------
// Role / ConversationTurn
// ---------------------------------------------------------------------------

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire-format role string for OpenAI-compatible endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One logged turn.  Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationSession
// ---------------------------------------------------------------------------

/// Ordered sequence of turns; insertion order defines both chat replay order
/// and the history injected into prompts.
#[derive(Debug, Default)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.  Turns are never mutated or removed afterwards.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the history as wire-format messages for prompt injection.
    pub fn as_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .map(|t| ChatMessage {
                role: t.role.as_str().into(),
                content: t.text.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let session = ConversationSession::new();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(session.as_messages().is_empty());
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut session = ConversationSession::new();
        session.push(ConversationTurn::user("สวัสดี"));
        session.push(ConversationTurn::assistant("Hi there!"));
        session.push(ConversationTurn::user("ขอบคุณ"));

        let turns = session.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0], ConversationTurn::user("สวัสดี"));
        assert_eq!(turns[1], ConversationTurn::assistant("Hi there!"));
        assert_eq!(turns[2], ConversationTurn::user("ขอบคุณ"));
    }

    #[test]
    fn as_messages_maps_roles_to_wire_format() {
        let mut session = ConversationSession::new();
        session.push(ConversationTurn::user("q"));
        session.push(ConversationTurn::assistant("a"));

        let messages = session.as_messages();
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "q");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].content, "a");
    }
}
