//! Turn state machine.
//!
//! [`TurnPhase`] tracks where the orchestrator is inside one chat turn.  The
//! UI reads it to label the busy indicator and to disable the input box while
//! a turn is in flight (exactly one active turn per session).

// ---------------------------------------------------------------------------
// TurnPhase
// ---------------------------------------------------------------------------

/// Phases of one chat turn.
///
/// The transitions, triggered by one user submission, are:
///
/// ```text
/// Idle ──Korean input──▶ TranslatingPrompt ─┐
///      ──otherwise──────────────────────────┤
///                                           ├─▶ (Enhancing, toggle on)
///                                           └─▶ Generating
///                          Generating ──stream done──▶ TranslatingReply
///                          TranslatingReply ──▶ Idle
/// any phase ──transport failure──▶ Error
/// Error ──next submission──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the user to submit a prompt.
    Idle,

    /// The Korean prompt is being translated to Thai.
    TranslatingPrompt,

    /// The prompt is being rewritten by the enhancement model.
    Enhancing,

    /// The primary model is streaming the reply.
    Generating,

    /// The finished reply is being back-translated to Korean.
    TranslatingReply,

    /// A transport failure ended the turn early.  The next submission
    /// returns to `Idle`.
    Error,
}

impl TurnPhase {
    /// Returns `true` while a turn is in flight.
    ///
    /// The UI uses this to disable the chat input while busy.
    ///
    /// ```
    /// use solar_chat::pipeline::TurnPhase;
    ///
    /// assert!(!TurnPhase::Idle.is_busy());
    /// assert!(TurnPhase::TranslatingPrompt.is_busy());
    /// assert!(TurnPhase::Generating.is_busy());
    /// assert!(!TurnPhase::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            TurnPhase::TranslatingPrompt
                | TurnPhase::Enhancing
                | TurnPhase::Generating
                | TurnPhase::TranslatingReply
        )
    }

    /// A short human-readable label suitable for the UI status line.
    pub fn label(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "Idle",
            TurnPhase::TranslatingPrompt => "Translating Korean to Thai...",
            TurnPhase::Enhancing => "Prompt engineering...",
            TurnPhase::Generating => "Generating...",
            TurnPhase::TranslatingReply => "Translating reply to Korean...",
            TurnPhase::Error => "Error",
        }
    }
}

impl Default for TurnPhase {
    fn default() -> Self {
        TurnPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
