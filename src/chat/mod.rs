//! Chat domain for Solar Chat.
//!
//! This module provides:
//! * [`is_korean`] — Hangul-syllable input heuristic.
//! * [`Translator`] / [`Translation`] — Korean↔Thai templated translation
//!   with per-direction model routing and raw-text fallback.
//! * [`PromptEnhancer`] / [`ApiEnhancer`] — optional LLM prompt rewriting.
//! * [`ReplyGenerator`] — persona-bound streamed reply generation.
//! * [`ConversationSession`] / [`ConversationTurn`] / [`Role`] — append-only
//!   per-session chat history.

pub mod detect;
pub mod enhance;
pub mod reply;
pub mod session;
pub mod translate;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use detect::is_korean;
pub use enhance::{ApiEnhancer, PromptEnhancer};
pub use reply::ReplyGenerator;
pub use session::{ConversationSession, ConversationTurn, Role};
pub use translate::{Translation, Translator};
