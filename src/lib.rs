//! Solar Chat — a single-page conversational chat demo.
//!
//! Forwards user text to a hosted LLM endpoint, optionally runs a
//! Korean→Thai→Korean round-trip translation, optionally rewrites the prompt
//! via a second LLM call, and streams the model's reply back into the chat
//! window.
//!
//! # Crate layout
//!
//! * [`config`] — `settings.toml` persistence and per-call-site model routing.
//! * [`llm`] — OpenAI-compatible client, streamed completions, SSE framing.
//! * [`chat`] — language detection, translation, enhancement, reply
//!   generation, and the per-session conversation log.
//! * [`pipeline`] — the per-turn orchestrator and its state machine.
//! * [`app`] — the egui chat window.

pub mod app;
pub mod chat;
pub mod config;
pub mod llm;
pub mod pipeline;
