//! Model invocation layer for Solar Chat.
//!
//! This module provides:
//! * [`ChatModel`] — async trait implemented by all model backends.
//! * [`ApiClient`] — OpenAI-compatible REST client (one per call site).
//! * [`ChatMessage`] — wire-format message.
//! * [`ReplyStream`] — streamed reply chunks.
//! * [`ChatError`] — error variants for model operations.
//! * [`sse`] — SSE framing for streamed completions.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use solar_chat::config::ModelConfig;
//! use solar_chat::llm::{ApiClient, ChatMessage, ChatModel};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ApiClient::from_config(&ModelConfig::default());
//!     let reply = client
//!         .invoke(&[ChatMessage::user("สวัสดีครับ")])
//!         .await
//!         .unwrap();
//!     println!("{}", reply);
//! }
//! ```

pub mod client;
pub mod sse;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiClient, ChatError, ChatMessage, ChatModel, ReplyStream};
