//! Turn orchestration for Solar Chat.
//!
//! This module wires the full detect → translate → enhance → generate →
//! back-translate pipeline behind a pair of mpsc channels.
//!
//! # Architecture
//!
//! ```text
//! ChatCommand (mpsc)                    TurnEvent (mpsc)
//!        │                                    ▲
//!        ▼                                    │
//! ChatOrchestrator::run()  ← async tokio task ┘
//!        │
//!        └─ Submit { prompt, enhance }
//!              ├─ is_korean → Translator::korean_to_thai  [TranslatingPrompt]
//!              ├─ toggle on → PromptEnhancer::enhance     [Enhancing]
//!              ├─ ReplyGenerator::generate (streamed)     [Generating]
//!              └─ Translator::thai_to_korean (always)     [TranslatingReply]
//!
//! TurnEvents are polled by the egui update loop each frame.
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use tokio::sync::mpsc;
//! use solar_chat::config::AppConfig;
//! use solar_chat::pipeline::{ChatCommand, ChatOrchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let mut orchestrator = ChatOrchestrator::from_config(&config);
//!
//!     let (command_tx, command_rx) = mpsc::channel(16);
//!     let (event_tx, _event_rx) = mpsc::channel(64);
//!
//!     tokio::spawn(async move { orchestrator.run(command_rx, event_tx).await });
//!
//!     command_tx
//!         .send(ChatCommand::Submit { prompt: "안녕".into(), enhance: false })
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{ChatCommand, ChatOrchestrator, TurnEvent};
pub use state::TurnPhase;
