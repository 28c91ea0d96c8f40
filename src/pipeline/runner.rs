//! Chat orchestrator — drives the full detect → translate → enhance →
//! generate → back-translate loop for each submitted prompt.
//!
//! [`ChatOrchestrator`] owns the [`ConversationSession`] and responds to
//! [`ChatCommand`]s received over a `tokio::sync::mpsc` channel, reporting
//! progress back to the UI as [`TurnEvent`]s.
//!
//! # Turn flow
//!
//! ```text
//! ChatCommand::Submit { prompt, enhance }
//!   ├─ empty prompt → ignored
//!   ├─ is_korean(prompt)    → Translator::korean_to_thai   [TranslatingPrompt]
//!   ├─ enhance toggle on    → PromptEnhancer::enhance      [Enhancing]
//!   ├─ echo user message, append user turn
//!   ├─ ReplyGenerator::generate, forward each chunk        [Generating]
//!   ├─ Translator::thai_to_korean (always)                 [TranslatingReply]
//!   └─ append assistant turn                               [Idle]
//! ```
//!
//! The back-translation in the last stage runs for every turn regardless of
//! the detected input language — fixed pipeline behavior carried over from
//! the source deployment.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::chat::{
    is_korean, ConversationSession, ConversationTurn, PromptEnhancer, ReplyGenerator, Translator,
};
use crate::config::AppConfig;

use super::state::TurnPhase;

// ---------------------------------------------------------------------------
// Commands and events
// ---------------------------------------------------------------------------

/// Commands sent from the UI to the orchestrator.
#[derive(Debug, Clone)]
pub enum ChatCommand {
    /// Process one user submission.
    Submit {
        /// Raw prompt text captured from the input box.
        prompt: String,
        /// State of the "Enhance prompt" toggle at submission time.
        enhance: bool,
    },
}

/// Progress events delivered from the orchestrator to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// The turn moved to a new phase.
    Phase(TurnPhase),
    /// The Korean prompt was translated; `thai` replaces it downstream.
    PromptTranslated { thai: String },
    /// The enhancement model produced a usable rewrite.
    PromptEnhanced { enhanced: String },
    /// Echo of the prompt as the Human chat message (post-translation text,
    /// matching the observed source behavior).
    UserMessage { text: String },
    /// One streamed reply chunk, in arrival order.
    ReplyChunk { delta: String },
    /// The reply stream finished; `text` is the accumulated full reply.
    ReplyComplete { text: String },
    /// The back-translated (Korean) rendition of the reply.
    ReplyTranslated { korean: String },
    /// A non-fatal notice (e.g. a translation response that was not valid
    /// JSON and fell back to raw text).
    Notice { message: String },
    /// A transport failure ended the turn.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// ChatOrchestrator
// ---------------------------------------------------------------------------

/// Drives the complete chat turn pipeline.
///
/// Create with [`ChatOrchestrator::new`] (or [`from_config`](Self::from_config)),
/// then call [`run`](Self::run) inside a tokio task.  Exactly one turn is
/// processed at a time; the session history is owned here and threaded
/// through every stage rather than living in any global state.
pub struct ChatOrchestrator {
    session: ConversationSession,
    translator: Translator,
    enhancer: Arc<dyn PromptEnhancer>,
    reply: ReplyGenerator,
}

impl ChatOrchestrator {
    pub fn new(
        translator: Translator,
        enhancer: Arc<dyn PromptEnhancer>,
        reply: ReplyGenerator,
    ) -> Self {
        Self {
            session: ConversationSession::new(),
            translator,
            enhancer,
            reply,
        }
    }

    /// Build all model clients from application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Translator::from_config(&config.translation),
            Arc::new(crate::chat::ApiEnhancer::from_config(&config.enhancer)),
            ReplyGenerator::from_config(&config.chat),
        )
    }

    /// The session history accumulated so far.
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `command_rx` is closed.
    ///
    /// This should be spawned as a tokio task from `main()`.  It never
    /// returns while the channel is open.
    pub async fn run(
        &mut self,
        mut command_rx: mpsc::Receiver<ChatCommand>,
        event_tx: mpsc::Sender<TurnEvent>,
    ) {
        while let Some(command) = command_rx.recv().await {
            match command {
                ChatCommand::Submit { prompt, enhance } => {
                    self.handle_submit(prompt, enhance, &event_tx).await;
                }
            }
        }

        log::info!("chat: command channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // Turn handler
    // -----------------------------------------------------------------------

    async fn handle_submit(
        &mut self,
        prompt: String,
        enhance: bool,
        events: &mpsc::Sender<TurnEvent>,
    ) {
        // Empty submissions are ignored — no transition, no events.
        if prompt.trim().is_empty() {
            log::debug!("chat: ignoring empty submission");
            return;
        }

        let mut prompt = prompt;

        // ── 1. Korean input → Thai ───────────────────────────────────────
        if is_korean(&prompt) {
            self.send(events, TurnEvent::Phase(TurnPhase::TranslatingPrompt))
                .await;

            match self.translator.korean_to_thai(&prompt).await {
                Ok(translation) => {
                    if translation.parse_failed {
                        self.send(
                            events,
                            TurnEvent::Notice {
                                message: "Failed to parse translation response".into(),
                            },
                        )
                        .await;
                    }
                    log::debug!("chat: prompt translated to Thai: {:?}", translation.text);
                    self.send(
                        events,
                        TurnEvent::PromptTranslated {
                            thai: translation.text.clone(),
                        },
                    )
                    .await;
                    // The translated text replaces the prompt for all
                    // subsequent stages.
                    prompt = translation.text;
                }
                Err(e) => {
                    self.fail(events, format!("Translation failed: {e}")).await;
                    return;
                }
            }
        }

        // ── 2. Optional enhancement ──────────────────────────────────────
        if enhance {
            self.send(events, TurnEvent::Phase(TurnPhase::Enhancing)).await;

            match self.enhancer.enhance(&prompt, self.session.turns()).await {
                Ok(Some(enhanced)) => {
                    log::debug!("chat: prompt enhanced: {:?}", enhanced);
                    self.send(
                        events,
                        TurnEvent::PromptEnhanced {
                            enhanced: enhanced.clone(),
                        },
                    )
                    .await;
                    prompt = enhanced;
                }
                Ok(None) => {
                    log::debug!("chat: no usable enhancement, keeping prompt");
                }
                Err(e) => {
                    // Enhancement is an optional stage; keep the original
                    // prompt and continue the turn.
                    log::warn!("chat: enhancement failed ({e}), keeping prompt");
                }
            }
        }

        // ── 3. Echo the Human message ────────────────────────────────────
        // The display text is the post-translation (and post-enhancement)
        // prompt, matching the observed source behavior.
        self.send(
            events,
            TurnEvent::UserMessage {
                text: prompt.clone(),
            },
        )
        .await;

        // ── 4. Stream the reply ──────────────────────────────────────────
        self.send(events, TurnEvent::Phase(TurnPhase::Generating)).await;

        // The prompt is the current query, not yet history: the generator
        // sees prior turns plus the query, then the user turn is logged.
        let mut stream = match self.reply.generate(&prompt, &self.session).await {
            Ok(stream) => stream,
            Err(e) => {
                self.fail(events, format!("Reply generation failed: {e}")).await;
                return;
            }
        };
        self.session.push(ConversationTurn::user(prompt));

        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(delta) => {
                    reply.push_str(&delta);
                    self.send(events, TurnEvent::ReplyChunk { delta }).await;
                }
                Err(e) => {
                    // Already-displayed chunks stay on screen; no rollback.
                    self.fail(events, format!("Reply stream failed: {e}")).await;
                    return;
                }
            }
        }

        log::debug!("chat: reply complete ({} chars)", reply.len());
        self.send(
            events,
            TurnEvent::ReplyComplete {
                text: reply.clone(),
            },
        )
        .await;

        // ── 5. Back-translate the reply (always) ─────────────────────────
        self.send(events, TurnEvent::Phase(TurnPhase::TranslatingReply))
            .await;

        match self.translator.thai_to_korean(&reply).await {
            Ok(translation) => {
                if translation.parse_failed {
                    self.send(
                        events,
                        TurnEvent::Notice {
                            message: "Failed to parse translation response".into(),
                        },
                    )
                    .await;
                }
                self.send(
                    events,
                    TurnEvent::ReplyTranslated {
                        korean: translation.text,
                    },
                )
                .await;
            }
            Err(e) => {
                self.fail(events, format!("Back-translation failed: {e}")).await;
                return;
            }
        }

        // ── 6. Finalise the turn ─────────────────────────────────────────
        // History records the reply as generated, before back-translation.
        self.session.push(ConversationTurn::assistant(reply));
        self.send(events, TurnEvent::Phase(TurnPhase::Idle)).await;
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn send(&self, events: &mpsc::Sender<TurnEvent>, event: TurnEvent) {
        if events.send(event).await.is_err() {
            log::warn!("chat: event receiver dropped");
        }
    }

    async fn fail(&self, events: &mpsc::Sender<TurnEvent>, message: String) {
        log::error!("chat turn error: {message}");
        self.send(events, TurnEvent::Error { message }).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
