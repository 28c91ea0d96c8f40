//! Solar Chat window — egui/eframe application.
//!
//! # Architecture
//!
//! [`SolarChatApp`] is the top-level [`eframe::App`] that owns the UI state
//! and two channel endpoints:
//!
//! * `command_tx` — sends [`ChatCommand`] to the chat orchestrator.
//! * `event_rx`  — receives [`TurnEvent`] progress from the orchestrator.
//!
//! The app renders a single chat page: title, an "Enhance prompt" toggle,
//! the chronological message list labeled "Human"/"AI", a busy status line
//! while a turn is in flight, and the input box.  Channels are polled
//! non-blocking every frame; the input is disabled while a turn is busy
//! (one active turn per session).

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::pipeline::{ChatCommand, TurnEvent, TurnPhase};

// ---------------------------------------------------------------------------
// Display messages
// ---------------------------------------------------------------------------

/// Chat-log speaker label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Human,
    Ai,
}

impl Speaker {
    fn label(self) -> &'static str {
        match self {
            Speaker::Human => "Human",
            Speaker::Ai => "AI",
        }
    }
}

/// One rendered chat message.
#[derive(Debug, Clone)]
pub struct DisplayMessage {
    pub speaker: Speaker,
    pub text: String,
}

// ---------------------------------------------------------------------------
// SolarChatApp
// ---------------------------------------------------------------------------

/// eframe application — the Solar Chat page.
pub struct SolarChatApp {
    // ── Turn state ───────────────────────────────────────────────────────
    /// Current phase of the chat turn pipeline.
    phase: TurnPhase,
    /// Finalised chat messages in chronological order.
    messages: Vec<DisplayMessage>,
    /// Accumulating reply text while the stream is in flight.
    streaming: Option<String>,
    /// Intermediate stage output (translated / enhanced prompt) shown next
    /// to the busy indicator; cleared when the turn ends.
    stage_notes: Vec<String>,
    /// Non-fatal notices (e.g. unparseable translation response).
    notices: Vec<String>,
    /// Error message shown after a failed turn.
    error_message: Option<String>,

    // ── Input state ──────────────────────────────────────────────────────
    /// Text currently in the input box.
    input: String,
    /// "Enhance prompt" toggle, default off.
    enhance_prompt: bool,
    /// Spinner animation phase (increases each frame).
    spinner_phase: f32,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<ChatCommand>,
    event_rx: mpsc::Receiver<TurnEvent>,
}

impl SolarChatApp {
    /// Create a new [`SolarChatApp`].
    pub fn new(
        command_tx: mpsc::Sender<ChatCommand>,
        event_rx: mpsc::Receiver<TurnEvent>,
        config: &AppConfig,
    ) -> Self {
        Self {
            phase: TurnPhase::Idle,
            messages: Vec::new(),
            streaming: None,
            stage_notes: Vec::new(),
            notices: Vec::new(),
            error_message: None,
            input: String::new(),
            enhance_prompt: config.ui.enhance_prompt,
            spinner_phase: 0.0,
            command_tx,
            event_rx,
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending turn events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                TurnEvent::Phase(phase) => {
                    if phase == TurnPhase::Idle {
                        self.stage_notes.clear();
                    }
                    self.phase = phase;
                }
                TurnEvent::PromptTranslated { thai } => {
                    self.stage_notes.push(format!("Translated to Thai: {thai}"));
                }
                TurnEvent::PromptEnhanced { enhanced } => {
                    self.stage_notes.push(format!("Enhanced prompt: {enhanced}"));
                }
                TurnEvent::UserMessage { text } => {
                    self.messages.push(DisplayMessage {
                        speaker: Speaker::Human,
                        text,
                    });
                }
                TurnEvent::ReplyChunk { delta } => {
                    self.streaming.get_or_insert_with(String::new).push_str(&delta);
                }
                TurnEvent::ReplyComplete { text } => {
                    self.streaming = None;
                    self.messages.push(DisplayMessage {
                        speaker: Speaker::Ai,
                        text,
                    });
                }
                TurnEvent::ReplyTranslated { korean } => {
                    self.messages.push(DisplayMessage {
                        speaker: Speaker::Ai,
                        text: korean,
                    });
                }
                TurnEvent::Notice { message } => {
                    self.notices.push(message);
                }
                TurnEvent::Error { message } => {
                    self.streaming = None;
                    self.stage_notes.clear();
                    self.error_message = Some(message);
                    self.phase = TurnPhase::Error;
                }
            }
        }
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Send the current input as a new turn, unless empty or busy.
    fn submit(&mut self) {
        if self.phase.is_busy() {
            return;
        }
        let prompt = std::mem::take(&mut self.input);
        // Empty submissions are ignored — no turn starts.
        if prompt.trim().is_empty() {
            return;
        }

        self.notices.clear();
        self.error_message = None;
        self.phase = TurnPhase::TranslatingPrompt; // provisional; orchestrator confirms

        let _ = self.command_tx.try_send(ChatCommand::Submit {
            prompt,
            enhance: self.enhance_prompt,
        });
    }

    // ── Panel renderers ──────────────────────────────────────────────────

    fn draw_message(ui: &mut egui::Ui, speaker: Speaker, text: &str) {
        let (label_color, text_color) = match speaker {
            Speaker::Human => (
                egui::Color32::from_rgb(120, 170, 255),
                egui::Color32::from_rgb(220, 220, 220),
            ),
            Speaker::Ai => (
                egui::Color32::from_rgb(80, 200, 120),
                egui::Color32::from_rgb(200, 200, 200),
            ),
        };

        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(speaker.label())
                .color(label_color)
                .size(12.0)
                .strong(),
        );
        ui.label(egui::RichText::new(text).color(text_color).size(14.0));
    }

    /// Render the chronological chat log, including the in-flight stream.
    fn draw_chat_log(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &self.messages {
                    Self::draw_message(ui, message.speaker, &message.text);
                }
                if let Some(partial) = &self.streaming {
                    Self::draw_message(ui, Speaker::Ai, partial);
                }
            });
    }

    /// Render the busy status row with spinner and stage notes.
    fn draw_status(&self, ui: &mut egui::Ui) {
        if self.phase.is_busy() {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        self.spinner_char(),
                        self.phase.label()
                    ))
                    .color(egui::Color32::from_rgb(68, 136, 255))
                    .size(12.0),
                );
            });
            for note in &self.stage_notes {
                ui.label(
                    egui::RichText::new(note.as_str())
                        .color(egui::Color32::from_rgb(130, 130, 130))
                        .italics()
                        .size(11.0),
                );
            }
        }

        for notice in &self.notices {
            ui.label(
                egui::RichText::new(notice.as_str())
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(11.0),
            );
        }

        if let Some(message) = &self.error_message {
            ui.label(
                egui::RichText::new(message.as_str())
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(12.0),
            );
        }
    }

    /// Render the input row: text box + send button.
    fn draw_input(&mut self, ui: &mut egui::Ui) {
        let busy = self.phase.is_busy();
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("What is up?")
                    .desired_width(ui.available_width() - 60.0),
            );

            let send_clicked = ui
                .add_enabled(!busy, egui::Button::new("Send"))
                .clicked();

            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if send_clicked || enter_pressed {
                self.submit();
                response.request_focus();
            }
        });
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for SolarChatApp {
    /// Called every frame by eframe.  Polls channels, advances the spinner,
    /// then renders the chat page.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        self.spinner_phase += 0.08;
        if self.spinner_phase >= 4.0 {
            self.spinner_phase = 0.0;
        }

        // Keep repainting while a turn streams progress in the background.
        if self.phase.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(66));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("SolarLLM");
            ui.checkbox(&mut self.enhance_prompt, "Enhance prompt");
            ui.separator();

            // Reserve space for status + input below the scrolling log.
            let bottom = 70.0 + 14.0 * (self.stage_notes.len() + self.notices.len()) as f32;
            let log_height = (ui.available_height() - bottom).max(80.0);
            ui.allocate_ui(egui::vec2(ui.available_width(), log_height), |ui| {
                self.draw_chat_log(ui);
            });

            ui.separator();
            self.draw_status(ui);
            self.draw_input(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Solar Chat window closing");
    }
}
