//! Application entry point — Solar Chat.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the chat orchestrator (model clients) from config.
//! 5. Create pipeline channels (`command`, `event`).
//! 6. Spawn the orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use tokio::sync::mpsc;

use solar_chat::{
    app::SolarChatApp,
    config::AppConfig,
    pipeline::{ChatCommand, ChatOrchestrator, TurnEvent},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([460.0, 680.0])
        .with_min_inner_size([360.0, 420.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Solar Chat starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — orchestrator + HTTP)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Orchestrator — one model client per call site, all from config
    let mut orchestrator = ChatOrchestrator::from_config(&config);

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<ChatCommand>(16);
    let (event_tx, event_rx) = mpsc::channel::<TurnEvent>(64);

    // 6. Spawn the orchestrator onto the tokio runtime
    rt.spawn(async move {
        orchestrator.run(command_rx, event_tx).await;
    });

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = SolarChatApp::new(command_tx, event_rx, &config);
    let options = native_options(&config);

    eframe::run_native("Chat", options, Box::new(move |_cc| Ok(Box::new(app))))
}
