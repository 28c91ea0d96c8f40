//! Configuration module for Solar Chat.
//!
//! Provides `AppConfig` (top-level settings), per-call-site `ModelConfig`s,
//! `AppPaths` for cross-platform data directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ModelConfig, TranslationConfig, UiConfig};
