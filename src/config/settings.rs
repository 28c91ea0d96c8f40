//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Connection settings for one LLM call site.
///
/// Every model invocation in the app (reply generation, each translation
/// direction, prompt enhancement) carries its own `ModelConfig`, so each can
/// be routed to a different endpoint or model without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible endpoint (no trailing slash).
    pub base_url: String,
    /// API key — `None` or empty for endpoints that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"solar-pro"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upstage.ai/v1/solar".into(),
            api_key: None,
            model: "solar-pro".into(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    /// Same endpoint with a different model id.
    pub fn with_model(model: &str) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Model routing for the two translation directions.
///
/// The directions are deliberately independent: the source deployment sends
/// Korean→Thai to one model and Thai→Korean to another. Keep this a mapping;
/// do not collapse the two into a single endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TranslationConfig {
    /// Endpoint handling Korean→Thai prompts.
    pub korean_to_thai: ModelConfig,
    /// Endpoint handling Thai→Korean back-translation.
    pub thai_to_korean: ModelConfig,
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Chat window appearance and behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Initial state of the "Enhance prompt" toggle.
    pub enhance_prompt: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            enhance_prompt: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use solar_chat::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Primary reply-generation endpoint.
    pub chat: ModelConfig,
    /// Translation routing (one endpoint per direction).
    pub translation: TranslationConfig,
    /// Prompt-enhancement endpoint.
    pub enhancer: ModelConfig,
    /// Chat window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.chat.base_url, "https://api.upstage.ai/v1/solar");
        assert_eq!(cfg.chat.model, "solar-pro");
        assert!(cfg.chat.api_key.is_none());
        assert_eq!(cfg.chat.timeout_secs, 120);
        assert!(!cfg.ui.enhance_prompt);
    }

    /// Verify that modified non-default values survive a round trip — in
    /// particular that the two translation directions stay independent.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.chat.api_key = Some("up-test".into());
        cfg.chat.model = "jai-chat".into();
        cfg.translation.korean_to_thai.model = "jai-chat".into();
        cfg.translation.korean_to_thai.base_url = "https://jai.example.com/v1".into();
        cfg.translation.thai_to_korean.model = "solar-pro".into();
        cfg.enhancer.temperature = 0.2;
        cfg.ui.enhance_prompt = true;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.chat.api_key, Some("up-test".into()));
        assert_eq!(loaded.translation.korean_to_thai.model, "jai-chat");
        assert_eq!(
            loaded.translation.korean_to_thai.base_url,
            "https://jai.example.com/v1"
        );
        assert_eq!(loaded.translation.thai_to_korean.model, "solar-pro");
        assert_eq!(loaded.enhancer.temperature, 0.2);
        assert!(loaded.ui.enhance_prompt);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }

    /// `with_model` keeps the default endpoint but swaps the model id.
    #[test]
    fn with_model_overrides_only_model() {
        let cfg = ModelConfig::with_model("solar-mini");
        assert_eq!(cfg.model, "solar-mini");
        assert_eq!(cfg.base_url, ModelConfig::default().base_url);
    }
}
