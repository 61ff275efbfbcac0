//! Persisted user settings.
//!
//! Explicit lifecycle instead of implicit global state: load from the
//! config file at startup, mutate through methods, persist on change.
//! Stored as TOML under the user config dir (`~/.config/aqicast/config.toml`
//! on Linux).

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_BASE_URL;
use crate::errors::AqicastError;
use crate::models::Station;

/// Default watch/poll interval in seconds (the dashboard's 5-minute refresh).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Terminal color preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether human output should use ANSI colors right now.
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// Cycle to the next mode (auto → always → never → auto).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Auto => Self::Always,
            Self::Always => Self::Never,
            Self::Never => Self::Auto,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(format!("unknown color mode: {s} (expected: auto, always, never)")),
        }
    }
}

/// User preferences, persisted across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Terminal color preference
    pub color: ColorMode,

    /// Station used when a command omits `--station`
    pub default_station: Option<Station>,

    /// Backend base URL
    pub api_url: String,

    /// Watch interval in seconds
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            default_station: None,
            api_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Settings {
    /// Load settings from the default config path.
    ///
    /// A missing or malformed file falls back to defaults; preferences are
    /// never worth failing a command over.
    #[must_use]
    pub fn load() -> Self {
        config_path().map_or_else(Self::default, |path| Self::load_from(&path))
    }

    /// Load settings from a specific path, defaulting on any failure.
    #[must_use]
    pub fn load_from(path: &std::path::Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Persist settings to the default config path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config dir cannot be determined or written.
    pub fn store(&self) -> Result<(), AqicastError> {
        let path = config_path()
            .ok_or_else(|| AqicastError::Settings("could not determine config dir".into()))?;
        self.store_to(&path)
    }

    /// Persist settings to a specific path, creating parent dirs as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn store_to(&self, path: &std::path::Path) -> Result<(), AqicastError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AqicastError::Settings(format!("create {}: {e}", parent.display())))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AqicastError::Settings(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| AqicastError::Settings(format!("write {}: {e}", path.display())))
    }

    /// Cycle the color mode and return the new value. Caller persists.
    pub fn toggle_color(&mut self) -> ColorMode {
        self.color = self.color.toggled();
        self.color
    }
}

/// Path to the settings file: `<config_dir>/aqicast/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("aqicast").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.default_station = Some(Station::Silkboard);
        settings.api_url = "http://10.0.0.5:8000".to_string();
        settings.poll_interval_secs = 120;

        settings.store_to(&path).unwrap();
        let loaded = Settings::load_from(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("absent.toml"));

        assert_eq!(loaded, Settings::default());
        assert_eq!(loaded.api_url, DEFAULT_BASE_URL);
        assert_eq!(loaded.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "color = [not toml").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_toggle_color_cycles() {
        let mut settings = Settings::default();

        assert_eq!(settings.toggle_color(), ColorMode::Always);
        assert_eq!(settings.toggle_color(), ColorMode::Never);
        assert_eq!(settings.toggle_color(), ColorMode::Auto);
    }

    #[test]
    fn test_color_mode_parse() {
        assert_eq!("always".parse::<ColorMode>(), Ok(ColorMode::Always));
        assert_eq!("AUTO".parse::<ColorMode>(), Ok(ColorMode::Auto));
        assert!("sometimes".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_never_mode_disables_color() {
        assert!(!ColorMode::Never.enabled());
        assert!(ColorMode::Always.enabled());
    }
}
