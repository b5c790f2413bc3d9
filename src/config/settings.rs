//! Configuration settings for Subtext.

use crate::transcription::{FormatChoice, ModelSelector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub tools: ToolSettings,
    pub transcription: TranscriptionSettings,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary working areas. Unset uses the system temp dir.
    pub temp_dir: Option<String>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

/// External tool locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// ffmpeg binary name or path.
    pub ffmpeg: String,
    /// whisper binary name or path.
    pub whisper: String,
    /// Kill any external tool running longer than this.
    pub timeout_seconds: Option<u64>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            whisper: "whisper".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Defaults for transcription commands; command-line flags win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: ModelSelector,
    /// Source language. Unset means auto-detect.
    pub language: Option<String>,
    /// Formats written by `audio transcribe`.
    pub formats: Vec<FormatChoice>,
    /// Directory transcripts are written to.
    pub output_dir: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: ModelSelector::Base,
            language: None,
            formats: vec![FormatChoice::All],
            output_dir: ".".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SubtextError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("subtext")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path, if one is configured.
    pub fn temp_dir(&self) -> Option<PathBuf> {
        self.general.temp_dir.as_deref().map(Self::expand_path)
    }

    /// Get the expanded transcript output directory.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.transcription.output_dir)
    }

    /// Deadline applied to external tools.
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tools.timeout_seconds.map(Duration::from_secs)
    }
}
