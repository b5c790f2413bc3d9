//! Error types for Subtext.

use thiserror::Error;

/// Library-level error type for Subtext operations.
#[derive(Error, Debug)]
pub enum SubtextError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External tool {tool} failed: {detail}")]
    ExternalToolFailure { tool: String, detail: String },

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailure(String),

    #[error(
        "Model '{model}' is English-only but language '{language}' was requested. \
         Use a multilingual model or pass --language en."
    )]
    ModelLanguageMismatch { model: String, language: String },

    #[error("Cleanup of temporary files failed: {0}")]
    ResourceCleanupFailure(String),

    #[error("Failed to write transcript: {0}")]
    FormatWrite(String),

    #[error("{failed} of {total} file(s) failed to transcribe")]
    BatchFailure { failed: usize, total: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Subtext operations.
pub type Result<T> = std::result::Result<T, SubtextError>;
