//! Transcription module for Subtext.
//!
//! Drives the Whisper engine and turns its output into a [`Transcript`],
//! then serializes transcripts into subtitle and metadata formats.

mod format;
mod models;
mod whisper;

pub use format::{
    format_transcript, resolve_formats, write_transcript, FormatChoice, OutputFormat,
};
pub use models::{ModelSelector, Segment, TaskKind, TranscribeOptions, Transcript};
pub use whisper::{fp16_available, WhisperCli};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription engines.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file and return segments with timestamps.
    async fn transcribe(&self, audio_path: &Path, options: &TranscribeOptions) -> Result<Transcript>;
}
