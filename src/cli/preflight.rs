//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools are available before starting operations
//! that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SubtextError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Audio transcription needs whisper.
    TranscribeAudio,
    /// Audio extraction needs ffmpeg.
    ExtractAudio,
    /// Burn-in needs both.
    SubtitleVideo,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::TranscribeAudio => {
            check_tool(&settings.tools.whisper)?;
        }
        Operation::ExtractAudio => {
            check_tool(&settings.tools.ffmpeg)?;
        }
        Operation::SubtitleVideo => {
            check_tool(&settings.tools.ffmpeg)?;
            check_tool(&settings.tools.whisper)?;
        }
    }
    Ok(())
}

/// Argument that makes a tool print something and exit zero.
pub(crate) fn probe_arg(name: &str) -> &'static str {
    let file_name = std::path::Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    // ffmpeg/ffprobe use -version (single dash); whisper has no version flag
    match file_name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--help",
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg(probe_arg(name)).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SubtextError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SubtextError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SubtextError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
