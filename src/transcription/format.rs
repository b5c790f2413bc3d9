//! Transcript output formatting (JSON, TXT, SRT, VTT, TSV).
//!
//! Each concrete [`OutputFormat`] maps to one pure serializer;
//! [`write_transcript`] fans a format selection out to files on disk.

use super::Transcript;
use crate::error::{Result, SubtextError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Txt,
    Srt,
    Vtt,
    Tsv,
}

impl OutputFormat {
    /// Every concrete format, in the order "all" writes them.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Json,
        OutputFormat::Txt,
        OutputFormat::Srt,
        OutputFormat::Vtt,
        OutputFormat::Tsv,
    ];

    /// File extension, without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
            OutputFormat::Tsv => "tsv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A requested format as given by the user: a concrete format or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatChoice {
    All,
    Json,
    Txt,
    Srt,
    Vtt,
    Tsv,
}

impl FormatChoice {
    /// The concrete format, or `None` for `all`.
    pub const fn concrete(&self) -> Option<OutputFormat> {
        match self {
            FormatChoice::All => None,
            FormatChoice::Json => Some(OutputFormat::Json),
            FormatChoice::Txt => Some(OutputFormat::Txt),
            FormatChoice::Srt => Some(OutputFormat::Srt),
            FormatChoice::Vtt => Some(OutputFormat::Vtt),
            FormatChoice::Tsv => Some(OutputFormat::Tsv),
        }
    }
}

impl std::str::FromStr for FormatChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FormatChoice::All),
            "json" => Ok(FormatChoice::Json),
            "txt" | "text" => Ok(FormatChoice::Txt),
            "srt" => Ok(FormatChoice::Srt),
            "vtt" | "webvtt" => Ok(FormatChoice::Vtt),
            "tsv" => Ok(FormatChoice::Tsv),
            _ => Err(format!(
                "Unknown format: {}. Use json, txt, srt, vtt, tsv, or all.",
                s
            )),
        }
    }
}

impl fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.concrete() {
            Some(format) => f.write_str(format.extension()),
            None => f.write_str("all"),
        }
    }
}

/// Expand a selection into the distinct concrete formats to write.
///
/// `all` anywhere in the selection yields exactly the five concrete formats.
/// Otherwise each requested format appears once, in first-seen order.
pub fn resolve_formats(choices: &[FormatChoice]) -> Vec<OutputFormat> {
    if choices.contains(&FormatChoice::All) {
        return OutputFormat::ALL.to_vec();
    }

    let mut formats = Vec::with_capacity(choices.len());
    for format in choices.iter().filter_map(FormatChoice::concrete) {
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    formats
}

/// Serialize a transcript in the given format.
pub fn format_transcript(transcript: &Transcript, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format_json(transcript)?,
        OutputFormat::Txt => format_txt(transcript),
        OutputFormat::Srt => format_srt(transcript),
        OutputFormat::Vtt => format_vtt(transcript),
        OutputFormat::Tsv => format_tsv(transcript),
    })
}

/// Write `<base_name>.<ext>` into `output_dir` for every selected format.
///
/// Every format is attempted even when an earlier one fails; failures are
/// reported together afterwards. Returns the written paths.
pub fn write_transcript(
    transcript: &Transcript,
    base_name: &str,
    formats: &[FormatChoice],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut errors = Vec::new();

    for format in resolve_formats(formats) {
        let path = output_dir.join(format!("{}.{}", base_name, format.extension()));
        debug!("Writing {}", path.display());

        let outcome = format_transcript(transcript, format)
            .and_then(|content| std::fs::write(&path, content).map_err(Into::into));

        match outcome {
            Ok(()) => written.push(path),
            Err(e) => {
                warn!("Failed to write {}: {}", path.display(), e);
                errors.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    if !errors.is_empty() {
        return Err(SubtextError::FormatWrite(format!(
            "{} of {} format(s) failed:\n{}",
            errors.len(),
            errors.len() + written.len(),
            errors.join("\n")
        )));
    }

    Ok(written)
}

/// JSON document of the transcript.
fn format_json(transcript: &Transcript) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}

/// Plain text, one segment per line.
fn format_txt(transcript: &Transcript) -> String {
    let mut output = String::new();
    for segment in &transcript.segments {
        output.push_str(segment.text.trim());
        output.push('\n');
    }
    output
}

/// SubRip.
fn format_srt(transcript: &Transcript) -> String {
    let mut output = String::new();

    for (i, segment) in transcript.segments.iter().enumerate() {
        // Sequence number (1-indexed)
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(segment.start, ','),
            format_timestamp(segment.end, ',')
        ));
        output.push_str(&cue_text(&segment.text));
        output.push_str("\n\n");
    }

    output
}

/// WebVTT.
fn format_vtt(transcript: &Transcript) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for segment in &transcript.segments {
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(segment.start, '.'),
            format_timestamp(segment.end, '.')
        ));
        output.push_str(&cue_text(&segment.text));
        output.push_str("\n\n");
    }

    output
}

/// Tab-separated `start`, `end` (integer milliseconds) and `text`.
fn format_tsv(transcript: &Transcript) -> String {
    let mut output = String::from("start\tend\ttext\n");

    for segment in &transcript.segments {
        output.push_str(&format!(
            "{}\t{}\t{}\n",
            to_millis(segment.start),
            to_millis(segment.end),
            segment.text.trim().replace('\t', " ")
        ));
    }

    output
}

/// Cue text with the timing arrow defused.
fn cue_text(text: &str) -> String {
    text.trim().replace("-->", "->")
}

fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Format `HH:MM:SS<sep>mmm`.
fn format_timestamp(seconds: f64, decimal_marker: char) -> String {
    let total_ms = to_millis(seconds);
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, decimal_marker, ms
    )
}
