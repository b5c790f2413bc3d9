//! Data models for transcription.

use crate::error::SubtextError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Engine options
// ============================================================================

/// Whisper model identifier.
///
/// Five size tiers, each with a multilingual and an English-only (`.en`)
/// variant. Config files accept any case, like the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ModelSelector {
    #[serde(rename = "tiny")]
    Tiny,
    #[serde(rename = "tiny.en")]
    TinyEn,
    #[default]
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "base.en")]
    BaseEn,
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "small.en")]
    SmallEn,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "medium.en")]
    MediumEn,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "large.en")]
    LargeEn,
}

impl ModelSelector {
    pub const ALL: [ModelSelector; 10] = [
        ModelSelector::Tiny,
        ModelSelector::TinyEn,
        ModelSelector::Base,
        ModelSelector::BaseEn,
        ModelSelector::Small,
        ModelSelector::SmallEn,
        ModelSelector::Medium,
        ModelSelector::MediumEn,
        ModelSelector::Large,
        ModelSelector::LargeEn,
    ];

    /// Identifier understood by the transcription engine.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModelSelector::Tiny => "tiny",
            ModelSelector::TinyEn => "tiny.en",
            ModelSelector::Base => "base",
            ModelSelector::BaseEn => "base.en",
            ModelSelector::Small => "small",
            ModelSelector::SmallEn => "small.en",
            ModelSelector::Medium => "medium",
            ModelSelector::MediumEn => "medium.en",
            ModelSelector::Large => "large",
            ModelSelector::LargeEn => "large.en",
        }
    }

    /// Whether this model only understands English.
    pub const fn is_english_only(&self) -> bool {
        matches!(
            self,
            ModelSelector::TinyEn
                | ModelSelector::BaseEn
                | ModelSelector::SmallEn
                | ModelSelector::MediumEn
                | ModelSelector::LargeEn
        )
    }
}

impl FromStr for ModelSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        ModelSelector::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = ModelSelector::ALL.iter().map(|m| m.as_str()).collect();
                format!("Unknown model: {}. Use one of: {}.", s, names.join(", "))
            })
    }
}

impl TryFrom<String> for ModelSelector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the engine should do with the speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Transcribe,
    /// Transcribe and translate into English.
    Translate,
}

impl TaskKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Transcribe => "transcribe",
            TaskKind::Translate => "translate",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single transcription call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscribeOptions {
    pub model: ModelSelector,
    /// Spoken language. `None` lets the engine detect it.
    pub language: Option<String>,
    pub task: TaskKind,
    /// Echo the engine's own progress output.
    pub verbose: bool,
}

// ============================================================================
// Core Transcript Types
// ============================================================================

/// A single segment of a transcript with timestamp information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the transcript, starting at 0.
    pub id: usize,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Transcribed text content.
    pub text: String,
}

impl Segment {
    pub fn new(id: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            text: text.into(),
        }
    }
}

/// A complete transcript of one audio source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text (concatenated segments).
    pub text: String,
    /// Spoken language, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Ordered segments.
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Create a transcript from segments, renumbering them in order.
    pub fn new(segments: Vec<Segment>) -> Self {
        let segments: Vec<Segment> = segments
            .into_iter()
            .enumerate()
            .map(|(id, segment)| Segment { id, ..segment })
            .collect();

        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            text,
            language: None,
            segments,
        }
    }

    /// Build a transcript from `(start, end, text)` triples.
    pub fn from_spans<S: Into<String>>(spans: impl IntoIterator<Item = (f64, f64, S)>) -> Self {
        Self::new(
            spans
                .into_iter()
                .map(|(start, end, text)| Segment::new(0, start, end, text))
                .collect(),
        )
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Check timing invariants: non-negative, `end >= start`, and starts
    /// never moving backwards.
    pub fn check_timing(&self) -> Result<(), SubtextError> {
        let mut previous_start = 0.0_f64;
        for segment in &self.segments {
            if !(segment.start >= 0.0 && segment.end >= segment.start) {
                return Err(SubtextError::TranscriptionFailure(format!(
                    "segment {} has invalid timing {:.3}..{:.3}",
                    segment.id, segment.start, segment.end
                )));
            }
            if segment.start < previous_start {
                return Err(SubtextError::TranscriptionFailure(format!(
                    "segment {} starts before the previous segment",
                    segment.id
                )));
            }
            previous_start = segment.start;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_creation() {
        let transcript = Transcript::from_spans([(0.0, 5.0, "Hello world"), (5.0, 10.0, "This is a test")]);

        assert_eq!(transcript.text, "Hello world This is a test");
        assert_eq!(transcript.segments[1].end, 10.0);
        assert_eq!(transcript.segments[1].id, 1);
        assert!(transcript.language.is_none());
    }

    #[test]
    fn test_segments_renumbered() {
        let transcript = Transcript::new(vec![
            Segment::new(7, 0.0, 1.0, "a"),
            Segment::new(3, 1.0, 2.0, "b"),
        ]);
        let ids: Vec<usize> = transcript.segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, [0, 1]);
    }

    #[test]
    fn test_check_timing() {
        assert!(Transcript::from_spans([(0.0, 1.0, "a"), (1.0, 1.0, "b")]).check_timing().is_ok());
        assert!(Transcript::from_spans([(1.0, 0.5, "a")]).check_timing().is_err());
        assert!(Transcript::from_spans([(-0.1, 0.5, "a")]).check_timing().is_err());
        assert!(Transcript::from_spans([(2.0, 3.0, "a"), (1.0, 4.0, "b")]).check_timing().is_err());
    }

    #[test]
    fn test_parse_model() {
        assert_eq!("base".parse::<ModelSelector>().unwrap(), ModelSelector::Base);
        assert_eq!("Medium.EN".parse::<ModelSelector>().unwrap(), ModelSelector::MediumEn);
        assert!("huge".parse::<ModelSelector>().is_err());
        for model in ModelSelector::ALL {
            assert_eq!(model.to_string().parse::<ModelSelector>().unwrap(), model);
        }
    }

    #[test]
    fn test_english_only_models() {
        let english_only: Vec<&str> = ModelSelector::ALL
            .iter()
            .filter(|m| m.is_english_only())
            .map(|m| m.as_str())
            .collect();
        assert_eq!(english_only, ["tiny.en", "base.en", "small.en", "medium.en", "large.en"]);
    }

    #[test]
    fn test_model_serde_names() {
        let json = serde_json::to_string(&ModelSelector::SmallEn).unwrap();
        assert_eq!(json, "\"small.en\"");
        let model: ModelSelector = serde_json::from_str("\"Small.EN\"").unwrap();
        assert_eq!(model, ModelSelector::SmallEn);
        assert!(serde_json::from_str::<ModelSelector>("\"huge\"").is_err());
        let task: TaskKind = serde_json::from_str("\"translate\"").unwrap();
        assert_eq!(task, TaskKind::Translate);
    }
}
