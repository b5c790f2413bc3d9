//! Whisper command-line transcription.

use super::{Segment, TranscribeOptions, Transcriber, Transcript};
use crate::error::{Result, SubtextError};
use crate::process::{CommandRunner, Invocation};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result document written by `whisper --output_format json`.
#[derive(Debug, Deserialize)]
struct WhisperResult {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Transcriber that shells out to the `whisper` CLI.
#[derive(Clone)]
pub struct WhisperCli {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    work_root: Option<PathBuf>,
}

impl WhisperCli {
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            work_root: None,
        }
    }

    /// Create the engine's scratch output directories under `root`.
    pub fn with_work_root(mut self, root: Option<PathBuf>) -> Self {
        self.work_root = root;
        self
    }

    /// Build the engine command writing its JSON result into `output_dir`.
    pub fn invocation(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
        fp16: bool,
        output_dir: &Path,
    ) -> Invocation {
        let mut invocation = Invocation::new(&self.binary)
            .arg(audio_path)
            .arg("--model")
            .arg(options.model.as_str())
            .arg("--task")
            .arg(options.task.as_str())
            .arg("--verbose")
            .arg(python_bool(options.verbose))
            .arg("--fp16")
            .arg(python_bool(fp16))
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(output_dir);

        if let Some(language) = &options.language {
            invocation = invocation.arg("--language").arg(engine_language(language));
        }

        invocation
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    #[instrument(skip(self, options), fields(audio_path = %audio_path.display(), model = %options.model))]
    async fn transcribe(&self, audio_path: &Path, options: &TranscribeOptions) -> Result<Transcript> {
        let stem = audio_path
            .file_stem()
            .ok_or_else(|| SubtextError::InvalidInput(format!("not a file: {}", audio_path.display())))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("subtext-whisper-");
        let output_dir = match &self.work_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let fp16 = fp16_available(self.runner.as_ref()).await;
        debug!(fp16, "Resolved half precision support");

        let invocation = self.invocation(audio_path, options, fp16, output_dir.path());

        let stdout = match self.runner.run(&invocation).await {
            Ok(out) => out,
            Err(e @ SubtextError::ToolNotFound(_)) => return Err(e),
            Err(e) => return Err(SubtextError::TranscriptionFailure(e.to_string())),
        };

        if options.verbose {
            eprint!("{stdout}");
        }

        let mut result_path = output_dir.path().join(stem);
        result_path.set_extension("json");
        let raw = tokio::fs::read_to_string(&result_path).await.map_err(|e| {
            SubtextError::TranscriptionFailure(format!(
                "engine produced no result at {}: {e}",
                result_path.display()
            ))
        })?;

        let transcript = parse_result(&raw)?;
        match transcript.segments.last() {
            Some(last) => info!("Transcribed {} segments ({:.1}s)", transcript.segments.len(), last.end),
            None => warn!("Engine found no speech in {}", audio_path.display()),
        }
        Ok(transcript)
    }
}

/// Map the engine's JSON document to a [`Transcript`].
fn parse_result(raw: &str) -> Result<Transcript> {
    let result: WhisperResult = serde_json::from_str(raw)
        .map_err(|e| SubtextError::TranscriptionFailure(format!("malformed engine result: {e}")))?;

    let segments = result
        .segments
        .into_iter()
        .map(|s| Segment::new(0, s.start, s.end, s.text.trim()))
        .collect();

    let mut transcript = Transcript::new(segments).with_language(result.language);
    if !result.text.trim().is_empty() {
        transcript.text = result.text.trim().to_string();
    }

    if let Err(e) = transcript.check_timing() {
        warn!("Engine returned irregular timestamps: {}", e);
    }

    Ok(transcript)
}

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Spell a language hint the way the engine's `--language` option accepts
/// it: lowercase codes (`en`, `haw`) or title-cased names (`English`).
fn engine_language(hint: &str) -> String {
    let hint = hint.trim().to_lowercase();
    if hint.len() <= 3 && hint.chars().all(|c| c.is_ascii_alphabetic()) {
        return hint;
    }

    let mut name = String::with_capacity(hint.len());
    let mut word_start = true;
    for c in hint.chars() {
        if word_start {
            name.extend(c.to_uppercase());
        } else {
            name.push(c);
        }
        word_start = !c.is_alphabetic();
    }
    name
}

/// Whether half precision inference is worth requesting, i.e. a CUDA device
/// is visible. Queried on every call; nothing is cached. Any failure of
/// `nvidia-smi` counts as no GPU.
pub async fn fp16_available(runner: &dyn CommandRunner) -> bool {
    if std::env::var("CUDA_VISIBLE_DEVICES").is_ok_and(|v| v.trim() == "-1" || v.trim().is_empty()) {
        return false;
    }

    match runner.run(&Invocation::new("nvidia-smi").arg("-L")).await {
        Ok(listing) => listing.contains("GPU"),
        Err(e) => {
            debug!("No GPU reported: {}", e);
            false
        }
    }
}
