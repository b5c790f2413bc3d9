//! Pipeline orchestrator for Subtext.
//!
//! Coordinates the end-to-end flows: audio transcription to files, audio
//! extraction, and subtitle burn-in.

use crate::config::Settings;
use crate::error::{Result, SubtextError};
use crate::media::{Ffmpeg, SubtitleComposer};
use crate::process::{CommandRunner, ProcessRunner};
use crate::transcription::{
    write_transcript, FormatChoice, ModelSelector, TaskKind, TranscribeOptions, Transcriber,
    WhisperCli,
};
use crate::validation::check_model_language;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Parameters of an audio transcription batch.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub files: Vec<PathBuf>,
    pub formats: Vec<FormatChoice>,
    pub model: ModelSelector,
    pub language: Option<String>,
    pub translate: bool,
    pub verbose: bool,
    pub output_dir: PathBuf,
    /// Continue with the next file after a failure instead of aborting.
    pub keep_going: bool,
}

/// Outcome of a transcription batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written, across all inputs.
    pub written: Vec<PathBuf>,
    /// Inputs that failed, with the reason (only with `keep_going`).
    pub failures: Vec<(PathBuf, String)>,
}

/// The main orchestrator for the Subtext pipelines.
pub struct Orchestrator {
    ffmpeg: Ffmpeg,
    transcriber: Arc<dyn Transcriber>,
    work_root: Option<PathBuf>,
}

impl Orchestrator {
    /// Create an orchestrator driving the real ffmpeg and whisper binaries.
    pub fn new(settings: &Settings) -> Self {
        let runner: Arc<dyn CommandRunner> =
            Arc::new(ProcessRunner::with_timeout(settings.tool_timeout()));
        let transcriber = Arc::new(
            WhisperCli::new(runner.clone(), &settings.tools.whisper).with_work_root(settings.temp_dir()),
        );

        Self::with_components(
            runner,
            &settings.tools.ffmpeg,
            transcriber,
            settings.temp_dir(),
        )
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        runner: Arc<dyn CommandRunner>,
        ffmpeg_binary: &str,
        transcriber: Arc<dyn Transcriber>,
        work_root: Option<PathBuf>,
    ) -> Self {
        Self {
            ffmpeg: Ffmpeg::new(runner, ffmpeg_binary),
            transcriber,
            work_root,
        }
    }

    /// Transcribe each audio file and write the requested formats.
    ///
    /// Aborts on the first failure unless `keep_going` is set, in which case
    /// every file is attempted and the batch fails at the end if any did.
    #[instrument(skip_all, fields(files = request.files.len(), model = %request.model))]
    pub async fn transcribe_audio(&self, request: &TranscriptionRequest) -> Result<BatchReport> {
        check_model_language(request.model, request.language.as_deref())?;

        let options = TranscribeOptions {
            model: request.model,
            language: request.language.clone(),
            task: if request.translate {
                TaskKind::Translate
            } else {
                TaskKind::Transcribe
            },
            verbose: request.verbose,
        };

        let total = request.files.len();
        let mut report = BatchReport::default();

        for (i, file) in request.files.iter().enumerate() {
            eprintln!("  [{}/{}] Processing {}", i + 1, total, file.display());

            match self
                .transcribe_file(file, &options, &request.formats, &request.output_dir)
                .await
            {
                Ok(written) => {
                    for path in &written {
                        eprintln!("  Wrote {}", path.display());
                    }
                    report.written.extend(written);
                }
                Err(e) if request.keep_going => {
                    warn!("Failed to transcribe {}: {}", file.display(), e);
                    eprintln!("  Failed: {}", e);
                    report.failures.push((file.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        if !report.failures.is_empty() {
            return Err(SubtextError::BatchFailure {
                failed: report.failures.len(),
                total,
            });
        }

        Ok(report)
    }

    /// Transcribe one file and write its outputs.
    async fn transcribe_file(
        &self,
        file: &Path,
        options: &TranscribeOptions,
        formats: &[FormatChoice],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let base_name = file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SubtextError::InvalidInput(format!("not a file name: {}", file.display())))?;

        info!("Transcribing {}", file.display());
        let transcript = self.transcriber.transcribe(file, options).await?;

        write_transcript(&transcript, base_name, formats, output_dir)
    }

    /// Extract the audio track of `video` into `output`.
    #[instrument(skip(self))]
    pub async fn extract_audio(&self, video: &Path, output: &Path) -> Result<()> {
        self.ffmpeg.extract_audio(video, output).await
    }

    /// Write `output`: `video` with its transcript burned in as subtitles.
    #[instrument(skip(self))]
    pub async fn subtitle_video(
        &self,
        video: &Path,
        output: &Path,
        model: ModelSelector,
        language: Option<&str>,
    ) -> Result<()> {
        check_model_language(model, language)?;

        let composer = SubtitleComposer::new(
            self.ffmpeg.clone(),
            self.transcriber.clone(),
            self.work_root.clone(),
        );
        composer.burn_in(video, output, model, language).await
    }
}
