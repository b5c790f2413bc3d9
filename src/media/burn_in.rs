//! Subtitle burn-in: extract, transcribe, write SRT, re-encode.

use super::Ffmpeg;
use crate::error::{Result, SubtextError};
use crate::transcription::{
    format_transcript, ModelSelector, OutputFormat, TaskKind, TranscribeOptions, Transcriber,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Name of the extracted audio inside the working area.
const AUDIO_FILE_NAME: &str = "audio.wav";

/// Produces a copy of a video with its own transcript burned in.
#[derive(Clone)]
pub struct SubtitleComposer {
    ffmpeg: Ffmpeg,
    transcriber: Arc<dyn Transcriber>,
    work_root: Option<PathBuf>,
}

impl SubtitleComposer {
    /// `work_root` is where working areas are created; `None` uses the
    /// system temp directory.
    pub fn new(ffmpeg: Ffmpeg, transcriber: Arc<dyn Transcriber>, work_root: Option<PathBuf>) -> Self {
        Self {
            ffmpeg,
            transcriber,
            work_root,
        }
    }

    fn create_working_area(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("subtext-");

        let dir = match &self.work_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    /// Write `output`: `video` re-encoded with subtitles transcribed from
    /// its own audio.
    ///
    /// The working area and the intermediate subtitle file are removed on
    /// every exit path.
    #[instrument(skip(self), fields(video = %video.display(), output = %output.display()))]
    pub async fn burn_in(
        &self,
        video: &Path,
        output: &Path,
        model: ModelSelector,
        language: Option<&str>,
    ) -> Result<()> {
        // The encoder runs from inside the working area, so both ends must
        // be absolute.
        let video = std::path::absolute(video)?;
        let output = std::path::absolute(output)?;

        let working_area = self.create_working_area()?;
        let work_dir = std::path::absolute(working_area.path())?;
        debug!("Working area: {}", work_dir.display());

        let audio = work_dir.join(AUDIO_FILE_NAME);
        self.ffmpeg.extract_audio(&video, &audio).await?;

        let options = TranscribeOptions {
            model,
            language: language.map(str::to_string),
            task: TaskKind::Transcribe,
            verbose: false,
        };
        let transcript = self.transcriber.transcribe(&audio, &options).await?;
        info!("Transcribed {} segments", transcript.segments.len());

        let subtitle_name = format!("subtitles-{}.srt", Uuid::new_v4().simple());
        let subtitle_path = work_dir.join(&subtitle_name);
        std::fs::write(&subtitle_path, format_transcript(&transcript, OutputFormat::Srt)?)?;

        let composed = self
            .ffmpeg
            .burn_subtitles(&video, &subtitle_name, &output, &work_dir)
            .await;

        clean_up(&subtitle_path, working_area);
        composed
    }
}

/// Remove the subtitle file and the working area. Failures are logged only,
/// so they never replace the outcome of the encode.
fn clean_up(subtitle_path: &Path, working_area: TempDir) {
    if let Err(e) = std::fs::remove_file(subtitle_path) {
        let err = SubtextError::ResourceCleanupFailure(format!("{}: {}", subtitle_path.display(), e));
        warn!("{}", err);
    }

    let dir = working_area.path().to_path_buf();
    if let Err(e) = working_area.close() {
        let err = SubtextError::ResourceCleanupFailure(format!("{}: {}", dir.display(), e));
        warn!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandRunner, Invocation};
    use crate::transcription::Transcript;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Behaves like ffmpeg: creates the last argument as the output file.
    #[derive(Default)]
    struct FakeFfmpeg {
        fail_extract: bool,
        fail_burn: bool,
        calls: Mutex<Vec<Invocation>>,
        subtitles_seen: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CommandRunner for FakeFfmpeg {
        async fn run(&self, invocation: &Invocation) -> Result<String> {
            self.calls.lock().unwrap().push(invocation.clone());
            let args: Vec<String> = invocation
                .arguments()
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            let destination = PathBuf::from(args.last().unwrap());

            let burning = args.iter().any(|a| a == "-vf");
            if burning {
                let filter = &args[args.iter().position(|a| a == "-vf").unwrap() + 1];
                let name = filter.strip_prefix("subtitles=").unwrap();
                let srt = invocation.working_dir().unwrap().join(name);
                *self.subtitles_seen.lock().unwrap() = std::fs::read_to_string(srt).ok();
            }

            if (burning && self.fail_burn) || (!burning && self.fail_extract) {
                return Err(SubtextError::ExternalToolFailure {
                    tool: "ffmpeg".into(),
                    detail: "exit status: 1: Invalid data found when processing input".into(),
                });
            }

            std::fs::write(destination, b"media").unwrap();
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct FakeTranscriber {
        fail: bool,
        calls: Mutex<Vec<(PathBuf, TranscribeOptions)>>,
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, audio_path: &Path, options: &TranscribeOptions) -> Result<Transcript> {
            assert!(audio_path.is_file(), "audio should exist while transcribing");
            self.calls
                .lock()
                .unwrap()
                .push((audio_path.to_path_buf(), options.clone()));
            if self.fail {
                return Err(SubtextError::TranscriptionFailure("model failed to load".into()));
            }
            Ok(Transcript::from_spans([(0.0, 1.5, "hello"), (1.5, 3.0, "world")]))
        }
    }

    struct Harness {
        ffmpeg: Arc<FakeFfmpeg>,
        transcriber: Arc<FakeTranscriber>,
        composer: SubtitleComposer,
        work_root: TempDir,
        media: TempDir,
    }

    fn harness(ffmpeg: FakeFfmpeg, transcriber: FakeTranscriber) -> Harness {
        let ffmpeg = Arc::new(ffmpeg);
        let transcriber = Arc::new(transcriber);
        let work_root = tempfile::tempdir().unwrap();
        let media = tempfile::tempdir().unwrap();
        std::fs::write(media.path().join("in.mp4"), b"video").unwrap();

        let composer = SubtitleComposer::new(
            Ffmpeg::new(ffmpeg.clone(), "ffmpeg"),
            transcriber.clone(),
            Some(work_root.path().to_path_buf()),
        );

        Harness {
            ffmpeg,
            transcriber,
            composer,
            work_root,
            media,
        }
    }

    fn is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_burn_in_success_leaves_only_output() {
        let h = harness(FakeFfmpeg::default(), FakeTranscriber::default());
        let output = h.media.path().join("out.mp4");

        h.composer
            .burn_in(&h.media.path().join("in.mp4"), &output, ModelSelector::Small, Some("es"))
            .await
            .unwrap();

        assert!(output.is_file());
        assert!(is_empty(h.work_root.path()), "working area should be removed");

        let mut names: Vec<String> = std::fs::read_dir(h.media.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["in.mp4", "out.mp4"]);

        let seen = h.ffmpeg.subtitles_seen.lock().unwrap().clone().unwrap();
        assert!(seen.starts_with("1\n00:00:00,000 --> 00:00:01,500\nhello\n"));
    }

    #[tokio::test]
    async fn test_burn_in_transcribes_without_translation() {
        let h = harness(FakeFfmpeg::default(), FakeTranscriber::default());
        h.composer
            .burn_in(
                &h.media.path().join("in.mp4"),
                &h.media.path().join("out.mp4"),
                ModelSelector::BaseEn,
                None,
            )
            .await
            .unwrap();

        let calls = h.transcriber.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (audio, options) = &calls[0];
        assert_eq!(audio.file_name().unwrap(), AUDIO_FILE_NAME);
        assert!(audio.starts_with(h.work_root.path()));
        assert_eq!(options.task, TaskKind::Transcribe);
        assert_eq!(options.model, ModelSelector::BaseEn);
        assert!(!options.verbose);
        assert!(options.language.is_none());
    }

    #[tokio::test]
    async fn test_compose_failure_still_cleans_up() {
        let ffmpeg = FakeFfmpeg {
            fail_burn: true,
            ..Default::default()
        };
        let h = harness(ffmpeg, FakeTranscriber::default());
        let output = h.media.path().join("out.mp4");

        let err = h
            .composer
            .burn_in(&h.media.path().join("in.mp4"), &output, ModelSelector::Base, None)
            .await
            .unwrap_err();

        assert!(matches!(err, SubtextError::ExternalToolFailure { .. }));
        assert!(err.to_string().contains("Invalid data"));
        assert!(is_empty(h.work_root.path()));
        assert!(!output.exists());
        // The subtitle file existed when the encoder ran.
        assert!(h.ffmpeg.subtitles_seen.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_extract_failure_stops_pipeline() {
        let ffmpeg = FakeFfmpeg {
            fail_extract: true,
            ..Default::default()
        };
        let h = harness(ffmpeg, FakeTranscriber::default());

        let err = h
            .composer
            .burn_in(
                &h.media.path().join("in.mp4"),
                &h.media.path().join("out.mp4"),
                ModelSelector::Base,
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubtextError::ExternalToolFailure { .. }));
        assert!(h.transcriber.calls.lock().unwrap().is_empty());
        assert_eq!(h.ffmpeg.calls.lock().unwrap().len(), 1);
        assert!(is_empty(h.work_root.path()));
    }

    #[tokio::test]
    async fn test_transcription_failure_stops_pipeline() {
        let transcriber = FakeTranscriber {
            fail: true,
            ..Default::default()
        };
        let h = harness(FakeFfmpeg::default(), transcriber);

        let err = h
            .composer
            .burn_in(
                &h.media.path().join("in.mp4"),
                &h.media.path().join("out.mp4"),
                ModelSelector::Base,
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubtextError::TranscriptionFailure(_)));
        // Only the extraction ran.
        assert_eq!(h.ffmpeg.calls.lock().unwrap().len(), 1);
        assert!(is_empty(h.work_root.path()));
    }

    #[tokio::test]
    async fn test_subtitle_names_are_unique_per_run() {
        let h = harness(FakeFfmpeg::default(), FakeTranscriber::default());
        for _ in 0..2 {
            h.composer
                .burn_in(
                    &h.media.path().join("in.mp4"),
                    &h.media.path().join("out.mp4"),
                    ModelSelector::Base,
                    None,
                )
                .await
                .unwrap();
        }

        let filters: Vec<String> = h
            .ffmpeg
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|inv| {
                let args: Vec<String> = inv
                    .arguments()
                    .iter()
                    .map(|a| a.to_string_lossy().into_owned())
                    .collect();
                let pos = args.iter().position(|a| a == "-vf")?;
                Some(args[pos + 1].clone())
            })
            .collect();

        assert_eq!(filters.len(), 2);
        assert_ne!(filters[0], filters[1]);
        assert!(filters.iter().all(|f| !f.contains('/') && !f.contains('\\')));
    }
}
