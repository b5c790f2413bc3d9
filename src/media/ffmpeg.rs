//! ffmpeg command construction.

use crate::error::Result;
use crate::process::{CommandRunner, Invocation};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Audio bitrate of extracted tracks.
pub const AUDIO_BITRATE: &str = "192k";

/// Sample rate (Hz) of extracted tracks.
pub const AUDIO_SAMPLE_RATE: u32 = 48_000;

/// Thin wrapper over the ffmpeg binary.
#[derive(Clone)]
pub struct Ffmpeg {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl Ffmpeg {
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// Command that drops the video stream and re-encodes the audio track.
    pub fn extract_audio_invocation(&self, video: &Path, destination: &Path) -> Invocation {
        Invocation::new(&self.binary)
            .arg("-i")
            .arg(video)
            .arg("-vn")
            .arg("-ab")
            .arg(AUDIO_BITRATE)
            .arg("-ar")
            .arg(AUDIO_SAMPLE_RATE.to_string())
            .arg("-y")
            .arg(destination)
    }

    /// Command that re-encodes `video` with `subtitle_file` burned in.
    ///
    /// `subtitle_file` must be a bare file name relative to `working_dir`;
    /// ffmpeg's filter syntax treats `:` and `\` specially, so no path is
    /// passed through the filter expression.
    pub fn burn_subtitles_invocation(
        &self,
        video: &Path,
        subtitle_file: &str,
        output: &Path,
        working_dir: &Path,
    ) -> Invocation {
        Invocation::new(&self.binary)
            .arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(format!("subtitles={subtitle_file}"))
            .arg("-y")
            .arg(output)
            .current_dir(working_dir)
    }

    /// Extract the audio track of `video` into `destination`, overwriting it.
    #[instrument(skip(self), fields(video = %video.display()))]
    pub async fn extract_audio(&self, video: &Path, destination: &Path) -> Result<()> {
        info!("Extracting audio to {}", destination.display());
        self.runner
            .run(&self.extract_audio_invocation(video, destination))
            .await?;
        Ok(())
    }

    /// Re-encode `video` into `output` with the subtitles burned in.
    #[instrument(skip(self, working_dir), fields(video = %video.display()))]
    pub async fn burn_subtitles(
        &self,
        video: &Path,
        subtitle_file: &str,
        output: &Path,
        working_dir: &Path,
    ) -> Result<()> {
        info!("Burning subtitles into {}", output.display());
        self.runner
            .run(&self.burn_subtitles_invocation(video, subtitle_file, output, working_dir))
            .await?;
        Ok(())
    }
}
