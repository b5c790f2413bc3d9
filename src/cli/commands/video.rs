//! Video command implementations.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcription::ModelSelector;
use crate::validation::check_model_language;
use anyhow::Result;
use std::path::Path;

/// Run the extract-audio command.
pub async fn run_extract_audio(video: &Path, output: &Path, settings: &Settings) -> Result<()> {
    require_file(video)?;

    if let Err(e) = preflight::check(Operation::ExtractAudio, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'subtext doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!("Processing {}", video.display()));

    let orchestrator = Orchestrator::new(settings);
    let spinner = Output::spinner("Extracting audio...");
    let result = orchestrator.extract_audio(video, output).await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        Output::error(&format!("Failed to extract audio: {}", e));
        return Err(e.into());
    }

    Output::success(&format!("Done! Audio saved to {}", output.display()));
    Ok(())
}

/// Run the subtitles command.
pub async fn run_subtitles(
    video: &Path,
    output: &Path,
    language: Option<String>,
    model: Option<ModelSelector>,
    settings: &Settings,
) -> Result<()> {
    let model = model.unwrap_or(settings.transcription.model);
    let language = language.or_else(|| settings.transcription.language.clone());

    // Nothing may run before this check.
    check_model_language(model, language.as_deref())?;
    require_file(video)?;

    if let Err(e) = preflight::check(Operation::SubtitleVideo, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'subtext doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!("Processing {} with model {}", video.display(), model));

    let orchestrator = Orchestrator::new(settings);
    let spinner = Output::spinner("Extracting, transcribing and re-encoding...");
    let result = orchestrator
        .subtitle_video(video, output, model, language.as_deref())
        .await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        Output::error(&format!("Failed to add subtitles: {}", e));
        return Err(e.into());
    }

    Output::success(&format!("Done! Subtitled video saved to {}", output.display()));
    Ok(())
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        Output::error(&format!("{} is not a file", path.display()));
        return Err(anyhow::anyhow!("Input file not found: {}", path.display()));
    }
    Ok(())
}
