//! Audio transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, TranscriptionRequest};
use crate::transcription::{FormatChoice, ModelSelector};
use crate::validation::check_model_language;
use anyhow::Result;
use std::path::PathBuf;

/// Command-line arguments of `audio transcribe`.
#[derive(Debug)]
pub struct TranscribeArgs {
    pub files: Vec<PathBuf>,
    pub formats: Vec<FormatChoice>,
    pub language: Option<String>,
    pub model: Option<ModelSelector>,
    pub directory: Option<PathBuf>,
    pub translate: bool,
    pub verbose_engine: bool,
    pub keep_going: bool,
}

/// Run the audio transcribe command.
pub async fn run_transcribe(args: TranscribeArgs, settings: &Settings) -> Result<()> {
    let request = build_request(args, settings);

    // Nothing may run before this check.
    check_model_language(request.model, request.language.as_deref())?;

    for file in &request.files {
        if !file.is_file() {
            Output::error(&format!("{} is not a file", file.display()));
            return Err(anyhow::anyhow!("Input file not found: {}", file.display()));
        }
    }

    if !request.output_dir.is_dir() {
        Output::error(&format!("{} is not a directory", request.output_dir.display()));
        return Err(anyhow::anyhow!(
            "Output directory not found: {}",
            request.output_dir.display()
        ));
    }

    if let Err(e) = preflight::check(Operation::TranscribeAudio, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'subtext doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings);

    match orchestrator.transcribe_audio(&request).await {
        Ok(report) => {
            Output::success(&format!(
                "Done! Wrote {} file(s) to {}",
                report.written.len(),
                request.output_dir.display()
            ));
            for path in &report.written {
                Output::file(path);
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Transcription failed: {}", e));
            Err(e.into())
        }
    }
}

/// Merge command-line arguments over configured defaults.
fn build_request(args: TranscribeArgs, settings: &Settings) -> TranscriptionRequest {
    let formats = if args.formats.is_empty() {
        settings.transcription.formats.clone()
    } else {
        args.formats
    };

    TranscriptionRequest {
        files: args.files,
        formats,
        model: args.model.unwrap_or(settings.transcription.model),
        language: args.language.or_else(|| settings.transcription.language.clone()),
        translate: args.translate,
        verbose: args.verbose_engine,
        output_dir: args.directory.unwrap_or_else(|| settings.output_dir()),
        keep_going: args.keep_going,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> TranscribeArgs {
        TranscribeArgs {
            files: vec![PathBuf::from("a.mp3")],
            formats: Vec::new(),
            language: None,
            model: None,
            directory: None,
            translate: false,
            verbose_engine: false,
            keep_going: false,
        }
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let mut settings = Settings::default();
        settings.transcription.model = ModelSelector::Medium;
        settings.transcription.language = Some("de".to_string());
        settings.transcription.formats = vec![FormatChoice::Vtt];
        settings.transcription.output_dir = "/srv/subs".to_string();

        let request = build_request(args(), &settings);
        assert_eq!(request.model, ModelSelector::Medium);
        assert_eq!(request.language.as_deref(), Some("de"));
        assert_eq!(request.formats, [FormatChoice::Vtt]);
        assert_eq!(request.output_dir, PathBuf::from("/srv/subs"));
    }

    #[test]
    fn test_flags_override_settings() {
        let mut a = args();
        a.model = Some(ModelSelector::Tiny);
        a.formats = vec![FormatChoice::Json];
        a.directory = Some(PathBuf::from("out"));
        a.language = Some("es".to_string());

        let request = build_request(a, &Settings::default());
        assert_eq!(request.model, ModelSelector::Tiny);
        assert_eq!(request.formats, [FormatChoice::Json]);
        assert_eq!(request.output_dir, PathBuf::from("out"));
        assert_eq!(request.language.as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn test_mismatch_rejected_before_file_checks() {
        let mut a = args();
        a.files = vec![PathBuf::from("/definitely/not/here.mp3")];
        a.model = Some(ModelSelector::SmallEn);
        a.language = Some("it".to_string());

        let err = run_transcribe(a, &Settings::default()).await.unwrap_err();
        assert!(err.to_string().contains("English-only"));
    }
}
