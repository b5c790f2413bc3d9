//! Subtext CLI entry point.

use anyhow::Result;
use clap::Parser;
use subtext::cli::{commands, AudioAction, Cli, Commands, VideoAction};
use subtext::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("subtext={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    match cli.command {
        Commands::Audio { action } => match action {
            AudioAction::Transcribe {
                files,
                formats,
                language,
                model,
                directory,
                translate,
                verbose_engine,
                keep_going,
            } => {
                let args = commands::TranscribeArgs {
                    files,
                    formats,
                    language,
                    model,
                    directory,
                    translate,
                    verbose_engine,
                    keep_going,
                };
                commands::run_transcribe(args, &settings).await?;
            }
        },

        Commands::Video { action } => match action {
            VideoAction::ExtractAudio { video, output } => {
                commands::run_extract_audio(&video, &output, &settings).await?;
            }
            VideoAction::Subtitles {
                video,
                output,
                language,
                model,
            } => {
                commands::run_subtitles(&video, &output, language, model, &settings).await?;
            }
        },

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, &config_path)?;
        }
    }

    Ok(())
}
