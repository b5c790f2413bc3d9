//! CLI module for Subtext.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::transcription::{FormatChoice, ModelSelector};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Subtext - transcribe audio and subtitle videos
///
/// Requires ffmpeg (https://ffmpeg.org/) and the whisper command line tool
/// to be installed and on your PATH.
#[derive(Parser, Debug)]
#[command(name = "subtext")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SUBTEXT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audio related subcommands
    Audio {
        #[command(subcommand)]
        action: AudioAction,
    },

    /// Video related subcommands
    Video {
        #[command(subcommand)]
        action: VideoAction,
    },

    /// Check that ffmpeg and whisper are installed
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum AudioAction {
    /// Transcribe audio files into subtitle and text formats
    ///
    /// Writes <name>.<format> for every input file, e.g. `subtext audio
    /// transcribe talk.mp3 -l es -f srt -f json` creates talk.srt and
    /// talk.json.
    Transcribe {
        /// Audio files to transcribe (they must share the same language)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output formats (json, txt, srt, vtt, tsv); "all" writes every one
        #[arg(short, long = "format")]
        formats: Vec<FormatChoice>,

        /// Source language; detected automatically if not given (slower)
        #[arg(short, long)]
        language: Option<String>,

        /// Whisper model; the "*.en" models only handle English
        #[arg(short, long)]
        model: Option<ModelSelector>,

        /// Directory for the transcribed files
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// Transcribe and translate into English
        #[arg(long)]
        translate: bool,

        /// Show whisper's own progress output
        #[arg(long)]
        verbose_engine: bool,

        /// Keep processing remaining files after a failure
        #[arg(long)]
        keep_going: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum VideoAction {
    /// Extract the audio track from a video file
    #[command(visible_alias = "ea")]
    ExtractAudio {
        /// Video file
        video: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Create a copy of a video with subtitles burned in
    Subtitles {
        /// Video file
        video: PathBuf,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,

        /// Source language; detected automatically if not given (slower)
        #[arg(short, long)]
        language: Option<String>,

        /// Whisper model; the "*.en" models only handle English
        #[arg(short, long)]
        model: Option<ModelSelector>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
