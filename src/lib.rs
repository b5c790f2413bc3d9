//! Subtext - Audio Transcription and Video Subtitles
//!
//! A CLI tool that transcribes audio files into subtitle and text formats and
//! burns subtitles into videos.
//!
//! # Overview
//!
//! Subtext allows you to:
//! - Transcribe audio files to JSON, plain text, SRT, WebVTT and TSV
//! - Translate speech into English while transcribing
//! - Extract the audio track of a video
//! - Create a copy of a video with its own transcript burned in as subtitles
//!
//! Speech recognition is done by the `whisper` command line tool and all
//! media work by `ffmpeg`; Subtext coordinates the two.
//!
//! # Architecture
//!
//! - `process` - External process execution
//! - `media` - ffmpeg commands and subtitle burn-in
//! - `transcription` - Whisper invocation and output formats
//! - `validation` - Checks that run before any work starts
//! - `orchestrator` - Pipeline coordination
//! - `config` - Configuration management
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use subtext::config::Settings;
//! use subtext::orchestrator::Orchestrator;
//! use subtext::transcription::ModelSelector;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings);
//!
//!     orchestrator
//!         .subtitle_video(Path::new("talk.mp4"), Path::new("talk-subbed.mp4"), ModelSelector::Small, Some("en"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod orchestrator;
pub mod process;
pub mod transcription;
pub mod validation;

pub use error::{Result, SubtextError};
