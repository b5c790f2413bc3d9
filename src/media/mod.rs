//! Media processing through ffmpeg.
//!
//! - [`Ffmpeg`] builds and runs the encoder commands (audio extraction,
//!   subtitle burn-in).
//! - [`SubtitleComposer`] chains extraction, transcription and burn-in inside
//!   a temporary working area.

mod burn_in;
mod ffmpeg;

pub use burn_in::SubtitleComposer;
pub use ffmpeg::{Ffmpeg, AUDIO_BITRATE, AUDIO_SAMPLE_RATE};
