//! CLI command implementations.

mod audio;
mod config;
mod doctor;
mod video;

pub use audio::{run_transcribe, TranscribeArgs};
pub use config::run_config;
pub use doctor::run_doctor;
pub use video::{run_extract_audio, run_subtitles};
