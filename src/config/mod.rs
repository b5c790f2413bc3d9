//! Configuration module for Subtext.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, Settings, ToolSettings, TranscriptionSettings};
