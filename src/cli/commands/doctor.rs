//! Doctor command - verify system requirements and configuration.

use crate::cli::preflight::probe_arg;
use crate::cli::Output;
use crate::config::Settings;
use crate::process::ProcessRunner;
use crate::transcription::fp16_available;
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Subtext Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let tool_checks = [
        check_tool("ffmpeg", &settings.tools.ffmpeg, install_hint_ffmpeg()),
        check_tool("whisper", &settings.tools.whisper, install_hint_whisper()),
    ];
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);

    println!();

    println!("{}", style("Hardware").bold());
    let runner = ProcessRunner::with_timeout(settings.tool_timeout());
    let gpu_check = check_gpu(fp16_available(&runner).await);
    gpu_check.print();
    checks.push(gpu_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = [check_config_file(config_path), check_temp_dir(settings)];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Subtext.",
            errors
        ));
        return Err(anyhow::anyhow!("{} doctor check(s) failed", errors));
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Subtext is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, binary: &str, hint: &str) -> CheckResult {
    match Command::new(binary).arg(probe_arg(binary)).output() {
        Ok(output) if output.status.success() => {
            // Try to extract version from first line
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            CheckResult::ok(name, &truncate(&version, 50))
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, &format!("{} not found", binary), hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

fn check_gpu(available: bool) -> CheckResult {
    if available {
        CheckResult::ok("GPU", "CUDA device found, half precision enabled")
    } else {
        CheckResult::warning(
            "GPU",
            "no CUDA device, transcription runs on the CPU",
            "Larger models will be slow; consider tiny, base or small",
        )
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: subtext config init",
        )
    }
}

fn check_temp_dir(settings: &Settings) -> CheckResult {
    let dir = settings.temp_dir().unwrap_or_else(std::env::temp_dir);
    match tempfile::Builder::new().prefix("subtext-doctor-").tempdir_in(&dir) {
        Ok(_) => CheckResult::ok("Temp directory", &format!("{}", dir.display())),
        Err(e) => CheckResult::error(
            "Temp directory",
            &format!("{} is not writable: {}", dir.display(), e),
            "Set general.temp_dir in the config file to a writable directory",
        ),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Install hint for whisper.
fn install_hint_whisper() -> &'static str {
    "Install with: pip install -U openai-whisper"
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
