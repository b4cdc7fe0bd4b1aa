//! Feedback dialog
//!
//! Shows the prompt with optional predefined options, collects text and
//! pasted images, and writes the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! feedback-ui --prompt "Implemented the change" \
//!   --predefined-options "Looks good|||Needs fix" \
//!   --output-file /tmp/feedback.json
//! ```
//!
//! Without `--output-file` the received feedback is printed instead.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use interactive_feedback::feedback::{parse_options, FeedbackRequest, FeedbackResult};
use interactive_feedback::gui;
use interactive_feedback::images::ImageStore;
use interactive_feedback::settings::{SettingsStore, APPLICATION, ORGANIZATION};

#[derive(Parser, Debug)]
#[command(name = "feedback-ui")]
#[command(about = "Interactive feedback dialog")]
#[command(version)]
struct Args {
    /// Prompt shown to the user
    #[arg(
        long,
        allow_hyphen_values = true,
        default_value = "I have implemented the changes you requested."
    )]
    prompt: String,

    /// Pipe-separated (|||) list of predefined options
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    predefined_options: String,

    /// Path to save the feedback result as JSON
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Directory for pasted images (defaults to images/ beside this binary)
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn write_result(path: &Path, result: &FeedbackResult) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string(result)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_result(result: &FeedbackResult) {
    if result.is_empty() {
        println!("\nNo feedback received (dialog closed)");
        return;
    }
    if !result.interactive_feedback.is_empty() {
        println!("\nFeedback received:\n{}", result.interactive_feedback);
    }
    if !result.image_paths.is_empty() {
        println!("\nAttached images:\n{}", result.image_paths.join(", "));
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Standalone mode prints the result on stdout; keep logs off it
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let request = FeedbackRequest::new(args.prompt, parse_options(&args.predefined_options));
    info!("Feedback UI starting with {} options", request.predefined_options.len());

    let images = match args.images_dir {
        Some(dir) => ImageStore::new(dir),
        None => ImageStore::beside_executable()?,
    };
    if let Err(e) = images.ensure_dir() {
        // Paste will retry and report the failure to the user
        warn!("Images directory {} unavailable: {}", images.dir().display(), e);
    }

    let settings = SettingsStore::open(ORGANIZATION, APPLICATION);

    let result = gui::run_feedback_ui(request, settings, images)
        .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    match args.output_file {
        Some(path) => {
            write_result(&path, &result)?;
            info!("Result written to {}", path.display());
        }
        None => print_result(&result),
    }

    Ok(())
}
