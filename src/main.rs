//! Interactive Feedback MCP server
//!
//! Serves the `interactive_feedback` tool over stdio. Each call spawns the
//! `feedback-ui` dialog and waits for the human to answer.
//!
//! # Usage
//!
//! ```bash
//! interactive-feedback-mcp
//! interactive-feedback-mcp --ui-program ./target/release/feedback-ui --log-level debug
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use interactive_feedback::config::Config;

#[derive(Parser, Debug)]
#[command(name = "interactive-feedback-mcp")]
#[command(about = "MCP server that requests interactive feedback from the user")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "error")]
    log_level: String,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the feedback dialog program
    #[arg(long)]
    ui_program: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the protocol; logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Interactive Feedback MCP v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(args.config.as_deref())?;
    let launcher = config.launcher(args.ui_program);

    interactive_feedback::mcp::run_server(launcher).await
}
