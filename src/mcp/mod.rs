//! MCP (Model Context Protocol) server for interactive feedback
//!
//! Exposes a single `interactive_feedback` tool over stdio. Each call opens
//! the feedback dialog and blocks until the human submits or closes it.

mod server;

pub use server::{run_server, FeedbackMcpServer, InteractiveFeedbackInput};
