//! Interactive Feedback MCP Library
//!
//! An MCP tool handler that asks a human for feedback through a desktop
//! dialog, and the dialog itself.

pub mod config;
pub mod error;
pub mod feedback;
pub mod gui;
pub mod handler;
pub mod images;
pub mod mcp;
pub mod session;
pub mod settings;
pub mod theme;

pub use error::{FeedbackError, Result};
pub use feedback::{combine_feedback, FeedbackRequest, FeedbackResult};
pub use handler::{DialogLauncher, FeedbackResponse, ImagePayload};
pub use settings::SettingsStore;
