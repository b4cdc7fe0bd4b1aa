//! Error types for interactive-feedback-mcp

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Failed to launch feedback UI {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Feedback UI exited with status {0}")]
    UiExit(i32),

    #[error("Feedback UI was terminated by a signal")]
    UiTerminated,

    #[error("Failed to read result file {path}: {source}")]
    ResultRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid result file: {0}")]
    ResultParse(#[from] serde_json::Error),

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image: {0}")]
    ImageSave(#[from] image::ImageError),

    #[error("Clipboard image is {width}x{height} but carries {len} bytes")]
    InvalidImage { width: usize, height: usize, len: usize },

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
