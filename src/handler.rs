//! Tool handler: launches the feedback dialog and collects its result
//!
//! The dialog runs as a separate process. A temporary JSON file carries the
//! result back; it is removed after reading and on every error path.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::error::{FeedbackError, Result};
use crate::feedback::{join_options, FeedbackResult, DEFAULT_OPTIONS};

/// Binary name of the dialog, looked up beside the server executable
pub const DIALOG_BINARY: &str = "feedback-ui";

/// Environment variable overriding the dialog program
pub const DIALOG_ENV: &str = "INTERACTIVE_FEEDBACK_UI";

/// An image read back from the dialog's images directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub filename: String,
    /// Standard base64 of the raw file bytes
    pub content: String,
    pub path: String,
}

impl ImagePayload {
    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            _ => "image/png",
        }
    }
}

/// What the `interactive_feedback` tool returns to the agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub interactive_feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImagePayload>>,
}

/// How to start the dialog process
#[derive(Debug, Clone)]
pub struct DialogLauncher {
    program: PathBuf,
    /// Arguments placed before the prompt/options/output arguments
    leading_args: Vec<OsString>,
    /// Options used when the caller supplies none
    default_options: Vec<String>,
}

impl DialogLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            default_options: DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the fallback option list. An empty list keeps the built-in one.
    pub fn with_default_options(mut self, options: Vec<String>) -> Self {
        if !options.is_empty() {
            self.default_options = options;
        }
        self
    }

    /// Find the dialog program.
    ///
    /// Order: `INTERACTIVE_FEEDBACK_UI`, then `feedback-ui` beside the
    /// current executable, then `feedback-ui` on `PATH`.
    pub fn locate() -> Self {
        if let Some(program) = std::env::var_os(DIALOG_ENV).filter(|p| !p.is_empty()) {
            debug!("Using dialog from {}", DIALOG_ENV);
            return Self::new(PathBuf::from(program));
        }

        let name = format!("{}{}", DIALOG_BINARY, std::env::consts::EXE_SUFFIX);
        let sibling = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
            .filter(|candidate| candidate.is_file());

        Self::new(sibling.unwrap_or_else(|| PathBuf::from(name)))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn default_options(&self) -> &[String] {
        &self.default_options
    }

    /// Options actually sent to the dialog: the caller's list, or the
    /// defaults when it is absent or empty
    pub fn resolve_options(&self, options: Option<Vec<String>>) -> Vec<String> {
        match options {
            Some(options) if !options.is_empty() => options,
            _ => self.default_options.clone(),
        }
    }

    /// Run the dialog and block until it exits.
    ///
    /// The temporary result file is removed whether or not this succeeds.
    pub fn launch(&self, summary: &str, options: &[String]) -> Result<FeedbackResult> {
        let output_file = tempfile::Builder::new()
            .prefix("feedback-")
            .suffix(".json")
            .tempfile()?
            .into_temp_path();

        info!("Launching feedback UI: {}", self.program.display());
        let status = Command::new(&self.program)
            .args(&self.leading_args)
            .args(dialog_args(summary, &output_file, options))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| FeedbackError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(match status.code() {
                Some(code) => FeedbackError::UiExit(code),
                None => FeedbackError::UiTerminated,
            });
        }

        let content = std::fs::read_to_string(&output_file).map_err(|source| {
            FeedbackError::ResultRead {
                path: output_file.to_path_buf(),
                source,
            }
        })?;
        let result: FeedbackResult = serde_json::from_str(&content)?;

        if let Err(e) = output_file.close() {
            warn!("Failed to remove result file: {}", e);
        }

        debug!(
            "Feedback UI returned {} chars and {} image paths",
            result.interactive_feedback.len(),
            result.image_paths.len()
        );
        Ok(result)
    }

    /// Full tool call: resolve options, run the dialog, inline images
    pub fn interactive_feedback(
        &self,
        message: &str,
        predefined_options: Option<Vec<String>>,
    ) -> Result<FeedbackResponse> {
        let options = self.resolve_options(predefined_options);
        let result = self.launch(message, &options)?;

        let images = collect_image_payloads(&result.image_paths);
        Ok(FeedbackResponse {
            interactive_feedback: result.interactive_feedback,
            images: if images.is_empty() { None } else { Some(images) },
        })
    }
}

/// Dialog command line for one request.
///
/// Values are attached with `=` so a prompt or option starting with `-`
/// (a markdown list, say) is never parsed as a flag.
pub fn dialog_args(prompt: &str, output_file: &Path, options: &[String]) -> Vec<OsString> {
    vec![
        flag_value("--prompt", prompt),
        flag_value("--output-file", output_file),
        flag_value("--predefined-options", join_options(options)),
    ]
}

fn flag_value(flag: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push("=");
    arg.push(value);
    arg
}

/// Read and base64-encode every image that still exists.
///
/// Missing files are skipped; unreadable ones are logged and skipped.
pub fn collect_image_payloads<S: AsRef<str>>(paths: &[S]) -> Vec<ImagePayload> {
    paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| Path::new(path).exists())
        .filter_map(|path| match read_image_payload(Path::new(path)) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Error processing image: {}", e);
                None
            }
        })
        .collect()
}

fn read_image_payload(path: &Path) -> Result<ImagePayload> {
    let bytes = std::fs::read(path).map_err(|source| FeedbackError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ImagePayload {
        filename,
        content: base64::engine::general_purpose::STANDARD.encode(&bytes),
        path: path.to_string_lossy().into_owned(),
    })
}
