//! Feedback session state
//!
//! Holds everything the dialog mutates between startup and close: checked
//! options, the free-text body, the uploaded image list and the final
//! result. Rendering lives in `gui`; this module has no egui dependency so
//! the submit/close semantics can be tested headless.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::feedback::{combine_feedback, FeedbackRequest, FeedbackResult};
use crate::images::{ImageStore, PastedImage};

/// Toast notification severity levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
}

/// A short-lived notification drawn over the dialog
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel, duration_ms: u64) -> Self {
        Self {
            message: message.into(),
            level,
            started_at: Instant::now(),
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Check if toast should be dismissed
    pub fn is_expired(&self) -> bool {
        if self.duration.is_zero() {
            return false; // Never expires (manual dismiss only)
        }
        self.started_at.elapsed() >= self.duration
    }

    /// Get remaining time ratio (1.0 = full, 0.0 = expired)
    pub fn time_remaining_ratio(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = self.started_at.elapsed().as_secs_f32();
        let total = self.duration.as_secs_f32();
        (1.0 - elapsed / total).max(0.0)
    }
}

/// One modal feedback session
#[derive(Debug)]
pub struct FeedbackSession {
    request: FeedbackRequest,
    /// Checkbox state, parallel to `request.predefined_options`
    checked: Vec<bool>,
    /// Free-text body
    pub text: String,
    /// Uploaded images in paste order
    images: Vec<PathBuf>,
    /// Set exactly once, on submit
    outcome: Option<FeedbackResult>,
}

impl FeedbackSession {
    pub fn new(request: FeedbackRequest) -> Self {
        let checked = vec![false; request.predefined_options.len()];
        Self {
            request,
            checked,
            text: String::new(),
            images: Vec::new(),
            outcome: None,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.request.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.request.predefined_options
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Mutable checkbox flag for option `index`
    pub fn checked_mut(&mut self, index: usize) -> Option<&mut bool> {
        self.checked.get_mut(index)
    }

    pub fn toggle_option(&mut self, index: usize) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = !*flag;
        }
    }

    /// Checked options in display order
    pub fn selected_options(&self) -> Vec<&str> {
        self.request
            .predefined_options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(option, _)| option.as_str())
            .collect()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    pub fn add_image(&mut self, path: PathBuf) {
        self.images.push(path);
    }

    /// Save a clipboard bitmap into `store` and append it to the upload list.
    ///
    /// On failure nothing is appended.
    pub fn paste_image(&mut self, store: &ImageStore, image: PastedImage) -> Result<&Path> {
        let path = store.save_pasted(image)?;
        self.images.push(path);
        Ok(self.images[self.images.len() - 1].as_path())
    }

    /// Drop `path` from the upload list. The file itself stays on disk.
    pub fn remove_image(&mut self, path: &Path) -> bool {
        match self.images.iter().position(|p| p == path) {
            Some(pos) => {
                self.images.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Build the result from the current state. Later calls return the
    /// first result unchanged.
    pub fn submit(&mut self) -> &FeedbackResult {
        if self.outcome.is_none() {
            let feedback = combine_feedback(&self.selected_options(), &self.text);
            let image_paths = self
                .images
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            self.outcome = Some(FeedbackResult {
                interactive_feedback: feedback,
                image_paths,
            });
        }
        self.outcome.get_or_insert_with(FeedbackResult::empty)
    }

    /// Final result when the window goes away: the submitted one, or an
    /// empty record if the user closed without submitting.
    pub fn result(&self) -> FeedbackResult {
        self.outcome.clone().unwrap_or_else(FeedbackResult::empty)
    }
}
