//! Feedback request/result records shared by the dialog and the tool handler.

use serde::{Deserialize, Serialize};

/// Separator for predefined options on the dialog command line
pub const OPTION_DELIMITER: &str = "|||";

/// Separator between checked options in the combined feedback
const OPTION_JOINER: &str = "; ";

/// Separator between the options line and the free text
const SECTION_JOINER: &str = "\n\n";

/// Options offered when the caller does not supply any
pub const DEFAULT_OPTIONS: [&str; 5] = [
    "The current issue is resolved",
    "Optimize the program further",
    "Polish the interface further",
    "There are still issues to fix",
    "No bugs were fixed",
];

/// Most option checkboxes placed on one grid row
pub const MAX_GRID_COLUMNS: usize = 3;

/// What the agent asks the human
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackRequest {
    /// Question or summary shown above the input area
    pub prompt: String,
    /// Canned answers rendered as checkboxes, in display order
    pub predefined_options: Vec<String>,
}

impl FeedbackRequest {
    pub fn new(prompt: impl Into<String>, predefined_options: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            predefined_options,
        }
    }
}

/// Result record written by the dialog and read back by the tool handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    #[serde(default)]
    pub interactive_feedback: String,
    #[serde(default)]
    pub image_paths: Vec<String>,
}

impl FeedbackResult {
    /// The result of a dialog closed without submitting
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.interactive_feedback.is_empty() && self.image_paths.is_empty()
    }
}

/// Merge checked options and free text into the final feedback string.
///
/// Options are joined with `"; "`, the (trimmed) text follows after a blank
/// line. Either part is left out when empty.
pub fn combine_feedback<S: AsRef<str>>(selected: &[S], text: &str) -> String {
    let mut parts = Vec::with_capacity(2);

    if !selected.is_empty() {
        let options: Vec<&str> = selected.iter().map(AsRef::as_ref).collect();
        parts.push(options.join(OPTION_JOINER));
    }

    let text = text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }

    parts.join(SECTION_JOINER)
}

/// Encode options for the `--predefined-options` argument
pub fn join_options<S: AsRef<str>>(options: &[S]) -> String {
    options
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(OPTION_DELIMITER)
}

/// Decode a `|||`-delimited option list, dropping empty segments
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(OPTION_DELIMITER)
        .filter(|opt| !opt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of grid columns used for `count` options
pub fn grid_columns(count: usize) -> usize {
    count.clamp(1, MAX_GRID_COLUMNS)
}

/// (row, column) of option `index` in a grid with `columns` columns
pub fn grid_position(index: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    (index / columns, index % columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_options_and_text() {
        let combined = combine_feedback(&["Looks good"], "Thanks");
        assert_eq!(combined, "Looks good\n\nThanks");
    }

    #[test]
    fn test_combine_multiple_options() {
        let combined = combine_feedback(&["A", "B", "C"], "");
        assert_eq!(combined, "A; B; C");
    }

    #[test]
    fn test_combine_text_only() {
        let none: [&str; 0] = [];
        assert_eq!(combine_feedback(&none, "  just text \n"), "just text");
    }

    #[test]
    fn test_combine_nothing() {
        let none: [&str; 0] = [];
        assert_eq!(combine_feedback(&none, ""), "");
        assert_eq!(combine_feedback(&none, "   \n\t"), "");
    }

    #[test]
    fn test_options_round_trip_through_argument() {
        let options = vec!["Looks good".to_string(), "Needs fix".to_string()];
        let raw = join_options(&options);
        assert_eq!(raw, "Looks good|||Needs fix");
        assert_eq!(parse_options(&raw), options);
    }

    #[test]
    fn test_parse_options_drops_empty_segments() {
        assert!(parse_options("").is_empty());
        assert_eq!(parse_options("a||||||b|||"), vec!["a", "b"]);
    }

    #[test]
    fn test_grid_layout() {
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(2), 2);
        assert_eq!(grid_columns(15), 3);

        let cols = grid_columns(5);
        let positions: Vec<_> = (0..5).map(|i| grid_position(i, cols)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_result_file_schema() {
        let result = FeedbackResult {
            interactive_feedback: "Looks good\n\nThanks".into(),
            image_paths: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"interactive_feedback": "Looks good\n\nThanks", "image_paths": []})
        );

        let parsed: FeedbackResult =
            serde_json::from_str(r#"{"interactive_feedback": "x"}"#).unwrap();
        assert!(parsed.image_paths.is_empty());
    }

    #[test]
    fn test_result_is_empty_only_without_text_and_images() {
        assert!(FeedbackResult::empty().is_empty());
        let images_only = FeedbackResult {
            interactive_feedback: String::new(),
            image_paths: vec!["/tmp/a.png".into()],
        };
        assert!(!images_only.is_empty());
    }
}
