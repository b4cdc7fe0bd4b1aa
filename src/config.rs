//! Configuration management for the MCP server

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FeedbackError, Result};
use crate::handler::DialogLauncher;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialog process configuration
    pub ui: UiConfig,
    /// Options offered when the agent passes none (empty = built-in list)
    pub default_options: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Explicit path to the dialog program
    pub program: Option<PathBuf>,
    /// Extra arguments placed before the dialog's own arguments
    pub args: Vec<String>,
}

impl Config {
    /// Get default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("interactive-feedback-mcp")
            .join("config.toml")
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)
                .map_err(|e| FeedbackError::Config(format!("{}: {}", path.display(), e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Build the dialog launcher.
    ///
    /// `program_override` (from the command line) wins over the config file,
    /// which wins over automatic discovery.
    pub fn launcher(&self, program_override: Option<PathBuf>) -> DialogLauncher {
        let launcher = match program_override.or_else(|| self.ui.program.clone()) {
            Some(program) => DialogLauncher::new(program),
            None => DialogLauncher::locate(),
        };
        launcher
            .with_leading_args(self.ui.args.iter())
            .with_default_options(self.default_options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(config.ui.program.is_none());
        assert!(config.default_options.is_empty());
    }

    #[test]
    fn test_parse_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_options = ["Ship it", "Try again"]

[ui]
program = "/opt/feedback/feedback-ui"
args = ["--log-level", "debug"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.default_options, vec!["Ship it", "Try again"]);
        assert_eq!(config.ui.args, vec!["--log-level", "debug"]);

        let launcher = config.launcher(None);
        assert_eq!(launcher.program(), Path::new("/opt/feedback/feedback-ui"));
        assert_eq!(launcher.resolve_options(None), vec!["Ship it", "Try again"]);

        let overridden = config.launcher(Some(PathBuf::from("/usr/bin/other-ui")));
        assert_eq!(overridden.program(), Path::new("/usr/bin/other-ui"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_options = 3").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(FeedbackError::Config(_))));
    }
}
