//! Persisted dialog preferences (theme, window geometry/state)
//!
//! Stored as TOML under the platform config directory, keyed by an
//! organization and application identifier:
//!
//! ```toml
//! [MainWindow_General]
//! isDarkMode = "true"
//!
//! [MainWindow_General.geometry]
//! x = 100.0
//! y = 80.0
//! width = 800.0
//! height = 600.0
//!
//! [MainWindow_General.windowState]
//! maximized = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{FeedbackError, Result};

pub const ORGANIZATION: &str = "InteractiveFeedbackMCP";
pub const APPLICATION: &str = "InteractiveFeedbackMCP";

/// Window position and inner size in logical points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    #[serde(default)]
    pub maximized: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(rename = "MainWindow_General", default)]
    main_window: MainWindowGeneral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MainWindowGeneral {
    /// Kept as the literal strings "true"/"false"
    #[serde(rename = "isDarkMode", default = "default_dark_mode")]
    is_dark_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<WindowGeometry>,
    #[serde(rename = "windowState", default, skip_serializing_if = "Option::is_none")]
    window_state: Option<WindowState>,
}

impl Default for MainWindowGeneral {
    fn default() -> Self {
        Self {
            is_dark_mode: default_dark_mode(),
            geometry: None,
            window_state: None,
        }
    }
}

fn default_dark_mode() -> String {
    "true".to_string()
}

/// Settings store injected into the dialog at construction.
///
/// Read once at startup; the theme flag is written on every toggle and the
/// window geometry/state when the window closes.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    data: SettingsFile,
}

impl SettingsStore {
    /// Default file location for an organization/application pair
    pub fn default_path(organization: &str, application: &str) -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(organization)
            .join(format!("{}.toml", application))
    }

    /// Open the store for the given identifiers
    pub fn open(organization: &str, application: &str) -> Self {
        Self::at_path(Self::default_path(organization, application))
    }

    /// Open the store backed by `path`.
    ///
    /// A missing file yields defaults. An unreadable or corrupt file is
    /// logged and replaced by defaults on the next write.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match Self::load(&path) {
            Ok(Some(data)) => {
                debug!("Loaded settings from {}", path.display());
                data
            }
            Ok(None) => SettingsFile::default(),
            Err(e) => {
                warn!("Ignoring settings at {}: {}", path.display(), e);
                SettingsFile::default()
            }
        };
        Self { path, data }
    }

    fn load(path: &Path) -> Result<Option<SettingsFile>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let data = toml::from_str(&content).map_err(|e| FeedbackError::Settings(e.to_string()))?;
        Ok(Some(data))
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.data)
            .map_err(|e| FeedbackError::Settings(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dark_mode(&self) -> bool {
        self.data.main_window.is_dark_mode == "true"
    }

    /// Set the theme flag and persist it immediately
    pub fn set_dark_mode(&mut self, dark: bool) -> Result<()> {
        self.data.main_window.is_dark_mode = dark.to_string();
        self.save()
    }

    /// Flip the theme flag, persist it, and return the new value
    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let dark = !self.dark_mode();
        self.set_dark_mode(dark)?;
        Ok(dark)
    }

    pub fn geometry(&self) -> Option<WindowGeometry> {
        self.data.main_window.geometry
    }

    pub fn window_state(&self) -> WindowState {
        self.data.main_window.window_state.unwrap_or_default()
    }

    /// Record the window geometry/state at close
    pub fn save_window(
        &mut self,
        geometry: Option<WindowGeometry>,
        state: WindowState,
    ) -> Result<()> {
        if geometry.is_some() {
            self.data.main_window.geometry = geometry;
        }
        self.data.main_window.window_state = Some(state);
        self.save()
    }
}
