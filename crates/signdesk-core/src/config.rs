//! Editor configuration.

use crate::diagnostics::DiagnosticPolicy;
use crate::error::EditorResult;
use crate::snap::GRID_SIZE;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Offset applied to pasted copies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PasteOffset {
    pub dx: f64,
    pub dy: f64,
}

impl Default for PasteOffset {
    fn default() -> Self {
        Self { dx: 20.0, dy: 20.0 }
    }
}

impl From<PasteOffset> for Vec2 {
    fn from(offset: PasteOffset) -> Self {
        Vec2::new(offset.dx, offset.dy)
    }
}

/// Editor session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid pitch in canvas units.
    pub grid_size: f64,
    /// Whether grid snap starts enabled.
    pub snap_to_grid: bool,
    pub paste_offset: PasteOffset,
    /// Maximum number of history entries (None = unbounded).
    pub history_limit: Option<usize>,
    pub diagnostics: DiagnosticPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_to_grid: false,
            paste_offset: PasteOffset::default(),
            history_limit: None,
            diagnostics: DiagnosticPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> EditorResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Default config location.
    ///
    /// On Linux: `~/.config/signdesk/editor.json`
    /// On Windows: `%APPDATA%\signdesk\editor.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("signdesk").join("editor.json"))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Load `path` (or the default location), falling back to defaults when
    /// there is no file. A file that exists but cannot be parsed is an error.
    pub fn load_or_default(path: Option<&Path>) -> EditorResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    log::info!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::info!("Loading config from {}", path.display());
        Self::from_file(&path)
    }
}
