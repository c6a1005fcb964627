//! Edit scripts replayed against an editor session.
//!
//! A script is a JSON array of steps, each tagged with an `op`:
//!
//! ```json
//! [
//!   { "op": "select", "id": "headline" },
//!   { "op": "update", "id": "headline", "property": "fontSize", "value": 48 },
//!   { "op": "key", "shortcut": "Ctrl+D" },
//!   { "op": "undo" }
//! ]
//! ```

use crate::shortcuts::ShortcutRegistry;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use signdesk_core::{
    EditorConfig, EditorError, EditorSession, ImageCompletion, ImageSource, MemorySurface,
    QueuedImageLoader, TemplateElement,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Session type used by the shell.
pub type Session = EditorSession<MemorySurface, QueuedImageLoader>;

/// Shell errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("Unknown shortcut '{0}'")]
    UnknownShortcut(String),
}

/// One scripted user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Pick an element in the list.
    Select { id: String },
    Deselect,
    /// Property panel edit.
    Update {
        id: String,
        property: String,
        value: Value,
    },
    Add { element: TemplateElement },
    Remove { id: String },
    /// Drag an element on the canvas so its top-left corner ends at (x, y).
    Drag { id: String, x: f64, y: f64 },
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    Grid { enabled: bool },
    /// Press a keyboard shortcut, e.g. `"Ctrl+Z"`.
    Key { shortcut: String },
}

/// Outcome of a script run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptReport {
    /// Steps that changed something.
    pub applied: usize,
    /// Steps that were no-ops (stale ids, empty history, locked elements).
    pub skipped: usize,
    pub images_loaded: usize,
    /// Image loads that failed or were superseded.
    pub images_dropped: usize,
}

/// Read a whole file, naming the path on failure.
pub fn read_file(path: &Path) -> Result<String, ScriptError> {
    fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a whole file, naming the path on failure.
pub fn write_file(path: &Path, contents: &str) -> Result<(), ScriptError> {
    fs::write(path, contents).map_err(|source| ScriptError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    parse_script(&read_file(path)?)
}

/// Open a headless session on an in-memory surface.
pub fn new_session(config: EditorConfig) -> Session {
    EditorSession::create(MemorySurface::new(), QueuedImageLoader::new(), config)
}

/// Complete every queued image load locally.
///
/// Embedded images must carry an `image/*` payload; remote sources are
/// accepted as-is.
pub fn resolve_images(session: &mut Session, report: &mut ScriptReport) {
    for request in session.loader_mut().drain() {
        let completion = match &request.source {
            ImageSource::Embedded { mime, data } if mime.starts_with("image/") && !data.is_empty() => {
                ImageCompletion::loaded(&request)
            }
            ImageSource::Embedded { mime, .. } => {
                ImageCompletion::failed(&request, format!("unsupported payload '{}'", mime))
            }
            ImageSource::Remote(_) => ImageCompletion::loaded(&request),
        };
        if session.finish_image_load(completion) {
            report.images_loaded += 1;
        } else {
            report.images_dropped += 1;
        }
    }
}

/// Apply one step. Returns whether it changed anything.
pub fn apply_step(session: &mut Session, step: &ScriptStep) -> Result<bool, ScriptError> {
    let changed = match step {
        ScriptStep::Select { id } => session.select_element(id),
        ScriptStep::Deselect => {
            session.clear_selection();
            true
        }
        ScriptStep::Update {
            id,
            property,
            value,
        } => session.update_property_value(id, property, value)?,
        ScriptStep::Add { element } => session.add_element(element.clone()),
        ScriptStep::Remove { id } => session.remove_element(id),
        ScriptStep::Drag { id, x, y } => drag(session, id, Point::new(*x, *y)),
        ScriptStep::Undo => session.undo(),
        ScriptStep::Redo => session.redo(),
        ScriptStep::Copy => session.copy_selection(),
        ScriptStep::Paste => session.paste_clipboard().is_some(),
        ScriptStep::Duplicate => session.duplicate_selection().is_some(),
        ScriptStep::Grid { enabled } => {
            session.toggle_grid_snap(*enabled);
            true
        }
        ScriptStep::Key { shortcut } => {
            let Some(found) = ShortcutRegistry::find(shortcut) else {
                return Err(ScriptError::UnknownShortcut(shortcut.clone()));
            };
            found.action.apply(session)
        }
    };
    Ok(changed)
}

/// Simulate a pointer drag: press, move, release.
fn drag(session: &mut Session, element_id: &str, to: Point) -> bool {
    match session.element(element_id) {
        Some(element) if element.is_editable => {}
        Some(_) => {
            log::warn!("Element '{}' is locked, not dragging", element_id);
            return false;
        }
        None => return false,
    }
    let Some(handle) = session.registry().lookup(element_id) else {
        return false;
    };
    let surface = session.surface_mut();
    surface.pointer_select(handle);
    surface.pointer_move(handle, to);
    surface.pointer_release(handle);
    session.pump_events();
    true
}

/// Replay `steps`, resolving image loads after the template and after
/// every step.
pub fn run_script(session: &mut Session, steps: &[ScriptStep]) -> Result<ScriptReport, ScriptError> {
    let mut report = ScriptReport::default();
    resolve_images(session, &mut report);

    for (index, step) in steps.iter().enumerate() {
        if apply_step(session, step)? {
            report.applied += 1;
        } else {
            log::warn!("Step {} had no effect: {:?}", index + 1, step);
            report.skipped += 1;
        }
        resolve_images(session, &mut report);
    }

    log::info!(
        "Script done: {} applied, {} skipped, {} images loaded",
        report.applied,
        report.skipped,
        report.images_loaded
    );
    Ok(report)
}
