//! SignDesk Application
//!
//! Headless shell around the editing engine: loads a template, replays an
//! edit script against an in-memory rendering surface and resolves image
//! loads locally.

mod script;
mod shortcuts;

pub use script::{
    ScriptError, ScriptReport, ScriptStep, Session, apply_step, load_script, new_session,
    parse_script, read_file, resolve_images, run_script, write_file,
};
pub use shortcuts::{EditorAction, Shortcut, ShortcutRegistry};
