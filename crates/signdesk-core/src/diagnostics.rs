//! Recoverable editor conditions and how loudly to report them.
//!
//! None of these abort an operation as an error. The component that
//! detects one recovers locally and hands it to [`DiagnosticPolicy`], which
//! decides whether it is logged and whether the UI gets to see it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A locally handled editor condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("Skipped element '{element_id}' with unsupported type '{type_name}'")]
    UnknownElementType {
        element_id: String,
        type_name: String,
    },
    #[error("Skipped malformed element: {reason}")]
    MalformedElement { reason: String },
    #[error("Element '{element_id}' has no scene object")]
    StaleReference { element_id: String },
    #[error("Image for element '{element_id}' failed to load: {reason}")]
    ImageLoadFailure { element_id: String, reason: String },
    #[error("Nothing to undo")]
    HistoryUnderflow,
    #[error("Nothing to redo")]
    HistoryOverflow,
    #[error("Element '{element_id}' is not editable")]
    NotEditable { element_id: String },
    #[error("Element '{element_id}' has no property '{property}'")]
    UnsupportedProperty {
        element_id: String,
        property: &'static str,
    },
}

impl Diagnostic {
    /// Log level used when the policy logs.
    pub fn level(&self) -> log::Level {
        match self {
            Diagnostic::HistoryUnderflow
            | Diagnostic::HistoryOverflow
            | Diagnostic::StaleReference { .. } => log::Level::Debug,
            _ => log::Level::Warn,
        }
    }
}

/// How diagnostics are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPolicy {
    /// Trace-level logging only.
    Silent,
    /// Log at the diagnostic's own level.
    #[default]
    Log,
    /// Log and also hand the diagnostic to the UI.
    Report,
}

impl DiagnosticPolicy {
    /// Log `diagnostic` and return it if the UI should be told.
    pub fn dispatch(self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        match self {
            DiagnosticPolicy::Silent => {
                log::trace!("{}", diagnostic);
                None
            }
            DiagnosticPolicy::Log => {
                log::log!(diagnostic.level(), "{}", diagnostic);
                None
            }
            DiagnosticPolicy::Report => {
                log::log!(diagnostic.level(), "{}", diagnostic);
                Some(diagnostic)
            }
        }
    }
}
