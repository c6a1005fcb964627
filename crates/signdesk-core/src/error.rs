//! Top-level editor error.

use crate::images::ImageError;
use crate::property::PropertyError;
use crate::surface::SurfaceError;
use crate::template::TemplateError;
use thiserror::Error;

/// Errors returned by the editor's loading and parsing entry points.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
