//! SignDesk Core Library
//!
//! Platform-agnostic template editing engine for the SignDesk sign editor:
//! keeps template elements in sync with an external rendering surface,
//! tracks selection, and provides undo/redo, clipboard and grid snap.

pub mod clipboard;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod history;
pub mod images;
pub mod projector;
pub mod property;
pub mod registry;
pub mod selection;
pub mod session;
pub mod snap;
pub mod surface;
pub mod template;

pub use clipboard::{Clipboard, ClipboardPayload, PASTE_OFFSET};
pub use config::{EditorConfig, PasteOffset};
pub use diagnostics::{Diagnostic, DiagnosticPolicy};
pub use error::{EditorError, EditorResult};
pub use history::History;
pub use images::{
    ImageCompletion, ImageError, ImageLoader, ImageRequest, ImageSource, LoadToken,
    QueuedImageLoader,
};
pub use projector::Projector;
pub use property::{ElementProperty, PropertyError};
pub use registry::SceneRegistry;
pub use selection::{SelectionState, SelectionSync};
pub use session::{EditorNotice, EditorSession};
pub use snap::{GridSnap, SnapResult, snap_to_grid, GRID_SIZE};
pub use surface::{
    Attributes, MemorySurface, ObjectKind, RenderSurface, SceneObjectHandle, SceneSnapshot,
    SurfaceError, SurfaceEvent,
};
pub use template::{
    ElementKind, ElementProperties, ImageProperties, ShapeProperties, Template, TemplateElement,
    TemplateError, TextProperties,
};
