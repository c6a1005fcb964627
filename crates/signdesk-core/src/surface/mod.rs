//! Rendering surface abstraction.
//!
//! The editor never draws anything itself. It talks to an external 2D scene
//! engine through the [`RenderSurface`] trait: creating objects from an
//! attribute set, moving the active-object pointer, snapshotting the whole
//! scene and replaying it. Implementations can wrap a browser canvas
//! library, a native scene graph, or the in-memory [`MemorySurface`] used by
//! tests and the headless shell.

mod memory;

pub use memory::MemorySurface;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Failed to serialize scene: {0}")]
    Serialize(String),
    #[error("Failed to deserialize scene: {0}")]
    Deserialize(String),
    #[error("Unknown scene object: {0}")]
    UnknownObject(SceneObjectHandle),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Opaque reference to an object living inside the rendering surface.
///
/// Handles are only meaningful to the surface that issued them and become
/// invalid once the object is removed or the scene is replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneObjectHandle(u64);

impl SceneObjectHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Kind of object the surface knows how to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Editable text box.
    Text,
    /// Raster image loaded from a source URL.
    Image,
    /// Rectangle with optional rounded corners.
    Rect,
}

/// Attribute set understood by the rendering surface.
///
/// Geometry is always present; the remaining slots are filled depending on
/// the object kind. The owning element's id and its editor flags travel
/// with the object so that a scene restored from a snapshot is
/// self-describing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Id of the template element this object materializes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `text` is the element placeholder standing in for empty content.
    /// A surface that lets the user type into the object clears it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub showing_placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Whether end users may edit the element behind this object.
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Attributes {
    /// Top-left position.
    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Move the object so its top-left corner sits at `position`.
    pub fn set_position(&mut self, position: Point) {
        self.left = position.x;
        self.top = position.y;
    }

    /// Translate by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.set_position(self.position() + offset);
    }

    /// Bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }
}

/// Whole-scene snapshot produced by [`RenderSurface::serialize`].
///
/// Opaque to the editor; two snapshots of identical scenes compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSnapshot(String);

impl SceneSnapshot {
    pub fn new(data: String) -> Self {
        Self(data)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size of the serialized scene in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Notification raised by the surface in response to user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// An object was added by the user (e.g. dropped onto the canvas).
    ObjectAdded(SceneObjectHandle),
    /// An object was removed by the user.
    ObjectRemoved(SceneObjectHandle),
    /// A drag, resize or inline edit finished.
    ObjectModified(SceneObjectHandle),
    /// An object is being dragged; not yet committed.
    ObjectMoving(SceneObjectHandle),
    /// An object is being resized; not yet committed.
    ObjectScaling(SceneObjectHandle),
    SelectionCreated(SceneObjectHandle),
    SelectionUpdated(SceneObjectHandle),
    SelectionCleared,
    /// Zoom level or pan offset changed.
    ViewportChanged { zoom: f64, pan: Vec2 },
}

/// Capability interface of the external rendering surface.
///
/// Mutations made through this trait are programmatic and do not raise
/// [`SurfaceEvent`]s; only user interaction does. Callers are expected to
/// snapshot and re-render after their own mutations.
pub trait RenderSurface {
    /// Create a detached object. It becomes visible after [`add_object`](Self::add_object).
    fn create_object(&mut self, kind: ObjectKind, attributes: Attributes) -> SceneObjectHandle;

    /// Insert a created object on top of the scene.
    fn add_object(&mut self, handle: SceneObjectHandle) -> SurfaceResult<()>;

    /// Remove and destroy an object.
    fn remove_object(&mut self, handle: SceneObjectHandle) -> SurfaceResult<()>;

    /// Set (or clear, with `None`) the active-object pointer.
    fn set_active_object(&mut self, handle: Option<SceneObjectHandle>);

    /// The active object, if any.
    fn active_object(&self) -> Option<SceneObjectHandle>;

    /// All objects in the scene, back to front.
    fn objects(&self) -> Vec<SceneObjectHandle>;

    /// Kind of a live object.
    fn object_kind(&self, handle: SceneObjectHandle) -> Option<ObjectKind>;

    /// Current attributes of a live object.
    fn attributes(&self, handle: SceneObjectHandle) -> Option<Attributes>;

    /// Replace the attributes of a live object.
    fn set_attributes(
        &mut self,
        handle: SceneObjectHandle,
        attributes: Attributes,
    ) -> SurfaceResult<()>;

    /// Serialize the entire scene.
    fn serialize(&self) -> SurfaceResult<SceneSnapshot>;

    /// Replace the entire scene with `snapshot`. Every previously issued
    /// handle is invalid afterwards and the active object is cleared.
    fn deserialize(&mut self, snapshot: &SceneSnapshot) -> SurfaceResult<()>;

    /// Drain pending user-interaction events.
    fn take_events(&mut self) -> Vec<SurfaceEvent>;

    /// Request a repaint.
    fn render(&mut self);

    /// Remove every object. The default goes through [`remove_object`](Self::remove_object).
    fn clear(&mut self) {
        self.set_active_object(None);
        for handle in self.objects() {
            if let Err(e) = self.remove_object(handle) {
                log::warn!("Failed to remove {} while clearing: {}", handle, e);
            }
        }
    }
}
