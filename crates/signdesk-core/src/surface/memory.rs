//! In-memory rendering surface for testing and headless use.

use super::{
    Attributes, ObjectKind, RenderSurface, SceneObjectHandle, SceneSnapshot, SurfaceError,
    SurfaceEvent, SurfaceResult,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Object as stored in a snapshot. Handles are deliberately left out so that
/// identical scenes serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredObject {
    kind: ObjectKind,
    #[serde(flatten)]
    attributes: Attributes,
}

/// A scene kept entirely in memory.
///
/// Besides implementing [`RenderSurface`], it can simulate pointer
/// interaction (`pointer_*`, `click_empty`, `delete_active`, `set_zoom`),
/// which queues the same events a real canvas would raise.
#[derive(Debug)]
pub struct MemorySurface {
    /// Objects in z-order (back to front).
    scene: Vec<SceneObjectHandle>,
    /// Every live object, attached or merely created.
    objects: HashMap<SceneObjectHandle, StoredObject>,
    active: Option<SceneObjectHandle>,
    next_handle: u64,
    events: Vec<SurfaceEvent>,
    render_count: u64,
    zoom: f64,
    pan: Vec2,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self {
            scene: Vec::new(),
            objects: HashMap::new(),
            active: None,
            next_handle: 1,
            events: Vec::new(),
            render_count: 0,
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    fn allocate(&mut self) -> SceneObjectHandle {
        let handle = SceneObjectHandle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Check whether `handle` refers to an object currently in the scene.
    pub fn contains(&self, handle: SceneObjectHandle) -> bool {
        self.scene.contains(&handle)
    }

    /// Number of render requests received so far.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Find the object materializing `element_id`.
    pub fn find_element(&self, element_id: &str) -> Option<SceneObjectHandle> {
        self.scene.iter().copied().find(|handle| {
            self.objects
                .get(handle)
                .and_then(|o| o.attributes.element_id.as_deref())
                == Some(element_id)
        })
    }

    /// User clicks an object.
    pub fn pointer_select(&mut self, handle: SceneObjectHandle) {
        if !self.contains(handle) {
            return;
        }
        let event = if self.active.is_some() {
            SurfaceEvent::SelectionUpdated(handle)
        } else {
            SurfaceEvent::SelectionCreated(handle)
        };
        self.active = Some(handle);
        self.events.push(event);
    }

    /// User drags an object so that its top-left corner is at `position`.
    pub fn pointer_move(&mut self, handle: SceneObjectHandle, position: Point) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.attributes.set_position(position);
            self.events.push(SurfaceEvent::ObjectMoving(handle));
        }
    }

    /// User drags a resize handle.
    pub fn pointer_resize(&mut self, handle: SceneObjectHandle, width: f64, height: f64) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.attributes.width = width;
            object.attributes.height = height;
            self.events.push(SurfaceEvent::ObjectScaling(handle));
        }
    }

    /// User releases the pointer, committing the current drag or resize.
    pub fn pointer_release(&mut self, handle: SceneObjectHandle) {
        if self.contains(handle) {
            self.events.push(SurfaceEvent::ObjectModified(handle));
        }
    }

    /// User clicks an empty area of the canvas.
    pub fn click_empty(&mut self) {
        if self.active.take().is_some() {
            self.events.push(SurfaceEvent::SelectionCleared);
        }
    }

    /// User presses delete with an object active.
    pub fn delete_active(&mut self) {
        let Some(handle) = self.active.take() else {
            return;
        };
        self.scene.retain(|&h| h != handle);
        self.objects.remove(&handle);
        self.events.push(SurfaceEvent::SelectionCleared);
        self.events.push(SurfaceEvent::ObjectRemoved(handle));
    }

    /// User drops a new object onto the canvas.
    pub fn drop_object(&mut self, kind: ObjectKind, attributes: Attributes) -> SceneObjectHandle {
        let handle = self.allocate();
        self.objects.insert(handle, StoredObject { kind, attributes });
        self.scene.push(handle);
        self.events.push(SurfaceEvent::ObjectAdded(handle));
        handle
    }

    /// User zooms the view.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.events.push(SurfaceEvent::ViewportChanged {
            zoom,
            pan: self.pan,
        });
    }
}

impl RenderSurface for MemorySurface {
    fn create_object(&mut self, kind: ObjectKind, attributes: Attributes) -> SceneObjectHandle {
        let handle = self.allocate();
        self.objects.insert(handle, StoredObject { kind, attributes });
        handle
    }

    fn add_object(&mut self, handle: SceneObjectHandle) -> SurfaceResult<()> {
        if !self.objects.contains_key(&handle) {
            return Err(SurfaceError::UnknownObject(handle));
        }
        if !self.scene.contains(&handle) {
            self.scene.push(handle);
        }
        Ok(())
    }

    fn remove_object(&mut self, handle: SceneObjectHandle) -> SurfaceResult<()> {
        if self.objects.remove(&handle).is_none() {
            return Err(SurfaceError::UnknownObject(handle));
        }
        self.scene.retain(|&h| h != handle);
        if self.active == Some(handle) {
            self.active = None;
        }
        Ok(())
    }

    fn set_active_object(&mut self, handle: Option<SceneObjectHandle>) {
        self.active = handle.filter(|h| self.scene.contains(h));
    }

    fn active_object(&self) -> Option<SceneObjectHandle> {
        self.active
    }

    fn objects(&self) -> Vec<SceneObjectHandle> {
        self.scene.clone()
    }

    fn object_kind(&self, handle: SceneObjectHandle) -> Option<ObjectKind> {
        self.objects.get(&handle).map(|o| o.kind)
    }

    fn attributes(&self, handle: SceneObjectHandle) -> Option<Attributes> {
        self.objects.get(&handle).map(|o| o.attributes.clone())
    }

    fn set_attributes(
        &mut self,
        handle: SceneObjectHandle,
        attributes: Attributes,
    ) -> SurfaceResult<()> {
        let object = self
            .objects
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownObject(handle))?;
        object.attributes = attributes;
        Ok(())
    }

    fn serialize(&self) -> SurfaceResult<SceneSnapshot> {
        let stored: Vec<&StoredObject> = self
            .scene
            .iter()
            .filter_map(|handle| self.objects.get(handle))
            .collect();
        serde_json::to_string(&stored)
            .map(SceneSnapshot::new)
            .map_err(|e| SurfaceError::Serialize(e.to_string()))
    }

    fn deserialize(&mut self, snapshot: &SceneSnapshot) -> SurfaceResult<()> {
        let stored: Vec<StoredObject> = serde_json::from_str(snapshot.as_str())
            .map_err(|e| SurfaceError::Deserialize(e.to_string()))?;

        self.scene.clear();
        self.objects.clear();
        self.active = None;
        for object in stored {
            let handle = self.allocate();
            self.objects.insert(handle, object);
            self.scene.push(handle);
        }
        Ok(())
    }

    fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn render(&mut self) {
        self.render_count += 1;
    }
}
