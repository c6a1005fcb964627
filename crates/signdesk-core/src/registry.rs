//! Bidirectional lookup between template element ids and scene objects.

use crate::surface::SceneObjectHandle;
use std::collections::HashMap;

/// Maps element ids to the scene objects that materialize them.
///
/// The mapping is strictly one-to-one: an element owns at most one handle
/// and a handle belongs to at most one element. Attempts to break that are
/// logged and refused.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    by_element: HashMap<String, SceneObjectHandle>,
    by_handle: HashMap<SceneObjectHandle, String>,
}

impl SceneRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `element_id` with `handle`.
    ///
    /// Returns false without changing anything if either side is already
    /// registered; callers must [`unregister`](Self::unregister) first.
    pub fn register(&mut self, element_id: &str, handle: SceneObjectHandle) -> bool {
        if let Some(existing) = self.by_element.get(element_id) {
            log::warn!(
                "Element '{}' is already registered to {}; refusing {}",
                element_id,
                existing,
                handle
            );
            return false;
        }
        if let Some(owner) = self.by_handle.get(&handle) {
            log::warn!(
                "{} already belongs to element '{}'; refusing '{}'",
                handle,
                owner,
                element_id
            );
            return false;
        }
        self.by_element.insert(element_id.to_string(), handle);
        self.by_handle.insert(handle, element_id.to_string());
        true
    }

    /// Handle materializing `element_id`, if any.
    pub fn lookup(&self, element_id: &str) -> Option<SceneObjectHandle> {
        self.by_element.get(element_id).copied()
    }

    /// Element owning `handle`, if any.
    pub fn element_for(&self, handle: SceneObjectHandle) -> Option<&str> {
        self.by_handle.get(&handle).map(String::as_str)
    }

    /// Drop the entry for `element_id`, returning its handle.
    pub fn unregister(&mut self, element_id: &str) -> Option<SceneObjectHandle> {
        let handle = self.by_element.remove(element_id)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }

    /// Drop every entry in one step.
    pub fn clear(&mut self) {
        self.by_element.clear();
        self.by_handle.clear();
    }

    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    /// Iterate over `(element_id, handle)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SceneObjectHandle)> {
        self.by_element.iter().map(|(id, &h)| (id.as_str(), h))
    }
}
