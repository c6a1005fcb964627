//! Projection of template elements onto the rendering surface.
//!
//! [`attributes_for`] and [`element_from_attributes`] are the two halves of
//! the element <-> attribute mapping. [`Projector`] applies them to a live
//! surface, keeping the [`SceneRegistry`] in step with every object it
//! creates or destroys. It never renders or snapshots on its own; the
//! session does both once the mutation is complete.

use crate::property::ElementProperty;
use crate::registry::SceneRegistry;
use crate::surface::{Attributes, ObjectKind, RenderSurface, SceneObjectHandle};
use crate::template::{ElementProperties, TemplateElement};

/// Initial attribute set for `element`, derived from the element alone.
pub fn attributes_for(element: &TemplateElement) -> Attributes {
    let mut attributes = Attributes {
        element_id: Some(element.id.clone()),
        left: element.x,
        top: element.y,
        width: element.width,
        height: element.height,
        editable: element.is_editable,
        required: element.is_required,
        placeholder: element.placeholder.clone(),
        ..Default::default()
    };
    element
        .properties
        .write_attributes(&mut attributes, element.placeholder.as_deref());
    attributes
}

/// Rebuild an element from live attributes. `None` for objects that carry
/// no element id.
pub fn element_from_attributes(kind: ObjectKind, attributes: &Attributes) -> Option<TemplateElement> {
    let id = attributes.element_id.clone()?;
    let placeholder = attributes.placeholder.clone();
    let properties = ElementProperties::read_attributes(kind, attributes, placeholder.as_deref());
    Some(TemplateElement {
        id,
        x: attributes.left,
        y: attributes.top,
        width: attributes.width,
        height: attributes.height,
        properties,
        is_editable: attributes.editable,
        is_required: attributes.required,
        placeholder,
    })
}

/// Applies element state to a surface through a registry.
pub struct Projector<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    registry: &'a mut SceneRegistry,
}

impl<'a, S: RenderSurface + ?Sized> Projector<'a, S> {
    pub fn new(surface: &'a mut S, registry: &'a mut SceneRegistry) -> Self {
        Self { surface, registry }
    }

    /// Create, insert and register the scene object for `element`.
    ///
    /// Returns `None` if the element is already materialized or the surface
    /// refuses the object.
    pub fn materialize(&mut self, element: &TemplateElement) -> Option<SceneObjectHandle> {
        if let Some(existing) = self.registry.lookup(&element.id) {
            log::warn!(
                "Element '{}' is already materialized as {}",
                element.id,
                existing
            );
            return None;
        }

        let kind = element.properties.object_kind();
        let handle = self.surface.create_object(kind, attributes_for(element));
        if let Err(e) = self.surface.add_object(handle) {
            log::error!("Failed to add object for '{}': {}", element.id, e);
            return None;
        }
        if !self.registry.register(&element.id, handle) {
            // Registry refused; do not leave an unowned object behind.
            if let Err(e) = self.surface.remove_object(handle) {
                log::warn!("Failed to discard {}: {}", handle, e);
            }
            return None;
        }
        log::debug!("Materialized '{}' ({}) as {}", element.id, element.kind(), handle);
        Some(handle)
    }

    /// Apply one property edit to the live object of `element_id`.
    ///
    /// Returns false if the element has no live object. Image sources are
    /// not changed here; use [`replace_image`](Self::replace_image).
    pub fn project(
        &mut self,
        element_id: &str,
        property: &ElementProperty,
        placeholder: Option<&str>,
    ) -> bool {
        if matches!(property, ElementProperty::ImageUrl(_)) {
            log::warn!("Image source of '{}' must be replaced, not projected", element_id);
            return false;
        }
        let Some(handle) = self.registry.lookup(element_id) else {
            log::debug!("No scene object for '{}', nothing to update", element_id);
            return false;
        };
        let Some(mut attributes) = self.surface.attributes(handle) else {
            log::debug!("{} for '{}' is gone", handle, element_id);
            return false;
        };

        property.write_to(&mut attributes, placeholder);
        match self.surface.set_attributes(handle, attributes) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to update '{}': {}", element_id, e);
                false
            }
        }
    }

    /// Read an element back from its live object.
    pub fn extract(&self, handle: SceneObjectHandle) -> Option<TemplateElement> {
        let kind = self.surface.object_kind(handle)?;
        let mut attributes = self.surface.attributes(handle)?;
        // The registry is authoritative for ownership.
        if let Some(owner) = self.registry.element_for(handle) {
            attributes.element_id = Some(owner.to_string());
        }
        element_from_attributes(kind, &attributes)
    }

    /// Swap the image object of `element` for a new one with the element's
    /// current source.
    ///
    /// The new object takes the live geometry of the old one, so an image
    /// that was moved or resized on the canvas stays where it is.
    pub fn replace_image(&mut self, element: &TemplateElement) -> Option<SceneObjectHandle> {
        let mut element = element.clone();
        if let Some(old) = self.registry.lookup(&element.id) {
            if let Some(live) = self.surface.attributes(old) {
                element.x = live.left;
                element.y = live.top;
                element.width = live.width;
                element.height = live.height;
            }
            self.dematerialize(&element.id);
        }
        self.materialize(&element)
    }

    /// Remove the object of `element_id` from the scene and the registry.
    pub fn dematerialize(&mut self, element_id: &str) -> bool {
        let Some(handle) = self.registry.unregister(element_id) else {
            return false;
        };
        if let Err(e) = self.surface.remove_object(handle) {
            log::warn!("Failed to remove {} for '{}': {}", handle, element_id, e);
        }
        true
    }

    /// Rebuild the registry from scratch from the objects in the scene.
    ///
    /// Required after every wholesale scene replace, since all earlier
    /// handles are invalid. Returns the materialized elements in z-order.
    pub fn rebuild(&mut self) -> Vec<TemplateElement> {
        self.registry.clear();
        let mut elements = Vec::new();
        for handle in self.surface.objects() {
            let Some(element) = self.extract(handle) else {
                log::debug!("{} has no owning element", handle);
                continue;
            };
            if self.registry.register(&element.id, handle) {
                elements.push(element);
            }
        }
        log::debug!("Registry rebuilt with {} elements", elements.len());
        elements
    }
}
