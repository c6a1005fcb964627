//! Selection synchronization between the element list and the canvas.
//!
//! There are two views of "what is selected": the domain element id held
//! here and the rendering surface's active-object pointer. Whichever side
//! initiates a change, both must agree once the transition completes.

use crate::registry::SceneRegistry;
use crate::surface::{RenderSurface, SceneObjectHandle};

/// Domain-side selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// The element with this id is selected.
    Selected(String),
}

impl SelectionState {
    pub fn element_id(&self) -> Option<&str> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(id) => Some(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }
}

/// Keeps [`SelectionState`] and the surface's active object in agreement.
#[derive(Debug, Clone, Default)]
pub struct SelectionSync {
    state: SelectionState,
}

impl SelectionSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Currently selected element id.
    pub fn selected(&self) -> Option<&str> {
        self.state.element_id()
    }

    /// The canvas reports a new active object.
    ///
    /// Objects that no element owns cannot be selected; the surface pointer
    /// is cleared so that both sides read as idle.
    pub fn canvas_selected<S: RenderSurface + ?Sized>(
        &mut self,
        registry: &SceneRegistry,
        surface: &mut S,
        handle: SceneObjectHandle,
    ) -> bool {
        let next = match registry.element_for(handle) {
            Some(id) => SelectionState::Selected(id.to_string()),
            None => {
                log::debug!("{} has no owning element, treating as deselect", handle);
                surface.set_active_object(None);
                SelectionState::Idle
            }
        };
        self.transition(next)
    }

    /// The user picked an element in the side list.
    ///
    /// Unknown or unmaterialized elements reset the selection to idle.
    pub fn panel_selected<S: RenderSurface + ?Sized>(
        &mut self,
        registry: &SceneRegistry,
        surface: &mut S,
        element_id: &str,
    ) -> bool {
        match registry.lookup(element_id) {
            Some(handle) => {
                surface.set_active_object(Some(handle));
                surface.render();
                self.transition(SelectionState::Selected(element_id.to_string()))
            }
            None => {
                log::debug!("Element '{}' has no scene object, clearing selection", element_id);
                surface.set_active_object(None);
                surface.render();
                self.transition(SelectionState::Idle)
            }
        }
    }

    /// The canvas reports the selection was cleared.
    pub fn canvas_cleared(&mut self) -> bool {
        self.transition(SelectionState::Idle)
    }

    /// Clear both sides.
    pub fn clear<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        surface.set_active_object(None);
        self.transition(SelectionState::Idle)
    }

    /// Select an element whose object was just made active by the caller.
    pub fn set_selected(&mut self, element_id: &str) -> bool {
        self.transition(SelectionState::Selected(element_id.to_string()))
    }

    /// Drop a selection that no longer points at a live, active object.
    pub fn validate<S: RenderSurface + ?Sized>(
        &mut self,
        registry: &SceneRegistry,
        surface: &mut S,
    ) -> bool {
        if self.agrees(registry, &*surface) {
            return false;
        }
        log::debug!("Selection went stale, resetting to idle");
        self.clear(surface)
    }

    /// Check that the domain selection and the surface's active object refer
    /// to the same element, or are both empty.
    pub fn agrees<S: RenderSurface + ?Sized>(&self, registry: &SceneRegistry, surface: &S) -> bool {
        let active = surface.active_object();
        match &self.state {
            SelectionState::Idle => active.is_none(),
            SelectionState::Selected(id) => {
                active.is_some() && registry.lookup(id) == active
            }
        }
    }

    fn transition(&mut self, next: SelectionState) -> bool {
        if self.state == next {
            return false;
        }
        log::trace!("Selection {:?} -> {:?}", self.state, next);
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Attributes, MemorySurface, ObjectKind};

    fn setup() -> (MemorySurface, SceneRegistry, SceneObjectHandle) {
        let mut surface = MemorySurface::new();
        let handle = surface.create_object(
            ObjectKind::Rect,
            Attributes {
                element_id: Some("s1".to_string()),
                width: 10.0,
                height: 10.0,
                ..Default::default()
            },
        );
        surface.add_object(handle).unwrap();
        let mut registry = SceneRegistry::new();
        registry.register("s1", handle);
        (surface, registry, handle)
    }

    #[test]
    fn test_panel_selection_moves_active_object() {
        let (mut surface, registry, handle) = setup();
        let mut sync = SelectionSync::new();

        assert!(sync.panel_selected(&registry, &mut surface, "s1"));
        assert_eq!(sync.selected(), Some("s1"));
        assert_eq!(surface.active_object(), Some(handle));
        assert!(sync.agrees(&registry, &surface));
    }

    #[test]
    fn test_panel_selection_of_stale_element_goes_idle() {
        let (mut surface, registry, _) = setup();
        let mut sync = SelectionSync::new();
        sync.panel_selected(&registry, &mut surface, "s1");

        sync.panel_selected(&registry, &mut surface, "gone");
        assert!(sync.state().is_idle());
        assert_eq!(surface.active_object(), None);
        assert!(sync.agrees(&registry, &surface));
    }

    #[test]
    fn test_canvas_selection_and_clear() {
        let (mut surface, registry, handle) = setup();
        let mut sync = SelectionSync::new();

        surface.pointer_select(handle);
        assert!(sync.canvas_selected(&registry, &mut surface, handle));
        assert_eq!(sync.selected(), Some("s1"));
        assert!(sync.agrees(&registry, &surface));

        surface.click_empty();
        assert!(sync.canvas_cleared());
        assert!(sync.agrees(&registry, &surface));
        assert!(!sync.canvas_cleared());
    }

    #[test]
    fn test_orphan_object_is_not_selectable() {
        let (mut surface, registry, _) = setup();
        let orphan = surface.create_object(ObjectKind::Rect, Attributes::default());
        surface.add_object(orphan).unwrap();
        let mut sync = SelectionSync::new();

        surface.pointer_select(orphan);
        sync.canvas_selected(&registry, &mut surface, orphan);
        assert!(sync.state().is_idle());
        assert!(sync.agrees(&registry, &surface));
    }

    #[test]
    fn test_dangling_selection_is_idle() {
        let (mut surface, mut registry, handle) = setup();
        let mut sync = SelectionSync::new();
        sync.panel_selected(&registry, &mut surface, "s1");

        surface.remove_object(handle).unwrap();
        registry.unregister("s1");
        assert!(!sync.agrees(&registry, &surface));
        assert!(sync.validate(&registry, &mut surface));
        assert!(sync.state().is_idle());
        assert!(sync.agrees(&registry, &surface));
    }
}
