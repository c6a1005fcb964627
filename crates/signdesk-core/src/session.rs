//! Editor session: the explicitly owned state of one open editor.
//!
//! An [`EditorSession`] owns the rendering surface, the image loader and
//! every piece of editing state (domain elements, registry, selection,
//! grid snap, history, clipboard, in-flight image loads). The property
//! panel and element list drive it through the public methods; user
//! interaction on the canvas reaches it through [`EditorSession::pump_events`].
//!
//! Within one gesture the order is always: mutate the scene, render,
//! snapshot into history, then bring the selection back into agreement.
//! Image loads are the only asynchronous step. They complete through
//! [`EditorSession::finish_image_load`] and are discarded unless their
//! token is still the latest for the element.

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::diagnostics::Diagnostic;
use crate::error::EditorResult;
use crate::history::History;
use crate::images::{
    ImageCompletion, ImageLoader, ImageRequest, ImageSource, LoadPurpose, PendingImage,
    PendingLoads,
};
use crate::projector::{Projector, element_from_attributes};
use crate::property::ElementProperty;
use crate::registry::SceneRegistry;
use crate::selection::{SelectionState, SelectionSync};
use crate::snap::GridSnap;
use crate::surface::{ObjectKind, RenderSurface, SceneObjectHandle, SceneSnapshot, SurfaceEvent};
use crate::template::{ElementKind, Template, TemplateElement, TemplateError, TemplateLoad};
use serde_json::Value;
use uuid::Uuid;

/// Something the panel or element list should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorNotice {
    /// Selection moved to this element, or to nothing.
    SelectionChanged(Option<String>),
    /// An element was added, edited or removed.
    ElementChanged(String),
    /// The element list was replaced wholesale (template load, undo, redo, clear).
    ElementsReloaded,
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// Only queued under [`DiagnosticPolicy::Report`](crate::DiagnosticPolicy::Report).
    Diagnostic(Diagnostic),
}

/// One open editor.
pub struct EditorSession<S: RenderSurface, L: ImageLoader> {
    id: Uuid,
    surface: S,
    loader: L,
    /// Template metadata plus the live domain model in `elements`.
    template: Template,
    registry: SceneRegistry,
    selection: SelectionSync,
    snap: GridSnap,
    history: History,
    clipboard: Clipboard,
    pending: PendingLoads,
    notices: Vec<EditorNotice>,
    config: EditorConfig,
}

impl<S: RenderSurface, L: ImageLoader> EditorSession<S, L> {
    /// Open a session on `surface`. The scene is cleared and history starts
    /// from the empty canvas.
    pub fn create(mut surface: S, loader: L, config: EditorConfig) -> Self {
        surface.clear();
        let mut session = Self {
            id: Uuid::new_v4(),
            surface,
            loader,
            template: Template::new("", "", Template::DEFAULT_WIDTH, Template::DEFAULT_HEIGHT),
            registry: SceneRegistry::new(),
            selection: SelectionSync::new(),
            snap: GridSnap::new(config.grid_size, config.snap_to_grid),
            history: History::new(config.history_limit),
            clipboard: Clipboard::new(config.paste_offset.into()),
            pending: PendingLoads::new(),
            notices: Vec::new(),
            config,
        };
        session.reset_history();
        log::info!("Editor session {} created", session.id);
        session
    }

    /// Close the session and hand the surface back.
    pub fn dispose(self) -> S {
        log::info!(
            "Editor session {} disposed ({} history entries, {} loads in flight)",
            self.id,
            self.history.len(),
            self.pending.len()
        );
        self.surface
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the surface, e.g. to feed it pointer input.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // --- Templates and elements ---

    /// Replace the whole scene with `template`.
    ///
    /// Text and shape elements appear immediately; images appear as their
    /// loads complete. History restarts from the loaded scene.
    pub fn load_template(&mut self, template: Template) {
        log::info!(
            "Loading template '{}' ({} elements)",
            template.id,
            template.elements.len()
        );
        self.pending.invalidate_all();
        let deselected = self.selection.clear(&mut self.surface);
        self.surface.clear();
        self.registry.clear();

        let Template {
            id,
            name,
            width,
            height,
            background_color,
            elements,
        } = template;
        self.template = Template {
            id,
            name,
            width,
            height,
            background_color,
            elements: Vec::with_capacity(elements.len()),
        };

        for element in elements {
            if self.template.element(&element.id).is_some() {
                log::warn!("Skipping duplicate element '{}'", element.id);
                continue;
            }
            if element.kind() == ElementKind::Image {
                self.start_image_load(element.clone(), LoadPurpose::Initial);
            } else {
                Projector::new(&mut self.surface, &mut self.registry).materialize(&element);
            }
            self.template.elements.push(element);
        }

        self.surface.render();
        self.reset_history();
        self.notices.push(EditorNotice::ElementsReloaded);
        self.selection_changed(deselected);
    }

    /// Parse and load template JSON. Skipped elements are reported as
    /// diagnostics; only unparseable JSON is an error.
    pub fn load_template_json(&mut self, json: &str) -> EditorResult<()> {
        let TemplateLoad { template, rejected } = Template::from_json(json)?;
        for error in rejected {
            let diagnostic = match error {
                TemplateError::UnknownType {
                    element_id,
                    type_name,
                } => Diagnostic::UnknownElementType {
                    element_id,
                    type_name,
                },
                other => Diagnostic::MalformedElement {
                    reason: other.to_string(),
                },
            };
            self.diagnose(diagnostic);
        }
        self.load_template(template);
        Ok(())
    }

    /// Current domain model, back to front.
    pub fn elements(&self) -> &[TemplateElement] {
        &self.template.elements
    }

    pub fn element(&self, element_id: &str) -> Option<&TemplateElement> {
        self.template.element(element_id)
    }

    /// Read an element back from its live scene object.
    pub fn live_element(&self, element_id: &str) -> Option<TemplateElement> {
        let handle = self.registry.lookup(element_id)?;
        let kind = self.surface.object_kind(handle)?;
        let attributes = self.surface.attributes(handle)?;
        element_from_attributes(kind, &attributes)
    }

    /// The current design as a template.
    pub fn export_template(&self) -> Template {
        self.template.clone()
    }

    /// Add a new element. Images are added once their load completes.
    pub fn add_element(&mut self, element: TemplateElement) -> bool {
        if self.element_index(&element.id).is_some() || self.pending.is_pending(&element.id) {
            log::warn!("Element '{}' already exists", element.id);
            return false;
        }
        if element.kind() == ElementKind::Image {
            return self.start_image_load(element, LoadPurpose::Add);
        }

        if Projector::new(&mut self.surface, &mut self.registry)
            .materialize(&element)
            .is_none()
        {
            return false;
        }
        let id = element.id.clone();
        self.template.elements.push(element);
        self.surface.render();
        self.record_snapshot();
        self.notices.push(EditorNotice::ElementChanged(id));
        true
    }

    /// Remove an element and its scene object.
    pub fn remove_element(&mut self, element_id: &str) -> bool {
        let Some(index) = self.element_index(element_id) else {
            if self.pending.cancel(element_id) {
                log::debug!("Cancelled pending image '{}'", element_id);
                return true;
            }
            self.diagnose(Diagnostic::StaleReference {
                element_id: element_id.to_string(),
            });
            return false;
        };

        self.pending.cancel(element_id);
        Projector::new(&mut self.surface, &mut self.registry).dematerialize(element_id);
        self.template.elements.remove(index);
        self.surface.render();
        self.record_snapshot();
        let changed = self.selection.validate(&self.registry, &mut self.surface);
        self.selection_changed(changed);
        self.notices
            .push(EditorNotice::ElementChanged(element_id.to_string()));
        true
    }

    /// Remove the selected element.
    pub fn delete_selection(&mut self) -> bool {
        match self.selection.selected().map(str::to_string) {
            Some(id) => self.remove_element(&id),
            None => false,
        }
    }

    /// Remove every element. Recorded as a single undoable step.
    pub fn clear_canvas(&mut self) {
        self.pending.invalidate_all();
        let changed = self.selection.clear(&mut self.surface);
        self.surface.clear();
        self.registry.clear();
        self.template.elements.clear();
        self.surface.render();
        self.record_snapshot();
        self.notices.push(EditorNotice::ElementsReloaded);
        self.selection_changed(changed);
    }

    // --- Selection ---

    /// Select an element from the list. Returns whether it is now selected;
    /// unknown or unmaterialized elements leave nothing selected.
    pub fn select_element(&mut self, element_id: &str) -> bool {
        let changed = self
            .selection
            .panel_selected(&self.registry, &mut self.surface, element_id);
        self.selection_changed(changed);
        self.selection.selected() == Some(element_id)
    }

    pub fn clear_selection(&mut self) {
        let changed = self.selection.clear(&mut self.surface);
        self.surface.render();
        self.selection_changed(changed);
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn selected_element(&self) -> Option<&TemplateElement> {
        self.selection
            .selected()
            .and_then(|id| self.template.element(id))
    }

    /// Check that the domain selection and the surface's active object agree.
    pub fn selection_agrees(&self) -> bool {
        self.selection.agrees(&self.registry, &self.surface)
    }

    // --- Property edits ---

    /// Apply a panel edit to an element.
    ///
    /// Image source changes start a load and return true once the request
    /// is issued; the object is replaced when it completes.
    pub fn update_property(&mut self, element_id: &str, property: ElementProperty) -> bool {
        let Some(index) = self.element_index(element_id) else {
            self.diagnose(Diagnostic::StaleReference {
                element_id: element_id.to_string(),
            });
            return false;
        };
        let element = &self.template.elements[index];
        if !element.is_editable {
            self.diagnose(Diagnostic::NotEditable {
                element_id: element_id.to_string(),
            });
            return false;
        }
        if !property.applies_to(element.kind()) {
            self.diagnose(Diagnostic::UnsupportedProperty {
                element_id: element_id.to_string(),
                property: property.name(),
            });
            return false;
        }

        if let ElementProperty::ImageUrl(_) = property {
            let mut next = element.clone();
            next.apply(&property);
            // A template image that has not arrived yet stays a template image.
            let purpose = match self.pending.purpose(element_id) {
                Some(LoadPurpose::Initial) => LoadPurpose::Initial,
                _ => LoadPurpose::Replace,
            };
            return self.start_image_load(next, purpose);
        }

        let placeholder = element.placeholder.clone();
        let projected = Projector::new(&mut self.surface, &mut self.registry).project(
            element_id,
            &property,
            placeholder.as_deref(),
        );
        if !projected {
            self.diagnose(Diagnostic::StaleReference {
                element_id: element_id.to_string(),
            });
            return false;
        }

        self.template.elements[index].apply(&property);
        self.surface.render();
        self.record_snapshot();
        self.notices
            .push(EditorNotice::ElementChanged(element_id.to_string()));
        true
    }

    /// Parse a panel edit given by property name and apply it.
    pub fn update_property_value(
        &mut self,
        element_id: &str,
        name: &str,
        value: &Value,
    ) -> EditorResult<bool> {
        let property = ElementProperty::from_name_value(name, value)?;
        Ok(self.update_property(element_id, property))
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.peek_undo().cloned() else {
            self.diagnose(Diagnostic::HistoryUnderflow);
            return false;
        };
        if !self.restore(&snapshot) {
            return false;
        }
        self.history.undo();
        self.notify_history();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.peek_redo().cloned() else {
            self.diagnose(Diagnostic::HistoryOverflow);
            return false;
        };
        if !self.restore(&snapshot) {
            return false;
        }
        self.history.redo();
        self.notify_history();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Clipboard ---

    /// Copy the active object. Returns false if nothing is active.
    pub fn copy_selection(&mut self) -> bool {
        let Some(handle) = self.surface.active_object() else {
            log::debug!("Nothing active to copy");
            return false;
        };
        let (Some(kind), Some(attributes)) = (
            self.surface.object_kind(handle),
            self.surface.attributes(handle),
        ) else {
            return false;
        };
        self.clipboard.copy(kind, attributes);
        true
    }

    /// Paste the clipboard as a new, selected element. Returns its id, or
    /// `None` if the clipboard is empty.
    pub fn paste_clipboard(&mut self) -> Option<String> {
        let Some(payload) = self.clipboard.paste() else {
            log::debug!("Clipboard is empty");
            return None;
        };
        let id = fresh_element_id(payload.kind);
        let mut attributes = payload.attributes;
        attributes.element_id = Some(id.clone());
        let element = element_from_attributes(payload.kind, &attributes)?;

        let handle = Projector::new(&mut self.surface, &mut self.registry).materialize(&element)?;
        self.template.elements.push(element);
        self.surface.render();
        self.record_snapshot();

        self.surface.set_active_object(Some(handle));
        let changed = self.selection.set_selected(&id);
        self.selection_changed(changed);
        self.notices.push(EditorNotice::ElementChanged(id.clone()));
        Some(id)
    }

    /// Copy and paste the active object in one step.
    pub fn duplicate_selection(&mut self) -> Option<String> {
        if !self.copy_selection() {
            return None;
        }
        self.paste_clipboard()
    }

    // --- Grid snap ---

    pub fn toggle_grid_snap(&mut self, enabled: bool) {
        log::debug!("Grid snap {}", if enabled { "on" } else { "off" });
        self.snap.set_enabled(enabled);
    }

    pub fn grid_snap_enabled(&self) -> bool {
        self.snap.is_enabled()
    }

    // --- Canvas events ---

    /// Drain and handle every pending surface event. Returns how many were
    /// handled.
    pub fn pump_events(&mut self) -> usize {
        let events = self.surface.take_events();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Handle one user-originated surface event.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::ObjectMoving(handle) => self.snap_moving(handle),
            SurfaceEvent::ObjectScaling(handle) => log::trace!("{} scaling", handle),
            SurfaceEvent::ObjectModified(handle) => self.canvas_modified(handle),
            SurfaceEvent::ObjectAdded(handle) => self.canvas_added(handle),
            SurfaceEvent::ObjectRemoved(handle) => self.canvas_removed(handle),
            SurfaceEvent::SelectionCreated(handle) | SurfaceEvent::SelectionUpdated(handle) => {
                let changed = self
                    .selection
                    .canvas_selected(&self.registry, &mut self.surface, handle);
                self.selection_changed(changed);
            }
            SurfaceEvent::SelectionCleared => {
                let changed = self.selection.canvas_cleared();
                self.selection_changed(changed);
            }
            SurfaceEvent::ViewportChanged { zoom, pan } => {
                log::debug!("Viewport zoom {:.2}, pan ({:.1}, {:.1})", zoom, pan.x, pan.y);
            }
        }
    }

    // --- Images ---

    /// Report the outcome of an image load.
    ///
    /// Returns true if the scene changed. Completions whose token has been
    /// superseded or invalidated are dropped without touching anything.
    pub fn finish_image_load(&mut self, completion: ImageCompletion) -> bool {
        let Some(pending) = self.pending.finish(&completion.element_id, completion.token) else {
            log::debug!(
                "Ignoring stale image load {} for '{}'",
                completion.token.raw(),
                completion.element_id
            );
            return false;
        };
        if let Err(reason) = completion.result {
            self.diagnose(Diagnostic::ImageLoadFailure {
                element_id: completion.element_id,
                reason,
            });
            return false;
        }

        let PendingImage {
            purpose, element, ..
        } = pending;
        let element_id = element.id.clone();
        if purpose == LoadPurpose::Initial {
            if !self.merge_template_image(&element) {
                return false;
            }
        } else {
            let mut projector = Projector::new(&mut self.surface, &mut self.registry);
            let handle = match purpose {
                LoadPurpose::Replace => projector.replace_image(&element),
                LoadPurpose::Initial | LoadPurpose::Add => projector.materialize(&element),
            };
            let Some(handle) = handle else {
                return false;
            };
            let live = projector.extract(handle).unwrap_or(element);
            self.upsert_element(live);
            self.surface.render();
            self.record_snapshot();
        }

        if self.selection.selected() == Some(element_id.as_str()) {
            let handle = self.registry.lookup(&element_id);
            self.surface.set_active_object(handle);
        }
        self.notices.push(EditorNotice::ElementChanged(element_id));
        true
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<EditorNotice> {
        std::mem::take(&mut self.notices)
    }

    // --- Internals ---

    fn element_index(&self, element_id: &str) -> Option<usize> {
        self.template.elements.iter().position(|e| e.id == element_id)
    }

    fn upsert_element(&mut self, element: TemplateElement) {
        match self.element_index(&element.id) {
            Some(index) => self.template.elements[index] = element,
            None => self.template.elements.push(element),
        }
    }

    fn start_image_load(&mut self, element: TemplateElement, purpose: LoadPurpose) -> bool {
        let url = element
            .properties
            .as_image()
            .map(|p| p.image_url.clone())
            .unwrap_or_default();
        let source = match ImageSource::parse(&url) {
            Ok(source) => source,
            Err(e) => {
                self.diagnose(Diagnostic::ImageLoadFailure {
                    element_id: element.id.clone(),
                    reason: e.to_string(),
                });
                return false;
            }
        };
        let element_id = element.id.clone();
        let token = self.pending.start(element, purpose);
        self.loader.begin(ImageRequest {
            element_id,
            token,
            url,
            source,
        });
        true
    }

    /// Restore a history entry. Loads started by edits are dropped; the
    /// scene they targeted is gone.
    fn restore(&mut self, snapshot: &SceneSnapshot) -> bool {
        if !self.reload_scene(snapshot) {
            return false;
        }
        self.pending.invalidate_edits();
        true
    }

    /// A template image arrived. It belongs to every state since the load,
    /// so it is written into each history entry rather than recorded as a
    /// step of its own.
    fn merge_template_image(&mut self, element: &TemplateElement) -> bool {
        let Some(current) = self.history.current().cloned() else {
            log::warn!("No scene history to place '{}' into", element.id);
            return false;
        };
        let surface = &mut self.surface;
        let merged = self.history.rewrite(|snapshot| {
            if let Err(e) = surface.deserialize(snapshot) {
                log::warn!("Skipping unreadable history entry: {}", e);
                return None;
            }
            let mut registry = SceneRegistry::new();
            let mut projector = Projector::new(&mut *surface, &mut registry);
            projector.rebuild();
            projector.materialize(element)?;
            match surface.serialize() {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    log::warn!("Failed to snapshot merged entry: {}", e);
                    None
                }
            }
        });
        log::debug!("Placed '{}' into {} history entries", element.id, merged);

        let current = self.history.current().cloned().unwrap_or(current);
        self.reload_scene(&current)
    }

    /// Replace the scene with `snapshot` and rebuild everything that referred
    /// to the old scene. Leaves the scene untouched if it cannot be read.
    fn reload_scene(&mut self, snapshot: &SceneSnapshot) -> bool {
        let previous = self.selection.selected().map(str::to_string);

        if let Err(e) = self.surface.deserialize(snapshot) {
            log::error!("Failed to restore scene: {}", e);
            return false;
        }
        let mut elements = Projector::new(&mut self.surface, &mut self.registry).rebuild();
        // Template images still loading stay in the domain model.
        let waiting: Vec<TemplateElement> = self
            .template
            .elements
            .iter()
            .filter(|e| self.registry.lookup(&e.id).is_none())
            .filter_map(|e| self.pending.template_image(&e.id).cloned())
            .collect();
        elements.extend(waiting);
        self.template.elements = elements;
        self.surface.render();
        self.notices.push(EditorNotice::ElementsReloaded);

        // Keep the selection on the same element if it survived.
        let changed = match previous {
            Some(id) if self.registry.lookup(&id).is_some() => {
                self.selection
                    .panel_selected(&self.registry, &mut self.surface, &id)
            }
            _ => self.selection.clear(&mut self.surface),
        };
        self.selection_changed(changed);
        true
    }

    fn snap_moving(&mut self, handle: SceneObjectHandle) {
        if !self.snap.is_enabled() {
            return;
        }
        let Some(mut attributes) = self.surface.attributes(handle) else {
            return;
        };
        let result = self.snap.snap(attributes.position());
        if !result.moved {
            return;
        }
        attributes.set_position(result.point);
        match self.surface.set_attributes(handle, attributes) {
            Ok(()) => self.surface.render(),
            Err(e) => log::warn!("Failed to snap {}: {}", handle, e),
        }
    }

    fn canvas_modified(&mut self, handle: SceneObjectHandle) {
        if self.surface.object_kind(handle).is_none() {
            log::debug!("{} modified but no longer exists", handle);
            return;
        }
        match self.registry.element_for(handle).map(str::to_string) {
            Some(id) => {
                let projector = Projector::new(&mut self.surface, &mut self.registry);
                if let Some(element) = projector.extract(handle) {
                    self.upsert_element(element);
                    self.notices.push(EditorNotice::ElementChanged(id));
                }
            }
            None => log::debug!("{} modified without an owning element", handle),
        }
        self.record_snapshot();
    }

    fn canvas_added(&mut self, handle: SceneObjectHandle) {
        if self.registry.element_for(handle).is_some() {
            return;
        }
        let (Some(kind), Some(mut attributes)) = (
            self.surface.object_kind(handle),
            self.surface.attributes(handle),
        ) else {
            return;
        };

        let id = match attributes.element_id.take() {
            Some(id) if self.registry.lookup(&id).is_none() && self.element_index(&id).is_none() => {
                id
            }
            _ => fresh_element_id(kind),
        };
        attributes.element_id = Some(id.clone());
        let Some(element) = element_from_attributes(kind, &attributes) else {
            return;
        };
        if let Err(e) = self.surface.set_attributes(handle, attributes) {
            log::warn!("Failed to adopt {}: {}", handle, e);
            return;
        }
        if !self.registry.register(&id, handle) {
            return;
        }
        log::debug!("Adopted {} as '{}'", handle, id);
        self.template.elements.push(element);
        self.record_snapshot();
        self.notices.push(EditorNotice::ElementChanged(id));
    }

    fn canvas_removed(&mut self, handle: SceneObjectHandle) {
        let Some(id) = self.registry.element_for(handle).map(str::to_string) else {
            log::debug!("{} removed without an owning element", handle);
            return;
        };
        self.registry.unregister(&id);
        self.pending.cancel(&id);
        if let Some(index) = self.element_index(&id) {
            self.template.elements.remove(index);
        }
        self.record_snapshot();
        let changed = self.selection.validate(&self.registry, &mut self.surface);
        self.selection_changed(changed);
        self.notices.push(EditorNotice::ElementChanged(id));
    }

    fn record_snapshot(&mut self) {
        match self.surface.serialize() {
            Ok(snapshot) => {
                log::trace!("Recorded {} byte snapshot", snapshot.len());
                self.history.record(snapshot);
            }
            Err(e) => log::error!("Failed to snapshot scene: {}", e),
        }
        self.notify_history();
    }

    fn reset_history(&mut self) {
        match self.surface.serialize() {
            Ok(baseline) => self.history.reset(baseline),
            Err(e) => {
                log::error!("Failed to snapshot scene: {}", e);
                self.history.clear();
            }
        }
        self.notify_history();
    }

    fn notify_history(&mut self) {
        self.notices.push(EditorNotice::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn selection_changed(&mut self, changed: bool) {
        if changed {
            let selected = self.selection.selected().map(str::to_string);
            self.notices.push(EditorNotice::SelectionChanged(selected));
        }
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        if let Some(diagnostic) = self.config.diagnostics.dispatch(diagnostic) {
            self.notices.push(EditorNotice::Diagnostic(diagnostic));
        }
    }
}

fn fresh_element_id(kind: ObjectKind) -> String {
    format!("{}-{}", ElementKind::from_object_kind(kind), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticPolicy;
    use crate::images::QueuedImageLoader;
    use crate::surface::{Attributes, MemorySurface};
    use crate::template::{ImageProperties, ShapeProperties, TextProperties};
    use kurbo::Point;
    use serde_json::json;

    type TestSession = EditorSession<MemorySurface, QueuedImageLoader>;

    const BANNER: &str = r##"{
        "id": "sale-banner",
        "name": "Sale Banner",
        "width": 800,
        "height": 400,
        "elements": [
            { "id": "t1", "type": "text", "x": 40, "y": 40, "properties": { "text": "Hello" } },
            { "id": "s1", "type": "shape", "x": 10, "y": 20, "width": 200, "height": 100,
              "properties": { "backgroundColor": "#ffee00" } },
            { "id": "bg", "type": "shape", "x": 0, "y": 0, "width": 800, "height": 400,
              "isEditable": false }
        ]
    }"##;

    fn session_with(config: EditorConfig) -> TestSession {
        EditorSession::create(MemorySurface::new(), QueuedImageLoader::new(), config)
    }

    fn session() -> TestSession {
        session_with(EditorConfig::default())
    }

    fn banner() -> TestSession {
        let mut session = session();
        session.load_template_json(BANNER).unwrap();
        session.take_notices();
        session
    }

    fn reporting() -> EditorConfig {
        EditorConfig {
            diagnostics: DiagnosticPolicy::Report,
            ..Default::default()
        }
    }

    fn scene(session: &TestSession) -> SceneSnapshot {
        session.surface().serialize().unwrap()
    }

    fn logo(url: &str) -> TemplateElement {
        TemplateElement::image("logo", ImageProperties::new(url))
            .at(500.0, 20.0)
            .sized(200.0, 100.0)
    }

    fn font_size(session: &TestSession, id: &str) -> f64 {
        session
            .live_element(id)
            .unwrap()
            .properties
            .as_text()
            .unwrap()
            .font_size
    }

    /// Every domain element on the canvas has exactly one live object and
    /// the domain model matches what the scene shows.
    fn assert_consistent(session: &TestSession) {
        assert_eq!(session.registry().len(), session.surface().len());
        for element in session.elements() {
            let handle = session.registry().lookup(&element.id).unwrap();
            assert!(session.surface().contains(handle));
            assert_eq!(session.live_element(&element.id).as_ref(), Some(element));
        }
        assert!(session.selection_agrees());
    }

    #[test]
    fn test_scenario_a_font_size_undo() {
        let mut session = session();
        session
            .load_template_json(
                r#"{"id":"tpl","elements":[{"id":"t1","type":"text","properties":{"text":"Hello"}}]}"#,
            )
            .unwrap();
        assert!(!session.can_undo());

        assert!(
            session
                .update_property_value("t1", "fontSize", &json!(48))
                .unwrap()
        );
        assert!((font_size(&session, "t1") - 48.0).abs() < f64::EPSILON);
        assert!(session.can_undo());

        assert!(session.undo());
        assert!((font_size(&session, "t1") - TextProperties::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        let domain = session.element("t1").unwrap().properties.as_text().unwrap();
        assert!((domain.font_size - 24.0).abs() < f64::EPSILON);
        assert!(session.can_redo());
        assert_consistent(&session);
    }

    #[test]
    fn test_scenario_b_late_image_load_after_undo() {
        let mut session = session();
        session.load_template(
            Template::new("tpl", "Promo", 800.0, 400.0)
                .with_element(TemplateElement::text("t1", TextProperties::new("Hello"))),
        );
        assert!(session.update_property("t1", ElementProperty::Text("Sale".to_string())));

        assert!(session.add_element(logo("https://example.com/logo.png")));
        let requests = session.loader_mut().drain();
        assert_eq!(requests.len(), 1);

        assert!(session.undo());
        let restored = scene(&session);

        assert!(!session.finish_image_load(ImageCompletion::loaded(&requests[0])));
        assert_eq!(scene(&session), restored);
        assert!(session.element("logo").is_none());
        assert!(session.registry().lookup("logo").is_none());
        assert!(session.can_redo());
        assert_consistent(&session);
    }

    #[test]
    fn test_added_image_appears_on_completion() {
        let mut session = banner();
        assert!(session.add_element(logo("https://example.com/logo.png")));
        assert!(session.element("logo").is_none());
        assert!(!session.can_undo());

        let request = session.loader_mut().drain().remove(0);
        assert!(session.finish_image_load(ImageCompletion::loaded(&request)));
        assert_eq!(session.element("logo").unwrap().kind(), ElementKind::Image);
        assert!(session.can_undo());
        assert_consistent(&session);

        assert!(session.undo());
        assert!(session.element("logo").is_none());
        assert_consistent(&session);
    }

    #[test]
    fn test_initial_image_amends_baseline() {
        let mut session = session();
        session.load_template(Template::new("tpl", "Logo", 800.0, 400.0).with_element(logo("https://example.com/a.png")));
        let request = session.loader_mut().drain().remove(0);

        assert!(session.finish_image_load(ImageCompletion::loaded(&request)));
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
        assert!(session.registry().lookup("logo").is_some());
    }

    #[test]
    fn test_superseded_image_load_is_discarded() {
        let mut session = session();
        session.load_template(Template::new("tpl", "Logo", 800.0, 400.0).with_element(logo("https://example.com/a.png")));
        let initial = session.loader_mut().drain().remove(0);
        session.finish_image_load(ImageCompletion::loaded(&initial));

        assert!(session.update_property("logo", ElementProperty::ImageUrl("https://example.com/b.png".to_string())));
        assert!(session.update_property("logo", ElementProperty::ImageUrl("https://example.com/c.png".to_string())));
        let requests = session.loader_mut().drain();
        assert_eq!(requests.len(), 2);

        assert!(session.finish_image_load(ImageCompletion::loaded(&requests[1])));
        assert!(!session.finish_image_load(ImageCompletion::loaded(&requests[0])));

        let live = session.live_element("logo").unwrap();
        assert_eq!(live.properties.as_image().unwrap().image_url, "https://example.com/c.png");
        assert!((live.x - 500.0).abs() < f64::EPSILON);
        assert_eq!(session.surface().len(), 1);
        assert_consistent(&session);
    }

    #[test]
    fn test_image_load_failure_leaves_prior_state() {
        let mut session = session_with(reporting());
        session.load_template(Template::new("tpl", "Logo", 800.0, 400.0).with_element(logo("https://example.com/a.png")));
        let initial = session.loader_mut().drain().remove(0);
        session.finish_image_load(ImageCompletion::loaded(&initial));
        let before = scene(&session);
        session.take_notices();

        session.update_property("logo", ElementProperty::ImageUrl("https://example.com/missing.png".to_string()));
        let request = session.loader_mut().drain().remove(0);
        assert!(!session.finish_image_load(ImageCompletion::failed(&request, "404")));

        assert_eq!(scene(&session), before);
        assert_eq!(
            session.element("logo").unwrap().properties.as_image().unwrap().image_url,
            "https://example.com/a.png"
        );
        assert!(session.take_notices().iter().any(|n| matches!(
            n,
            EditorNotice::Diagnostic(Diagnostic::ImageLoadFailure { element_id, .. }) if element_id == "logo"
        )));
    }

    #[test]
    fn test_bad_data_url_fails_immediately() {
        let mut session = banner();
        assert!(!session.add_element(logo("data:image/png;base64,!!!")));
        assert!(session.loader().is_empty());
        assert!(session.element("logo").is_none());
    }

    #[test]
    fn test_embedded_image_is_decoded() {
        let mut session = banner();
        assert!(session.add_element(logo("data:image/png;base64,iVBORw0KGgo=")));
        let request = session.loader_mut().drain().remove(0);
        assert!(request.source.is_embedded());
        assert!(request.url.starts_with("data:image/png"));
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut session = banner();
        let mut states = vec![scene(&session)];

        assert!(session.update_property("t1", ElementProperty::FontSize(48.0)));
        states.push(scene(&session));
        assert!(session.update_property("s1", ElementProperty::X(70.0)));
        states.push(scene(&session));
        assert!(session.add_element(
            TemplateElement::shape("s2", ShapeProperties::default().with_radius(6.0))
                .at(300.0, 300.0)
                .sized(50.0, 50.0)
        ));
        states.push(scene(&session));
        assert!(session.remove_element("t1"));
        states.push(scene(&session));

        let n = states.len() - 1;
        for i in (0..n).rev() {
            assert!(session.undo());
            assert_eq!(scene(&session), states[i]);
            assert_consistent(&session);
        }
        assert!(!session.can_undo());
        assert!(!session.undo());

        for state in states.iter().skip(1) {
            assert!(session.redo());
            assert_eq!(&scene(&session), state);
            assert_consistent(&session);
        }
        assert!(!session.can_redo());
        assert!(!session.redo());
    }

    #[test]
    fn test_new_edit_after_undo_drops_redo_branch() {
        let mut session = banner();
        for size in [30.0, 36.0, 42.0] {
            session.update_property("t1", ElementProperty::FontSize(size));
        }
        session.undo();
        session.undo();
        assert!(session.can_redo());

        session.update_property("t1", ElementProperty::FontColor("#ff0000".to_string()));
        assert!(!session.can_redo());
        assert!(!session.redo());
        assert!((font_size(&session, "t1") - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_registry_rebuilt_after_undo() {
        let mut session = banner();
        session.update_property("s1", ElementProperty::BorderWidth(2.0));
        let old = session.registry().lookup("s1").unwrap();

        assert!(session.undo());
        let fresh = session.registry().lookup("s1").unwrap();
        assert_ne!(old, fresh);
        assert!(!session.surface().contains(old));

        assert!(session.update_property("s1", ElementProperty::BorderWidth(4.0)));
        let shape = session.live_element("s1").unwrap();
        assert!((shape.properties.as_shape().unwrap().border_width - 4.0).abs() < f64::EPSILON);
        assert_consistent(&session);
    }

    #[test]
    fn test_selection_agreement() {
        let mut session = banner();

        assert!(session.select_element("t1"));
        assert_eq!(
            session.surface().active_object(),
            session.registry().lookup("t1")
        );
        assert!(session.selection_agrees());

        let shape = session.registry().lookup("s1").unwrap();
        session.surface_mut().pointer_select(shape);
        session.pump_events();
        assert_eq!(session.selected_element().map(|e| e.id.as_str()), Some("s1"));
        assert!(session.selection_agrees());

        session.surface_mut().click_empty();
        session.pump_events();
        assert!(session.selection().is_idle());
        assert!(session.selection_agrees());

        session.select_element("t1");
        assert!(!session.select_element("missing"));
        assert!(session.selection().is_idle());
        assert_eq!(session.surface().active_object(), None);
    }

    #[test]
    fn test_selection_survives_undo() {
        let mut session = banner();
        session.select_element("t1");
        session.update_property("t1", ElementProperty::FontSize(60.0));

        assert!(session.undo());
        assert_eq!(session.selection().element_id(), Some("t1"));
        assert_eq!(
            session.surface().active_object(),
            session.registry().lookup("t1")
        );
        assert!(session.selection_agrees());
    }

    #[test]
    fn test_grid_snap_during_drag() {
        let mut session = banner();
        session.toggle_grid_snap(true);
        let handle = session.registry().lookup("s1").unwrap();
        let entries = session.history().len();

        session.surface_mut().pointer_move(handle, Point::new(47.0, 63.0));
        session.pump_events();
        let live = session.surface().attributes(handle).unwrap();
        assert_eq!(live.position(), Point::new(40.0, 60.0));
        assert_eq!(session.history().len(), entries);

        session.surface_mut().pointer_release(handle);
        session.pump_events();
        assert!(session.can_undo());
        let element = session.element("s1").unwrap();
        assert!((element.x - 40.0).abs() < f64::EPSILON);
        assert!((element.y - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_without_snap() {
        let mut session = banner();
        assert!(!session.grid_snap_enabled());
        let handle = session.registry().lookup("s1").unwrap();

        session.surface_mut().pointer_move(handle, Point::new(47.0, 63.0));
        session.surface_mut().pointer_resize(handle, 33.0, 33.0);
        session.pump_events();
        let live = session.surface().attributes(handle).unwrap();
        assert_eq!(live.position(), Point::new(47.0, 63.0));
        assert!((live.width - 33.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_copy_paste_offset() {
        let mut session = banner();
        session.select_element("s1");
        assert!(session.copy_selection());

        let first = session.paste_clipboard().unwrap();
        let copy = session.live_element(&first).unwrap();
        assert!((copy.x - 30.0).abs() < f64::EPSILON);
        assert!((copy.y - 40.0).abs() < f64::EPSILON);
        assert_eq!(
            copy.properties.as_shape().unwrap().background_color,
            "#ffee00"
        );
        assert_eq!(session.selection().element_id(), Some(first.as_str()));

        let second = session.paste_clipboard().unwrap();
        assert_ne!(first, second);
        let again = session.live_element(&second).unwrap();
        assert!((again.x - 30.0).abs() < f64::EPSILON);
        assert_eq!(session.elements().len(), 5);
        assert!(session.can_undo());
        assert_consistent(&session);
    }

    #[test]
    fn test_paste_with_empty_clipboard() {
        let mut session = banner();
        let before = session.surface().len();
        assert!(session.paste_clipboard().is_none());
        assert_eq!(session.surface().len(), before);
        assert!(!session.copy_selection());
        assert!(session.duplicate_selection().is_none());
    }

    #[test]
    fn test_duplicate_selection() {
        let mut session = banner();
        session.select_element("t1");
        let id = session.duplicate_selection().unwrap();
        assert!(id.starts_with("text-"));
        let copy = session.live_element(&id).unwrap();
        assert_eq!(copy.properties.as_text().unwrap().text, "Hello");
        assert!((copy.x - 60.0).abs() < f64::EPSILON);
        assert_consistent(&session);
    }

    #[test]
    fn test_locked_element_refuses_edits() {
        let mut session = session_with(reporting());
        session.load_template_json(BANNER).unwrap();
        session.take_notices();
        let before = scene(&session);

        assert!(!session.update_property("bg", ElementProperty::BackgroundColor("#000000".to_string())));
        assert_eq!(scene(&session), before);
        assert!(!session.can_undo());
        assert_eq!(
            session.take_notices(),
            vec![EditorNotice::Diagnostic(Diagnostic::NotEditable {
                element_id: "bg".to_string()
            })]
        );
    }

    #[test]
    fn test_unsupported_and_stale_edits_are_noops() {
        let mut session = banner();
        assert!(!session.update_property("s1", ElementProperty::FontSize(10.0)));
        assert!(!session.update_property("ghost", ElementProperty::X(1.0)));
        assert!(!session.remove_element("ghost"));
        assert!(!session.can_undo());
        assert!(session.update_property_value("t1", "opacity", &json!(1)).is_err());
    }

    #[test]
    fn test_history_bounds_are_noops() {
        let mut session = session_with(reporting());
        assert!(!session.undo());
        assert!(!session.redo());
        let notices = session.take_notices();
        assert!(notices.contains(&EditorNotice::Diagnostic(Diagnostic::HistoryUnderflow)));
        assert!(notices.contains(&EditorNotice::Diagnostic(Diagnostic::HistoryOverflow)));
    }

    #[test]
    fn test_history_limit() {
        let mut session = session_with(EditorConfig {
            history_limit: Some(3),
            ..Default::default()
        });
        session.load_template_json(BANNER).unwrap();
        for size in [25.0, 26.0, 27.0, 28.0, 29.0] {
            session.update_property("t1", ElementProperty::FontSize(size));
        }
        let mut undone = 0;
        while session.undo() {
            undone += 1;
        }
        assert_eq!(undone, 2);
        assert!((font_size(&session, "t1") - 27.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let mut session = session_with(reporting());
        session
            .load_template_json(
                r#"{"elements":[
                    {"id":"t1","type":"text","properties":{"text":"Hi"}},
                    {"id":"qr","type":"qrcode","x":0,"y":0,"width":10,"height":10}
                ]}"#,
            )
            .unwrap();
        assert_eq!(session.elements().len(), 1);
        assert_eq!(session.surface().len(), 1);
        assert!(session.take_notices().contains(&EditorNotice::Diagnostic(
            Diagnostic::UnknownElementType {
                element_id: "qr".to_string(),
                type_name: "qrcode".to_string(),
            }
        )));
    }

    #[test]
    fn test_silent_policy_queues_nothing() {
        let mut session = session_with(EditorConfig {
            diagnostics: DiagnosticPolicy::Silent,
            ..Default::default()
        });
        session.undo();
        assert!(
            !session
                .take_notices()
                .iter()
                .any(|n| matches!(n, EditorNotice::Diagnostic(_)))
        );
    }

    #[test]
    fn test_canvas_edit_syncs_domain() {
        let mut session = banner();
        let handle = session.registry().lookup("t1").unwrap();
        let mut attributes = session.surface().attributes(handle).unwrap();
        attributes.text = Some("Edited".to_string());
        session.surface_mut().set_attributes(handle, attributes).unwrap();
        session.surface_mut().pointer_release(handle);
        session.pump_events();

        assert_eq!(
            session.element("t1").unwrap().properties.as_text().unwrap().text,
            "Edited"
        );
        assert!(session.can_undo());
        assert!(session.take_notices().contains(&EditorNotice::ElementChanged("t1".to_string())));
    }

    #[test]
    fn test_canvas_delete() {
        let mut session = banner();
        let handle = session.registry().lookup("s1").unwrap();
        session.surface_mut().pointer_select(handle);
        session.pump_events();
        assert_eq!(session.selection().element_id(), Some("s1"));

        session.surface_mut().delete_active();
        session.pump_events();
        assert!(session.element("s1").is_none());
        assert!(session.registry().lookup("s1").is_none());
        assert!(session.selection().is_idle());
        assert!(session.can_undo());
        assert_consistent(&session);
    }

    #[test]
    fn test_canvas_drop_is_adopted() {
        let mut session = banner();
        let handle = session.surface_mut().drop_object(
            ObjectKind::Rect,
            Attributes {
                left: 5.0,
                top: 5.0,
                width: 10.0,
                height: 10.0,
                fill: Some("#123456".to_string()),
                editable: true,
                ..Default::default()
            },
        );
        session.pump_events();

        let id = session.registry().element_for(handle).unwrap().to_string();
        assert!(id.starts_with("shape-"));
        let element = session.element(&id).unwrap();
        assert_eq!(element.properties.as_shape().unwrap().background_color, "#123456");
        assert!(session.can_undo());
        assert_consistent(&session);
    }

    #[test]
    fn test_delete_selection_and_clear() {
        let mut session = banner();
        session.select_element("t1");
        assert!(session.delete_selection());
        assert!(session.element("t1").is_none());
        assert!(session.selection().is_idle());
        assert!(!session.delete_selection());

        session.clear_canvas();
        assert!(session.elements().is_empty());
        assert!(session.surface().is_empty());
        assert!(session.registry().is_empty());

        assert!(session.undo());
        assert_eq!(session.elements().len(), 2);
        assert_consistent(&session);
    }

    #[test]
    fn test_text_matching_placeholder_survives_undo() {
        let mut session = session();
        session.load_template(
            Template::new("tpl", "Card", 400.0, 200.0).with_element(
                TemplateElement::text("name", TextProperties::new("Your name"))
                    .with_placeholder("Your name"),
            ),
        );
        let text = |session: &TestSession| {
            session.element("name").unwrap().properties.as_text().unwrap().text.clone()
        };

        assert!(session.update_property("name", ElementProperty::FontSize(40.0)));
        assert!(session.undo());
        assert_eq!(text(&session), "Your name");
        assert!(session.redo());
        assert_eq!(text(&session), "Your name");
        assert_consistent(&session);

        let exported = session.export_template();
        assert_eq!(
            exported.elements[0].properties.as_text().unwrap().text,
            "Your name"
        );
    }

    #[test]
    fn test_template_image_survives_undo_before_loading() {
        let mut session = session();
        session.load_template(
            Template::new("tpl", "Promo", 800.0, 400.0)
                .with_element(TemplateElement::text("t1", TextProperties::new("Hello")))
                .with_element(logo("https://example.com/logo.png")),
        );
        let request = session.loader_mut().drain().remove(0);

        assert!(session.update_property("t1", ElementProperty::FontSize(48.0)));
        assert!(session.undo());
        assert!(session.element("logo").is_some());
        assert!(session.registry().lookup("logo").is_none());

        assert!(session.finish_image_load(ImageCompletion::loaded(&request)));
        assert!(session.registry().lookup("logo").is_some());
        assert_eq!(session.export_template().elements.len(), 2);
        assert_eq!(session.history().len(), 2);
        assert!(session.can_redo());
        assert_consistent(&session);

        assert!(session.redo());
        assert!((font_size(&session, "t1") - 48.0).abs() < f64::EPSILON);
        assert!(session.registry().lookup("logo").is_some());
        assert_consistent(&session);

        assert!(session.undo());
        assert!(session.registry().lookup("logo").is_some());
        assert_consistent(&session);
    }

    #[test]
    fn test_template_image_source_change_while_loading() {
        let mut session = session();
        session.load_template(
            Template::new("tpl", "Promo", 800.0, 400.0)
                .with_element(TemplateElement::text("t1", TextProperties::new("Hello")))
                .with_element(logo("https://example.com/a.png")),
        );
        session.loader_mut().drain();
        assert!(session.update_property(
            "logo",
            ElementProperty::ImageUrl("https://example.com/b.png".to_string())
        ));
        let request = session.loader_mut().drain().remove(0);

        assert!(session.update_property("t1", ElementProperty::FontSize(48.0)));
        assert!(session.undo());
        assert!(session.finish_image_load(ImageCompletion::loaded(&request)));

        let live = session.live_element("logo").unwrap();
        assert_eq!(live.properties.as_image().unwrap().image_url, "https://example.com/b.png");
        assert_consistent(&session);
    }

    #[test]
    fn test_unreadable_history_entry_keeps_cursor() {
        let mut session = banner();
        assert!(session.update_property("t1", ElementProperty::FontSize(60.0)));
        let before = scene(&session);

        let mut first = true;
        session.history.rewrite(|_| {
            let corrupt = first;
            first = false;
            corrupt.then(|| SceneSnapshot::new("not a scene".to_string()))
        });

        assert!(!session.undo());
        assert_eq!(session.history().index(), 1);
        assert!(session.can_undo());
        assert_eq!(scene(&session), before);
        assert!((font_size(&session, "t1") - 60.0).abs() < f64::EPSILON);
        assert_consistent(&session);
    }

    #[test]
    fn test_placeholder_display() {
        let mut session = session();
        session.load_template(
            Template::new("tpl", "Card", 400.0, 200.0)
                .with_element(TemplateElement::text("name", TextProperties::default()).with_placeholder("Your name")),
        );
        let shown = |session: &TestSession| {
            let handle = session.registry().lookup("name").unwrap();
            session.surface().attributes(handle).unwrap().text.unwrap_or_default()
        };
        assert_eq!(shown(&session), "Your name");

        session.update_property("name", ElementProperty::Text("Bob".to_string()));
        assert_eq!(shown(&session), "Bob");

        session.update_property("name", ElementProperty::Text(String::new()));
        assert_eq!(shown(&session), "Your name");
        assert_eq!(session.element("name").unwrap().properties.as_text().unwrap().text, "");
        assert_consistent(&session);
    }

    #[test]
    fn test_notices() {
        let mut session = banner();
        session.select_element("t1");
        assert_eq!(
            session.take_notices(),
            vec![EditorNotice::SelectionChanged(Some("t1".to_string()))]
        );

        session.update_property("t1", ElementProperty::FontWeight("bold".to_string()));
        assert_eq!(
            session.take_notices(),
            vec![
                EditorNotice::HistoryChanged {
                    can_undo: true,
                    can_redo: false
                },
                EditorNotice::ElementChanged("t1".to_string()),
            ]
        );
    }

    #[test]
    fn test_export_reflects_edits() {
        let mut session = banner();
        session.update_property("t1", ElementProperty::FontSize(48.0));
        session.update_property("s1", ElementProperty::Y(90.0));

        let exported = session.export_template();
        assert_eq!(exported.id, "sale-banner");
        let json: Value = serde_json::from_str(&exported.to_json().unwrap()).unwrap();
        assert_eq!(json["elements"][0]["properties"]["fontSize"], 48.0);
        assert_eq!(json["elements"][1]["y"], 90.0);
    }

    #[test]
    fn test_load_replaces_scene_and_dispose() {
        let mut session = banner();
        session.select_element("t1");
        session.update_property("t1", ElementProperty::FontSize(50.0));
        session.load_template_json(r#"{"id":"blank"}"#).unwrap();

        assert!(session.elements().is_empty());
        assert!(session.selection().is_idle());
        assert!(!session.can_undo());

        let surface = session.dispose();
        assert!(surface.is_empty());
    }
}
