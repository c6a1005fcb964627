//! Single-slot clipboard for scene objects.

use crate::surface::{Attributes, ObjectKind};
use kurbo::Vec2;

/// Default offset applied to pasted copies.
pub const PASTE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// A cloned scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardPayload {
    pub kind: ObjectKind,
    pub attributes: Attributes,
}

/// Holds at most one copied object.
///
/// Pasting never updates the stored clone, so every paste of the same copy
/// lands at the same offset from the original.
#[derive(Debug, Clone)]
pub struct Clipboard {
    slot: Option<ClipboardPayload>,
    offset: Vec2,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new(PASTE_OFFSET)
    }
}

impl Clipboard {
    pub fn new(offset: Vec2) -> Self {
        Self { slot: None, offset }
    }

    /// Store a clone of an object, replacing whatever was there.
    pub fn copy(&mut self, kind: ObjectKind, attributes: Attributes) {
        self.slot = Some(ClipboardPayload { kind, attributes });
    }

    /// Produce the object to paste: the stored clone moved by the paste
    /// offset and detached from its element. `None` when empty.
    pub fn paste(&self) -> Option<ClipboardPayload> {
        let mut payload = self.slot.clone()?;
        payload.attributes.translate(self.offset);
        payload.attributes.element_id = None;
        Some(payload)
    }

    /// The stored clone, unmodified.
    pub fn peek(&self) -> Option<&ClipboardPayload> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}
