//! Linear undo/redo over whole-scene snapshots.
//!
//! Every entry is a complete serialized scene, so recording costs
//! O(scene size) per edit and restoring replaces the scene wholesale.

use crate::surface::SceneSnapshot;

/// Ordered snapshots plus a cursor.
///
/// When non-empty, `0 <= index < entries.len()` and `entries[index]` is the
/// state currently shown. Entries after the cursor are the redo branch and
/// are discarded as soon as a new snapshot is recorded.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<SceneSnapshot>,
    index: usize,
    /// Maximum number of entries kept (None = unbounded).
    limit: Option<usize>,
}

impl History {
    /// Create an empty history.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Record the current scene, dropping any redo branch.
    pub fn record(&mut self, snapshot: SceneSnapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(snapshot);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                log::debug!("History limit reached, dropped {} oldest entries", excess);
            }
        }
        self.index = self.entries.len() - 1;
    }

    /// Drop everything and start over from `baseline`.
    pub fn reset(&mut self, baseline: SceneSnapshot) {
        self.entries.clear();
        self.entries.push(baseline);
        self.index = 0;
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    /// Step back. Returns the snapshot to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<&SceneSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the tip.
    pub fn redo(&mut self) -> Option<&SceneSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Snapshot `undo` would restore, without moving the cursor.
    pub fn peek_undo(&self) -> Option<&SceneSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.index - 1)
    }

    /// Snapshot `redo` would restore, without moving the cursor.
    pub fn peek_redo(&self) -> Option<&SceneSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.index + 1)
    }

    /// Rewrite entries in place. `f` returns a replacement, or `None` to keep
    /// the entry as it is. Returns how many entries were replaced.
    pub fn rewrite(&mut self, mut f: impl FnMut(&SceneSnapshot) -> Option<SceneSnapshot>) -> usize {
        let mut replaced = 0;
        for entry in &mut self.entries {
            if let Some(snapshot) = f(entry) {
                *entry = snapshot;
                replaced += 1;
            }
        }
        replaced
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&SceneSnapshot> {
        self.entries.get(self.index)
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
