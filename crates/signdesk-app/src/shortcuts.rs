//! Keyboard shortcut registry and documentation.

use signdesk_core::{EditorSession, ImageLoader, RenderSurface};

/// Editor command a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    DeleteSelection,
    Deselect,
    ToggleGrid,
}

impl EditorAction {
    /// Run the action. Returns false if it had nothing to act on.
    pub fn apply<S: RenderSurface, L: ImageLoader>(self, session: &mut EditorSession<S, L>) -> bool {
        match self {
            EditorAction::Undo => session.undo(),
            EditorAction::Redo => session.redo(),
            EditorAction::Copy => session.copy_selection(),
            EditorAction::Paste => session.paste_clipboard().is_some(),
            EditorAction::Duplicate => session.duplicate_selection().is_some(),
            EditorAction::DeleteSelection => session.delete_selection(),
            EditorAction::Deselect => {
                session.clear_selection();
                true
            }
            EditorAction::ToggleGrid => {
                let enabled = !session.grid_snap_enabled();
                session.toggle_grid_snap(enabled);
                true
            }
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: EditorAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: EditorAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, EditorAction::Undo, "Undo"),
            Shortcut::new("Z", true, true, EditorAction::Redo, "Redo"),
            Shortcut::new("Y", true, false, EditorAction::Redo, "Redo"),
            Shortcut::new("C", true, false, EditorAction::Copy, "Copy selected element"),
            Shortcut::new("V", true, false, EditorAction::Paste, "Paste element"),
            Shortcut::new("D", true, false, EditorAction::Duplicate, "Duplicate selected element"),
            Shortcut::new("G", true, false, EditorAction::ToggleGrid, "Toggle grid snap"),
            Shortcut::new("Delete", false, false, EditorAction::DeleteSelection, "Delete selected element"),
            Shortcut::new("Backspace", false, false, EditorAction::DeleteSelection, "Delete selected element"),
            Shortcut::new("Escape", false, false, EditorAction::Deselect, "Clear selection"),
        ]
    }

    /// Look up a combination such as `"Ctrl+Shift+Z"`. `Cmd` counts as `Ctrl`.
    pub fn find(combo: &str) -> Option<Shortcut> {
        let parts: Vec<&str> = combo.split('+').map(str::trim).collect();
        let (key, modifiers) = parts.split_last()?;
        let mut ctrl = false;
        let mut shift = false;
        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "cmd" | "meta" => ctrl = true,
                "shift" => shift = true,
                _ => return None,
            }
        }
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl, shift))
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
