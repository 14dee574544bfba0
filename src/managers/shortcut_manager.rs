//! In-panel keyboard shortcut handling for VisualStash.
//!
//! Maps key chords to panel actions. Shortcuts are consumed only while the
//! panel has focus, and suppressed entirely while an input, textarea, or
//! select element has focus, except for the escape key.

use std::collections::HashMap;

/// Actions the panel shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelAction {
    /// Save the current tab into the active category.
    SaveToActive,
    /// Save into the last-used category, falling back to the active one.
    SaveToLast,
    /// Clear the search query.
    ClearSearch,
    /// Move focus to the search field.
    FocusSearch,
    /// Enter or leave bulk-selection mode.
    ToggleBulkSelection,
    PreviousCategory,
    NextCategory,
    ToggleHelp,
    /// Escape: close whatever modal or mode is open.
    Dismiss,
}

/// A key press as reported by the panel surface. `command` is the primary
/// modifier (Ctrl, or Cmd on macOS).
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub key: String,
    pub command: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            command: false,
            alt: false,
            shift: false,
        }
    }

    pub fn with_command(key: &str) -> Self {
        Self {
            command: true,
            ..Self::plain(key)
        }
    }

    pub fn with_alt(key: &str) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }
}

/// Resolves key events against the panel's chord bindings.
pub struct ShortcutManager {
    bindings: HashMap<String, PanelAction>,
}

impl ShortcutManager {
    pub fn new() -> Self {
        let defaults = [
            ("Alt+S", PanelAction::SaveToActive),
            ("Mod+M", PanelAction::SaveToLast),
            ("Mod+Shift+S", PanelAction::SaveToLast),
            ("Mod+I", PanelAction::ClearSearch),
            ("Mod+K", PanelAction::FocusSearch),
            ("Mod+B", PanelAction::ToggleBulkSelection),
            ("[", PanelAction::PreviousCategory),
            ("]", PanelAction::NextCategory),
            ("Shift+?", PanelAction::ToggleHelp),
            ("Escape", PanelAction::Dismiss),
        ];
        Self {
            bindings: defaults
                .into_iter()
                .map(|(chord, action)| (chord.to_string(), action))
                .collect(),
        }
    }

    /// Normalizes a key event into a chord string such as `"Mod+Shift+S"`.
    fn chord_of(event: &KeyEvent) -> String {
        let mut chord = String::new();
        if event.command {
            chord.push_str("Mod+");
        }
        if event.alt {
            chord.push_str("Alt+");
        }
        if event.shift {
            chord.push_str("Shift+");
        }
        if event.key.chars().count() == 1 {
            chord.extend(event.key.to_uppercase().chars());
        } else {
            chord.push_str(&event.key);
        }
        chord
    }

    /// Resolves a key event to an action, honoring the input-focus
    /// suppression rule: while a form element has focus only Escape is
    /// let through.
    pub fn resolve(&self, event: &KeyEvent, input_focused: bool) -> Option<PanelAction> {
        if input_focused && event.key != "Escape" {
            return None;
        }
        self.bindings.get(&Self::chord_of(event)).copied()
    }

    /// All chords bound to an action, for the help overlay.
    pub fn chords_for(&self, action: PanelAction) -> Vec<&str> {
        let mut chords: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(chord, _)| chord.as_str())
            .collect();
        chords.sort_unstable();
        chords
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}
