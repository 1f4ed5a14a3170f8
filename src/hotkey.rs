//! Keyboard shortcuts for the scan screen

use anyhow::{anyhow, Result};
use egui::{Key, KeyboardShortcut, Modifiers};
use tracing::warn;

use crate::config::ShortcutSettings;

/// Parses a shortcut string like "Space", "Ctrl+S", "Alt+F1" into a KeyboardShortcut
pub fn parse_shortcut(shortcut_str: &str) -> Result<KeyboardShortcut> {
    let mut modifiers = Modifiers::NONE;
    let mut key: Option<Key> = None;

    for part in shortcut_str.split('+').map(|s| s.trim()) {
        match part.to_uppercase().as_str() {
            "CTRL" | "CONTROL" => modifiers = modifiers | Modifiers::CTRL,
            "SHIFT" => modifiers = modifiers | Modifiers::SHIFT,
            "ALT" => modifiers = modifiers | Modifiers::ALT,
            "CMD" | "COMMAND" => modifiers = modifiers | Modifiers::COMMAND,
            "" => return Err(anyhow!("Empty key in shortcut {:?}", shortcut_str)),
            upper => {
                if key.is_some() {
                    return Err(anyhow!("More than one key in shortcut {:?}", shortcut_str));
                }
                key = Some(parse_key(upper)?);
            }
        }
    }

    let key = key.ok_or_else(|| anyhow!("No key found in shortcut {:?}", shortcut_str))?;
    Ok(KeyboardShortcut::new(modifiers, key))
}

/// Parse an upper-cased key name
fn parse_key(key: &str) -> Result<Key> {
    let name = match key {
        "ESC" | "ESCAPE" => "Escape",
        "RETURN" | "ENTER" => "Enter",
        "SPACE" => "Space",
        "TAB" => "Tab",
        "BACKSPACE" => "Backspace",
        "DEL" | "DELETE" => "Delete",
        "UP" => "ArrowUp",
        "DOWN" => "ArrowDown",
        "LEFT" => "ArrowLeft",
        "RIGHT" => "ArrowRight",
        other => other,
    };
    Key::from_name(name).ok_or_else(|| anyhow!("Unknown key: {}", key))
}

/// Actions bound to shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Capture,
    ContinueLive,
    ToggleDetail,
    Save,
}

/// Parsed shortcut bindings
#[derive(Debug, Clone, Default)]
pub struct ScanShortcuts {
    bindings: Vec<(KeyboardShortcut, ShortcutAction)>,
}

impl ScanShortcuts {
    /// Build bindings from settings. Unparseable entries are skipped.
    pub fn from_settings(settings: &ShortcutSettings) -> Self {
        let entries = [
            (&settings.capture, ShortcutAction::Capture),
            (&settings.continue_live, ShortcutAction::ContinueLive),
            (&settings.toggle_detail, ShortcutAction::ToggleDetail),
            (&settings.save, ShortcutAction::Save),
        ];

        let bindings = entries
            .into_iter()
            .filter_map(|(text, action)| match parse_shortcut(text) {
                Ok(shortcut) => Some((shortcut, action)),
                Err(e) => {
                    warn!("Ignoring shortcut for {:?}: {}", action, e);
                    None
                }
            })
            .collect();

        Self { bindings }
    }

    /// Consume the first pressed binding this frame
    pub fn poll(&self, ctx: &egui::Context) -> Option<ShortcutAction> {
        // Typing into a text field should not trigger scan actions
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input_mut(|input| {
            self.bindings
                .iter()
                .find(|(shortcut, _)| input.consume_shortcut(shortcut))
                .map(|(_, action)| *action)
        })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let shortcut = parse_shortcut("F9").unwrap();
        assert_eq!(shortcut.logical_key, Key::F9);
        assert_eq!(shortcut.modifiers, Modifiers::NONE);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let shortcut = parse_shortcut("Ctrl+Shift+S").unwrap();
        assert_eq!(shortcut.logical_key, Key::S);
        assert!(shortcut.modifiers.ctrl);
        assert!(shortcut.modifiers.shift);
        assert!(!shortcut.modifiers.alt);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_shortcut("esc").unwrap().logical_key, Key::Escape);
        assert_eq!(parse_shortcut("Space").unwrap().logical_key, Key::Space);
        assert_eq!(parse_shortcut("Return").unwrap().logical_key, Key::Enter);
        assert_eq!(parse_shortcut("d").unwrap().logical_key, Key::D);
    }

    #[test]
    fn test_parse_invalid_key() {
        assert!(parse_shortcut("InvalidKey").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_shortcut("").is_err());
        assert!(parse_shortcut("Ctrl+").is_err());
    }

    #[test]
    fn test_parse_two_keys() {
        assert!(parse_shortcut("A+B").is_err());
    }

    #[test]
    fn test_default_settings_bind_every_action() {
        let shortcuts = ScanShortcuts::from_settings(&ShortcutSettings::default());
        assert_eq!(shortcuts.len(), 4);
    }

    #[test]
    fn test_bad_binding_is_skipped() {
        let settings = ShortcutSettings {
            capture: "Hyper+Q".to_string(),
            ..Default::default()
        };
        assert_eq!(ScanShortcuts::from_settings(&settings).len(), 3);
    }
}
