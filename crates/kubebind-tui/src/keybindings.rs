use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::PickerAction;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Picker keybindings
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, PickerAction>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(KeyBinding::new(KeyCode::Up), PickerAction::Up);
        bindings.insert(KeyBinding::new(KeyCode::Down), PickerAction::Down);
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('p')), PickerAction::Up);
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('n')), PickerAction::Down);

        bindings.insert(KeyBinding::new(KeyCode::Enter), PickerAction::Select);
        bindings.insert(KeyBinding::new(KeyCode::Esc), PickerAction::Cancel);
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), PickerAction::Cancel);

        bindings.insert(KeyBinding::new(KeyCode::Backspace), PickerAction::Backspace);
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('u')), PickerAction::ClearFilter);

        Self { bindings }
    }

    /// Action for a key press; plain characters go to the filter
    pub fn get_action(&self, key: &KeyEvent) -> Option<PickerAction> {
        let binding = KeyBinding::from_event(key);
        if let Some(action) = self.bindings.get(&binding) {
            return Some(action.clone());
        }

        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(PickerAction::Input(c));
            }
        }

        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
