//! Terminal UI for kubebind
//!
//! A filterable list picker standing in for an editor's quick-pick, plus the
//! widgets and keybindings it is built from.

mod action;
mod keybindings;
mod layout;
mod list_selector;
mod picker;
mod status_bar;
mod terminal;
mod theme;

pub use action::PickerAction;
pub use keybindings::{KeyBinding, KeyBindings};
pub use layout::Layout;
pub use list_selector::ListSelector;
pub use picker::{PickerOutcome, PickerState, TuiPicker};
pub use status_bar::{StatusBar, picker_hints};
pub use terminal::Tui;
pub use theme::Theme;
