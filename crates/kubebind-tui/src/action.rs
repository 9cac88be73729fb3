/// Everything a key press can do inside the picker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerAction {
    // Navigation
    Up,
    Down,

    // Outcome
    Select,
    Cancel,

    // Filter input
    Input(char),
    Backspace,
    ClearFilter,
}
