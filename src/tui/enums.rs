//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    ItemList,
    EditItem,
    /// Picker overlay on top of the edit screen.
    Picker,
    Help,
    Confirm,
}
