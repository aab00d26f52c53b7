//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Focused field borders and the status bar.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Destructive confirmation dialogs and invalid fields.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
