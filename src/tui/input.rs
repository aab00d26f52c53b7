//! Input field handling for the terminal user interface.

/// A text input field with cursor position management.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
        }
    }

    /// Create an input field with initial text value.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let prev = prev_boundary(&self.value, self.cursor);
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = prev_boundary(&self.value, self.cursor);
        }
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.len() {
            let mut next = self.cursor + 1;
            while next < self.value.len() && !self.value.is_char_boundary(next) {
                next += 1;
            }
            self.cursor = next;
        }
    }
}

fn prev_boundary(s: &str, from: usize) -> usize {
    let mut prev = from - 1;
    while prev > 0 && !s.is_char_boundary(prev) {
        prev -= 1;
    }
    prev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace() {
        let mut f = InputField::new();
        for c in "milk".chars() {
            f.handle_char(c);
        }
        assert_eq!(f.value, "milk");
        f.handle_backspace();
        assert_eq!(f.value, "mil");
        assert_eq!(f.cursor, 3);
    }

    #[test]
    fn cursor_insertion_mid_string() {
        let mut f = InputField::with_value("mik");
        f.move_cursor_left();
        f.handle_char('l');
        assert_eq!(f.value, "milk");
    }

    #[test]
    fn multibyte_safe() {
        let mut f = InputField::new();
        f.handle_char('é');
        f.handle_char('x');
        f.handle_backspace();
        f.handle_backspace();
        assert_eq!(f.value, "");
        assert_eq!(f.cursor, 0);
    }
}
