//! Generic picker field and the option-list overlay it delegates to.

/// A selection field holding one optional value from a candidate list.
///
/// Presented without a title row: a centered label shows the current value
/// (blank when unset) next to a disclosure marker. Activation hands the
/// option list to a [`PickerOverlay`]; the field itself never renders the
/// choices. Configured per use site rather than subclassed.
#[derive(Debug, Clone)]
pub struct PickerField<T> {
    pub value: Option<T>,
    pub options: Vec<T>,
}

impl<T: Clone + PartialEq + ToString> PickerField<T> {
    pub fn new(value: Option<T>, options: Vec<T>) -> Self {
        PickerField { value, options }
    }

    /// Label text for the centered value display.
    pub fn display_text(&self) -> String {
        self.value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn option_labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.to_string()).collect()
    }
}

/// Modal option list: presents choices for one field and reports the pick.
pub struct PickerOverlay {
    pub title: String,
    pub options: Vec<String>,
    pub selected: usize,
    /// Tag of the field the chosen option is delivered to.
    pub field_tag: &'static str,
}

impl PickerOverlay {
    /// Start with the cursor on the current value when it is in the list.
    pub fn new(
        title: &str,
        options: Vec<String>,
        current: Option<&str>,
        field_tag: &'static str,
    ) -> Self {
        let selected = current
            .and_then(|c| options.iter().position(|o| o == c))
            .unwrap_or(0);
        PickerOverlay {
            title: title.to_string(),
            options,
            selected,
            field_tag,
        }
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.options.is_empty() {
            self.selected = if self.selected == 0 {
                self.options.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// The option under the cursor, `None` for an empty list.
    pub fn chosen(&self) -> Option<String> {
        self.options.get(self.selected).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_blank_when_unset() {
        let field: PickerField<String> = PickerField::new(None, vec!["home".into()]);
        assert_eq!(field.display_text(), "");
        let field = PickerField::new(Some("work".to_string()), vec!["work".into()]);
        assert_eq!(field.display_text(), "work");
    }

    #[test]
    fn overlay_starts_on_current_value() {
        let overlay = PickerOverlay::new(
            "Category",
            vec!["home".into(), "work".into(), "errands".into()],
            Some("work"),
            "category",
        );
        assert_eq!(overlay.selected, 1);
        assert_eq!(overlay.chosen(), Some("work".to_string()));
    }

    #[test]
    fn overlay_navigation_wraps() {
        let mut overlay =
            PickerOverlay::new("Repeats", vec!["never".into(), "daily".into()], None, "repeat");
        overlay.prev();
        assert_eq!(overlay.chosen(), Some("daily".to_string()));
        overlay.next();
        assert_eq!(overlay.chosen(), Some("never".to_string()));
    }

    #[test]
    fn empty_overlay_is_harmless() {
        let mut overlay = PickerOverlay::new("Category", vec![], None, "category");
        overlay.next();
        overlay.prev();
        assert_eq!(overlay.chosen(), None);
    }
}
