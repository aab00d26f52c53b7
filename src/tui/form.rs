//! Declarative form engine for the edit screen.
//!
//! A form is built once, as an ordered list of sections holding field
//! descriptors. Each field owns its widget state, an optional required rule,
//! and a change handler that writes the new value back to the view-model.
//! Sections can be hidden; navigation and validation only ever see the
//! visible ones. Lookup by tag returns `Option` so a missing tag degrades to
//! a no-op instead of a crash.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::store::parse_due_input;
use crate::tui::input::InputField;
use crate::tui::picker::PickerField;
use crate::vm::EditViewModel;

pub const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Callback invoked with the field's current value after every change.
pub type ChangeHandler = Box<dyn Fn(&mut EditViewModel, FieldValue)>;

/// Typed snapshot of a field's current value, as handed to change handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// `None` while the input does not parse to a date-time at or after the
    /// field's minimum bound.
    DateTime(Option<NaiveDateTime>),
    Choice(Option<String>),
    Path(Option<PathBuf>),
}

/// Widget state for one field.
pub enum FieldWidget {
    Text(InputField),
    DateTime {
        input: InputField,
        /// Lower bound, fixed when the form is built.
        min: NaiveDateTime,
    },
    /// Single choice presented through the picker overlay.
    Select {
        options: Vec<String>,
        selected: usize,
    },
    /// Single choice cycled inline with left/right.
    Segmented {
        options: Vec<String>,
        selected: usize,
    },
    ImagePath(InputField),
    Picker(PickerField<String>),
}

/// One editable unit in the form.
pub struct Field {
    pub tag: &'static str,
    pub title: &'static str,
    pub widget: FieldWidget,
    pub required: bool,
    /// Result of the most recent validation, used for error styling.
    pub valid: bool,
    on_change: Option<ChangeHandler>,
}

impl Field {
    pub fn new(tag: &'static str, title: &'static str, widget: FieldWidget) -> Self {
        Field {
            tag,
            title,
            widget,
            required: false,
            valid: true,
            on_change: None,
        }
    }

    pub fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_on_change(mut self, handler: ChangeHandler) -> Self {
        self.on_change = Some(handler);
        self
    }

    /// Current value as seen by change handlers and the renderer.
    pub fn value(&self) -> FieldValue {
        match &self.widget {
            FieldWidget::Text(input) => FieldValue::Text(input.value.clone()),
            FieldWidget::DateTime { input, min } => {
                let parsed = parse_due_input(&input.value).filter(|dt| dt >= min);
                FieldValue::DateTime(parsed)
            }
            FieldWidget::Select { options, selected }
            | FieldWidget::Segmented { options, selected } => {
                FieldValue::Choice(options.get(*selected).cloned())
            }
            FieldWidget::ImagePath(input) => {
                let trimmed = input.value.trim();
                if trimmed.is_empty() {
                    FieldValue::Path(None)
                } else {
                    FieldValue::Path(Some(PathBuf::from(trimmed)))
                }
            }
            FieldWidget::Picker(picker) => FieldValue::Choice(picker.value.clone()),
        }
    }

    /// Validate the field, returning an error message when it fails.
    pub fn validate(&self) -> Option<String> {
        match &self.widget {
            FieldWidget::Text(input) | FieldWidget::ImagePath(input) => {
                if self.required && input.value.trim().is_empty() {
                    Some(format!("{} is required", self.title))
                } else {
                    None
                }
            }
            FieldWidget::DateTime { input, min } => match parse_due_input(&input.value) {
                None => Some(format!("{}: use {}", self.title, "YYYY-MM-DD HH:MM")),
                Some(dt) if dt < *min => Some(format!(
                    "{}: must not be before {}",
                    self.title,
                    min.format(DUE_FORMAT)
                )),
                Some(_) => None,
            },
            _ => None,
        }
    }

    /// Re-validate and notify the change handler with the current value.
    pub fn fire_change(&mut self, vm: &mut EditViewModel) {
        self.valid = self.validate().is_none();
        if let Some(handler) = &self.on_change {
            handler(vm, self.value());
        }
    }

    fn text_input_mut(&mut self) -> Option<&mut InputField> {
        match &mut self.widget {
            FieldWidget::Text(input)
            | FieldWidget::DateTime { input, .. }
            | FieldWidget::ImagePath(input) => Some(input),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char, vm: &mut EditViewModel) {
        if let Some(input) = self.text_input_mut() {
            input.handle_char(c);
            self.fire_change(vm);
        }
    }

    pub fn handle_backspace(&mut self, vm: &mut EditViewModel) {
        if let Some(input) = self.text_input_mut() {
            input.handle_backspace();
            self.fire_change(vm);
        }
    }

    pub fn handle_delete(&mut self, vm: &mut EditViewModel) {
        if let Some(input) = self.text_input_mut() {
            input.handle_delete();
            self.fire_change(vm);
        }
    }

    /// Left/right arrows: cursor movement on text fields, option cycling on
    /// segmented selectors.
    pub fn handle_left_right(&mut self, right: bool, vm: &mut EditViewModel) {
        match &mut self.widget {
            FieldWidget::Segmented { options, selected } => {
                if options.is_empty() {
                    return;
                }
                *selected = if right {
                    (*selected + 1) % options.len()
                } else if *selected == 0 {
                    options.len() - 1
                } else {
                    *selected - 1
                };
                self.fire_change(vm);
            }
            _ => {
                if let Some(input) = self.text_input_mut() {
                    if right {
                        input.move_cursor_right();
                    } else {
                        input.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Apply a choice made in the picker overlay.
    pub fn set_choice(&mut self, choice: String, vm: &mut EditViewModel) {
        match &mut self.widget {
            FieldWidget::Select { options, selected } => {
                if let Some(idx) = options.iter().position(|o| *o == choice) {
                    *selected = idx;
                } else {
                    return;
                }
            }
            FieldWidget::Picker(picker) => picker.value = Some(choice),
            _ => return,
        }
        self.fire_change(vm);
    }
}

/// Ordered group of fields, independently hideable.
pub struct Section {
    pub tag: &'static str,
    pub title: Option<&'static str>,
    pub hidden: bool,
    pub fields: Vec<Field>,
}

impl Section {
    pub fn new(tag: &'static str, fields: Vec<Field>) -> Self {
        Section {
            tag,
            title: None,
            hidden: false,
            fields,
        }
    }

    pub fn with_title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// The built form: ordered sections, a focus cursor over the visible fields,
/// and an optional one-shot reveal footer.
pub struct Form {
    pub sections: Vec<Section>,
    footer: Option<&'static str>,
    focus: usize,
}

impl Form {
    pub fn new(sections: Vec<Section>, footer: Option<&'static str>) -> Self {
        Form {
            sections,
            footer,
            focus: 0,
        }
    }

    pub fn section_by_tag(&self, tag: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.tag == tag)
    }

    pub fn section_by_tag_mut(&mut self, tag: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.tag == tag)
    }

    pub fn field_by_tag(&self, tag: &str) -> Option<&Field> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.tag == tag)
    }

    pub fn field_by_tag_mut(&mut self, tag: &str) -> Option<&mut Field> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.fields.iter_mut())
            .find(|f| f.tag == tag)
    }

    /// Number of fields in visible sections.
    pub fn visible_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| !s.hidden)
            .map(|s| s.fields.len())
            .sum()
    }

    /// Focus slots: visible fields plus the footer when present.
    pub fn focusable_count(&self) -> usize {
        self.visible_count() + usize::from(self.footer.is_some())
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn next_focus(&mut self) {
        let count = self.focusable_count();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn prev_focus(&mut self) {
        let count = self.focusable_count();
        if count > 0 {
            self.focus = if self.focus == 0 {
                count - 1
            } else {
                self.focus - 1
            };
        }
    }

    /// Keep the focus in range after a visibility or footer change.
    pub fn clamp_focus(&mut self) {
        let count = self.focusable_count();
        if count == 0 {
            self.focus = 0;
        } else if self.focus >= count {
            self.focus = count - 1;
        }
    }

    pub fn footer(&self) -> Option<&'static str> {
        self.footer
    }

    pub fn footer_focused(&self) -> bool {
        self.footer.is_some() && self.focus == self.visible_count()
    }

    /// Remove the footer. It can only ever fire once.
    pub fn take_footer(&mut self) -> Option<&'static str> {
        let footer = self.footer.take();
        self.clamp_focus();
        footer
    }

    /// The currently focused field, or `None` when the footer holds focus.
    pub fn focused_field_mut(&mut self) -> Option<&mut Field> {
        let focus = self.focus;
        self.sections
            .iter_mut()
            .filter(|s| !s.hidden)
            .flat_map(|s| s.fields.iter_mut())
            .nth(focus)
    }

    pub fn focused_field(&self) -> Option<&Field> {
        self.sections
            .iter()
            .filter(|s| !s.hidden)
            .flat_map(|s| s.fields.iter())
            .nth(self.focus)
    }

    /// Run every visible field's validation, updating the error styling
    /// flags, and collect the failures.
    pub fn validate_all(&mut self) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();
        for section in self.sections.iter_mut().filter(|s| !s.hidden) {
            for field in &mut section.fields {
                match field.validate() {
                    Some(msg) => {
                        field.valid = false;
                        errors.push((field.tag, msg));
                    }
                    None => field.valid = true,
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ToDoItem;
    use chrono::NaiveDate;

    fn vm() -> EditViewModel {
        let due = NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        EditViewModel::from_item(&ToDoItem::new(1, "x", due), vec!["home".into()])
    }

    fn text_field(tag: &'static str, value: &str) -> Field {
        Field::new(tag, "Title", FieldWidget::Text(InputField::with_value(value)))
    }

    fn two_section_form(second_hidden: bool) -> Form {
        Form::new(
            vec![
                Section::new("first", vec![text_field("a", "one"), text_field("b", "two")]),
                Section::new("second", vec![text_field("c", "three")])
                    .with_hidden(second_hidden),
            ],
            None,
        )
    }

    #[test]
    fn tag_lookup_miss_is_none() {
        let mut form = two_section_form(false);
        assert!(form.section_by_tag("nope").is_none());
        assert!(form.field_by_tag_mut("nope").is_none());
    }

    #[test]
    fn hidden_sections_are_skipped_by_focus() {
        let mut form = two_section_form(true);
        assert_eq!(form.visible_count(), 2);
        form.next_focus();
        assert_eq!(form.focused_field().map(|f| f.tag), Some("b"));
        form.next_focus();
        // Wraps past the hidden section's field.
        assert_eq!(form.focused_field().map(|f| f.tag), Some("a"));
    }

    #[test]
    fn footer_takes_last_focus_slot() {
        let mut form = Form::new(
            vec![Section::new("first", vec![text_field("a", "one")])],
            Some("+ add a category"),
        );
        assert_eq!(form.focusable_count(), 2);
        form.next_focus();
        assert!(form.footer_focused());
        assert!(form.focused_field().is_none());
        assert_eq!(form.take_footer(), Some("+ add a category"));
        // Second take yields nothing, and focus was clamped back in range.
        assert_eq!(form.take_footer(), None);
        assert_eq!(form.focused_field().map(|f| f.tag), Some("a"));
    }

    #[test]
    fn validate_all_flags_required_fields() {
        let mut form = Form::new(
            vec![Section::new(
                "first",
                vec![
                    text_field("a", "").with_required(),
                    text_field("b", "fine"),
                ],
            )],
            None,
        );
        let errors = form.validate_all();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "a");
        assert!(!form.field_by_tag("a").unwrap().valid);
        assert!(form.field_by_tag("b").unwrap().valid);
    }

    #[test]
    fn hidden_fields_do_not_block_validation() {
        let mut form = Form::new(
            vec![
                Section::new("first", vec![text_field("a", "ok")]),
                Section::new("second", vec![text_field("c", "").with_required()])
                    .with_hidden(true),
            ],
            None,
        );
        assert!(form.validate_all().is_empty());
    }

    #[test]
    fn datetime_value_respects_min_bound() {
        let min = NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let field = Field::new(
            "due",
            "Due date",
            FieldWidget::DateTime {
                input: InputField::with_value("2026-04-01 11:00"),
                min,
            },
        );
        assert_eq!(field.value(), FieldValue::DateTime(None));
        assert!(field.validate().is_some());
    }

    #[test]
    fn change_handler_receives_new_value() {
        let mut state = vm();
        let mut field = text_field("title", "Buy mil").with_on_change(Box::new(|vm, value| {
            if let FieldValue::Text(s) = value {
                vm.title = s;
            }
        }));
        field.handle_char('k', &mut state);
        assert_eq!(state.title, "Buy milk");
    }

    #[test]
    fn segmented_cycles_and_wraps() {
        let mut state = vm();
        let mut field = Field::new(
            "priority",
            "Priority",
            FieldWidget::Segmented {
                options: vec!["low".into(), "medium".into(), "high".into()],
                selected: 2,
            },
        );
        field.handle_left_right(true, &mut state);
        assert_eq!(field.value(), FieldValue::Choice(Some("low".into())));
        field.handle_left_right(false, &mut state);
        assert_eq!(field.value(), FieldValue::Choice(Some("high".into())));
    }
}
