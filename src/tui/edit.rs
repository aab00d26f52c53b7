//! Edit screen controller: builds the item form and binds it to the
//! view-model.
//!
//! The form is constructed once, synchronously, when the screen opens.
//! Every field starts from the view-model's current value and writes each
//! change straight back through its change handler. The category section is
//! special: it starts hidden when the item has no category and is revealed
//! by a one-shot footer, which also defaults the category to the first
//! available option.

use chrono::{Local, NaiveDateTime};
use crossterm::event::{KeyCode, KeyModifiers};

use crate::fields::{Priority, Reminder, Repeat};
use crate::tui::form::{Field, FieldValue, FieldWidget, Form, Section, DUE_FORMAT};
use crate::tui::input::InputField;
use crate::tui::picker::{PickerField, PickerOverlay};
use crate::vm::EditViewModel;

pub const TITLE_TAG: &str = "title";
pub const DUE_TAG: &str = "due";
pub const REPEAT_TAG: &str = "repeat";
pub const PRIORITY_TAG: &str = "priority";
pub const REMINDER_TAG: &str = "reminder";
pub const IMAGE_TAG: &str = "image";
pub const CATEGORY_TAG: &str = "category";
pub const CATEGORY_SECTION_TAG: &str = "category-section";

const FOOTER_LABEL: &str = "+ add a category";

/// What the host should do after a key was handled.
pub enum EditOutcome {
    Continue,
    /// Leave the screen. `saved` is true only for a successful save.
    Close { saved: bool },
    /// Present the option list for the focused selection field.
    OpenPicker(PickerOverlay),
    /// Save was blocked by validation; the message is for the status bar.
    Invalid(String),
}

/// The edit screen: owns the view-model and the form built from it.
pub struct EditScreen {
    pub vm: EditViewModel,
    pub form: Form,
}

impl EditScreen {
    pub fn new(vm: EditViewModel) -> Self {
        Self::with_min_due(vm, Local::now().naive_local())
    }

    /// Build the form with an explicit due-date lower bound. The bound is
    /// captured here and never re-evaluated for the life of the screen.
    pub fn with_min_due(vm: EditViewModel, min_due: NaiveDateTime) -> Self {
        let title_section = Section::new(
            "description",
            vec![Field::new(
                TITLE_TAG,
                "Description",
                FieldWidget::Text(InputField::with_value(&vm.title)),
            )
            .with_required()
            .with_on_change(Box::new(|vm, value| {
                if let FieldValue::Text(s) = value {
                    vm.title = s;
                }
            }))],
        );

        let schedule_section = Section::new(
            "schedule",
            vec![
                Field::new(
                    DUE_TAG,
                    "Due date",
                    FieldWidget::DateTime {
                        input: InputField::with_value(&vm.due.format(DUE_FORMAT).to_string()),
                        min: min_due,
                    },
                )
                .with_on_change(Box::new(|vm, value| {
                    if let FieldValue::DateTime(Some(dt)) = value {
                        vm.due = dt;
                    }
                })),
                Field::new(
                    REPEAT_TAG,
                    "Repeats",
                    FieldWidget::Select {
                        options: vm.repeat_options(),
                        selected: Repeat::ALL
                            .iter()
                            .position(|r| *r == vm.repeat)
                            .unwrap_or(0),
                    },
                )
                .with_on_change(Box::new(|vm, value| {
                    if let FieldValue::Choice(Some(label)) = value {
                        if let Some(repeat) = Repeat::from_label(&label) {
                            vm.repeat = repeat;
                        }
                    }
                })),
            ],
        );

        let triage_section = Section::new(
            "triage",
            vec![
                Field::new(
                    PRIORITY_TAG,
                    "Priority",
                    FieldWidget::Segmented {
                        options: vm.priority_options(),
                        selected: Priority::ALL
                            .iter()
                            .position(|p| *p == vm.priority)
                            .unwrap_or(0),
                    },
                )
                .with_on_change(Box::new(|vm, value| {
                    if let FieldValue::Choice(Some(label)) = value {
                        if let Some(priority) = Priority::from_label(&label) {
                            vm.priority = priority;
                        }
                    }
                })),
                Field::new(
                    REMINDER_TAG,
                    "Reminder",
                    FieldWidget::Select {
                        options: vm.reminder_options(),
                        selected: Reminder::ALL
                            .iter()
                            .position(|r| *r == vm.reminder)
                            .unwrap_or(0),
                    },
                )
                .with_on_change(Box::new(|vm, value| {
                    if let FieldValue::Choice(Some(label)) = value {
                        if let Some(reminder) = Reminder::from_label(&label) {
                            vm.reminder = reminder;
                        }
                    }
                })),
            ],
        );

        let attachment_section = Section::new(
            "attachment",
            vec![Field::new(
                IMAGE_TAG,
                "Attachment",
                FieldWidget::ImagePath(InputField::with_value(
                    &vm.image
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                )),
            )
            .with_on_change(Box::new(|vm, value| {
                if let FieldValue::Path(path) = value {
                    vm.image = path;
                }
            }))],
        )
        .with_title("Picture Attachment");

        let category_section = Section::new(
            CATEGORY_SECTION_TAG,
            vec![Field::new(
                CATEGORY_TAG,
                "Category",
                FieldWidget::Picker(PickerField::new(
                    vm.category.clone(),
                    vm.category_options().to_vec(),
                )),
            )
            .with_on_change(Box::new(|vm, value| {
                if let FieldValue::Choice(choice) = value {
                    vm.category = choice;
                }
            }))],
        )
        .with_title("Category")
        .with_hidden(vm.category.is_none());

        let footer = if vm.category.is_none() {
            Some(FOOTER_LABEL)
        } else {
            None
        };

        let form = Form::new(
            vec![
                title_section,
                schedule_section,
                triage_section,
                attachment_section,
                category_section,
            ],
            footer,
        );

        EditScreen { vm, form }
    }

    /// Reveal the hidden category section. Fired by the footer, at most
    /// once; a missing section or field makes this a no-op.
    pub fn reveal_category(&mut self) {
        if self.form.section_by_tag(CATEGORY_SECTION_TAG).is_none() {
            return;
        }
        self.form.take_footer();
        if let Some(section) = self.form.section_by_tag_mut(CATEGORY_SECTION_TAG) {
            section.hidden = false;
        }
        self.form.clamp_focus();
        if let Some(field) = self.form.field_by_tag_mut(CATEGORY_TAG) {
            if self.vm.category.is_none() {
                if let Some(first) = self.vm.category_options().first().cloned() {
                    self.vm.category = Some(first.clone());
                    if let FieldWidget::Picker(picker) = &mut field.widget {
                        picker.value = Some(first);
                    }
                }
            }
        }
    }

    /// Validate every visible field. An empty result means the screen may
    /// close; otherwise the offending fields are already styled.
    pub fn try_save(&mut self) -> Vec<(&'static str, String)> {
        self.form.validate_all()
    }

    /// Outcome of the delete confirmation dialog. Confirming tells the
    /// view-model to delete the item and closes the screen; cancelling
    /// changes nothing.
    pub fn confirm_delete(&mut self, confirmed: bool) -> bool {
        if confirmed {
            self.vm.delete();
        }
        confirmed
    }

    /// Deliver the overlay's chosen option to its field.
    pub fn apply_picker_choice(&mut self, tag: &str, choice: String) {
        if let Some(field) = self.form.field_by_tag_mut(tag) {
            field.set_choice(choice, &mut self.vm);
        }
    }

    fn picker_for_focused(&self) -> Option<PickerOverlay> {
        let field = self.form.focused_field()?;
        match &field.widget {
            FieldWidget::Select { options, selected } => Some(PickerOverlay::new(
                field.title,
                options.clone(),
                options.get(*selected).map(|s| s.as_str()),
                field.tag,
            )),
            FieldWidget::Picker(picker) => Some(PickerOverlay::new(
                field.title,
                picker.option_labels(),
                picker.value.as_deref(),
                field.tag,
            )),
            _ => None,
        }
    }

    /// Handle one key press inside the edit screen.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> EditOutcome {
        match key {
            KeyCode::Esc => return EditOutcome::Close { saved: false },
            KeyCode::Tab | KeyCode::Down => self.form.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_focus(),
            KeyCode::Left => {
                if let Some(field) = self.form.focused_field_mut() {
                    field.handle_left_right(false, &mut self.vm);
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.form.focused_field_mut() {
                    field.handle_left_right(true, &mut self.vm);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.form.focused_field_mut() {
                    field.handle_backspace(&mut self.vm);
                }
            }
            KeyCode::Delete => {
                if let Some(field) = self.form.focused_field_mut() {
                    field.handle_delete(&mut self.vm);
                }
            }
            KeyCode::Enter => {
                if self.form.footer_focused() {
                    self.reveal_category();
                } else if let Some(overlay) = self.picker_for_focused() {
                    return EditOutcome::OpenPicker(overlay);
                } else {
                    let errors = self.try_save();
                    match errors.into_iter().next() {
                        None => return EditOutcome::Close { saved: true },
                        Some((_, msg)) => return EditOutcome::Invalid(msg),
                    }
                }
            }
            KeyCode::Char(c) => {
                if !modifiers.contains(KeyModifiers::CONTROL) {
                    if let Some(field) = self.form.focused_field_mut() {
                        field.handle_char(c, &mut self.vm);
                    }
                }
            }
            _ => {}
        }
        EditOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ToDoItem;
    use chrono::NaiveDate;

    fn due() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn screen_with_category(category: Option<&str>) -> EditScreen {
        let mut item = ToDoItem::new(1, "Buy milk", due());
        item.category = category.map(|c| c.to_string());
        let vm = EditViewModel::from_item(
            &item,
            vec!["home".into(), "work".into(), "errands".into()],
        );
        let min = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        EditScreen::with_min_due(vm, min)
    }

    fn category_value(screen: &EditScreen) -> Option<String> {
        match &screen.form.field_by_tag(CATEGORY_TAG).unwrap().widget {
            FieldWidget::Picker(p) => p.value.clone(),
            _ => panic!("category field is not a picker"),
        }
    }

    #[test]
    fn no_category_starts_hidden_with_footer() {
        let screen = screen_with_category(None);
        assert!(screen.form.section_by_tag(CATEGORY_SECTION_TAG).unwrap().hidden);
        assert_eq!(screen.form.footer(), Some("+ add a category"));
    }

    #[test]
    fn existing_category_starts_visible_without_footer() {
        let screen = screen_with_category(Some("work"));
        assert!(!screen.form.section_by_tag(CATEGORY_SECTION_TAG).unwrap().hidden);
        assert_eq!(screen.form.footer(), None);
        assert_eq!(category_value(&screen), Some("work".to_string()));
    }

    #[test]
    fn reveal_defaults_category_to_first_option() {
        let mut screen = screen_with_category(None);
        screen.reveal_category();
        assert!(!screen.form.section_by_tag(CATEGORY_SECTION_TAG).unwrap().hidden);
        assert_eq!(screen.form.footer(), None);
        assert_eq!(screen.vm.category.as_deref(), Some("home"));
        assert_eq!(category_value(&screen), Some("home".to_string()));
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut screen = screen_with_category(None);
        screen.reveal_category();
        screen.vm.category = Some("errands".to_string());
        screen.apply_picker_choice(CATEGORY_TAG, "errands".to_string());
        screen.reveal_category();
        assert_eq!(screen.vm.category.as_deref(), Some("errands"));
        assert_eq!(category_value(&screen), Some("errands".to_string()));
    }

    #[test]
    fn reveal_keeps_existing_category() {
        let mut screen = screen_with_category(Some("work"));
        screen.reveal_category();
        assert_eq!(screen.vm.category.as_deref(), Some("work"));
    }

    #[test]
    fn save_blocked_on_empty_title() {
        let mut screen = screen_with_category(None);
        screen.vm.title.clear();
        if let Some(field) = screen.form.field_by_tag_mut(TITLE_TAG) {
            if let FieldWidget::Text(input) = &mut field.widget {
                input.value.clear();
                input.cursor = 0;
            }
        }
        let errors = screen.try_save();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, TITLE_TAG);
        assert!(!screen.form.field_by_tag(TITLE_TAG).unwrap().valid);
    }

    #[test]
    fn save_passes_with_title() {
        let mut screen = screen_with_category(None);
        assert!(screen.try_save().is_empty());
    }

    #[test]
    fn confirm_delete_marks_view_model_once() {
        let mut screen = screen_with_category(None);
        assert!(screen.confirm_delete(true));
        assert!(screen.vm.is_deleted());
    }

    #[test]
    fn cancel_delete_is_a_no_op() {
        let mut screen = screen_with_category(None);
        let before = screen.vm.clone();
        assert!(!screen.confirm_delete(false));
        assert!(!screen.vm.is_deleted());
        assert_eq!(screen.vm.title, before.title);
        assert_eq!(screen.vm.category, before.category);
    }

    #[test]
    fn field_change_touches_only_its_property() {
        let mut screen = screen_with_category(Some("work"));
        let before = screen.vm.clone();
        if let Some(field) = screen.form.field_by_tag_mut(TITLE_TAG) {
            field.handle_char('!', &mut screen.vm);
        }
        assert_eq!(screen.vm.title, "Buy milk!");
        assert_eq!(screen.vm.due, before.due);
        assert_eq!(screen.vm.repeat, before.repeat);
        assert_eq!(screen.vm.priority, before.priority);
        assert_eq!(screen.vm.reminder, before.reminder);
        assert_eq!(screen.vm.image, before.image);
        assert_eq!(screen.vm.category, before.category);
    }

    #[test]
    fn picker_choice_flows_through_change_handler() {
        let mut screen = screen_with_category(Some("home"));
        screen.apply_picker_choice(REPEAT_TAG, "weekly".to_string());
        assert_eq!(screen.vm.repeat, Repeat::Weekly);
        screen.apply_picker_choice(CATEGORY_TAG, "errands".to_string());
        assert_eq!(screen.vm.category.as_deref(), Some("errands"));
    }

    #[test]
    fn unknown_picker_tag_is_ignored() {
        let mut screen = screen_with_category(None);
        let before = screen.vm.clone();
        screen.apply_picker_choice("no-such-field", "x".to_string());
        assert_eq!(screen.vm.title, before.title);
        assert_eq!(screen.vm.category, before.category);
    }

    #[test]
    fn due_edits_respect_build_time_bound() {
        let mut screen = screen_with_category(None);
        let before = screen.vm.due;
        if let Some(field) = screen.form.field_by_tag_mut(DUE_TAG) {
            if let FieldWidget::DateTime { input, .. } = &mut field.widget {
                input.value = "2026-02-01 10:00".to_string();
                input.cursor = input.value.len();
            }
            field.fire_change(&mut screen.vm);
            assert!(!field.valid);
        }
        // Below the bound: the view-model keeps its previous value.
        assert_eq!(screen.vm.due, before);
    }

    #[test]
    fn footer_enter_reveals_and_enter_saves() {
        let mut screen = screen_with_category(None);
        // Move focus onto the footer (last slot).
        screen.form.prev_focus();
        assert!(screen.form.footer_focused());
        match screen.handle_key(KeyCode::Enter, KeyModifiers::NONE) {
            EditOutcome::Continue => {}
            _ => panic!("footer enter should not close the screen"),
        }
        assert_eq!(screen.vm.category.as_deref(), Some("home"));
        // Focus back on the title field; Enter now saves and closes.
        while screen.form.focus() != 0 {
            screen.form.prev_focus();
        }
        match screen.handle_key(KeyCode::Enter, KeyModifiers::NONE) {
            EditOutcome::Close { saved: true } => {}
            _ => panic!("expected a successful save"),
        }
    }
}
