//! View-model for the item edit screen.
//!
//! The edit form never touches the database directly. It reads and writes
//! this view-model, which holds the edit state of a single item plus the
//! option lists the selector fields offer. The host applies the result back
//! to storage when the screen closes.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::fields::{Priority, Reminder, Repeat};
use crate::item::ToDoItem;

/// Edit state for one to-do item, owned by the edit screen.
#[derive(Debug, Clone)]
pub struct EditViewModel {
    pub title: String,
    pub due: NaiveDateTime,
    pub repeat: Repeat,
    pub priority: Priority,
    pub reminder: Reminder,
    pub image: Option<PathBuf>,
    pub category: Option<String>,
    item_id: u64,
    category_options: Vec<String>,
    deleted: bool,
}

impl EditViewModel {
    /// Build a view-model from a stored item and the categories to offer.
    pub fn from_item(item: &ToDoItem, category_options: Vec<String>) -> Self {
        EditViewModel {
            title: item.title.clone(),
            due: item.due,
            repeat: item.repeat,
            priority: item.priority,
            reminder: item.reminder,
            image: item.image.clone(),
            category: item.category.clone(),
            item_id: item.id,
            category_options,
            deleted: false,
        }
    }

    pub fn item_id(&self) -> u64 {
        self.item_id
    }

    pub fn repeat_options(&self) -> Vec<String> {
        Repeat::ALL.iter().map(|r| r.label().to_string()).collect()
    }

    pub fn priority_options(&self) -> Vec<String> {
        Priority::ALL.iter().map(|p| p.label().to_string()).collect()
    }

    pub fn reminder_options(&self) -> Vec<String> {
        Reminder::ALL.iter().map(|r| r.label().to_string()).collect()
    }

    pub fn category_options(&self) -> &[String] {
        &self.category_options
    }

    /// Mark the underlying item for deletion. The host removes it from
    /// storage once the screen closes.
    pub fn delete(&mut self) {
        self.deleted = true;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Write the edited values back onto a stored item.
    pub fn apply_to(&self, item: &mut ToDoItem) {
        item.title = self.title.clone();
        item.due = self.due;
        item.repeat = self.repeat;
        item.priority = self.priority;
        item.reminder = self.reminder;
        item.image = self.image.clone();
        item.category = self.category.clone();
        item.updated_at_utc = chrono::Utc::now().timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_item() -> ToDoItem {
        let due = NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut item = ToDoItem::new(7, "Buy milk", due);
        item.category = Some("errands".to_string());
        item
    }

    #[test]
    fn from_item_copies_all_fields() {
        let item = sample_item();
        let vm = EditViewModel::from_item(&item, vec!["home".into()]);
        assert_eq!(vm.title, "Buy milk");
        assert_eq!(vm.due, item.due);
        assert_eq!(vm.category.as_deref(), Some("errands"));
        assert_eq!(vm.item_id(), 7);
        assert!(!vm.is_deleted());
    }

    #[test]
    fn apply_to_writes_back_and_bumps_updated() {
        let mut item = sample_item();
        let before = item.updated_at_utc;
        let mut vm = EditViewModel::from_item(&item, vec![]);
        vm.title = "Buy oat milk".to_string();
        vm.priority = Priority::High;
        vm.category = None;
        vm.apply_to(&mut item);
        assert_eq!(item.title, "Buy oat milk");
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.category, None);
        assert!(item.updated_at_utc >= before);
    }

    #[test]
    fn delete_marks_only() {
        let item = sample_item();
        let mut vm = EditViewModel::from_item(&item, vec![]);
        vm.delete();
        assert!(vm.is_deleted());
    }

    #[test]
    fn option_lists_follow_enum_order() {
        let vm = EditViewModel::from_item(&sample_item(), vec!["home".into(), "work".into()]);
        assert_eq!(vm.repeat_options()[0], "never");
        assert_eq!(vm.priority_options(), vec!["low", "medium", "high"]);
        assert_eq!(vm.category_options(), &["home".to_string(), "work".to_string()]);
    }
}
