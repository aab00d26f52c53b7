//! Storage and utility functions for the to-do list.
//!
//! This module provides the `Database` struct that holds the items in memory
//! and persists them to a single JSON file, plus formatting helpers shared by
//! the CLI and the TUI.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::item::ToDoItem;

/// Categories offered even when no stored item uses them yet.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["home", "work", "errands", "leisure"];

/// In-memory database for storing and managing to-do items.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub items: Vec<ToDoItem>,
}

impl Database {
    /// Load database from JSON file, creating a new empty database if file doesn't exist.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("Error parsing item file, starting fresh: {e}");
                    Database::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading item file, starting fresh: {e}");
                Database::default()
            }
        }
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available item ID.
    pub fn next_id(&self) -> u64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    /// Get an item by ID.
    pub fn get(&self, id: u64) -> Option<&ToDoItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Get a mutable reference to an item by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut ToDoItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Remove an item by ID. Returns true if something was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// All category names the picker should offer: the defaults plus any
    /// category already used by a stored item, sorted and deduplicated.
    pub fn known_categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        for item in &self.items {
            if let Some(c) = &item.category {
                cats.push(c.clone());
            }
        }
        cats.sort();
        cats.dedup();
        cats
    }
}

/// Format a due timestamp relative to now ("today 14:30", "tomorrow 09:00",
/// "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let days = due.date() - now.date();
    match days.num_days() {
        0 => format!("today {}", due.format("%H:%M")),
        1 => format!("tomorrow {}", due.format("%H:%M")),
        d if d > 1 => format!("in {}d", d),
        d => format!("{}d late", -d),
    }
}

/// Parse due input as `YYYY-MM-DD HH:MM` or bare `YYYY-MM-DD` (midnight).
pub fn parse_due_input(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Default due for new items: tomorrow 09:00 local time.
pub fn default_due() -> NaiveDateTime {
    let tomorrow = chrono::Local::now().date_naive() + TimeDelta::days(1);
    tomorrow
        .and_hms_opt(9, 0, 0)
        .unwrap_or_else(|| chrono::Local::now().naive_local())
}

/// Print items in a formatted table.
pub fn print_table(items: &[&ToDoItem]) {
    println!(
        "{:<5} {:<14} {:<8} {:<10} {:<10} {}",
        "ID", "Due", "Pri", "Repeat", "Category", "Title"
    );
    let now = chrono::Local::now().naive_local();
    for item in items {
        println!(
            "{:<5} {:<14} {:<8} {:<10} {:<10} {}",
            item.id,
            format_due_relative(item.due, now),
            item.priority.label(),
            item.repeat.label(),
            item.category.as_deref().unwrap_or("-"),
            item.title,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn format_due_relative_cases() {
        let now = dt(2026, 3, 10, 12, 0);
        assert_eq!(format_due_relative(dt(2026, 3, 10, 14, 30), now), "today 14:30");
        assert_eq!(format_due_relative(dt(2026, 3, 11, 9, 0), now), "tomorrow 09:00");
        assert_eq!(format_due_relative(dt(2026, 3, 13, 9, 0), now), "in 3d");
        assert_eq!(format_due_relative(dt(2026, 3, 8, 9, 0), now), "2d late");
    }

    #[test]
    fn parse_due_input_formats() {
        assert_eq!(parse_due_input("2026-03-10 14:30"), Some(dt(2026, 3, 10, 14, 30)));
        assert_eq!(parse_due_input("2026-03-10"), Some(dt(2026, 3, 10, 0, 0)));
        assert_eq!(parse_due_input("next tuesday"), None);
    }

    #[test]
    fn next_id_and_remove() {
        let mut db = Database::default();
        assert_eq!(db.next_id(), 1);
        db.items.push(ToDoItem::new(1, "a", dt(2026, 1, 1, 0, 0)));
        db.items.push(ToDoItem::new(5, "b", dt(2026, 1, 1, 0, 0)));
        assert_eq!(db.next_id(), 6);
        assert!(db.remove(1));
        assert!(!db.remove(1));
        assert_eq!(db.items.len(), 1);
    }

    #[test]
    fn items_round_trip_through_json() {
        let mut db = Database::default();
        let mut item = ToDoItem::new(3, "Water plants", dt(2026, 5, 2, 18, 0));
        item.category = Some("garden".to_string());
        item.image = Some(std::path::PathBuf::from("/tmp/plants.jpg"));
        db.items.push(item);

        let json = serde_json::to_string(&db).unwrap();
        let restored: Database = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.items, db.items);
    }

    #[test]
    fn known_categories_merges_defaults_and_items() {
        let mut db = Database::default();
        let mut item = ToDoItem::new(1, "a", dt(2026, 1, 1, 0, 0));
        item.category = Some("garden".to_string());
        db.items.push(item);
        let cats = db.known_categories();
        assert!(cats.contains(&"garden".to_string()));
        assert!(cats.contains(&"home".to_string()));
        let mut sorted = cats.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(cats, sorted);
    }
}
