//! To-do item data structure.
//!
//! This module defines the core `ToDoItem` struct that represents a single
//! item with its scheduling, categorisation, and attachment metadata.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoItem {
    pub id: u64,
    pub title: String,
    pub due: NaiveDateTime,
    pub repeat: Repeat,
    pub priority: Priority,
    pub reminder: Reminder,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl ToDoItem {
    /// Create a new item with default metadata.
    pub fn new(id: u64, title: &str, due: NaiveDateTime) -> Self {
        let now_utc = chrono::Utc::now().timestamp();
        ToDoItem {
            id,
            title: title.to_string(),
            due,
            repeat: Repeat::Never,
            priority: Priority::Medium,
            reminder: Reminder::None,
            image: None,
            category: None,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        }
    }
}
