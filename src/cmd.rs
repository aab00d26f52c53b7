//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the subcommands available
//! in the CLI, from basic CRUD operations to the TUI interface.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::path::{Path, PathBuf};

use crate::fields::{Priority, Reminder, Repeat};
use crate::item::ToDoItem;
use crate::store::{default_due, parse_due_input, print_table, Database};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new to-do item.
    Add {
        /// Short title for the item.
        title: String,
        /// Due date: "YYYY-MM-DD HH:MM" or "YYYY-MM-DD". Defaults to
        /// tomorrow morning.
        #[arg(long)]
        due: Option<String>,
        /// Repeat rule: never | daily | weekly | monthly | annually.
        #[arg(long, value_enum, default_value_t = Repeat::Never)]
        repeat: Repeat,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Reminder: none | at-time | ten-minutes-before | one-hour-before | one-day-before.
        #[arg(long, value_enum, default_value_t = Reminder::None)]
        reminder: Reminder,
        /// Category name.
        #[arg(long)]
        category: Option<String>,
        /// Path to an attached picture.
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// List all to-do items.
    List,

    /// Delete a to-do item by ID.
    Delete {
        /// Item ID to delete.
        id: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path) {
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new item to the database.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    title: String,
    due: Option<String>,
    repeat: Repeat,
    priority: Priority,
    reminder: Reminder,
    category: Option<String>,
    image: Option<PathBuf>,
) {
    let due = match due {
        Some(s) => match parse_due_input(&s) {
            Some(dt) => dt,
            None => {
                eprintln!("Invalid due date '{}': use YYYY-MM-DD HH:MM", s);
                std::process::exit(1);
            }
        },
        None => default_due(),
    };

    let mut item = ToDoItem::new(db.next_id(), &title, due);
    item.repeat = repeat;
    item.priority = priority;
    item.reminder = reminder;
    item.category = category;
    item.image = image;
    let id = item.id;
    db.items.push(item);

    if let Err(e) = db.save(db_path) {
        eprintln!("Failed to save database: {}", e);
        std::process::exit(1);
    }
    println!("Added item {} \"{}\"", id, title);
}

/// Print every item as a table.
pub fn cmd_list(db: &Database) {
    let items: Vec<&ToDoItem> = db.items.iter().collect();
    print_table(&items);
}

/// Delete an item by ID.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: u64) {
    if !db.remove(id) {
        eprintln!("No item with ID {}", id);
        std::process::exit(1);
    }
    if let Err(e) = db.save(db_path) {
        eprintln!("Failed to save database: {}", e);
        std::process::exit(1);
    }
    println!("Deleted item {}", id);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
