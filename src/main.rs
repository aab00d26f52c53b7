//! # To-Do - Daily Task CLI
//!
//! A command-line to-do manager with an interactive terminal user interface
//! (TUI) built around a single edit screen.
//!
//! ## Key Features
//!
//! - **Rich Item Metadata**: Due date, repeat rule, priority, reminder,
//!   category, and an optional picture attachment
//! - **Multiple Interfaces**: CLI for automation + interactive TUI for
//!   visual editing
//! - **Local File Storage**: A single JSON file, easy to source control
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! todo ui
//!
//! # Add an item via CLI
//! todo add "Buy milk" --due "2026-09-01 09:00" --priority high
//!
//! # List items
//! todo list
//! ```
//!
//! Data is stored locally in `~/.todo/todo.json`.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod item;
pub mod store;
pub mod vm;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod edit;
    pub mod enums;
    pub mod form;
    pub mod input;
    pub mod picker;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::Database;

fn main() {
    let cli = Cli::parse();

    // Determine the database file to use.
    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let todo_dir = PathBuf::from(home).join(".todo");
        if let Err(e) = std::fs::create_dir_all(&todo_dir) {
            eprintln!("Failed to create todo directory {}: {}", todo_dir.display(), e);
            std::process::exit(1);
        }
        todo_dir.join("todo.json")
    });

    match cli.command {
        Commands::Ui => cmd_ui(&db_path),

        Commands::Add {
            title,
            due,
            repeat,
            priority,
            reminder,
            category,
            image,
        } => {
            let mut db = Database::load(&db_path);
            cmd_add(
                &mut db, &db_path, title, due, repeat, priority, reminder, category, image,
            );
        }

        Commands::List => {
            let db = Database::load(&db_path);
            cmd_list(&db);
        }

        Commands::Delete { id } => {
            let mut db = Database::load(&db_path);
            cmd_delete(&mut db, &db_path, id);
        }

        Commands::Completions { shell } => cmd_completions(shell),
    }
}
