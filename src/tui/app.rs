//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between
//! the item list, the edit form, the picker overlay, and dialogs.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::item::ToDoItem;
use crate::store::{default_due, format_due_relative, Database};
use crate::tui::{
    colors::{DARK_RED, GOLD},
    edit::{EditOutcome, EditScreen},
    enums::AppState,
    form::FieldWidget,
    picker::PickerOverlay,
    utils::centered_rect,
};
use crate::vm::EditViewModel;

/// Main application state for the terminal user interface.
///
/// Manages the current screen, database operations, the open edit screen
/// and its picker overlay, and the status bar message.
pub struct App {
    state: AppState,
    db: Database,
    db_path: PathBuf,
    list_state: TableState,
    edit: Option<EditScreen>,
    picker: Option<PickerOverlay>,
    /// Item queued for deletion from the list view.
    confirm_item: Option<u64>,
    status_message: String,
}

impl App {
    /// Create a new App instance, loading the database from the specified path.
    pub fn new(db_path: &Path) -> io::Result<Self> {
        let db = Database::load(db_path);

        let mut app = App {
            state: AppState::ItemList,
            db,
            db_path: db_path.to_path_buf(),
            list_state: TableState::default(),
            edit: None,
            picker: None,
            confirm_item: None,
            status_message: String::new(),
        };

        if !app.db.items.is_empty() {
            app.list_state.select(Some(0));
        }
        Ok(app)
    }

    /// Save the database to disk.
    fn save_db(&mut self) -> io::Result<()> {
        self.db.save(&self.db_path)
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// ID of the item under the list cursor.
    fn selected_id(&self) -> Option<u64> {
        self.list_state
            .selected()
            .and_then(|idx| self.db.items.get(idx))
            .map(|item| item.id)
    }

    /// Keep the list selection in range after items were added or removed.
    fn clamp_selection(&mut self) {
        if self.db.items.is_empty() {
            self.list_state.select(None);
        } else {
            let last = self.db.items.len() - 1;
            match self.list_state.selected() {
                Some(idx) if idx > last => self.list_state.select(Some(last)),
                None => self.list_state.select(Some(0)),
                _ => {}
            }
        }
    }

    /// Open the edit screen for an existing item.
    fn open_edit(&mut self, id: u64) {
        if let Some(item) = self.db.get(id) {
            let vm = vm_for_item(item, &self.db);
            self.edit = Some(EditScreen::new(vm));
            self.state = AppState::EditItem;
        }
    }

    /// Open the edit screen for a brand-new item. The item is only added
    /// to the database when the screen closes with a successful save.
    fn open_add(&mut self) {
        let item = ToDoItem::new(self.db.next_id(), "", default_due());
        let vm = vm_for_item(&item, &self.db);
        self.edit = Some(EditScreen::new(vm));
        self.state = AppState::EditItem;
    }

    /// Close the edit screen. With `apply` set, the view-model's outcome is
    /// written through: a deletion removes the item, otherwise the edits are
    /// stored (adding the item first when it was new) and persisted.
    fn close_edit(&mut self, apply: bool) {
        if let Some(edit) = self.edit.take() {
            if apply {
                let id = edit.vm.item_id();
                if edit.vm.is_deleted() {
                    if self.db.remove(id) {
                        self.set_status_message("Item deleted".to_string());
                    }
                } else if let Some(item) = self.db.get_mut(id) {
                    edit.vm.apply_to(item);
                    self.set_status_message("Item saved".to_string());
                } else {
                    let mut item = ToDoItem::new(id, "", default_due());
                    edit.vm.apply_to(&mut item);
                    self.db.items.push(item);
                    self.set_status_message("Item added".to_string());
                }
                if let Err(e) = self.save_db() {
                    self.set_status_message(format!("Error saving database: {}", e));
                }
            }
        }
        self.picker = None;
        self.state = AppState::ItemList;
        self.clamp_selection();
    }

    fn handle_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.list_state.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
                } else if !self.db.items.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.list_state.selected() {
                    if selected + 1 < self.db.items.len() {
                        self.list_state.select(Some(selected + 1));
                    }
                } else if !self.db.items.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.open_edit(id);
                }
            }
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.confirm_item = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('h') | KeyCode::F(1) => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        // Ctrl+D asks for confirmation before the item is deleted.
        if key == KeyCode::Char('d') && modifiers.contains(KeyModifiers::CONTROL) {
            self.state = AppState::Confirm;
            return Ok(false);
        }
        let outcome = match self.edit.as_mut() {
            Some(edit) => edit.handle_key(key, modifiers),
            None => return Ok(false),
        };
        match outcome {
            EditOutcome::Continue => {}
            EditOutcome::Close { saved } => self.close_edit(saved),
            EditOutcome::OpenPicker(overlay) => {
                self.picker = Some(overlay);
                self.state = AppState::Picker;
            }
            EditOutcome::Invalid(msg) => self.set_status_message(msg),
        }
        Ok(false)
    }

    fn handle_picker_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        let Some(picker) = self.picker.as_mut() else {
            self.state = AppState::EditItem;
            return Ok(false);
        };
        match key {
            KeyCode::Up | KeyCode::Char('k') => picker.prev(),
            KeyCode::Down | KeyCode::Char('j') => picker.next(),
            KeyCode::Enter => {
                let tag = picker.field_tag;
                let chosen = picker.chosen();
                self.picker = None;
                if let (Some(edit), Some(choice)) = (self.edit.as_mut(), chosen) {
                    edit.apply_picker_choice(tag, choice);
                }
                self.state = AppState::EditItem;
            }
            KeyCode::Esc => {
                self.picker = None;
                self.state = AppState::EditItem;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.confirm_delete(true);
                    self.close_edit(true);
                } else if let Some(id) = self.confirm_item.take() {
                    if self.db.remove(id) {
                        self.set_status_message("Item deleted".to_string());
                        if let Err(e) = self.save_db() {
                            self.set_status_message(format!("Error saving database: {}", e));
                        }
                    }
                    self.state = AppState::ItemList;
                    self.clamp_selection();
                } else {
                    self.state = AppState::ItemList;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_item = None;
                self.state = if self.edit.is_some() {
                    AppState::EditItem
                } else {
                    AppState::ItemList
                };
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when viewing the help screen.
    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = AppState::ItemList;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Poll for and handle keyboard events based on current application state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = match self.state {
                    AppState::ItemList => self.handle_list_input(key.code, key.modifiers)?,
                    AppState::EditItem => self.handle_edit_input(key.code, key.modifiers)?,
                    AppState::Picker => self.handle_picker_input(key.code, key.modifiers)?,
                    AppState::Confirm => self.handle_confirm_input(key.code, key.modifiers)?,
                    AppState::Help => self.handle_help_input(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the to-do item list table.
    fn render_item_list(&mut self, f: &mut Frame, area: Rect) {
        let now = Local::now().naive_local();

        let header_cells = ["ID", "Due", "Priority", "Repeats", "Category", "Title"]
            .iter()
            .map(|h| {
                ratatui::widgets::Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))
            });
        let header = Row::new(header_cells)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .height(1);

        let rows: Vec<Row> = self
            .db
            .items
            .iter()
            .map(|item| {
                let style = if item.due < now {
                    Style::default().fg(DARK_RED).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    ratatui::widgets::Cell::from(item.id.to_string()),
                    ratatui::widgets::Cell::from(format_due_relative(item.due, now)),
                    ratatui::widgets::Cell::from(item.priority.label()),
                    ratatui::widgets::Cell::from(item.repeat.label()),
                    ratatui::widgets::Cell::from(item.category.as_deref().unwrap_or("-").to_string()),
                    ratatui::widgets::Cell::from(item.title.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(4),  // ID
            Constraint::Length(12), // Due
            Constraint::Length(8),  // Priority
            Constraint::Length(10), // Repeats
            Constraint::Length(10), // Category
            Constraint::Min(25),    // Title
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "To-Do Items ({}) - Press 'h' for help",
                self.db.items.len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    /// Render the edit form: one bordered box per visible field, section
    /// titles in between, and the reveal footer as the last line.
    fn render_edit_form(&mut self, f: &mut Frame, area: Rect) {
        let Some(edit) = &self.edit else { return };

        let mut constraints: Vec<Constraint> = Vec::new();
        for section in edit.form.sections.iter().filter(|s| !s.hidden) {
            if section.title.is_some() {
                constraints.push(Constraint::Length(1));
            }
            for _ in &section.fields {
                constraints.push(Constraint::Length(3));
            }
        }
        if edit.form.footer().is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut chunk_idx = 0usize;
        let mut field_idx = 0usize;
        for section in edit.form.sections.iter().filter(|s| !s.hidden) {
            if let Some(title) = section.title {
                let heading = Paragraph::new(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                f.render_widget(heading, chunks[chunk_idx]);
                chunk_idx += 1;
            }
            for field in &section.fields {
                let focused = edit.form.focus() == field_idx && !edit.form.footer_focused();
                let border_style = if focused {
                    Style::default().fg(GOLD)
                } else if !field.valid {
                    Style::default().fg(DARK_RED)
                } else {
                    Style::default()
                };

                match &field.widget {
                    FieldWidget::Text(input)
                    | FieldWidget::DateTime { input, .. }
                    | FieldWidget::ImagePath(input) => {
                        let title = if field.required {
                            format!("{} *", field.title)
                        } else {
                            field.title.to_string()
                        };
                        let widget = Paragraph::new(input.value.as_str()).block(
                            Block::default()
                                .borders(Borders::ALL)
                                .title(title)
                                .border_style(border_style),
                        );
                        f.render_widget(widget, chunks[chunk_idx]);
                    }
                    FieldWidget::Select { options, selected } => {
                        let value = options.get(*selected).map(String::as_str).unwrap_or("");
                        let widget = Paragraph::new(format!("{}  \u{203a}", value)).block(
                            Block::default()
                                .borders(Borders::ALL)
                                .title(field.title)
                                .border_style(border_style),
                        );
                        f.render_widget(widget, chunks[chunk_idx]);
                    }
                    FieldWidget::Segmented { options, selected } => {
                        let value = options.get(*selected).map(String::as_str).unwrap_or("");
                        let widget = Paragraph::new(format!("< {} >", value)).block(
                            Block::default()
                                .borders(Borders::ALL)
                                .title(field.title)
                                .border_style(border_style),
                        );
                        f.render_widget(widget, chunks[chunk_idx]);
                    }
                    FieldWidget::Picker(picker) => {
                        // Centered label with a disclosure marker, no title row.
                        let widget =
                            Paragraph::new(format!("{}  \u{203a}", picker.display_text()))
                                .alignment(Alignment::Center)
                                .block(
                                    Block::default()
                                        .borders(Borders::ALL)
                                        .border_style(border_style),
                                );
                        f.render_widget(widget, chunks[chunk_idx]);
                    }
                }
                chunk_idx += 1;
                field_idx += 1;
            }
        }

        if let Some(footer) = edit.form.footer() {
            let style = if edit.form.footer_focused() {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let widget = Paragraph::new(Span::styled(footer, style)).alignment(Alignment::Center);
            f.render_widget(widget, chunks[chunk_idx]);
        }
    }

    /// Render the option list overlay for the focused selection field.
    fn render_picker(&mut self, f: &mut Frame, area: Rect) {
        let Some(picker) = &self.picker else { return };

        let area = centered_rect(40, 50, area);
        f.render_widget(Clear, area);

        let lines: Vec<Line> = picker
            .options
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                if idx == picker.selected {
                    Line::from(Span::styled(
                        format!(">> {}", option),
                        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("   {}", option))
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(picker.title.clone()),
        );
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for destructive actions.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this to-do item?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "To-Do Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Item List:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Up/k, Down/j  Navigate items"),
            Line::from("  Enter/e       Edit selected item"),
            Line::from("  a             Add a new item"),
            Line::from("  d             Delete selected item"),
            Line::from("  h/F1          Show this help"),
            Line::from("  q/Ctrl+C/Esc  Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Edit Form:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Tab/Down, Shift+Tab/Up  Navigate fields"),
            Line::from("  Left/Right    Move cursor / cycle priority"),
            Line::from("  Enter         Open picker on selectors, save otherwise"),
            Line::from("  Ctrl+D        Delete the item (with confirmation)"),
            Line::from("  Esc           Close without saving"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Due Date Format:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  YYYY-MM-DD HH:MM  (a bare date means midnight)"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::ItemList => {
                    format!("Items: {} | Press 'h' for help", self.db.items.len())
                }
                AppState::EditItem => {
                    "Edit Item | Enter to save, Esc to close, Ctrl+D to delete".to_string()
                }
                AppState::Picker => "Pick an option | Enter to choose, Esc to cancel".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::ItemList => self.render_item_list(f, chunks[0]),
            AppState::EditItem => self.render_edit_form(f, chunks[0]),
            AppState::Picker => {
                self.render_edit_form(f, chunks[0]);
                self.render_picker(f, chunks[0]);
            }
            AppState::Confirm => {
                if self.edit.is_some() {
                    self.render_edit_form(f, chunks[0]);
                } else {
                    self.render_item_list(f, chunks[0]);
                }
                self.render_confirm(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// View-model for an item, with the category options drawn from the
/// database's known categories.
pub fn vm_for_item(item: &ToDoItem, db: &Database) -> EditViewModel {
    EditViewModel::from_item(item, db.known_categories())
}
