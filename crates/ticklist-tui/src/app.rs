use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ticklist_api::BlockingGateway;
use ticklist_core::{Todo, TodoId, TodoPayload};

use crate::components::todo_list::TodoList;

/// Fallback title when an edit empties it out.
const UNTITLED: &str = "(untitled)";

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Normal list navigation
    Normal,
    /// Typing a new todo
    NewTodo {
        title: String,
        description: String,
        field: InputField,
    },
    /// Editing one todo at a time, keyed by its id
    Edit {
        id: TodoId,
        title: String,
        description: String,
        field: InputField,
    },
    /// Confirm delete
    ConfirmDelete { todo: Todo },
}

#[derive(Debug, Clone, Copy)]
pub enum InputField {
    Title,
    Description,
}

/// Owns the todo collection and reconciles it with the server.
///
/// Every mutation follows the same shape: snapshot, apply the change
/// locally, send it, then replace the optimistic state with the server's
/// record, or roll back to the snapshot and surface the error.
pub struct App {
    service: BlockingGateway,
    list: TodoList,
    mode: Mode,
    loading: bool,
    error: Option<String>,
}

impl App {
    pub fn new(service: BlockingGateway) -> Self {
        let mut app = Self {
            service,
            list: TodoList::new(Vec::new()),
            mode: Mode::Normal,
            loading: false,
            error: None,
        };
        app.reload();
        app
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn todos(&self) -> &[Todo] {
        self.list.items()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::NewTodo { .. } | Mode::Edit { .. })
    }

    //  Operations

    /// Replace the collection with a fresh fetch. A failure keeps the
    /// current collection and lands in the error slot.
    pub fn reload(&mut self) {
        self.loading = true;
        self.error = None;
        match self.service.list() {
            Ok(todos) => self.list.replace(todos),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }

    /// Create a todo. A blank title is a local no-op; nothing is shown
    /// until the server confirms, then its record is prepended.
    /// Returns whether the todo was created.
    pub fn create(&mut self, title: &str, description: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.error = None;

        let description = description.trim();
        let payload = TodoPayload {
            title: Some(title.to_string()),
            description: Some((!description.is_empty()).then(|| description.to_string())),
            completed: Some(false),
            ..Default::default()
        };

        match self.service.create(&payload) {
            Ok(created) => {
                self.list.prepend(created);
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn start_edit(&mut self, todo: &Todo) {
        self.mode = Mode::Edit {
            id: todo.id.clone(),
            title: todo.title.clone().unwrap_or_default(),
            description: todo.description.clone().unwrap_or_default(),
            field: InputField::Title,
        };
    }

    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Apply the edited fields optimistically, then reconcile with the
    /// server's record or roll back to the snapshot.
    pub fn confirm_edit(&mut self, id: &TodoId, title: &str, description: &str) {
        self.error = None;

        let title = title.trim();
        let description = description.trim();
        let payload = TodoPayload {
            title: Some(if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            }),
            description: Some((!description.is_empty()).then(|| description.to_string())),
            ..Default::default()
        };

        let snapshot = self.list.items().to_vec();
        self.list.apply_payload(id, &payload);
        self.mode = Mode::Normal;

        match self.service.update(id, &payload) {
            Ok(saved) => self.list.replace_item(id, saved),
            Err(e) => {
                self.error = Some(e.to_string());
                self.list.replace(snapshot);
            }
        }
    }

    /// Flip the completed flag optimistically, same rollback contract.
    pub fn toggle_completion(&mut self, id: &TodoId) {
        let Some(current) = self.list.find(id).map(|t| t.completed) else {
            return;
        };
        self.error = None;

        let payload = TodoPayload {
            completed: Some(!current),
            ..Default::default()
        };

        let snapshot = self.list.items().to_vec();
        self.list.apply_payload(id, &payload);

        match self.service.update(id, &payload) {
            Ok(saved) => self.list.replace_item(id, saved),
            Err(e) => {
                self.error = Some(e.to_string());
                self.list.replace(snapshot);
            }
        }
    }

    /// Remove the todo locally first; a failed delete restores it at its
    /// original position.
    pub fn remove(&mut self, id: &TodoId) {
        let snapshot = self.list.items().to_vec();
        self.list.remove_item(id);
        self.error = None;

        if let Err(e) = self.service.remove(id) {
            self.error = Some(e.to_string());
            self.list.replace(snapshot);
        }
    }

    //  Key handling

    pub fn handle_key(&mut self, key: KeyEvent) {
        match &self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::NewTodo {
                title,
                description,
                field,
            } => self.handle_new_todo(key, title.clone(), description.clone(), *field),
            Mode::Edit {
                id,
                title,
                description,
                field,
            } => self.handle_edit(key, id.clone(), title.clone(), description.clone(), *field),
            Mode::ConfirmDelete { todo } => self.handle_confirm_delete(key, todo.clone()),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                self.mode = Mode::NewTodo {
                    title: String::new(),
                    description: String::new(),
                    field: InputField::Title,
                };
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(todo) = self.list.selected().cloned() {
                    self.start_edit(&todo);
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('t') => {
                if let Some(id) = self.list.selected().map(|t| t.id.clone()) {
                    self.toggle_completion(&id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(todo) = self.list.selected().cloned() {
                    self.mode = Mode::ConfirmDelete { todo };
                }
            }
            KeyCode::Char('r') => self.reload(),
            _ => self.list.handle_key(key),
        }
    }

    fn handle_new_todo(
        &mut self,
        key: KeyEvent,
        mut title: String,
        mut description: String,
        field: InputField,
    ) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let next_field = match field {
                    InputField::Title => InputField::Description,
                    InputField::Description => InputField::Title,
                };
                self.mode = Mode::NewTodo {
                    title,
                    description,
                    field: next_field,
                };
            }
            KeyCode::Enter => {
                if self.create(&title, &description) {
                    self.mode = Mode::Normal;
                }
                // A blank title or a failed create keeps the form up.
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                match field {
                    InputField::Title => {
                        title.pop();
                    }
                    InputField::Description => {
                        description.pop();
                    }
                }
                self.mode = Mode::NewTodo {
                    title,
                    description,
                    field,
                };
            }
            KeyCode::Char(c) => {
                match field {
                    InputField::Title => title.push(c),
                    InputField::Description => description.push(c),
                }
                self.mode = Mode::NewTodo {
                    title,
                    description,
                    field,
                };
            }
            _ => {}
        }
    }

    fn handle_edit(
        &mut self,
        key: KeyEvent,
        id: TodoId,
        mut title: String,
        mut description: String,
        field: InputField,
    ) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let next_field = match field {
                    InputField::Title => InputField::Description,
                    InputField::Description => InputField::Title,
                };
                self.mode = Mode::Edit {
                    id,
                    title,
                    description,
                    field: next_field,
                };
            }
            KeyCode::Enter => self.confirm_edit(&id, &title, &description),
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Backspace => {
                match field {
                    InputField::Title => {
                        title.pop();
                    }
                    InputField::Description => {
                        description.pop();
                    }
                }
                self.mode = Mode::Edit {
                    id,
                    title,
                    description,
                    field,
                };
            }
            KeyCode::Char(c) => {
                match field {
                    InputField::Title => title.push(c),
                    InputField::Description => description.push(c),
                }
                self.mode = Mode::Edit {
                    id,
                    title,
                    description,
                    field,
                };
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, todo: Todo) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.remove(&todo.id);
                self.mode = Mode::Normal;
            }
            _ => self.mode = Mode::Normal,
        }
    }

    //  Rendering

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.list.render(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::NewTodo {
                title,
                description,
                field,
            } => self.render_todo_form(frame, " New Todo ", title, description, *field, area),
            Mode::Edit {
                title,
                description,
                field,
                ..
            } => self.render_todo_form(frame, " Edit Todo ", title, description, *field, area),
            Mode::ConfirmDelete { todo } => self.render_confirm_delete(frame, todo, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" ticklist ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.service.base_url(), Style::default().fg(Color::DarkGray)),
        ];
        if self.loading {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("loading...", Style::default().fg(Color::Yellow)));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.error {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Red),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "move"),
                ("n", "new"),
                ("e", "edit"),
                ("Space", "toggle"),
                ("d", "del"),
                ("r", "reload"),
            ],
            Mode::NewTodo { .. } => {
                vec![("Tab", "next field"), ("Enter", "create"), ("Esc", "cancel")]
            }
            Mode::Edit { .. } => {
                vec![("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")]
            }
            Mode::ConfirmDelete { .. } => vec![("y", "confirm"), ("any", "cancel")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_todo_form(
        &self,
        frame: &mut Frame,
        heading: &str,
        title: &str,
        description: &str,
        field: InputField,
        area: Rect,
    ) {
        let popup = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(heading)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let title_style = match field {
            InputField::Title => Style::default().fg(Color::Cyan).bold(),
            InputField::Description => Style::default(),
        };
        let description_style = match field {
            InputField::Description => Style::default().fg(Color::Cyan).bold(),
            InputField::Title => Style::default(),
        };

        let lines = vec![
            Line::from(vec![Span::styled("Title: ", title_style), Span::raw(title)]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Description: ", description_style),
                Span::raw(description),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_confirm_delete(&self, frame: &mut Frame, todo: &Todo, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!(
            "Delete \"{}\"?\n\n(y)es / (any key) cancel",
            todo.title.as_deref().unwrap_or(UNTITLED)
        );
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
