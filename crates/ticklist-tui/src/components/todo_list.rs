use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ticklist_core::{Todo, TodoId, TodoPayload};

/// The todo collection plus the cursor over it.
pub struct TodoList {
    items: Vec<Todo>,
    list_state: ListState,
}

impl TodoList {
    pub fn new(items: Vec<Todo>) -> Self {
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(0));
        }
        Self { items, list_state }
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Returns the currently highlighted todo, if any.
    pub fn selected(&self) -> Option<&Todo> {
        let idx = self.list_state.selected()?;
        self.items.get(idx)
    }

    pub fn find(&self, id: &TodoId) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == *id)
    }

    pub fn select_by_id(&mut self, id: &TodoId) -> bool {
        if let Some(idx) = self.items.iter().position(|t| t.id == *id) {
            self.list_state.select(Some(idx));
            return true;
        }
        false
    }

    /// Replace the collection, keeping the cursor on the same todo where
    /// possible.
    pub fn replace(&mut self, items: Vec<Todo>) {
        let selected_id = self.selected().map(|t| t.id.clone());
        self.items = items;
        let idx = selected_id.and_then(|id| self.items.iter().position(|t| t.id == id));
        match idx {
            Some(idx) => self.list_state.select(Some(idx)),
            None if self.items.is_empty() => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
        }
    }

    pub fn prepend(&mut self, todo: Todo) {
        self.items.insert(0, todo);
        match self.list_state.selected() {
            Some(idx) => self.list_state.select(Some(idx + 1)),
            None => self.list_state.select(Some(0)),
        }
    }

    pub fn apply_payload(&mut self, id: &TodoId, payload: &TodoPayload) {
        if let Some(todo) = self.items.iter_mut().find(|t| t.id == *id) {
            payload.apply_to(todo);
        }
    }

    pub fn replace_item(&mut self, id: &TodoId, todo: Todo) {
        if let Some(slot) = self.items.iter_mut().find(|t| t.id == *id) {
            *slot = todo;
        }
    }

    pub fn remove_item(&mut self, id: &TodoId) {
        self.items.retain(|t| t.id != *id);
        if let Some(idx) = self.list_state.selected() {
            if idx >= self.items.len() {
                self.list_state.select(if self.items.is_empty() {
                    None
                } else {
                    Some(self.items.len() - 1)
                });
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let current = self.list_state.selected().unwrap_or(0);
                if current + 1 < self.items.len() {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let current = self.list_state.selected().unwrap_or(0);
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            // Jump to first/last
            KeyCode::Char('g') => {
                if !self.items.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Char('G') => {
                if !self.items.is_empty() {
                    self.list_state.select(Some(self.items.len() - 1));
                }
            }
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" todos ({}) ", self.items.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|todo| {
                let (check, check_style) = if todo.completed {
                    ("[x] ", Style::default().fg(Color::Green))
                } else {
                    ("[ ] ", Style::default().fg(Color::DarkGray))
                };
                let title_style = if todo.completed {
                    Style::default().fg(Color::DarkGray).crossed_out()
                } else {
                    Style::default()
                };
                let mut spans = vec![
                    Span::styled(check, check_style),
                    Span::styled(todo.title.as_deref().unwrap_or("(untitled)"), title_style),
                ];
                if let Some(desc) = todo.description.as_deref() {
                    if !desc.is_empty() {
                        spans.push(Span::styled(
                            format!("  {desc}"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn make_todo(id: i64, title: &str) -> Todo {
        Todo {
            id: TodoId::Int(id),
            title: Some(title.to_string()),
            description: None,
            completed: false,
            priority: Some(1),
            due_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn make_list() -> TodoList {
        TodoList::new(vec![
            make_todo(1, "one"),
            make_todo(2, "two"),
            make_todo(3, "three"),
        ])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn starts_with_first_selected() {
        let list = make_list();
        assert_eq!(list.selected().unwrap().id, TodoId::Int(1));
    }

    #[test]
    fn select_by_id_matches_either_representation() {
        let mut list = make_list();
        assert!(list.select_by_id(&TodoId::Text("2".into())));
        assert_eq!(list.selected().unwrap().id, TodoId::Int(2));
    }

    #[test]
    fn replace_keeps_cursor_on_same_todo() {
        let mut list = make_list();
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(list.selected().unwrap().id, TodoId::Int(2));

        // Same todos, new order
        list.replace(vec![
            make_todo(3, "three"),
            make_todo(2, "two"),
            make_todo(1, "one"),
        ]);
        assert_eq!(list.selected().unwrap().id, TodoId::Int(2));
    }

    #[test]
    fn replace_falls_back_to_first_when_todo_is_gone() {
        let mut list = make_list();
        list.handle_key(key(KeyCode::Char('G')));
        list.replace(vec![make_todo(1, "one")]);
        assert_eq!(list.selected().unwrap().id, TodoId::Int(1));
    }

    #[test]
    fn prepend_keeps_cursor_on_same_todo() {
        let mut list = make_list();
        list.handle_key(key(KeyCode::Char('j')));
        list.prepend(make_todo(4, "four"));
        assert_eq!(list.items()[0].id, TodoId::Int(4));
        assert_eq!(list.selected().unwrap().id, TodoId::Int(2));
    }

    #[test]
    fn remove_clamps_the_cursor() {
        let mut list = make_list();
        list.handle_key(key(KeyCode::Char('G')));
        list.remove_item(&TodoId::Int(3));
        assert_eq!(list.selected().unwrap().id, TodoId::Int(2));

        list.remove_item(&TodoId::Int(2));
        list.remove_item(&TodoId::Int(1));
        assert!(list.selected().is_none());
    }

    #[test]
    fn apply_payload_touches_only_the_matching_todo() {
        let mut list = make_list();
        let payload = TodoPayload {
            completed: Some(true),
            ..Default::default()
        };
        list.apply_payload(&TodoId::Int(2), &payload);
        assert!(!list.items()[0].completed);
        assert!(list.items()[1].completed);
        assert!(!list.items()[2].completed);
    }
}
