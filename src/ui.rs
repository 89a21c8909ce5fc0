use crate::error::{Result, TaskersError};
use crate::kanban_board::{Action, KanbanBoard};
use crate::store::TaskRepository;
use crate::task::TaskStatus;
use chrono::{Datelike, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing the text of a new task.
    Adding(String),
}

/// Everything the board screen needs between key presses.
#[derive(Debug, Default)]
pub struct App {
    pub board: KanbanBoard,
    pub mode: Mode,
    pub message: Option<String>,
}

impl App {
    pub fn new(board: KanbanBoard) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    /// Handles one key press. Returns `false` once the user asked to quit.
    pub fn handle_key<R: TaskRepository>(&mut self, repo: &R, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return true;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }
        // Other Ctrl/Alt chords are not bound to anything.
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return true;
        }
        if let Mode::Adding(input) = &mut self.mode {
            match key.code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Enter => {
                    let text = std::mem::take(input);
                    self.mode = Mode::Normal;
                    self.dispatch(repo, Action::Add(text));
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return true;
        }

        self.message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('a') => self.mode = Mode::Adding(String::new()),
            KeyCode::Left | KeyCode::Char('h') => self.board.select_status(TaskStatus::Ongoing),
            KeyCode::Right | KeyCode::Char('l') => self.board.select_status(TaskStatus::Done),
            KeyCode::Up | KeyCode::Char('k') => self.board.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.board.move_selection(1),
            KeyCode::Enter | KeyCode::Char('c') => {
                if self.board.selected_status == TaskStatus::Ongoing {
                    if let Some(id) = self.board.selected().map(|t| t.id) {
                        self.dispatch(repo, Action::Complete(id));
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.board.selected().map(|t| t.id) {
                    let from = self.board.selected_status;
                    self.dispatch(repo, Action::Delete { id, from });
                }
            }
            KeyCode::Char('D') => {
                let status = self.board.selected_status;
                self.dispatch(repo, Action::Clear(status));
            }
            _ => {}
        }
        true
    }

    fn dispatch<R: TaskRepository>(&mut self, repo: &R, action: Action) {
        if let Err(err) = self.board.apply(repo, action) {
            if !matches!(err, TaskersError::Validation(_)) {
                warn!(error = %err, "action failed");
            }
            self.message = Some(err.to_string());
        }
    }
}

pub fn run_app<B: Backend, R: TaskRepository>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    repo: &R,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if !app.handle_key(repo, key) {
                return Ok(());
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    for (i, status) in TaskStatus::ALL.into_iter().enumerate() {
        draw_column(f, app, status, columns[i]);
    }

    let input = match &app.mode {
        Mode::Adding(text) => Paragraph::new(text.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Add a New Task").borders(Borders::ALL)),
        Mode::Normal => {
            let hint = app.message.as_deref().unwrap_or(
                "a add  c complete  d delete  D delete all  ←/→ column  q quit",
            );
            Paragraph::new(hint).block(Block::default().borders(Borders::ALL))
        }
    };
    f.render_widget(input, rows[1]);

    let footer = Paragraph::new(format!("Task Manager © {}", Local::now().year()))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, rows[2]);
}

fn draw_column(f: &mut Frame, app: &App, status: TaskStatus, area: Rect) {
    let (title, empty) = match status {
        TaskStatus::Ongoing => ("Ongoing Tasks", "No ongoing tasks!"),
        TaskStatus::Done => ("Done Tasks", "No tasks completed yet!"),
    };
    let focused = app.board.selected_status == status;
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    let tasks = app.board.get_tasks_by_status(status);
    if tasks.is_empty() {
        f.render_widget(Paragraph::new(empty).block(block), area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("[#{}] ", t.id)),
                Span::styled(t.text.as_str(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.board.selected_task));
    }
    f.render_stateful_widget(list, area, &mut state);
}
