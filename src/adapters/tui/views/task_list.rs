use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Table, TableState},
};

use super::{QueryState, ViewAction};
use crate::adapters::tui::{event::AppEvent, route::Route, theme, widgets::TaskItem};
use crate::domain::Task;

pub const EMPTY_TITLE: &str = "You don't have any tasks registered yet.";
pub const EMPTY_HINT: &str = "Create tasks and organize your to-do items.";
pub const FETCH_ERROR: &str = "Error fetching tasks. Press r to try again.";

/// The `/` screen.
pub struct TaskListView {
    tasks: QueryState<Vec<Task>>,
    table_state: TableState,
}

impl TaskListView {
    pub fn new() -> Self {
        Self {
            tasks: QueryState::Loading,
            table_state: TableState::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &QueryState<Vec<Task>> {
        &self.tasks
    }

    pub fn set_loading(&mut self) {
        self.tasks = QueryState::Loading;
    }

    pub fn set_failed(&mut self) {
        self.tasks = QueryState::Failed;
    }

    /// Replaces the list, keeping the selection on the same row index
    /// where it still exists.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let selected = if tasks.is_empty() {
            None
        } else {
            let previous = self.table_state.selected().unwrap_or(0);
            Some(previous.min(tasks.len() - 1))
        };
        self.table_state.select(selected);
        self.tasks = QueryState::Ready(tasks);
    }

    pub fn tasks(&self) -> &[Task] {
        match &self.tasks {
            QueryState::Ready(tasks) => tasks,
            _ => &[],
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.table_state
            .selected()
            .and_then(|index| self.tasks().get(index))
    }

    /// `(total, completed)` for the current list.
    pub fn counts(&self) -> (usize, usize) {
        let tasks = self.tasks();
        let completed = tasks.iter().filter(|t| t.completed).count();
        (tasks.len(), completed)
    }

    fn next_task(&mut self) {
        let len = self.tasks().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn previous_task(&mut self) {
        if self.tasks().is_empty() {
            return;
        }
        let i = self.table_state.selected().unwrap_or(0).saturating_sub(1);
        self.table_state.select(Some(i));
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> ViewAction {
        match event {
            AppEvent::Character('q') => ViewAction::Quit,
            AppEvent::Character('?') => ViewAction::ShowHelp,
            AppEvent::Character('r') => ViewAction::Refresh,
            AppEvent::Character('n') => ViewAction::Navigate(Route::Create),
            AppEvent::Down | AppEvent::Character('j') => {
                self.next_task();
                ViewAction::None
            }
            AppEvent::Up | AppEvent::Character('k') => {
                self.previous_task();
                ViewAction::None
            }
            AppEvent::Home | AppEvent::Character('g') => {
                if !self.tasks().is_empty() {
                    self.table_state.select(Some(0));
                }
                ViewAction::None
            }
            AppEvent::End | AppEvent::Character('G') => {
                let len = self.tasks().len();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                ViewAction::None
            }
            AppEvent::Character(' ') => self
                .selected_task()
                .map(|task| ViewAction::Toggle(task.clone()))
                .unwrap_or(ViewAction::None),
            AppEvent::Character('d') | AppEvent::Delete => self
                .selected_task()
                .map(|task| ViewAction::RequestDelete(task.clone()))
                .unwrap_or(ViewAction::None),
            AppEvent::Enter | AppEvent::Character('e') => self
                .selected_task()
                .map(|task| ViewAction::Navigate(Route::Edit(task.id)))
                .unwrap_or(ViewAction::None),
            _ => ViewAction::None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Create action
                Constraint::Length(1), // Counts
                Constraint::Min(0),
            ])
            .split(area);

        let create = Line::from(vec![
            Span::styled("n ", Style::default().fg(theme::MUTED)),
            Span::styled(
                "Create Task ⊕",
                Style::default()
                    .fg(Color::White)
                    .bg(theme::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(create), chunks[0]);

        self.render_counts(frame, chunks[1]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::focused_border(true));

        match &self.tasks {
            QueryState::Loading => {
                let paragraph = Paragraph::new("Loading...")
                    .block(block)
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, chunks[2]);
            }
            QueryState::Failed => {
                let paragraph = Paragraph::new(FETCH_ERROR)
                    .block(block)
                    .style(Style::default().fg(theme::ERROR))
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, chunks[2]);
            }
            QueryState::Ready(tasks) if tasks.is_empty() => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        EMPTY_TITLE,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(EMPTY_HINT, Style::default().fg(theme::MUTED))),
                ];
                let paragraph = Paragraph::new(lines)
                    .block(block)
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, chunks[2]);
            }
            QueryState::Ready(tasks) => {
                let rows: Vec<_> = tasks.iter().map(|task| TaskItem::new(task).row()).collect();

                let table = Table::new(rows, [Constraint::Length(2), Constraint::Min(10)])
                    .block(block)
                    .highlight_style(Style::default().bg(Color::DarkGray))
                    .highlight_symbol("▶ ");

                frame.render_stateful_widget(table, chunks[2], &mut self.table_state);
            }
        }
    }

    fn render_counts(&self, frame: &mut Frame, area: Rect) {
        let (total, completed) = self.counts();

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let created = Line::from(vec![
            Span::styled("Tasks ", theme::heading()),
            Span::styled(total.to_string(), Style::default().fg(theme::ACCENT)),
        ]);
        frame.render_widget(Paragraph::new(created), halves[0]);

        let done = Line::from(vec![
            Span::styled(
                "Completed: ",
                Style::default()
                    .fg(theme::COMPLETED)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{completed} of {total}"),
                Style::default().fg(theme::ACCENT),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(done).alignment(Alignment::Right),
            halves[1],
        );
    }
}
