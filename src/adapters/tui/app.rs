use chrono::Local;
use color_eyre::Result;
use ratatui::{
    layout::Margin,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{
    event::{AppEvent, EventHandler},
    route::Route,
    theme,
    views::{CreateTaskView, EditTaskView, TaskListView, ViewAction},
    widgets::{dialog::centered_rect, ConfirmDelete, Notification},
};
use crate::application::{AppResult, QueryKey, QueryStatus, TaskService};
use crate::domain::{Task, TaskColor, TaskId};

pub const TASK_ADDED: &str = "Task added successfully!";
pub const ADD_FAILED: &str = "Failed to add task. Please try again.";
pub const TASK_UPDATED: &str = "Task updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update task. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete task. Please try again.";

/// Identifies the screen instance a background result belongs to.
pub type ViewGeneration = u64;

/// Results of background work, tagged with the generation that asked.
#[derive(Debug)]
pub enum AppMessage {
    TasksLoaded(ViewGeneration, AppResult<Vec<Task>>),
    TaskLoaded(ViewGeneration, AppResult<Task>),
    TaskCreated(ViewGeneration, AppResult<Task>),
    TaskSaved(ViewGeneration, AppResult<Option<Task>>),
    TaskToggled(ViewGeneration, TaskId, AppResult<Option<Task>>),
    TaskDeleted(ViewGeneration, AppResult<()>),
}

impl AppMessage {
    fn generation(&self) -> ViewGeneration {
        match self {
            AppMessage::TasksLoaded(g, _)
            | AppMessage::TaskLoaded(g, _)
            | AppMessage::TaskCreated(g, _)
            | AppMessage::TaskSaved(g, _)
            | AppMessage::TaskToggled(g, _, _)
            | AppMessage::TaskDeleted(g, _) => *g,
        }
    }
}

pub enum View {
    List(TaskListView),
    Create(CreateTaskView),
    Edit(EditTaskView),
}

pub struct App {
    service: Arc<TaskService>,

    route: Route,
    view: View,
    generation: ViewGeneration,

    // Background work
    sender: UnboundedSender<AppMessage>,
    receiver: UnboundedReceiver<AppMessage>,
    in_flight: usize,
    toggling: HashSet<TaskId>,

    // Modals
    notification: Option<Notification>,
    confirm: Option<ConfirmDelete>,
    show_help: bool,

    should_quit: bool,
}

impl App {
    pub fn new(service: Arc<TaskService>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            service,
            route: Route::List,
            view: View::List(TaskListView::new()),
            generation: 0,
            sender,
            receiver,
            in_flight: 0,
            toggling: HashSet::new(),
            notification: None,
            confirm: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Enters the list screen and issues its first fetch.
    pub fn start(&mut self) {
        self.navigate(Route::List);
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn navigate(&mut self, route: Route) {
        self.generation += 1;
        self.route = route;
        self.confirm = None;
        tracing::info!("Navigating to {}", route);

        self.view = match route {
            Route::List => {
                self.load_tasks(false);
                View::List(TaskListView::new())
            }
            Route::Create => View::Create(CreateTaskView::new()),
            Route::Edit(id) => {
                self.load_task(id);
                View::Edit(EditTaskView::new(id))
            }
        };
    }

    fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = AppMessage> + Send + 'static,
    {
        self.in_flight += 1;
        let sender = self.sender.clone();
        tokio::spawn(async move {
            // The receiver only goes away on shutdown.
            let _ = sender.send(work.await);
        });
    }

    fn load_tasks(&mut self, refresh: bool) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(async move {
            let result = if refresh {
                service.refresh_tasks().await
            } else {
                service.list_tasks().await
            };
            AppMessage::TasksLoaded(generation, result)
        });
    }

    fn load_task(&mut self, id: TaskId) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(async move { AppMessage::TaskLoaded(generation, service.get_task(id).await) });
    }

    fn create_task(&mut self, title: String, color: TaskColor) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(async move {
            AppMessage::TaskCreated(generation, service.create_task(&title, color).await)
        });
    }

    fn save_task(&mut self, id: TaskId, title: String, color: TaskColor) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(async move {
            AppMessage::TaskSaved(generation, service.update_task(id, &title, color).await)
        });
    }

    /// At most one toggle per task is in flight; the flag it sends is
    /// based on the row as last fetched.
    fn toggle_task(&mut self, task: Task) {
        if !self.toggling.insert(task.id) {
            tracing::debug!("Toggle of task {} already in flight", task.id);
            return;
        }
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(async move {
            let result = service.toggle_completion(&task).await;
            AppMessage::TaskToggled(generation, task.id, result)
        });
    }

    /// Refetches the list if it is the screen on show.
    fn reload_list(&mut self) {
        if matches!(self.view, View::List(_)) {
            self.load_tasks(false);
        }
    }

    fn delete_task(&mut self, id: TaskId) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(async move { AppMessage::TaskDeleted(generation, service.delete_task(id).await) });
    }

    /// Applies every result that has already arrived, without waiting.
    pub fn drain_messages(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.handle_message(message);
        }
    }

    /// Waits until no background work is outstanding, including work
    /// started by the results themselves.
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.receiver.recv().await {
                Some(message) => {
                    self.in_flight -= 1;
                    self.handle_message(message);
                }
                None => break,
            }
        }
    }

    /// Applies one background result. Reads for a screen that was left
    /// are dropped; writes are always reported, but only touch the screen
    /// that issued them.
    pub fn handle_message(&mut self, message: AppMessage) {
        let current = message.generation() == self.generation;

        match message {
            AppMessage::TasksLoaded(..) | AppMessage::TaskLoaded(..) if !current => {
                tracing::debug!("Dropping result for a screen that was left: {:?}", message);
            }
            AppMessage::TasksLoaded(_, result) => {
                if let View::List(view) = &mut self.view {
                    match result {
                        Ok(tasks) => view.set_tasks(tasks),
                        Err(e) => {
                            tracing::error!("Failed to load tasks: {}", e);
                            view.set_failed();
                        }
                    }
                }
            }
            AppMessage::TaskLoaded(_, result) => {
                if let View::Edit(view) = &mut self.view {
                    match result {
                        Ok(task) => view.set_task(&task),
                        Err(e) => {
                            tracing::error!("Failed to load task {}: {}", view.id(), e);
                            view.set_failed();
                        }
                    }
                }
            }
            AppMessage::TaskCreated(_, result) => match result {
                Ok(_) => {
                    if current {
                        self.navigate(Route::List);
                    } else {
                        self.reload_list();
                    }
                    self.notification = Some(Notification::success(TASK_ADDED));
                }
                Err(e) => {
                    tracing::error!("Failed to add task: {}", e);
                    if current {
                        if let View::Create(view) = &mut self.view {
                            view.submission_failed();
                        }
                    }
                    self.notification = Some(Notification::error(ADD_FAILED));
                }
            },
            AppMessage::TaskSaved(_, result) => match result {
                Ok(_) => {
                    if current {
                        self.navigate(Route::List);
                    } else {
                        self.reload_list();
                    }
                    self.notification = Some(Notification::success(TASK_UPDATED));
                }
                Err(e) => {
                    tracing::error!("Failed to update task: {}", e);
                    if current {
                        if let View::Edit(view) = &mut self.view {
                            view.submission_failed();
                        }
                    }
                    self.notification = Some(Notification::error(UPDATE_FAILED));
                }
            },
            AppMessage::TaskToggled(_, id, result) => {
                self.toggling.remove(&id);
                match result {
                    Ok(_) => self.reload_list(),
                    Err(e) => {
                        tracing::error!("Failed to toggle task {}: {}", id, e);
                        self.notification = Some(Notification::error(UPDATE_FAILED));
                    }
                }
            }
            AppMessage::TaskDeleted(_, result) => match result {
                Ok(()) => self.reload_list(),
                Err(e) => {
                    tracing::error!("Failed to delete task: {}", e);
                    self.notification = Some(Notification::error(DELETE_FAILED));
                }
            },
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        if event == AppEvent::Tick {
            return;
        }
        if event == AppEvent::Quit {
            self.should_quit = true;
            return;
        }

        // Modals take every key while open
        if self.notification.take().is_some() {
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        if let Some(confirm) = self.confirm.take() {
            match event {
                AppEvent::Character('y') | AppEvent::Enter => self.delete_task(confirm.task.id),
                AppEvent::Character('n') | AppEvent::Escape => {}
                _ => self.confirm = Some(confirm),
            }
            return;
        }

        let action = match &mut self.view {
            View::List(view) => view.handle_event(&event),
            View::Create(view) => view.handle_event(&event),
            View::Edit(view) => view.handle_event(&event),
        };
        self.apply(action);
    }

    fn apply(&mut self, action: ViewAction) {
        match action {
            ViewAction::None => {}
            ViewAction::Navigate(route) => self.navigate(route),
            ViewAction::Toggle(task) => self.toggle_task(task),
            ViewAction::RequestDelete(task) => self.confirm = Some(ConfirmDelete::new(task)),
            ViewAction::Create { title, color } => self.create_task(title, color),
            ViewAction::Save { id, title, color } => self.save_task(id, title, color),
            ViewAction::Refresh => {
                if let View::List(view) = &mut self.view {
                    view.set_loading();
                }
                self.load_tasks(true);
            }
            ViewAction::ShowHelp => self.show_help = true,
            ViewAction::Quit => self.should_quit = true,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Screen
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);

        let body = chunks[1].inner(Margin {
            horizontal: 1,
            vertical: 0,
        });
        match &mut self.view {
            View::List(view) => view.render(frame, body),
            View::Create(view) => view.render(frame, body),
            View::Edit(view) => view.render(frame, body),
        }

        self.render_status_bar(frame, chunks[2]);

        if self.show_help {
            self.render_help(frame);
        }
        if let Some(confirm) = &self.confirm {
            confirm.render(frame);
        }
        if let Some(notification) = &self.notification {
            notification.render(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let screen = match self.route {
            Route::List => "Tasks",
            Route::Create => "New task",
            Route::Edit(_) => "Edit task",
        };

        let header = Line::from(vec![
            Span::styled("✓ todo", theme::heading()),
            Span::raw("  "),
            Span::styled(screen, Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(self.route.path(), Style::default().fg(theme::MUTED)),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Paragraph::new(header).block(block), area);
    }

    /// Cache status of the data the current screen reads.
    fn sync_status(&self) -> Option<QueryStatus> {
        let key = match self.route {
            Route::List => QueryKey::Tasks,
            Route::Edit(id) => QueryKey::Task(id),
            Route::Create => return None,
        };
        Some(self.service.queries().status(&key))
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = self.sync_status();
        let sync = status.as_ref().and_then(sync_label);
        let sync_width = sync.as_ref().map(|s| s.len() as u16 + 1).unwrap_or(0);
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(sync_width)])
            .split(area);

        let help_text = match &self.view {
            View::List(_) => {
                "j/k: navigate | Space: toggle | Enter: edit | n: new | d: delete | r: refresh | ?: help | q: quit"
            }
            View::Create(_) | View::Edit(_) => {
                "Tab: next field | ←/→: color | Enter: submit | Esc: back | Ctrl+C: quit"
            }
        };

        let paragraph = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, halves[0]);

        if let Some(label) = sync {
            let style = match status {
                Some(QueryStatus::Error(_)) => Style::default().fg(theme::ERROR),
                _ => Style::default().fg(theme::MUTED),
            };
            frame.render_widget(
                Paragraph::new(label).style(style).alignment(Alignment::Right),
                halves[1],
            );
        }
    }

    fn render_help(&self, frame: &mut Frame) {
        let popup_area = centered_rect(60, 70, frame.area());

        frame.render_widget(Clear, popup_area);

        let help_text = [
            "Todo TUI Help",
            "",
            "Task list:",
            "  j/k or ↑/↓     - Move selection",
            "  g/G            - First/last task",
            "  Space          - Toggle completion",
            "  Enter or e     - Edit task",
            "  n              - Create task",
            "  d              - Delete task",
            "  r              - Refresh",
            "",
            "Forms:",
            "  Tab/Shift+Tab  - Move between fields",
            "  ←/→            - Pick a color",
            "  Enter          - Submit",
            "  Esc            - Back to the list",
            "",
            "General:",
            "  ?              - Show this help",
            "  q              - Quit from the list",
            "  Ctrl+C         - Force quit",
            "",
            "Press any key to close this help",
        ]
        .join("\n");

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}

fn sync_label(status: &QueryStatus) -> Option<String> {
    match status {
        QueryStatus::Idle => None,
        QueryStatus::Loading => Some("Syncing...".to_string()),
        QueryStatus::Success { fetched_at } => Some(format!(
            "Synced {}",
            fetched_at.with_timezone(&Local).format("%H:%M:%S")
        )),
        QueryStatus::Error(_) => Some("Sync failed".to_string()),
        QueryStatus::Stale => Some("Out of date".to_string()),
    }
}

pub async fn run_tui(mut app: App) -> Result<()> {
    // Set up terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();

    let mut event_handler = EventHandler::new();

    // Main loop
    let outcome = loop {
        app.drain_messages();

        if let Err(e) = terminal.draw(|frame| app.render(frame)) {
            break Err(e.into());
        }

        match event_handler.next_event().await {
            Ok(event) => app.handle_event(event),
            Err(e) => break Err(e),
        }

        if app.should_quit() || event_handler.should_quit() {
            break Ok(());
        }
    };

    // Cleanup
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;

    outcome
}
