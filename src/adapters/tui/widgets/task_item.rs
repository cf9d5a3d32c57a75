use ratatui::{prelude::*, widgets::Row};

use crate::adapters::tui::theme;
use crate::domain::Task;

pub const CHECKED: &str = "●";
pub const UNCHECKED: &str = "○";
pub const SWATCH: &str = "■";

/// One row of the task list: checkbox, color swatch, title.
pub struct TaskItem<'a> {
    task: &'a Task,
}

impl<'a> TaskItem<'a> {
    pub fn new(task: &'a Task) -> Self {
        Self { task }
    }

    pub fn checkbox(&self) -> Span<'a> {
        if self.task.completed {
            Span::styled(
                CHECKED,
                Style::default()
                    .fg(theme::COMPLETED)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(UNCHECKED, Style::default().fg(theme::PRIMARY))
        }
    }

    pub fn swatch(&self) -> Span<'a> {
        Span::styled(
            SWATCH,
            Style::default().fg(theme::task_color(self.task.color)),
        )
    }

    pub fn title(&self) -> Span<'a> {
        let style = if self.task.completed {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(self.task.title.as_str(), style)
    }

    pub fn row(&self) -> Row<'a> {
        let row = Row::new(vec![
            Line::from(self.checkbox()),
            Line::from(vec![self.swatch(), Span::raw(" "), self.title()]),
        ]);

        if self.task.completed {
            row.style(Style::default().add_modifier(Modifier::DIM))
        } else {
            row
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskColor, TaskId};

    fn task(completed: bool) -> Task {
        Task {
            id: TaskId(1),
            title: "Brush teeth".to_string(),
            color: TaskColor::Orange,
            completed,
        }
    }

    #[test]
    fn completion_drives_checkbox_and_strike_through() {
        for completed in [false, true] {
            let task = task(completed);
            let item = TaskItem::new(&task);

            assert_eq!(item.checkbox().content == CHECKED, completed);
            assert_eq!(
                item.title().style.add_modifier.contains(Modifier::CROSSED_OUT),
                completed
            );
            assert_eq!(item.title().content, "Brush teeth");
        }
    }

    #[test]
    fn swatch_uses_task_color() {
        let task = task(false);
        let swatch = TaskItem::new(&task).swatch();
        assert_eq!(swatch.style.fg, Some(theme::task_color(TaskColor::Orange)));
    }
}
