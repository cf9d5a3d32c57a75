use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::adapters::tui::theme;

/// Single-line text field. The cursor counts characters, not bytes; the
/// text scrolls sideways to keep it on screen.
pub struct TextInput {
    label: &'static str,
    placeholder: &'static str,
    value: String,
    cursor_position: usize,
    is_focused: bool,
}

impl TextInput {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            cursor_position: 0,
            is_focused: false,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
        self
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor_position += 1;
    }

    /// Backspace.
    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let index = self.byte_index();
        self.value.remove(index);
    }

    /// Delete key.
    pub fn delete_forward(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let index = self.byte_index();
            self.value.remove(index);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    /// First visible byte and the cursor's screen column for a field
    /// `width` cells wide.
    fn visible_window(&self, width: u16) -> (usize, u16) {
        let cursor = self.byte_index();
        let limit = usize::from(width.saturating_sub(1));
        let mut start = 0;
        let mut column = display_width(&self.value[..cursor]);
        for (i, c) in self.value[..cursor].char_indices() {
            if column <= limit {
                break;
            }
            let next = i + c.len_utf8();
            column -= display_width(&self.value[i..next]);
            start = next;
        }
        (start, column as u16)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::focused_border(self.is_focused));

        let inner_width = area.width.saturating_sub(2);
        let (start, cursor_column) = self.visible_window(inner_width);

        let (text, text_style) = if self.value.is_empty() {
            (self.placeholder, Style::default().fg(Color::DarkGray))
        } else {
            (&self.value[start..], Style::default())
        };

        let paragraph = Paragraph::new(text).block(block).style(text_style);
        frame.render_widget(paragraph, area);

        if self.is_focused && inner_width > 0 {
            frame.set_cursor_position(Position {
                x: area.x + 1 + cursor_column,
                y: area.y + 1,
            });
        }
    }
}

fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}
