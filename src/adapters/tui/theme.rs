use ratatui::style::{Color, Modifier, Style};

use crate::domain::TaskColor;

pub const PRIMARY: Color = Color::Rgb(0x1d, 0x70, 0xa0);
pub const ACCENT: Color = Color::Rgb(0x5e, 0x5f, 0xce);
pub const COMPLETED: Color = Color::Rgb(0xa8, 0x55, 0xf7);
pub const MUTED: Color = Color::Gray;
pub const ERROR: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const SUCCESS: Color = Color::Rgb(0x22, 0xc5, 0x5e);

pub fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Terminal color for a palette entry.
pub fn task_color(color: TaskColor) -> Color {
    hex_to_rgb(color.hex())
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Gray)
}

/// Foreground that stays readable on top of a swatch.
pub fn swatch_foreground(color: TaskColor) -> Color {
    if should_use_light_text(color.hex()) {
        Color::White
    } else {
        Color::Black
    }
}

/// Calculate luminance of a color for contrast calculation
fn calculate_luminance(r: u8, g: u8, b: u8) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Parse hex color string to RGB values
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Light text when it contrasts better than dark text would.
fn should_use_light_text(bg_color: &str) -> bool {
    hex_to_rgb(bg_color)
        .map(|(r, g, b)| {
            let luminance = calculate_luminance(r, g, b);
            1.05 / (luminance + 0.05) > (luminance + 0.05) / 0.05
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_maps_to_rgb() {
        assert_eq!(task_color(TaskColor::Red), Color::Rgb(0xef, 0x44, 0x44));
        for color in TaskColor::ALL {
            assert!(matches!(task_color(color), Color::Rgb(..)));
        }
    }

    #[test]
    fn hex_parsing_rejects_short_values() {
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#000000"), Some((0, 0, 0)));
    }

    #[test]
    fn text_contrast_follows_background() {
        assert!(should_use_light_text("#1a1a1a"));
        assert!(!should_use_light_text("#EAB308"));
        assert_eq!(swatch_foreground(TaskColor::Yellow), Color::Black);
    }
}
