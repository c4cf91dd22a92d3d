//! Colors and text styles.

use ratatui::style::{Color, Modifier, Style};

use crate::viewer::PageRow;

/// Highlighted search match.
pub fn mark_style() -> Style {
    Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

pub fn dim_style() -> Style {
    Style::default().fg(Color::Indexed(245))
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn toolbar_style() -> Style {
    Style::default().bg(Color::Indexed(236)).fg(Color::White)
}

pub fn selected_suggestion_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Style for one row of the page stack.
pub fn style_for_page_row(row: &PageRow<'_>) -> Style {
    match row {
        PageRow::Header { .. } => Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
        PageRow::Text(_) => Style::default(),
        PageRow::Pending { .. } => dim_style().add_modifier(Modifier::ITALIC),
        PageRow::Failed { .. } => error_style(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_border_is_highlighted() {
        assert_eq!(border_style(true).fg, Some(Color::Yellow));
        assert_eq!(border_style(false).fg, None);
    }

    #[test]
    fn test_page_row_styles_differ_by_state() {
        let header = style_for_page_row(&PageRow::Header { index: 1, total: 2 });
        let failed = style_for_page_row(&PageRow::Failed {
            index: 1,
            error: "boom",
        });
        assert_eq!(header.fg, Some(Color::Cyan));
        assert_eq!(failed.fg, Some(Color::Red));
        assert_eq!(style_for_page_row(&PageRow::Text("x")), Style::default());
    }
}
