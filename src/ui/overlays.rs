use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::style;

/// Lines of the help overlay, before the config section.
fn help_lines() -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    vec![
        Line::styled("Viewer", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  Space/PageDown      Page down"),
        Line::raw("  b/PageUp            Page up"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw("  + / -               Zoom in / out"),
        Line::raw(""),
        Line::styled("Search", section_style),
        Line::raw("  Tab or /            Focus search"),
        Line::raw("  Up/Down             Choose suggestion"),
        Line::raw("  Enter               Accept suggestion or submit"),
        Line::raw("  Ctrl-u              Clear query"),
        Line::raw("  PageUp/PageDown     Scroll answer"),
        Line::raw("  Esc                 Back to viewer"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  o                   Open document"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw("  ? / F1              Toggle help"),
        Line::raw(""),
    ]
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let mut all_lines = help_lines();
    all_lines.push(Line::styled(
        "Config",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Border and padding on each side
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Last row is the footer
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = usize::from(content_height_u16);
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll.min(max_scroll);
    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} Esc closes", style::dim_style());
    frame.render_widget(Paragraph::new(footer), footer_area);
}

pub fn render_upload_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(prompt) = model.upload_prompt.as_ref() else {
        return;
    };
    let popup_width = area.width.saturating_sub(16).max(44);
    let popup = centered_popup_rect(popup_width, 7, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Path: ", style::dim_style()),
            Span::raw(prompt.input.clone()),
            Span::raw("\u{258f}"),
        ]),
        Line::raw(""),
    ];
    match &prompt.error {
        Some(error) => lines.push(Line::styled(error.clone(), style::error_style())),
        None => lines.push(Line::styled(
            "Enter opens \u{00b7} Esc cancels",
            style::dim_style(),
        )),
    }

    let block = Block::default()
        .title("Open Document")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
