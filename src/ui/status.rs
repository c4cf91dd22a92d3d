use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, ToastLevel};
use crate::viewer::LoadState;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let session = &model.session;
    let name = session
        .renderer
        .as_ref()
        .map_or_else(|| "no document".to_string(), |r| r.display_name());

    let page_info = match session.renderer.as_ref().map(|r| r.load_state()) {
        Some(LoadState::Loaded) => format!(
            "Page {}/{}",
            session.current_page(),
            session.total_pages().unwrap_or_default()
        ),
        Some(LoadState::Loading) => "loading".to_string(),
        Some(LoadState::Failed(_)) => "failed".to_string(),
        None => String::new(),
    };
    let zoom = session
        .zoom()
        .unwrap_or(model.settings.zoom)
        .percent();
    let focus = match model.focus {
        Focus::Viewer => "[viewer]",
        Focus::Search => "[search]",
    };

    let status = format!(" {name}  {page_info}  [{zoom}%]  {focus}  ?:help");
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
