use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{Focus, Model};
use crate::search::{AnswerState, SearchMode, SuggestionState};
use crate::ui::markup::MarkupLine;
use crate::viewer::{LoadState, PageRow};

use super::{PaneLayout, overlays, pane_layout, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let panes = pane_layout(area.width, area.height);

    render_viewer(model, frame, &panes);
    render_search(model, frame, &panes);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, panes.status);
    } else {
        status::render_status_bar(model, frame, panes.status);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.upload_prompt.is_some() {
        overlays::render_upload_prompt(model, frame, area);
    }
}

fn render_viewer(model: &Model, frame: &mut Frame, panes: &PaneLayout) {
    let session = &model.session;
    let title = session
        .renderer
        .as_ref()
        .map_or_else(|| "Pagewise".to_string(), |r| r.display_name());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style::border_style(model.focus == Focus::Viewer));
    frame.render_widget(block, panes.viewer);

    let Some(renderer) = session.renderer.as_ref() else {
        let hint = Paragraph::new(Line::styled(
            "No document. Press o to open one.",
            style::dim_style(),
        ));
        frame.render_widget(hint, panes.pages);
        return;
    };

    let total = renderer
        .total_pages()
        .map_or_else(|| "-".to_string(), |n| n.to_string());
    let toolbar = format!(
        " Page {} / {}   Zoom {}%   -/+ zoom",
        session.current_page(),
        total,
        renderer.zoom().percent()
    );
    frame.render_widget(
        Paragraph::new(toolbar).style(style::toolbar_style()),
        panes.toolbar,
    );

    let body: Vec<Line> = match renderer.load_state() {
        LoadState::Loading => vec![Line::styled("Loading document...", style::dim_style())],
        LoadState::Failed(message) => vec![
            Line::styled("Failed to load document.", style::error_style()),
            Line::raw(message.clone()),
        ],
        LoadState::Loaded => renderer
            .rows()
            .skip(session.viewport.offset())
            .take(usize::from(panes.pages.height))
            .map(|row| page_row_line(&row, panes.pages.width))
            .collect(),
    };
    frame.render_widget(Paragraph::new(body), panes.pages);
}

fn page_row_line(row: &PageRow<'_>, width: u16) -> Line<'static> {
    let text = match row {
        PageRow::Header { index, total } => {
            let label = format!(" Page {index} of {total} ");
            let rule = usize::from(width).saturating_sub(label.chars().count() + 2);
            format!("──{label}{}", "─".repeat(rule))
        }
        PageRow::Text(text) => (*text).to_string(),
        PageRow::Pending { index } => format!("  rendering page {index}..."),
        PageRow::Failed { index, error } => format!("  page {index} failed: {error}"),
    };
    Line::styled(text, style::style_for_page_row(row))
}

fn render_search(model: &Model, frame: &mut Frame, panes: &PaneLayout) {
    let search = &model.session.search;
    let focused = model.focus == Focus::Search;
    let title = match search.mode() {
        SearchMode::Local { .. } => "Search",
        SearchMode::Remote => "Ask",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style::border_style(focused));
    frame.render_widget(block, panes.search);

    let cursor = if focused { "\u{258f}" } else { "" };
    let input = Line::from(vec![
        Span::styled("> ", style::dim_style()),
        Span::raw(search.query().to_string()),
        Span::raw(cursor),
    ]);
    frame.render_widget(Paragraph::new(input), panes.input);

    frame.render_widget(
        Paragraph::new(suggestion_lines(model, panes.suggestions.height)),
        panes.suggestions,
    );

    let separator = "─".repeat(usize::from(panes.separator.width));
    frame.render_widget(
        Paragraph::new(Line::styled(separator, style::dim_style())),
        panes.separator,
    );

    let answer: Vec<Line> = if matches!(search.answer_state(), AnswerState::Loading { .. }) {
        vec![Line::styled("Loading answer...", style::dim_style())]
    } else {
        let range = model.session.answer_view.visible_range();
        model.session.answer_lines[range]
            .iter()
            .map(markup_line)
            .collect()
    };
    frame.render_widget(Paragraph::new(answer), panes.answer);
}

fn suggestion_lines(model: &Model, rows: u16) -> Vec<Line<'static>> {
    let search = &model.session.search;
    let filter = search.filter();
    let matches = filter.matches();
    if matches.is_empty() {
        let text = match search.suggestion_state() {
            SuggestionState::Loading => "loading suggestions...",
            SuggestionState::Idle | SuggestionState::Ready => "",
        };
        return vec![Line::styled(text, style::dim_style())];
    }
    let rows = usize::from(rows).max(1);
    let start = filter
        .selected()
        .map_or(0, |selected| (selected + 1).saturating_sub(rows));
    matches
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
        .map(|(i, keyword)| {
            if filter.selected() == Some(i) {
                Line::styled(format!(" {keyword}"), style::selected_suggestion_style())
            } else {
                Line::raw(format!(" {keyword}"))
            }
        })
        .collect()
}

fn markup_line(line: &MarkupLine) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|span| {
                if span.marked {
                    Span::styled(span.text.clone(), style::mark_style())
                } else {
                    Span::raw(span.text.clone())
                }
            })
            .collect::<Vec<_>>(),
    )
}
