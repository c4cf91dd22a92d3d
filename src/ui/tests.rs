use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Modifier;

use super::*;
use crate::app::{Message, Model, Settings, update};
use crate::document::DocumentHandle;
use crate::services::RenderedPage;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(120, 30);
    Terminal::new(backend).unwrap()
}

fn buffer_text(buffer: &Buffer) -> String {
    buffer.content().iter().map(|c| c.symbol()).collect()
}

fn draw(model: &Model) -> Buffer {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn open(model: Model, url: &str) -> Model {
    update(model, Message::OpenDocument(DocumentHandle::Url(url.to_string())))
}

fn loaded_model(pages: usize) -> Model {
    let model = open(Model::new(Settings::default(), (120, 30)), "file:///tmp/report.pdf");
    let session = model.session.id;
    let mut model = update(
        model,
        Message::DocumentOpened {
            session,
            result: Ok(pages),
        },
    );
    let width = model
        .session
        .renderer
        .as_ref()
        .and_then(|r| r.render_width());
    model = update(
        model,
        Message::PageRendered {
            session,
            page: RenderedPage {
                index: 1,
                requested_width: width,
                rows: vec!["Invoice #12345".to_string(), "Total: $130.00".to_string()],
            },
        },
    );
    model
}

#[test]
fn test_pane_layout_splits_viewer_and_search() {
    let panes = pane_layout(120, 30);
    assert_eq!(panes.status.y, 29);
    assert_eq!(panes.status.height, 1);
    assert!(panes.viewer.width > panes.search.width);
    assert_eq!(panes.viewer.x + panes.viewer.width, panes.search.x);
    assert_eq!(panes.toolbar.height, 1);
    assert_eq!(panes.pages.y, panes.toolbar.y + 1);
    assert_eq!(panes.suggestions.height, SUGGESTION_ROWS);
    assert_eq!(panes.answer.y, panes.separator.y + 1);
}

#[test]
fn test_pane_layout_handles_tiny_terminal() {
    let panes = pane_layout(3, 2);
    assert_eq!(panes.pages.height, 0);
    assert_eq!(panes.answer.width, 0);
}

#[test]
fn test_render_without_document_shows_hint() {
    let model = Model::new(Settings::default(), (120, 30));
    let content = buffer_text(&draw(&model));
    assert!(content.contains("No document. Press o to open one."));
    assert!(content.contains("no data"));
}

#[test]
fn test_render_shows_toolbar_with_page_and_zoom() {
    let model = loaded_model(3);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Page 1 / 3"), "toolbar should show page count");
    assert!(content.contains("Zoom 90%"));
    assert!(content.contains("report.pdf"));
}

#[test]
fn test_render_shows_rendered_and_pending_pages() {
    let model = loaded_model(3);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Invoice #12345"));
    assert!(content.contains("Page 2 of 3"));
    assert!(content.contains("rendering page 2..."));
}

#[test]
fn test_render_failed_load_shows_error() {
    let model = open(Model::new(Settings::default(), (120, 30)), "file:///missing.pdf");
    let session = model.session.id;
    let model = update(
        model,
        Message::DocumentOpened {
            session,
            result: Err("file not found".to_string()),
        },
    );
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Failed to load document."));
    assert!(content.contains("file not found"));
    assert!(content.contains("Page 1 / -"));
}

#[test]
fn test_render_highlights_local_match() {
    let settings = Settings {
        local_markup: Some("<p>Total: $130.00</p>".to_string()),
        ..Settings::default()
    };
    let model = Model::new(settings, (120, 30));
    let model = update(model, Message::SearchInput("$130".to_string()));
    let model = update(model, Message::SubmitSearch);
    let buffer = draw(&model);

    let panes = pane_layout(120, 30);
    let row = panes.answer.y;
    let line: String = (panes.answer.x..panes.answer.x + panes.answer.width)
        .map(|col| buffer[(col, row)].symbol())
        .collect();
    assert!(line.starts_with("Total: $130.00"), "got {line:?}");

    let mark_col = panes.answer.x + 7;
    assert_eq!(buffer[(mark_col, row)].symbol(), "$");
    assert_eq!(buffer[(mark_col, row)].bg, style::mark_style().bg.unwrap());
    assert_ne!(buffer[(mark_col + 4, row)].bg, style::mark_style().bg.unwrap());
}

#[test]
fn test_render_remote_loading_answer() {
    let settings = Settings {
        answer_service: true,
        ..Settings::default()
    };
    let model = Model::new(settings, (120, 30));
    let model = update(model, Message::SearchInput("total".to_string()));
    let model = update(model, Message::SubmitSearch);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Ask"));
    assert!(content.contains("Loading answer..."));
}

#[test]
fn test_render_selected_suggestion_is_reversed() {
    let settings = Settings {
        suggestion_service: true,
        ..Settings::default()
    };
    let model = Model::new(settings, (120, 30));
    let session = model.session.id;
    let model = update(
        model,
        Message::SuggestionsLoaded {
            session,
            result: Ok(vec!["Invoice".to_string(), "Total".to_string()]),
        },
    );
    let model = update(model, Message::SearchInput("o".to_string()));
    let model = update(model, Message::SuggestionNext);
    let buffer = draw(&model);

    let panes = pane_layout(120, 30);
    let first = panes.suggestions.y;
    let text: String = (panes.suggestions.x..panes.suggestions.x + 8)
        .map(|col| buffer[(col, first)].symbol())
        .collect();
    assert_eq!(text, " Invoice");
    assert!(
        buffer[(panes.suggestions.x + 1, first)]
            .modifier
            .contains(Modifier::REVERSED)
    );
}

#[test]
fn test_render_upload_prompt_error() {
    let model = update(
        Model::new(Settings::default(), (120, 30)),
        Message::OpenUploadPrompt,
    );
    let mut model = update(model, Message::UploadInput("notes.docx".to_string()));
    if let Some(prompt) = model.upload_prompt.as_mut() {
        prompt.error = Some("Only pdf, txt files are allowed.".to_string());
    }
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Open Document"));
    assert!(content.contains("notes.docx"));
    assert!(content.contains("Only pdf, txt files are allowed."));
}

#[test]
fn test_render_help_lists_config_paths() {
    let mut model = update(Model::new(Settings::default(), (120, 40)), Message::ToggleHelp);
    model.config_global_path = Some(std::path::PathBuf::from("/home/u/.config/pagewise/config"));
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let content = buffer_text(terminal.backend().buffer());
    assert!(content.contains("Help"));
    assert!(content.contains("Zoom in / out"));
    assert!(content.contains("/home/u/.config/pagewise/config"));
}

#[test]
fn test_render_status_bar_shows_focus() {
    let model = loaded_model(2);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("[viewer]"));
    let model = update(model, Message::SwitchFocus);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("[search]"));
}
