use std::time::Instant;

use crate::app::Model;
use crate::app::model::{Focus, ToastLevel, UploadPrompt};
use crate::document::{DocumentHandle, SessionId};
use crate::search::{KeywordSet, Submission, markup_from_pages};
use crate::services::RenderedPage;
use crate::ui::markup::scroll_to_first_match;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and completions posted by
/// background tasks. Completions carry the [`SessionId`] they were issued
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Viewer
    /// Scroll the page stack up by n lines
    ScrollUp(usize),
    /// Scroll the page stack down by n lines
    ScrollDown(usize),
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ZoomIn,
    ZoomOut,

    // Search
    /// Replace the query text
    SearchInput(String),
    SuggestionNext,
    SuggestionPrev,
    /// Copy the selected suggestion into the query
    AcceptSuggestion,
    SubmitSearch,
    ClearSearch,
    /// Scroll the answer area up by n lines
    AnswerScrollUp(usize),
    /// Scroll the answer area down by n lines
    AnswerScrollDown(usize),

    // Documents
    /// Start a new session for this document
    OpenDocument(DocumentHandle),
    OpenUploadPrompt,
    UploadInput(String),
    SubmitUpload,
    CancelUpload,

    // Completions
    DocumentOpened {
        session: SessionId,
        result: Result<usize, String>,
    },
    PageTextLoaded {
        session: SessionId,
        result: Result<Vec<String>, String>,
    },
    PageRendered {
        session: SessionId,
        page: RenderedPage,
    },
    PageRenderFailed {
        session: SessionId,
        index: usize,
        width: Option<u16>,
        error: String,
    },
    SuggestionsLoaded {
        session: SessionId,
        result: Result<Vec<String>, String>,
    },
    AnswerLoaded {
        session: SessionId,
        seq: u64,
        result: Result<String, String>,
    },
    /// Centre the first highlighted answer row
    ScrollToFirstMatch(SessionId),
    /// Advance smooth scrolling by one step
    AnimationTick,

    // Window
    SwitchFocus,
    FocusSearch,
    ToggleHelp,
    HideHelp,
    HelpScrollUp,
    HelpScrollDown,
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions happen here; collaborator calls are issued
/// afterwards by the side-effect pass.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Viewer
        Message::ScrollUp(n) => {
            model.session.viewport.scroll_up(n);
            model.session.sync_pages();
        }
        Message::ScrollDown(n) => {
            model.session.viewport.scroll_down(n);
            model.session.sync_pages();
        }
        Message::PageUp => {
            model.session.viewport.page_up();
            model.session.sync_pages();
        }
        Message::PageDown => {
            model.session.viewport.page_down();
            model.session.sync_pages();
        }
        Message::GoToTop => {
            model.session.viewport.go_to_top();
            model.session.sync_pages();
        }
        Message::GoToBottom => {
            model.session.viewport.go_to_bottom();
            model.session.sync_pages();
        }
        Message::ZoomIn => zoom(&mut model, true),
        Message::ZoomOut => zoom(&mut model, false),

        // Search
        Message::SearchInput(text) => model.session.search.set_query(text),
        Message::SuggestionNext => model.session.search.select_next_suggestion(),
        Message::SuggestionPrev => model.session.search.select_previous_suggestion(),
        Message::AcceptSuggestion => {
            model.session.search.accept_suggestion();
        }
        Message::SubmitSearch => submit_search(&mut model),
        Message::ClearSearch => model.session.search.clear_query(),
        Message::AnswerScrollUp(n) => model.session.answer_view.scroll_up(n),
        Message::AnswerScrollDown(n) => model.session.answer_view.scroll_down(n),

        // Documents
        Message::OpenDocument(handle) => {
            tracing::info!(document = %handle, "opening document");
            model.upload_prompt = None;
            model.start_session(handle);
        }
        Message::OpenUploadPrompt => {
            model.upload_prompt = Some(UploadPrompt::default());
        }
        Message::UploadInput(input) => {
            if let Some(prompt) = model.upload_prompt.as_mut() {
                prompt.input = input;
                prompt.error = None;
            }
        }
        Message::CancelUpload => {
            model.upload_prompt = None;
        }

        // Completions
        Message::DocumentOpened { session, result } => {
            if model.is_current(session, "document opened") {
                document_opened(&mut model, result);
            }
        }
        Message::PageTextLoaded { session, result } => {
            if model.is_current(session, "page text") {
                page_text_loaded(&mut model, result);
            }
        }
        Message::PageRendered { session, page } => {
            if model.is_current(session, "page render")
                && let Some(renderer) = model.session.renderer.as_mut()
            {
                let index = page.index;
                if renderer.accept_rendered(page) {
                    model.session.sync_pages();
                } else {
                    tracing::debug!(%session, page = index, "dropping render for a stale width");
                }
            }
        }
        Message::PageRenderFailed {
            session,
            index,
            width,
            error,
        } => {
            if model.is_current(session, "page render")
                && let Some(renderer) = model.session.renderer.as_mut()
                && renderer.render_failed(index, width, &error)
            {
                tracing::warn!(%session, page = index, %error, "page render failed");
                model.session.sync_pages();
            }
        }
        Message::SuggestionsLoaded { session, result } => {
            if model.is_current(session, "suggestions") {
                model.session.search.suggestions_loaded(result);
            }
        }
        Message::AnswerLoaded {
            session,
            seq,
            result,
        } => {
            if model.is_current(session, "answer") {
                if model.session.search.answer_loaded(seq, result) {
                    model.session.relayout_answer();
                    model.session.answer_view.go_to_top();
                    model.request_scroll_probe();
                } else {
                    tracing::debug!(%session, seq, "dropping answer for a superseded query");
                }
            }
        }
        Message::ScrollToFirstMatch(session) => {
            if model.is_current(session, "scroll probe") {
                let session = &mut model.session;
                scroll_to_first_match(&session.answer_lines, &mut session.answer_view);
            }
        }
        Message::AnimationTick => {
            model.session.answer_view.step_animation();
        }

        // Window
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Viewer => Focus::Search,
                Focus::Search => Focus::Viewer,
            };
        }
        Message::FocusSearch => model.focus = Focus::Search,
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll = 0;
        }
        Message::HideHelp => model.help_visible = false,
        Message::HelpScrollUp => model.help_scroll = model.help_scroll.saturating_sub(1),
        Message::HelpScrollDown => model.help_scroll = model.help_scroll.saturating_add(1),
        Message::Resize(width, height) => model.resize(width, height),
        // SubmitUpload: handled in effects
        // Redraw: no state change needed
        Message::SubmitUpload | Message::Redraw => {}

        Message::Quit => model.should_quit = true,
    }

    model
}

fn zoom(model: &mut Model, zoom_in: bool) {
    let Some(renderer) = model.session.renderer.as_mut() else {
        return;
    };
    let changed = if zoom_in {
        renderer.zoom_in()
    } else {
        renderer.zoom_out()
    };
    if changed {
        tracing::debug!(
            percent = renderer.zoom().percent(),
            width = ?renderer.render_width(),
            "zoom changed"
        );
    }
}

fn submit_search(model: &mut Model) {
    let session = &mut model.session;
    match session.search.submit(Instant::now()) {
        Submission::Ignored => {}
        Submission::Highlighted => {
            session.relayout_answer();
            session.answer_view.go_to_top();
            model.request_scroll_probe();
        }
        Submission::Ask { question, seq } => {
            tracing::debug!(session = %session.id, seq, "question queued");
            session.relayout_answer();
            session.pending_ask = Some((question, seq));
        }
    }
}

fn document_opened(model: &mut Model, result: Result<usize, String>) {
    let Some(renderer) = model.session.renderer.as_mut() else {
        return;
    };
    match result {
        Ok(page_count) => {
            renderer.document_opened(page_count);
            if renderer.total_pages().is_some() {
                tracing::info!(document = %renderer.handle(), page_count, "document loaded");
            } else {
                model.show_toast(ToastLevel::Error, "Failed to load document.");
            }
        }
        Err(error) => {
            tracing::warn!(document = %renderer.handle(), %error, "document failed to load");
            renderer.document_failed(error);
            model.show_toast(ToastLevel::Error, "Failed to load document.");
        }
    }
    model.session.sync_pages();
}

fn page_text_loaded(model: &mut Model, result: Result<Vec<String>, String>) {
    let pages = match result {
        Ok(pages) => pages,
        Err(error) => {
            tracing::warn!(%error, "page text unavailable; local search disabled");
            return;
        }
    };
    if model.needs_local_markup() {
        model
            .session
            .search
            .set_local_markup(markup_from_pages(&pages));
        model.session.relayout_answer();
    }
    if model.needs_local_keywords() {
        let keywords = KeywordSet::from_text_words(&pages.join("\n"));
        tracing::debug!(keywords = keywords.len(), "seeded keywords from document text");
        model.session.search.seed_keywords(keywords);
    }
}
