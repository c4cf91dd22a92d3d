use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::model::Focus;
use crate::app::{App, Message, Model};

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                _ => Some(Message::HideHelp),
            };
        }

        if let Some(prompt) = model.upload_prompt.as_ref() {
            return match key.code {
                KeyCode::Esc => Some(Message::CancelUpload),
                KeyCode::Enter => Some(Message::SubmitUpload),
                KeyCode::Backspace => {
                    let mut next = prompt.input.clone();
                    next.pop();
                    Some(Message::UploadInput(next))
                }
                KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                    let mut next = prompt.input.clone();
                    next.push(c);
                    Some(Message::UploadInput(next))
                }
                _ => None,
            };
        }

        if key.code == KeyCode::F(1) {
            return Some(Message::ToggleHelp);
        }

        match model.focus {
            Focus::Search => Self::handle_search_key(key, model),
            Focus::Viewer => Self::handle_viewer_key(key),
        }
    }

    fn handle_search_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let search = &model.session.search;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let answer_page = usize::from(model.session.answer_view.height()).max(1);
        match key.code {
            KeyCode::Esc if search.query().is_empty() => Some(Message::SwitchFocus),
            KeyCode::Esc => Some(Message::ClearSearch),
            KeyCode::Char('u') if ctrl => Some(Message::ClearSearch),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::SwitchFocus),
            KeyCode::Enter => Some(Message::SubmitSearch),
            KeyCode::Up => Some(Message::SuggestionPrev),
            KeyCode::Down => Some(Message::SuggestionNext),
            KeyCode::Right if search.filter().selected().is_some() => {
                Some(Message::AcceptSuggestion)
            }
            KeyCode::PageUp => Some(Message::AnswerScrollUp(answer_page)),
            KeyCode::PageDown => Some(Message::AnswerScrollDown(answer_page)),
            KeyCode::Backspace => {
                let mut next = search.query().to_string();
                next.pop();
                Some(Message::SearchInput(next))
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut next = search.query().to_string();
                next.push(c);
                Some(Message::SearchInput(next))
            }
            _ => None,
        }
    }

    fn handle_viewer_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
            KeyCode::Char('+' | '=') => Some(Message::ZoomIn),
            KeyCode::Char('-') => Some(Message::ZoomOut),
            KeyCode::Char('o') => Some(Message::OpenUploadPrompt),
            KeyCode::Char('/') => Some(Message::FocusSearch),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::SwitchFocus),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.upload_prompt.is_some() {
            return None;
        }
        let panes = model.panes();
        let in_viewer = point_in_rect(mouse.column, mouse.row, panes.viewer);
        let in_answer = point_in_rect(mouse.column, mouse.row, panes.answer);
        match mouse.kind {
            MouseEventKind::ScrollDown if in_viewer => Some(Message::ScrollDown(WHEEL_LINES)),
            MouseEventKind::ScrollUp if in_viewer => Some(Message::ScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_answer => Some(Message::AnswerScrollDown(WHEEL_LINES)),
            MouseEventKind::ScrollUp if in_answer => Some(Message::AnswerScrollUp(WHEEL_LINES)),
            _ => None,
        }
    }
}

const fn point_in_rect(column: u16, row: u16, rect: Rect) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
