//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position, visible range and smooth scrolling
//! - [`markup`]: Answer markup laid out into highlighted rows
//! - [`style`]: Colors for highlights and states

pub mod markup;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

use ratatui::layout::{Constraint, Layout, Rect};

pub use render::render;

pub const VIEWER_WIDTH_PERCENT: u16 = 55;
pub const SEARCH_WIDTH_PERCENT: u16 = 45;
/// Suggestion rows shown under the search input.
pub const SUGGESTION_ROWS: u16 = 5;

/// Screen regions, computed from the terminal size alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneLayout {
    /// Viewer pane including its border
    pub viewer: Rect,
    /// Page number and zoom line
    pub toolbar: Rect,
    /// Scrollable page stack
    pub pages: Rect,
    /// Search pane including its border
    pub search: Rect,
    pub input: Rect,
    pub suggestions: Rect,
    pub separator: Rect,
    /// Scrollable answer area
    pub answer: Rect,
    pub status: Rect,
}

/// Split a `width` x `height` terminal into panes.
pub fn pane_layout(width: u16, height: u16) -> PaneLayout {
    let area = Rect::new(0, 0, width, height);
    let [main, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [viewer, search] = Layout::horizontal([
        Constraint::Percentage(VIEWER_WIDTH_PERCENT),
        Constraint::Percentage(SEARCH_WIDTH_PERCENT),
    ])
    .areas(main);

    let viewer_inner = bordered_inner(viewer);
    let [toolbar, pages] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(viewer_inner);

    let search_inner = bordered_inner(search);
    let [input, suggestions, separator, answer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(SUGGESTION_ROWS),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(search_inner);

    PaneLayout {
        viewer,
        toolbar,
        pages,
        search,
        input,
        suggestions,
        separator,
        answer,
        status,
    }
}

fn bordered_inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

#[cfg(test)]
mod tests;
