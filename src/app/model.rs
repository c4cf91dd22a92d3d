use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::document::{DocumentHandle, SessionId};
use crate::search::{SearchMode, SearchPanel};
use crate::ui::markup::{MarkupLine, layout};
use crate::ui::viewport::Viewport;
use crate::ui::{PaneLayout, pane_layout};
use crate::viewer::{
    DEFAULT_VISIBILITY_THRESHOLD, DocumentRenderer, ViewportPageTracker, ZoomController,
};

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Viewer,
    Search,
}

/// The "open document" prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPrompt {
    pub input: String,
    /// Validation message from the last attempt
    pub error: Option<String>,
}

/// Session-independent settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Zoom for the first document
    pub zoom: ZoomController,
    /// Share of a page that must be visible to make it current
    pub threshold: f32,
    /// Markup searched locally instead of the document text
    pub local_markup: Option<String>,
    /// A suggestion service supplies the keyword vocabulary
    pub suggestion_service: bool,
    /// An answering service handles submitted queries
    pub answer_service: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: ZoomController::default(),
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
            local_markup: None,
            suggestion_service: false,
            answer_service: false,
        }
    }
}

/// Everything that belongs to one opened document.
///
/// Rebuilt from scratch on every document change; completions carry the
/// [`SessionId`] they were issued under and are dropped when it no longer
/// matches.
#[derive(Debug)]
pub struct DocumentSession {
    pub id: SessionId,
    pub renderer: Option<DocumentRenderer>,
    pub tracker: ViewportPageTracker,
    /// Scroll position of the page stack
    pub viewport: Viewport,
    pub search: SearchPanel,
    /// Scroll position of the answer area
    pub answer_view: Viewport,
    /// Answer content laid out for the answer area
    pub answer_lines: Vec<MarkupLine>,
    /// Question waiting to be sent to the answering service
    pub(super) pending_ask: Option<(String, u64)>,
}

impl DocumentSession {
    fn new(id: SessionId, settings: &Settings, panes: &PaneLayout) -> Self {
        let mode = if settings.answer_service {
            SearchMode::Remote
        } else {
            SearchMode::Local {
                markup: settings.local_markup.clone().unwrap_or_default(),
            }
        };
        let search = SearchPanel::new(mode);
        let mut session = Self {
            id,
            renderer: None,
            tracker: ViewportPageTracker::scrolling(settings.threshold),
            viewport: Viewport::new(panes.pages.width, panes.pages.height, 0),
            search,
            answer_view: Viewport::new(panes.answer.width, panes.answer.height, 0),
            answer_lines: Vec::new(),
            pending_ask: None,
        };
        session.relayout_answer();
        session
    }

    /// Re-lay the answer content out at the answer area width.
    pub fn relayout_answer(&mut self) {
        self.answer_lines = layout(self.search.content().markup(), self.answer_view.width());
        self.answer_view.set_rows(self.answer_lines.len());
    }

    /// Refresh scroll extents and the current page after the page stack or
    /// the scroll position changed.
    pub fn sync_pages(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        let layout = renderer.layout();
        self.viewport.set_rows(layout.total_rows());
        self.tracker.attach(renderer.pages());
        self.tracker.sync(&layout, self.viewport.visible_range());
    }

    pub const fn current_page(&self) -> usize {
        self.tracker.current_page()
    }

    pub fn total_pages(&self) -> Option<usize> {
        self.renderer.as_ref().and_then(DocumentRenderer::total_pages)
    }

    pub fn zoom(&self) -> Option<ZoomController> {
        self.renderer.as_ref().map(DocumentRenderer::zoom)
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    pub session: DocumentSession,
    pub settings: Settings,
    pub focus: Focus,
    pub upload_prompt: Option<UploadPrompt>,
    pub help_visible: bool,
    pub help_scroll: usize,
    pub should_quit: bool,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    terminal_size: (u16, u16),
    toast: Option<Toast>,
    /// Session whose answer area should scroll to its first match
    scroll_probe: Option<SessionId>,
}

impl Model {
    pub fn new(settings: Settings, terminal_size: (u16, u16)) -> Self {
        let panes = pane_layout(terminal_size.0, terminal_size.1);
        Self {
            session: DocumentSession::new(SessionId::default(), &settings, &panes),
            settings,
            focus: Focus::Viewer,
            upload_prompt: None,
            help_visible: false,
            help_scroll: 0,
            should_quit: false,
            config_global_path: None,
            config_local_path: None,
            terminal_size,
            toast: None,
            scroll_probe: None,
        }
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn panes(&self) -> PaneLayout {
        pane_layout(self.terminal_size.0, self.terminal_size.1)
    }

    /// Inner width of the page area, once the terminal has a size.
    pub fn container_width(&self) -> Option<u16> {
        let width = self.panes().pages.width;
        (width > 0).then_some(width)
    }

    /// Replace the session for a new document.
    ///
    /// Zoom carries over from the previous document; page, query and answer
    /// start fresh.
    pub(super) fn start_session(&mut self, handle: DocumentHandle) {
        let zoom = self.session.zoom().unwrap_or(self.settings.zoom);
        let id = self.session.id.next();
        let panes = self.panes();
        let mut session = DocumentSession::new(id, &self.settings, &panes);
        session.renderer = Some(DocumentRenderer::new(handle, zoom, self.container_width()));
        if self.settings.suggestion_service {
            session.search.begin_suggestions();
        }
        self.session = session;
        self.scroll_probe = None;
    }

    /// Whether a completion tagged with `session` still applies.
    pub(super) fn is_current(&self, session: SessionId, what: &str) -> bool {
        if session == self.session.id {
            return true;
        }
        tracing::debug!(
            %session,
            current = %self.session.id,
            completion = what,
            "dropping stale completion"
        );
        false
    }

    /// The session searches document text locally.
    pub const fn needs_local_markup(&self) -> bool {
        !self.settings.answer_service && self.settings.local_markup.is_none()
    }

    /// The session builds its vocabulary from document words.
    pub const fn needs_local_keywords(&self) -> bool {
        !self.settings.suggestion_service
    }

    /// The session needs page text for local markup or local keywords.
    pub fn needs_page_text(&self) -> bool {
        self.session.renderer.is_some()
            && (self.needs_local_markup() || self.needs_local_keywords())
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let panes = self.panes();
        let container_width = self.container_width();
        let session = &mut self.session;
        session.viewport.resize(panes.pages.width, panes.pages.height);
        session.answer_view.resize(panes.answer.width, panes.answer.height);
        if let Some(renderer) = session.renderer.as_mut() {
            renderer.set_container_width(container_width);
        }
        session.relayout_answer();
        session.sync_pages();
    }

    pub(super) fn request_scroll_probe(&mut self) {
        self.scroll_probe = Some(self.session.id);
    }

    /// Take a requested scroll-to-match probe, to be run after a short delay.
    pub(super) const fn take_scroll_probe(&mut self) -> Option<SessionId> {
        self.scroll_probe.take()
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Settings::default(), (0, 0))
    }
}
