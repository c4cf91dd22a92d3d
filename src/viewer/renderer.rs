use std::ops::Range;

use super::zoom::ZoomController;
use crate::document::DocumentHandle;
use crate::services::RenderedPage;

/// Opaque reference to the UI element that hosts one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

/// A page in the rendered sequence.
///
/// Indices are unique, contiguous from 1 and stored in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub index: usize,
    pub container: ContainerId,
}

/// Where the document is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Terminal until the user picks another document.
    Failed(String),
}

/// One page-render descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub index: usize,
    /// `None` renders at the rasterizer's intrinsic default width.
    pub width: Option<u16>,
}

/// Lazy, finite sequence of render requests for pages `1..=total`.
///
/// Cloning restarts from where the clone was taken; calling
/// [`DocumentRenderer::render_requests`] again starts over at page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequests {
    next: usize,
    total: usize,
    width: Option<u16>,
}

impl Iterator for RenderRequests {
    type Item = RenderRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.total {
            return None;
        }
        let request = RenderRequest {
            index: self.next,
            width: self.width,
        };
        self.next += 1;
        Some(request)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RenderRequests {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageContent {
    Pending,
    Rendered(RenderedPage),
    Failed(String),
}

/// A displayable row of the stacked page sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRow<'a> {
    /// Separator at the top of each page container
    Header { index: usize, total: usize },
    Text(&'a str),
    Pending { index: usize },
    Failed { index: usize, error: &'a str },
}

/// Row ranges occupied by each page container in the scroll area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    slots: Vec<(ContainerId, Range<usize>)>,
    total_rows: usize,
}

impl PageLayout {
    pub fn rows_of(&self, container: ContainerId) -> Option<Range<usize>> {
        self.slots
            .iter()
            .find(|(id, _)| *id == container)
            .map(|(_, rows)| rows.clone())
    }

    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Drives the rasterizer for one document.
///
/// Owns the page sequence and the zoom state. Knows nothing about threads:
/// callers pull [`RenderRequests`] out, run them however they like, and feed
/// the results back through [`accept_rendered`](Self::accept_rendered).
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    handle: DocumentHandle,
    zoom: ZoomController,
    container_width: Option<u16>,
    load: LoadState,
    pages: Vec<PageState>,
    content: Vec<PageContent>,
    /// Width the last batch of requests was issued at.
    issued_width: Option<Option<u16>>,
}

impl DocumentRenderer {
    pub fn new(handle: DocumentHandle, zoom: ZoomController, container_width: Option<u16>) -> Self {
        Self {
            handle,
            zoom,
            container_width,
            load: LoadState::Loading,
            pages: Vec::new(),
            content: Vec::new(),
            issued_width: None,
        }
    }

    pub const fn handle(&self) -> &DocumentHandle {
        &self.handle
    }

    pub fn display_name(&self) -> String {
        self.handle.display_name()
    }

    pub const fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Page count once the document has opened; `None` while loading or after failure.
    pub fn total_pages(&self) -> Option<usize> {
        match self.load {
            LoadState::Loaded => Some(self.pages.len()),
            LoadState::Loading | LoadState::Failed(_) => None,
        }
    }

    pub fn pages(&self) -> &[PageState] {
        &self.pages
    }

    /// Record a successful open and materialise pages `1..=page_count`.
    pub fn document_opened(&mut self, page_count: usize) {
        if page_count == 0 {
            self.document_failed("document has no pages");
            return;
        }
        self.pages = (1..=page_count)
            .map(|index| PageState {
                index,
                container: ContainerId(index as u64),
            })
            .collect();
        self.content = vec![PageContent::Pending; page_count];
        self.load = LoadState::Loaded;
        self.issued_width = None;
    }

    pub fn document_failed(&mut self, message: impl Into<String>) {
        self.load = LoadState::Failed(message.into());
        self.pages.clear();
        self.content.clear();
        self.issued_width = None;
    }

    pub const fn zoom(&self) -> ZoomController {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out()
    }

    pub const fn container_width(&self) -> Option<u16> {
        self.container_width
    }

    /// Returns whether the width changed.
    pub fn set_container_width(&mut self, width: Option<u16>) -> bool {
        let changed = self.container_width != width;
        self.container_width = width;
        changed
    }

    pub fn render_width(&self) -> Option<u16> {
        self.zoom.render_width(self.container_width)
    }

    /// Fresh request sequence for every page at the current render width.
    ///
    /// Empty until the page count is known.
    pub fn render_requests(&self) -> RenderRequests {
        RenderRequests {
            next: 1,
            total: self.total_pages().unwrap_or(0),
            width: self.render_width(),
        }
    }

    /// Requests that still need issuing: all pages, whenever the render width
    /// differs from the last issued batch. Marks them issued.
    pub fn take_pending_requests(&mut self) -> Option<RenderRequests> {
        if self.load != LoadState::Loaded {
            return None;
        }
        let width = self.render_width();
        if self.issued_width == Some(width) {
            return None;
        }
        self.issued_width = Some(width);
        Some(self.render_requests())
    }

    /// Store a rendered page. Results for another width are stale and dropped.
    pub fn accept_rendered(&mut self, page: RenderedPage) -> bool {
        if page.requested_width != self.render_width() {
            return false;
        }
        let Some(slot) = page.index.checked_sub(1).and_then(|i| self.content.get_mut(i)) else {
            return false;
        };
        *slot = PageContent::Rendered(page);
        true
    }

    /// Mark a page as failed to render. Stale widths are ignored.
    pub fn render_failed(&mut self, index: usize, width: Option<u16>, error: &str) -> bool {
        if width != self.render_width() {
            return false;
        }
        let Some(slot) = index.checked_sub(1).and_then(|i| self.content.get_mut(i)) else {
            return false;
        };
        *slot = PageContent::Failed(error.to_string());
        true
    }

    pub fn is_page_rendered(&self, index: usize) -> bool {
        index
            .checked_sub(1)
            .and_then(|i| self.content.get(i))
            .is_some_and(|c| matches!(c, PageContent::Rendered(_)))
    }

    fn content_height(content: &PageContent) -> usize {
        match content {
            PageContent::Pending | PageContent::Failed(_) => 1,
            PageContent::Rendered(page) => page.rows.len().max(1),
        }
    }

    /// Row ranges of every page container: one header row plus the page body.
    pub fn layout(&self) -> PageLayout {
        let mut row = 0usize;
        let slots = self
            .pages
            .iter()
            .zip(&self.content)
            .map(|(page, content)| {
                let height = 1 + Self::content_height(content);
                let range = row..row + height;
                row += height;
                (page.container, range)
            })
            .collect();
        PageLayout {
            slots,
            total_rows: row,
        }
    }

    /// All display rows, in order.
    pub fn rows(&self) -> impl Iterator<Item = PageRow<'_>> + '_ {
        let total = self.pages.len();
        self.pages
            .iter()
            .zip(&self.content)
            .flat_map(move |(page, content)| {
                let index = page.index;
                let body: Vec<PageRow<'_>> = match content {
                    PageContent::Pending => vec![PageRow::Pending { index }],
                    PageContent::Failed(error) => vec![PageRow::Failed {
                        index,
                        error: error.as_str(),
                    }],
                    PageContent::Rendered(rendered) if rendered.rows.is_empty() => {
                        vec![PageRow::Text("")]
                    }
                    PageContent::Rendered(rendered) => rendered
                        .rows
                        .iter()
                        .map(|row| PageRow::Text(row.as_str()))
                        .collect(),
                };
                std::iter::once(PageRow::Header { index, total }).chain(body)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(
            DocumentHandle::Url("file:///tmp/invoice.txt".to_string()),
            ZoomController::default(),
            Some(100),
        )
    }

    fn page(index: usize, width: Option<u16>, rows: &[&str]) -> RenderedPage {
        RenderedPage {
            index,
            requested_width: width,
            rows: rows.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_new_renderer_is_loading_without_pages() {
        let r = renderer();
        assert_eq!(r.load_state(), &LoadState::Loading);
        assert_eq!(r.total_pages(), None);
        assert_eq!(r.render_requests().count(), 0);
    }

    #[test]
    fn test_opened_document_materialises_contiguous_pages() {
        let mut r = renderer();
        r.document_opened(3);
        assert_eq!(r.total_pages(), Some(3));
        let indices: Vec<_> = r.pages().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        let mut containers: Vec<_> = r.pages().iter().map(|p| p.container).collect();
        containers.dedup();
        assert_eq!(containers.len(), 3);
    }

    #[test]
    fn test_render_requests_use_scaled_container_width() {
        let mut r = renderer();
        r.document_opened(2);
        let requests: Vec<_> = r.render_requests().collect();
        assert_eq!(
            requests,
            vec![
                RenderRequest { index: 1, width: Some(90) },
                RenderRequest { index: 2, width: Some(90) },
            ]
        );
    }

    #[test]
    fn test_render_requests_without_container_width_use_default() {
        let mut r = DocumentRenderer::new(
            DocumentHandle::Url("a.txt".to_string()),
            ZoomController::default(),
            None,
        );
        r.document_opened(1);
        assert_eq!(
            r.render_requests().next(),
            Some(RenderRequest { index: 1, width: None })
        );
    }

    #[test]
    fn test_render_requests_are_restartable() {
        let mut r = renderer();
        r.document_opened(4);
        let mut first = r.render_requests();
        first.next();
        first.next();
        assert_eq!(first.len(), 2);
        assert_eq!(r.render_requests().len(), 4);
        assert_eq!(r.render_requests().next().map(|req| req.index), Some(1));
    }

    #[test]
    fn test_failed_document_is_terminal() {
        let mut r = renderer();
        r.document_failed("Failed to load document.");
        assert_eq!(
            r.load_state(),
            &LoadState::Failed("Failed to load document.".to_string())
        );
        assert_eq!(r.total_pages(), None);
        assert!(r.take_pending_requests().is_none());
    }

    #[test]
    fn test_zero_pages_is_a_failure() {
        let mut r = renderer();
        r.document_opened(0);
        assert!(matches!(r.load_state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_pending_requests_issue_once_per_width() {
        let mut r = renderer();
        assert!(r.take_pending_requests().is_none(), "nothing before load");
        r.document_opened(2);
        assert_eq!(r.take_pending_requests().map(|reqs| reqs.count()), Some(2));
        assert!(r.take_pending_requests().is_none());

        r.zoom_in();
        let reissued: Vec<_> = r.take_pending_requests().unwrap().collect();
        assert_eq!(reissued.len(), 2);
        assert!(reissued.iter().all(|req| req.width == Some(100)));

        assert!(r.set_container_width(Some(50)));
        assert!(r.take_pending_requests().is_some());
        assert!(!r.set_container_width(Some(50)));
        assert!(r.take_pending_requests().is_none());
    }

    #[test]
    fn test_stale_width_results_are_dropped() {
        let mut r = renderer();
        r.document_opened(1);
        r.zoom_in();
        assert!(!r.accept_rendered(page(1, Some(90), &["old"])));
        assert!(r.accept_rendered(page(1, Some(100), &["new"])));
        assert!(r.is_page_rendered(1));
        assert!(!r.accept_rendered(page(2, Some(100), &["out of range"])));
    }

    #[test]
    fn test_layout_stacks_header_and_body_rows() {
        let mut r = renderer();
        r.document_opened(3);
        r.accept_rendered(page(1, Some(90), &["a", "b", "c"]));
        r.render_failed(3, Some(90), "boom");
        let layout = r.layout();
        let ids: Vec<_> = r.pages().iter().map(|p| p.container).collect();
        assert_eq!(layout.rows_of(ids[0]), Some(0..4));
        assert_eq!(layout.rows_of(ids[1]), Some(4..6));
        assert_eq!(layout.rows_of(ids[2]), Some(6..8));
        assert_eq!(layout.total_rows(), 8);
        assert_eq!(r.rows().count(), 8);
    }

    #[test]
    fn test_rows_describe_each_page_state() {
        let mut r = renderer();
        r.document_opened(2);
        r.accept_rendered(page(2, Some(90), &["Total: $130.00"]));
        let rows: Vec<_> = r.rows().collect();
        assert_eq!(
            rows,
            vec![
                PageRow::Header { index: 1, total: 2 },
                PageRow::Pending { index: 1 },
                PageRow::Header { index: 2, total: 2 },
                PageRow::Text("Total: $130.00"),
            ]
        );
    }
}
