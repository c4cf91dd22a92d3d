//! Collaborator contracts.
//!
//! The viewer and search panel only manage view state. Turning a document
//! into pages, suggesting keywords, answering questions and uploading files
//! are delegated to the collaborators defined here:
//! - [`Rasterizer`]: page count, page text and page rendering
//! - [`SuggestionService`]: the keyword vocabulary for autocomplete
//! - [`AnswerService`]: formatted answers for a submitted question
//! - [`UploadTransport`]: turns a local file into a document location
//!
//! All collaborators are called from worker threads, so they are `Send + Sync`.

mod http;
mod keywords;
mod text;
mod upload;

use std::sync::Arc;

pub use http::{HttpAnswerService, HttpSuggestionService, decode_answer, decode_keywords};
pub use keywords::StaticSuggestions;
pub use text::{DEFAULT_RENDER_WIDTH, TextRasterizer, wrap_line};
pub use upload::{LocalUpload, Upload, UploadError, UploadTransport};

use crate::document::DocumentHandle;

/// Failure reported by a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a text document")]
    NotText(String),
    #[error("document has no pages")]
    EmptyDocument,
    #[error("page {index} out of range (document has {total} pages)")]
    PageOutOfRange { index: usize, total: usize },
    #[error("unsupported document location: {0}")]
    UnsupportedLocation(String),
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result of opening a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub page_count: usize,
}

/// One page rendered at a given width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// 1-based page index
    pub index: usize,
    /// Width the page was requested at (`None` = intrinsic default)
    pub requested_width: Option<u16>,
    /// Rendered rows, each at most the render width in display columns
    pub rows: Vec<String>,
}

/// Answer returned by the answering service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Formatted answer; may contain raw newline sequences
    pub answer_markup: String,
}

/// Turns a document into pages.
pub trait Rasterizer: Send + Sync {
    /// Open a document and report its page count.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is unreachable or malformed.
    fn open_document(&self, handle: &DocumentHandle) -> Result<DocumentInfo, ServiceError>;

    /// Plain text of every page, in page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is unreachable or malformed.
    fn page_text(&self, handle: &DocumentHandle) -> Result<Vec<String>, ServiceError>;

    /// Render page `index` (1-based) at `width` columns, or at the intrinsic
    /// default when `width` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or `index` is out of range.
    fn render_page(
        &self,
        handle: &DocumentHandle,
        index: usize,
        width: Option<u16>,
    ) -> Result<RenderedPage, ServiceError>;
}

/// Supplies the keyword vocabulary for suggestions.
pub trait SuggestionService: Send + Sync {
    /// Ordered keyword list.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with garbage.
    fn suggestions(&self) -> Result<Vec<String>, ServiceError>;
}

/// Answers a free-form question about the current document.
pub trait AnswerService: Send + Sync {
    /// Ask `question` and return the formatted answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with garbage.
    fn ask(&self, question: &str) -> Result<Answer, ServiceError>;
}

/// The set of collaborators an [`App`](crate::app::App) talks to.
#[derive(Clone)]
pub struct Services {
    pub rasterizer: Arc<dyn Rasterizer>,
    pub suggestions: Option<Arc<dyn SuggestionService>>,
    pub answers: Option<Arc<dyn AnswerService>>,
    pub upload: Arc<dyn UploadTransport>,
}

impl Services {
    /// Local-only services: text rasterizer and local upload, no remote endpoints.
    pub fn local(lines_per_page: usize, accept: Vec<String>) -> Self {
        Self {
            rasterizer: Arc::new(TextRasterizer::new(lines_per_page)),
            suggestions: None,
            answers: None,
            upload: Arc::new(LocalUpload::new(accept)),
        }
    }

    #[must_use]
    pub fn with_suggestions(mut self, service: Option<Arc<dyn SuggestionService>>) -> Self {
        self.suggestions = service;
        self
    }

    #[must_use]
    pub fn with_answers(mut self, service: Option<Arc<dyn AnswerService>>) -> Self {
        self.answers = service;
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("suggestions", &self.suggestions.is_some())
            .field("answers", &self.answers.is_some())
            .finish_non_exhaustive()
    }
}
