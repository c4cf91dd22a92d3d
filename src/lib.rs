// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchPanel)
    clippy::module_name_repetitions
)]

//! # Pagewise
//!
//! A terminal document viewer paired with an in-document search panel.
//!
//! Pagewise renders a document page by page with:
//! - Progressive page rendering through a pluggable rasterizer
//! - A "current page" indicator driven by page visibility
//! - Continuous zoom between 50% and 200%
//! - A search box with keyword suggestions that either highlights matches in
//!   local markup or asks a remote answering service
//!
//! ## Architecture
//!
//! Pagewise uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state, scoped to a per-document session
//! - **Message**: Events, actions and collaborator completions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Document handles and session identity
//! - [`viewer`]: Zoom, page tracking and page-render orchestration
//! - [`search`]: Highlighting, suggestion filtering and the search panel
//! - [`services`]: Collaborator traits and their shipped implementations
//! - [`ui`]: Terminal UI components
//! - [`config`]: Config files and flag merging

pub mod app;
pub mod config;
pub mod document;
pub mod perf;
pub mod search;
pub mod services;
pub mod ui;
pub mod viewer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{DocumentHandle, SessionId};
    pub use crate::search::SearchPanel;
    pub use crate::viewer::{DocumentRenderer, ViewportPageTracker, ZoomController};
}
