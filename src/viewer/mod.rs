//! Document viewer state.
//!
//! - [`ZoomController`]: bounded zoom with fixed steps
//! - [`DocumentRenderer`]: page sequence and render requests for one document
//! - [`ViewportPageTracker`]: the "current page" derived from page visibility

mod renderer;
mod tracker;
mod zoom;

pub use renderer::{
    ContainerId, DocumentRenderer, LoadState, PageLayout, PageRow, PageState, RenderRequest,
    RenderRequests,
};
pub use tracker::{
    DEFAULT_VISIBILITY_THRESHOLD, IntersectionEntry, IntersectionObserver, ScrollObserver,
    ViewportPageTracker,
};
pub use zoom::{
    DEFAULT_ZOOM_PERCENT, MAX_ZOOM_PERCENT, MIN_ZOOM_PERCENT, ZOOM_STEP_PERCENT, ZoomController,
};
