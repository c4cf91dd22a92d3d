use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use super::renderer::{ContainerId, PageLayout, PageState};

/// Default share of a page that must be on screen for it to count as visible.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.6;

/// A visibility change reported for one observed container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ContainerId,
    /// Share of the container inside the viewport, `0.0..=1.0`
    pub ratio: f32,
    /// Whether any part of the container is inside the viewport
    pub is_intersecting: bool,
}

/// Source of visibility events for page containers.
pub trait IntersectionObserver {
    fn observe(&mut self, target: ContainerId);
    fn unobserve(&mut self, target: ContainerId);
    /// Stop observing everything.
    fn disconnect(&mut self);
}

/// Computes intersection entries from the scroll position.
///
/// Reports a container whenever it crosses the threshold in either direction,
/// and once when it is first seen, like a browser intersection observer.
#[derive(Debug, Clone)]
pub struct ScrollObserver {
    threshold: f32,
    observed: Vec<ContainerId>,
    above: HashMap<ContainerId, bool>,
}

impl ScrollObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed: Vec::new(),
            above: HashMap::new(),
        }
    }

    pub fn observed(&self) -> &[ContainerId] {
        &self.observed
    }

    /// Entries for containers whose threshold state changed since the last poll.
    ///
    /// `visible` is the range of layout rows currently on screen.
    pub fn poll(&mut self, layout: &PageLayout, visible: Range<usize>) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for &target in &self.observed {
            let Some(rows) = layout.rows_of(target) else {
                continue;
            };
            let overlap = rows.end.min(visible.end).saturating_sub(rows.start.max(visible.start));
            let height = rows.len();
            #[allow(clippy::cast_precision_loss)]
            let ratio = if height == 0 {
                0.0
            } else {
                overlap as f32 / height as f32
            };
            let above = overlap > 0 && ratio >= self.threshold;
            if self.above.get(&target) == Some(&above) {
                continue;
            }
            self.above.insert(target, above);
            entries.push(IntersectionEntry {
                target,
                ratio,
                is_intersecting: overlap > 0,
            });
        }
        entries
    }
}

impl IntersectionObserver for ScrollObserver {
    fn observe(&mut self, target: ContainerId) {
        if !self.observed.contains(&target) {
            self.observed.push(target);
        }
    }

    fn unobserve(&mut self, target: ContainerId) {
        self.observed.retain(|t| *t != target);
        self.above.remove(&target);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.above.clear();
    }
}

/// Maintains the "current page" number from visibility events.
///
/// Entries only report changes, so the tracker remembers which pages were
/// last reported above the threshold. The current page is the lowest of
/// those; while there are none the previous value is kept.
#[derive(Debug)]
pub struct ViewportPageTracker<O: IntersectionObserver = ScrollObserver> {
    observer: O,
    threshold: f32,
    /// Observed containers with their page index, in reading order
    pages: Vec<(ContainerId, usize)>,
    /// Page indices last reported above the threshold
    above: BTreeSet<usize>,
    current_page: usize,
}

impl ViewportPageTracker<ScrollObserver> {
    /// Tracker driven by scroll position.
    pub fn scrolling(threshold: f32) -> Self {
        Self::new(ScrollObserver::new(threshold), threshold)
    }

    /// Poll the observer against the current scroll position and apply the
    /// resulting entries. Returns whether the current page changed.
    pub fn sync(&mut self, layout: &PageLayout, visible: Range<usize>) -> bool {
        let entries = self.observer.poll(layout, visible);
        self.apply(&entries)
    }
}

impl<O: IntersectionObserver> ViewportPageTracker<O> {
    pub fn new(observer: O, threshold: f32) -> Self {
        Self {
            observer,
            threshold: threshold.clamp(0.0, 1.0),
            pages: Vec::new(),
            above: BTreeSet::new(),
            current_page: 1,
        }
    }

    /// 1-based; `1` until a page has been seen.
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Observe every page container not yet observed.
    ///
    /// Containers already observed are left alone, so calling this after each
    /// render is safe. Containers no longer in `pages` are unobserved.
    pub fn attach(&mut self, pages: &[PageState]) {
        let observer = &mut self.observer;
        let above = &mut self.above;
        self.pages.retain(|(container, index)| {
            let keep = pages.iter().any(|p| p.container == *container);
            if !keep {
                observer.unobserve(*container);
                above.remove(index);
            }
            keep
        });
        for page in pages {
            if !self.pages.iter().any(|(c, _)| *c == page.container) {
                self.observer.observe(page.container);
                self.pages.push((page.container, page.index));
            }
        }
    }

    /// Update the current page from a batch of entries.
    ///
    /// Returns whether the current page changed.
    pub fn apply(&mut self, entries: &[IntersectionEntry]) -> bool {
        for entry in entries {
            let Some(index) = self
                .pages
                .iter()
                .find(|(container, _)| *container == entry.target)
                .map(|(_, index)| *index)
            else {
                continue;
            };
            if entry.is_intersecting && entry.ratio >= self.threshold {
                self.above.insert(index);
            } else {
                self.above.remove(&index);
            }
        }
        match self.above.first() {
            Some(&index) if index != self.current_page => {
                tracing::trace!(page = index, "current page changed");
                self.current_page = index;
                true
            }
            _ => false,
        }
    }

    /// Release every observation and start over at page 1.
    pub fn reset(&mut self) {
        self.observer.disconnect();
        self.pages.clear();
        self.above.clear();
        self.current_page = 1;
    }
}

impl<O: IntersectionObserver> Drop for ViewportPageTracker<O> {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
