//! Scroll container.
//!
//! A [`Viewport`] is the visible window over a pane's rows. Pages and the
//! answer area each own one. Besides plain scrolling it can glide toward a
//! row so that row ends up centred, one step per animation tick.

use std::ops::Range;

/// Visible window over a column of rows.
///
/// ```
/// use pagewise::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
///
/// vp.start_smooth_scroll_to_center(60);
/// while vp.step_animation() {}
/// assert_eq!(vp.offset(), 48);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    /// First visible row
    offset: usize,
    rows: usize,
    /// Offset the running animation is heading for
    glide_to: Option<usize>,
}

impl Viewport {
    /// A viewport of `width` x `height` cells at the top of `rows` rows.
    pub const fn new(width: u16, height: u16, rows: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            rows,
            glide_to: None,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Rows currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let bottom = self.offset.saturating_add(usize::from(self.height));
        self.offset..bottom.min(self.rows)
    }

    // Manual scrolling cancels any running animation.

    pub const fn scroll_up(&mut self, n: usize) {
        self.glide_to = None;
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.glide_to = None;
        self.offset = self.offset.saturating_add(n).min(self.last_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.height));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height));
    }

    pub const fn go_to_top(&mut self) {
        self.glide_to = None;
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.glide_to = None;
        self.offset = self.last_offset();
    }

    /// Offset that puts `row` in the middle of the viewport.
    pub fn center_offset(&self, row: usize) -> usize {
        row.saturating_sub(usize::from(self.height) / 2)
            .min(self.last_offset())
    }

    /// Begin gliding toward centring `row`.
    pub fn start_smooth_scroll_to_center(&mut self, row: usize) {
        let target = self.center_offset(row);
        self.glide_to = (target != self.offset).then_some(target);
    }

    pub const fn is_animating(&self) -> bool {
        self.glide_to.is_some()
    }

    /// Move a third of the remaining distance, at least one row.
    ///
    /// Returns whether the glide is still running.
    pub fn step_animation(&mut self) -> bool {
        let Some(target) = self.glide_to else {
            return false;
        };
        let step = (target.abs_diff(self.offset) / 3).max(1);
        if target > self.offset {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        if self.offset == target {
            self.glide_to = None;
        }
        self.glide_to.is_some()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    /// Replace the row count, e.g. after a page renders or an answer arrives.
    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.clamp();
    }

    fn clamp(&mut self) {
        let last = self.last_offset();
        self.offset = self.offset.min(last);
        if let Some(target) = self.glide_to {
            let target = target.min(last);
            self.glide_to = (target != self.offset).then_some(target);
        }
    }

    const fn last_offset(&self) -> usize {
        self.rows.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_shows_every_row() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
        assert!(!vp.is_animating());
    }

    #[test]
    fn test_bottom_shows_last_rows() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.visible_range(), 76..100);
        vp.go_to_top();
        assert_eq!(vp.visible_range(), 0..24);
    }

    #[test]
    fn test_paging_moves_by_height() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.page_down();
        vp.page_down();
        assert_eq!(vp.offset(), 48);
        vp.page_up();
        assert_eq!(vp.offset(), 24);
    }

    #[test]
    fn test_center_offset_clamps_near_edges() {
        let vp = Viewport::new(80, 10, 100);
        assert_eq!(vp.center_offset(50), 45);
        assert_eq!(vp.center_offset(2), 0);
        assert_eq!(vp.center_offset(99), 90);
    }

    #[test]
    fn test_glide_reaches_target_in_shrinking_steps() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.start_smooth_scroll_to_center(50);
        assert!(vp.is_animating());

        let mut offsets = vec![vp.offset()];
        while vp.step_animation() {
            offsets.push(vp.offset());
        }
        offsets.push(vp.offset());
        assert_eq!(offsets[1], 15);
        assert_eq!(vp.offset(), 45);
        let steps: Vec<usize> = offsets.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(steps.windows(2).all(|s| s[0] >= s[1]), "steps {steps:?}");
    }

    #[test]
    fn test_glide_upward_stops_at_top() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.go_to_bottom();
        vp.start_smooth_scroll_to_center(5);
        while vp.step_animation() {}
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_glide_to_current_position_is_noop() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.start_smooth_scroll_to_center(3);
        assert!(!vp.is_animating());
        assert!(!vp.step_animation());
    }

    #[test]
    fn test_manual_scroll_cancels_glide() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.start_smooth_scroll_to_center(80);
        vp.step_animation();
        vp.scroll_up(1);
        assert!(!vp.is_animating());
    }

    #[test]
    fn test_fewer_rows_clamp_glide_target() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.start_smooth_scroll_to_center(90);
        vp.set_rows(20);
        while vp.step_animation() {}
        assert_eq!(vp.offset(), 10);
    }

    #[test]
    fn test_taller_pane_pulls_offset_back() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(50);
        vp.resize(100, 60);
        assert_eq!(vp.offset(), 40);
        assert_eq!(vp.width(), 100);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_stays_within_rows(
                rows in 1..10000usize,
                height in 1..100u16,
                amount in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, rows);
                vp.scroll_down(amount);
                prop_assert!(vp.offset() <= rows.saturating_sub(usize::from(height)));
                prop_assert!(vp.visible_range().end <= rows);
            }

            #[test]
            fn glide_always_lands_on_center_offset(
                rows in 0..2000usize,
                height in 1..100u16,
                start in 0..2000usize,
                row in 0..2000usize,
            ) {
                let mut vp = Viewport::new(80, height, rows);
                vp.scroll_down(start);
                let expected = vp.center_offset(row);
                vp.start_smooth_scroll_to_center(row);
                let mut steps = 0;
                while vp.step_animation() {
                    steps += 1;
                    prop_assert!(steps <= 2000);
                }
                prop_assert_eq!(vp.offset(), expected);
            }
        }
    }
}
