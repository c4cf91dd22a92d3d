/// Smallest zoom, in percent.
pub const MIN_ZOOM_PERCENT: u16 = 50;
/// Largest zoom, in percent.
pub const MAX_ZOOM_PERCENT: u16 = 200;
/// Zoom change per step, in percent.
pub const ZOOM_STEP_PERCENT: u16 = 10;
/// Initial zoom, in percent.
pub const DEFAULT_ZOOM_PERCENT: u16 = 90;

/// Bounded zoom factor.
///
/// Stored as whole percent so repeated steps stay exact: three
/// [`zoom_in`](Self::zoom_in) calls from 90% land on 120%, never 120.0000001%.
///
/// ```
/// use pagewise::viewer::ZoomController;
///
/// let mut zoom = ZoomController::default();
/// zoom.zoom_in();
/// assert_eq!(zoom.percent(), 100);
/// assert_eq!(zoom.render_width(Some(120)), Some(120));
/// assert_eq!(zoom.render_width(None), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomController {
    percent: u16,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self {
            percent: DEFAULT_ZOOM_PERCENT,
        }
    }
}

impl ZoomController {
    /// Build from a zoom factor (`1.0` = 100%), rounded to whole percent and
    /// clamped into range. Non-finite factors give the default.
    pub fn from_factor(factor: f32) -> Self {
        if !factor.is_finite() {
            return Self::default();
        }
        let percent = (factor * 100.0)
            .round()
            .clamp(f32::from(MIN_ZOOM_PERCENT), f32::from(MAX_ZOOM_PERCENT));
        // Clamped into 50..=200 above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = percent as u16;
        Self { percent }
    }

    pub const fn percent(&self) -> u16 {
        self.percent
    }

    pub fn factor(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }

    /// Step up by 10%, saturating at 200%. Returns whether the zoom changed.
    pub fn zoom_in(&mut self) -> bool {
        let next = (self.percent + ZOOM_STEP_PERCENT).min(MAX_ZOOM_PERCENT);
        let changed = next != self.percent;
        self.percent = next;
        changed
    }

    /// Step down by 10%, saturating at 50%. Returns whether the zoom changed.
    pub fn zoom_out(&mut self) -> bool {
        let next = self
            .percent
            .saturating_sub(ZOOM_STEP_PERCENT)
            .max(MIN_ZOOM_PERCENT);
        let changed = next != self.percent;
        self.percent = next;
        changed
    }

    /// Effective render width: `container_width * zoom`, or `None` (render at
    /// the rasterizer's intrinsic default) while the container is unmeasured.
    pub fn render_width(&self, container_width: Option<u16>) -> Option<u16> {
        let width = container_width?;
        let scaled = u32::from(width) * u32::from(self.percent) / 100;
        Some(u16::try_from(scaled).unwrap_or(u16::MAX).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zoom_is_ninety_percent() {
        assert_eq!(ZoomController::default().percent(), 90);
    }

    #[test]
    fn test_three_zoom_ins_from_ninety_reach_one_twenty() {
        let mut zoom = ZoomController::default();
        for _ in 0..3 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), 120);
        assert!((zoom.factor() - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zoom_in_clamps_at_two_hundred() {
        let mut zoom = ZoomController::from_factor(1.2);
        for _ in 0..5 {
            assert!(zoom.zoom_in());
        }
        assert_eq!(zoom.percent(), 170);
        for _ in 0..3 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), 200);
        assert!(!zoom.zoom_in(), "zooming past the maximum has no effect");
        assert_eq!(zoom.percent(), 200);
    }

    #[test]
    fn test_zoom_out_clamps_at_fifty() {
        let mut zoom = ZoomController::from_factor(0.6);
        assert!(zoom.zoom_out());
        assert_eq!(zoom.percent(), 50);
        assert!(!zoom.zoom_out());
        assert_eq!(zoom.percent(), 50);
    }

    #[test]
    fn test_from_factor_clamps_and_rounds() {
        assert_eq!(ZoomController::from_factor(5.0).percent(), 200);
        assert_eq!(ZoomController::from_factor(0.1).percent(), 50);
        assert_eq!(ZoomController::from_factor(1.234).percent(), 123);
        assert_eq!(ZoomController::from_factor(f32::NAN).percent(), 90);
    }

    #[test]
    fn test_render_width_scales_container_width() {
        let zoom = ZoomController::from_factor(1.5);
        assert_eq!(zoom.render_width(Some(60)), Some(90));
        assert_eq!(zoom.render_width(None), None);
    }

    #[test]
    fn test_render_width_never_zero() {
        let zoom = ZoomController::from_factor(0.5);
        assert_eq!(zoom.render_width(Some(1)), Some(1));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn zoom_stays_in_bounds_and_steps_by_ten(
                start in 50u16..=200,
                steps in proptest::collection::vec(any::<bool>(), 0..64),
            ) {
                let mut zoom = ZoomController::from_factor(f32::from(start) / 100.0);
                for step_in in steps {
                    let before = zoom.percent();
                    if step_in {
                        zoom.zoom_in();
                        let expected = (before + ZOOM_STEP_PERCENT).min(MAX_ZOOM_PERCENT);
                        prop_assert_eq!(zoom.percent(), expected);
                    } else {
                        zoom.zoom_out();
                        let expected = before.saturating_sub(ZOOM_STEP_PERCENT).max(MIN_ZOOM_PERCENT);
                        prop_assert_eq!(zoom.percent(), expected);
                    }
                    prop_assert!((MIN_ZOOM_PERCENT..=MAX_ZOOM_PERCENT).contains(&zoom.percent()));
                }
            }
        }
    }
}
