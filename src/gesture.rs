//! Gesture interpretation
//!
//! Turns raw pointer samples into the discrete outcomes the controller acts
//! on: page previous/next, snap back, or a recognized long-press. Timestamps
//! are monotonic durations supplied by the host; nothing here reads a clock,
//! which keeps classification fully deterministic under test.

use std::collections::VecDeque;
use std::time::Duration;

use crate::constants::gesture;
use crate::types::Vec2;

/// One timestamped pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Translation from the gesture origin
    pub translation: Vec2,
    /// Host-supplied monotonic timestamp
    pub at: Duration,
}

/// Transient per-gesture state: accumulated translation plus a trailing
/// sample window for velocity estimation. Exists only while a pointer is
/// down; abandoning the gesture just drops it.
#[derive(Debug, Clone)]
pub struct DragState {
    origin: Vec2,
    started_at: Duration,
    translation: Vec2,
    peak_excursion: f32,
    samples: VecDeque<DragSample>,
}

impl DragState {
    pub fn begin(origin: Vec2, at: Duration) -> Self {
        let mut state = Self {
            origin,
            started_at: at,
            translation: Vec2::ZERO,
            peak_excursion: 0.0,
            samples: VecDeque::new(),
        };
        state.samples.push_back(DragSample {
            translation: Vec2::ZERO,
            at,
        });
        state
    }

    /// Record a pointer position. Samples older than the velocity window are
    /// discarded; peak excursion is monotonic for the life of the gesture.
    pub fn push(&mut self, position: Vec2, at: Duration) {
        let translation = position - self.origin;
        self.translation = translation;
        self.peak_excursion = self.peak_excursion.max(translation.length());
        self.samples.push_back(DragSample { translation, at });

        let window = Duration::from_millis(gesture::VELOCITY_WINDOW_MS);
        while let Some(front) = self.samples.front() {
            if front.at + window < at {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Net translation from the gesture origin.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Farthest the pointer has strayed from the origin at any point.
    pub fn peak_excursion(&self) -> f32 {
        self.peak_excursion
    }

    pub fn held(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    /// Velocity estimate over the trailing sample window, pixels/second.
    /// Zero with fewer than two in-window samples or zero elapsed time.
    pub fn velocity(&self) -> Vec2 {
        if self.samples.len() < 2 {
            return Vec2::ZERO;
        }
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return Vec2::ZERO;
        };
        let dt = last.at.saturating_sub(first.at).as_secs_f32();
        if dt <= 0.0 {
            return Vec2::ZERO;
        }
        let delta = last.translation - first.translation;
        Vec2::new(delta.x / dt, delta.y / dt)
    }
}

/// Outcome of releasing a Browse-mode drag. Exactly one per release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    PagePrevious,
    PageNext,
    SnapBack,
}

/// Classification thresholds; defaults come from `constants::gesture`.
#[derive(Debug, Clone, Copy)]
pub struct GestureInterpreter {
    pub distance_threshold: f32,
    pub velocity_threshold: f32,
    pub min_page_drag: f32,
    pub horizontal_bias: f32,
    pub long_press_duration: Duration,
    pub long_press_tolerance: f32,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self {
            distance_threshold: gesture::DISTANCE_THRESHOLD,
            velocity_threshold: gesture::VELOCITY_THRESHOLD,
            min_page_drag: gesture::MIN_PAGE_DRAG,
            horizontal_bias: gesture::HORIZONTAL_BIAS,
            long_press_duration: Duration::from_millis(gesture::LONG_PRESS_DURATION_MS),
            long_press_tolerance: gesture::LONG_PRESS_TOLERANCE,
        }
    }
}

impl GestureInterpreter {
    /// A drag counts as paging only when clearly horizontal: past the minimum
    /// displacement and dominating the vertical axis.
    pub fn is_paging_gesture(&self, translation: Vec2) -> bool {
        translation.x.abs() > self.min_page_drag
            && translation.x.abs() > self.horizontal_bias * translation.y.abs()
    }

    /// Classify a Browse-mode release. One page change at most, regardless of
    /// velocity magnitude; a page against the end of the row snaps back.
    pub fn classify_release(
        &self,
        translation: Vec2,
        velocity: Vec2,
        selected: usize,
        count: usize,
    ) -> PageOutcome {
        if !self.is_paging_gesture(translation) {
            return PageOutcome::SnapBack;
        }
        if (translation.x > self.distance_threshold || velocity.x > self.velocity_threshold)
            && selected > 0
        {
            PageOutcome::PagePrevious
        } else if (translation.x < -self.distance_threshold
            || velocity.x < -self.velocity_threshold)
            && selected + 1 < count
        {
            PageOutcome::PageNext
        } else {
            PageOutcome::SnapBack
        }
    }

    /// True once a press has been held long enough with near-zero movement.
    /// Peak excursion is monotonic, so movement past the tolerance cancels
    /// recognition for the rest of the gesture.
    pub fn long_press_recognized(&self, drag: &DragState, now: Duration) -> bool {
        drag.peak_excursion() <= self.long_press_tolerance
            && drag.held(now) >= self.long_press_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::default()
    }

    #[test]
    fn test_rightward_swipe_pages_previous() {
        let outcome =
            interpreter().classify_release(Vec2::new(40.0, 0.0), Vec2::ZERO, 1, 3);
        assert_eq!(outcome, PageOutcome::PagePrevious);
    }

    #[test]
    fn test_rightward_swipe_at_first_card_snaps_back() {
        let outcome =
            interpreter().classify_release(Vec2::new(40.0, 0.0), Vec2::ZERO, 0, 3);
        assert_eq!(outcome, PageOutcome::SnapBack);
    }

    #[test]
    fn test_leftward_swipe_pages_next() {
        let outcome =
            interpreter().classify_release(Vec2::new(-40.0, 0.0), Vec2::ZERO, 0, 3);
        assert_eq!(outcome, PageOutcome::PageNext);
    }

    #[test]
    fn test_leftward_swipe_at_last_card_snaps_back() {
        let outcome =
            interpreter().classify_release(Vec2::new(-40.0, 0.0), Vec2::ZERO, 2, 3);
        assert_eq!(outcome, PageOutcome::SnapBack);
    }

    #[test]
    fn test_below_distance_threshold_snaps_back() {
        let outcome =
            interpreter().classify_release(Vec2::new(10.0, 0.0), Vec2::ZERO, 1, 3);
        assert_eq!(outcome, PageOutcome::SnapBack);
    }

    #[test]
    fn test_fast_flick_pages_despite_short_distance() {
        let outcome = interpreter().classify_release(
            Vec2::new(-12.0, 0.0),
            Vec2::new(-450.0, 0.0),
            0,
            3,
        );
        assert_eq!(outcome, PageOutcome::PageNext);
    }

    #[test]
    fn test_vertical_drag_is_not_paging() {
        let i = interpreter();
        assert!(!i.is_paging_gesture(Vec2::new(30.0, 80.0)));
        assert!(i.is_paging_gesture(Vec2::new(30.0, 20.0)));
        assert_eq!(
            i.classify_release(Vec2::new(30.0, 80.0), Vec2::ZERO, 1, 3),
            PageOutcome::SnapBack
        );
    }

    #[test]
    fn test_velocity_from_trailing_window() {
        let mut drag = DragState::begin(Vec2::ZERO, ms(0));
        drag.push(Vec2::new(10.0, 0.0), ms(50));
        drag.push(Vec2::new(20.0, 0.0), ms(100));
        let v = drag.velocity();
        assert!((v.x - 200.0).abs() < 1e-3);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_velocity_ignores_stale_samples() {
        let mut drag = DragState::begin(Vec2::ZERO, ms(0));
        drag.push(Vec2::new(200.0, 0.0), ms(500));
        // Pointer held still for the last stretch: velocity should be near
        // zero even though the gesture covered a lot of ground earlier.
        drag.push(Vec2::new(200.0, 0.0), ms(620));
        drag.push(Vec2::new(200.0, 0.0), ms(700));
        assert_eq!(drag.velocity().x, 0.0);
    }

    #[test]
    fn test_flick_after_long_hold_uses_recent_window() {
        let mut drag = DragState::begin(Vec2::ZERO, ms(0));
        // Still hold, then a fast flick: only the flick should count.
        drag.push(Vec2::ZERO, ms(600));
        drag.push(Vec2::new(-40.0, 0.0), ms(650));
        let v = drag.velocity();
        assert!((v.x + 800.0).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_zero_with_single_in_window_sample() {
        let mut drag = DragState::begin(Vec2::ZERO, ms(0));
        // The origin sample is stale by now; one sample is no baseline.
        drag.push(Vec2::new(-40.0, 0.0), ms(600));
        assert_eq!(drag.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_velocity_zero_without_elapsed_time() {
        let drag = DragState::begin(Vec2::ZERO, ms(0));
        assert_eq!(drag.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_long_press_recognized_after_still_hold() {
        let i = interpreter();
        let mut drag = DragState::begin(Vec2::new(100.0, 100.0), ms(0));
        drag.push(Vec2::new(102.0, 101.0), ms(300));
        assert!(!i.long_press_recognized(&drag, ms(300)));
        assert!(i.long_press_recognized(&drag, ms(500)));
    }

    #[test]
    fn test_long_press_cancelled_by_movement() {
        let i = interpreter();
        let mut drag = DragState::begin(Vec2::new(100.0, 100.0), ms(0));
        drag.push(Vec2::new(120.0, 100.0), ms(200));
        // Returning to the origin does not revive recognition.
        drag.push(Vec2::new(100.0, 100.0), ms(400));
        assert!(!i.long_press_recognized(&drag, ms(800)));
    }
}
