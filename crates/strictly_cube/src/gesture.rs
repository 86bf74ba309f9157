//! Telling clicks from view drags.
//!
//! One press-release cycle produces at most one [`Click`]. A press that
//! moves further than the drag threshold, or is held too long, is treated as
//! view manipulation (orbiting the cube) and produces nothing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Default movement, in screen units, after which a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;

/// Default longest press that still counts as a click.
pub const DEFAULT_CLICK_MAX: Duration = Duration::from_millis(200);

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPosition {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl ScreenPosition {
    /// Creates a position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: ScreenPosition) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A disambiguated click at a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Click {
    /// Where the pointer was released.
    pub position: ScreenPosition,
}

/// State of one press-release cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGesture {
    /// Where the press started.
    pub start_position: ScreenPosition,
    /// When the press started.
    pub start_time: Duration,
    /// Set once movement crosses the threshold. Never cleared within a cycle.
    pub dragging: bool,
}

/// Single-pointer click/drag disambiguator.
#[derive(Debug, Clone)]
pub struct PointerGestureClassifier {
    drag_threshold: f32,
    click_max: Duration,
    gesture: Option<PointerGesture>,
}

impl PointerGestureClassifier {
    /// Creates a classifier with explicit thresholds.
    pub fn new(drag_threshold: f32, click_max: Duration) -> Self {
        Self {
            drag_threshold,
            click_max,
            gesture: None,
        }
    }

    /// Returns the cycle in progress, if the pointer is down.
    pub fn gesture(&self) -> Option<&PointerGesture> {
        self.gesture.as_ref()
    }

    /// Returns true while no press is in progress.
    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    /// Starts a cycle. A press while already pressed restarts the cycle.
    #[instrument(skip(self))]
    pub fn pointer_down(&mut self, position: ScreenPosition, at: Duration) {
        if self.gesture.is_some() {
            debug!("Press without release, restarting gesture");
        }
        self.gesture = Some(PointerGesture {
            start_position: position,
            start_time: at,
            dragging: false,
        });
    }

    /// Tracks movement. Ignored while idle.
    #[instrument(skip(self))]
    pub fn pointer_move(&mut self, position: ScreenPosition, at: Duration) {
        let threshold = self.drag_threshold;
        if let Some(gesture) = self.gesture.as_mut()
            && !gesture.dragging
            && gesture.start_position.distance(position) > threshold
        {
            gesture.dragging = true;
            trace!("Gesture became a drag");
        }
    }

    /// Ends the cycle, returning a click if it qualified as one.
    ///
    /// Always returns to idle.
    #[instrument(skip(self))]
    pub fn pointer_up(&mut self, position: ScreenPosition, at: Duration) -> Option<Click> {
        let gesture = self.gesture.take()?;
        let held = at.saturating_sub(gesture.start_time);

        if gesture.dragging {
            debug!("Release after drag, no click");
            return None;
        }
        if held >= self.click_max {
            debug!(?held, "Press held too long, no click");
            return None;
        }
        Some(Click { position })
    }

    /// Abandons the cycle in progress without emitting anything.
    pub fn cancel(&mut self) {
        self.gesture = None;
    }
}

impl Default for PointerGestureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD, DEFAULT_CLICK_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn at(x: f32, y: f32) -> ScreenPosition {
        ScreenPosition::new(x, y)
    }

    #[test]
    fn test_short_still_press_is_click() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_down(at(0.0, 0.0), ms(0));
        let click = classifier.pointer_up(at(2.0, 1.0), ms(50));
        assert_eq!(click, Some(Click { position: at(2.0, 1.0) }));
        assert!(classifier.is_idle());
    }

    #[test]
    fn test_drag_emits_nothing() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_down(at(0.0, 0.0), ms(0));
        classifier.pointer_move(at(10.0, 0.0), ms(20));
        assert_eq!(classifier.pointer_up(at(10.0, 0.0), ms(50)), None);
        assert!(classifier.is_idle());
    }

    #[test]
    fn test_drag_is_sticky_even_if_pointer_returns() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_down(at(0.0, 0.0), ms(0));
        classifier.pointer_move(at(0.0, 6.0), ms(10));
        classifier.pointer_move(at(0.0, 0.0), ms(20));
        assert_eq!(classifier.pointer_up(at(0.0, 0.0), ms(30)), None);
    }

    #[test]
    fn test_movement_at_threshold_is_not_drag() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_down(at(0.0, 0.0), ms(0));
        classifier.pointer_move(at(3.0, 4.0), ms(10));
        assert!(classifier.pointer_up(at(3.0, 4.0), ms(20)).is_some());
    }

    #[test]
    fn test_long_press_emits_nothing() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_down(at(0.0, 0.0), ms(0));
        assert_eq!(classifier.pointer_up(at(0.0, 0.0), ms(200)), None);

        classifier.pointer_down(at(0.0, 0.0), ms(1000));
        assert!(classifier.pointer_up(at(0.0, 0.0), ms(1199)).is_some());
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_move(at(50.0, 50.0), ms(0));
        assert_eq!(classifier.pointer_up(at(0.0, 0.0), ms(10)), None);
    }

    #[test]
    fn test_each_cycle_starts_fresh() {
        let mut classifier = PointerGestureClassifier::default();
        classifier.pointer_down(at(0.0, 0.0), ms(0));
        classifier.pointer_move(at(20.0, 0.0), ms(10));
        classifier.pointer_up(at(20.0, 0.0), ms(20));

        classifier.pointer_down(at(20.0, 0.0), ms(100));
        assert!(classifier.pointer_up(at(21.0, 0.0), ms(150)).is_some());
    }
}
