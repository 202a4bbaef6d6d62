//! Direction detection with sensitivity debouncing.
//!
//! Raw pointer streams jitter by a pixel or two between events. The filter
//! keeps a "settled" coordinate per axis and reports a direction only when
//! the pointer has moved further than the sensitivity threshold from it;
//! reporting re-settles that axis at the new position. Without this, a
//! single gesture would re-trigger a swap on every intermediate move event.

/// Signed per-axis movement report.
///
/// Sign contract: motion toward larger coordinates ("right" on x, "down"
/// on y) reports **-1**, motion toward smaller coordinates reports **1**,
/// and 0 means the axis has not moved past the sensitivity threshold.
/// Callers branch on the sign to choose insert-before vs insert-after and
/// indent vs outdent, so the inversion is load-bearing; do not "fix" it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveDirection {
    /// Horizontal component: -1 right, 1 left, 0 no significant motion.
    pub horizontal: i8,
    /// Vertical component: -1 down, 1 up, 0 no significant motion.
    pub vertical: i8,
}

impl MoveDirection {
    /// No significant motion on either axis.
    pub const NONE: Self = Self {
        horizontal: 0,
        vertical: 0,
    };

    /// True if neither axis moved past the threshold.
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Debouncing direction detector for a single gesture.
#[derive(Debug, Clone, Copy)]
pub struct DirectionFilter {
    /// Last settled x (updated only when the horizontal axis fires).
    last_x: f32,
    /// Last settled y (updated only when the vertical axis fires).
    last_y: f32,
}

impl DirectionFilter {
    /// Create a filter settled at the gesture's starting position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { last_x: x, last_y: y }
    }

    /// Report per-axis direction for a new pointer position.
    ///
    /// An axis fires only when the delta from its settled value exceeds
    /// `sensitivity`; firing re-settles that axis at the new value. The
    /// other axis keeps its settled value untouched.
    pub fn detect(&mut self, x: f32, y: f32, sensitivity: f32) -> MoveDirection {
        let mut direction = MoveDirection::NONE;

        if (x - self.last_x).abs() > sensitivity {
            direction.horizontal = if x > self.last_x { -1 } else { 1 };
            self.last_x = x;
        }
        if (y - self.last_y).abs() > sensitivity {
            direction.vertical = if y > self.last_y { -1 } else { 1 };
            self.last_y = y;
        }

        direction
    }
}
