//! Exponential smoothing for a single scalar
//!
//! Each call to [`MotionController::update`] closes a fixed fraction of the
//! gap between the current value and the target, so motion eases in instead
//! of snapping.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionController {
    current: f32,
    target: f32,
    /// Fraction of the remaining gap closed per update, in (0, 1]
    rate: f32,
}

impl MotionController {
    /// Start at rest on `initial`
    pub fn new(initial: f32, rate: f32) -> Self {
        debug_assert!(rate > 0.0 && rate <= 1.0, "rate {rate} outside (0, 1]");
        Self {
            current: initial,
            target: initial,
            rate,
        }
    }

    /// Store the desired value; takes effect on the next update
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Step toward the target and return the new value
    pub fn update(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.rate;
        self.current
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }
}
