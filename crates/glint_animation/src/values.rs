//! Animatable value types
//!
//! Provides the move-towards primitive used by every driver, plus the
//! distance/rate calculation that turns a duration into a per-tick step.
//!
//! Drivers never test raw float equality against a destination they are
//! still approaching. `move_towards` snaps onto the target once it is within
//! one step, so the returned value compares equal to the destination on the
//! final tick and termination is bounded.

use glint_core::{Color, Vec2, Vec3};

/// Tolerance absorbed by the final snap, covering rounding left over from
/// accumulating many equal steps
pub const SNAP_EPSILON: f32 = 1e-5;

/// Per-tick movement needed to cover `total_distance` in `duration` seconds
/// when ticks arrive every `frame_delta` seconds
///
/// Sampled once when an effect starts. A non-positive duration yields an
/// infinite step, completing on the first tick.
pub fn step_per_tick(duration: f32, total_distance: f32, frame_delta: f32) -> f32 {
    if duration <= 0.0 {
        return f32::INFINITY;
    }
    let ticks_in_duration = duration / frame_delta;
    total_distance / ticks_in_duration
}

/// Values that can be moved linearly toward a target without overshooting
pub trait MoveTowards: Copy + PartialEq {
    /// Distance between two values in the value's own metric
    fn distance(&self, target: &Self) -> f32;

    /// Move toward `target` by at most `max_delta`, landing exactly on it
    /// when within reach
    fn move_towards(&self, target: &Self, max_delta: f32) -> Self;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl MoveTowards for f32 {
    fn distance(&self, target: &Self) -> f32 {
        (target - self).abs()
    }

    fn move_towards(&self, target: &Self, max_delta: f32) -> Self {
        let delta = target - self;
        if delta.abs() <= max_delta + SNAP_EPSILON {
            return *target;
        }
        self + delta.signum() * max_delta
    }
}

// ============================================================================
// Integer Implementation (font sizes)
// ============================================================================

impl MoveTowards for u32 {
    fn distance(&self, target: &Self) -> f32 {
        self.abs_diff(*target) as f32
    }

    /// Rounds the float step to the nearest integer. A step that rounds to no
    /// change is forced one unit toward the target so the tween always ends.
    fn move_towards(&self, target: &Self, max_delta: f32) -> Self {
        if self == target {
            return *target;
        }
        let moved = (*self as f32).move_towards(&(*target as f32), max_delta).round() as u32;
        if moved != *self {
            moved
        } else if target > self {
            self + 1
        } else {
            self - 1
        }
    }
}

// ============================================================================
// Vector Implementations
// ============================================================================

impl MoveTowards for Vec2 {
    fn distance(&self, target: &Self) -> f32 {
        Vec2::distance(self, *target)
    }

    fn move_towards(&self, target: &Self, max_delta: f32) -> Self {
        let delta = *target - *self;
        let dist = delta.length();
        if dist <= max_delta + SNAP_EPSILON {
            return *target;
        }
        *self + delta * (max_delta / dist)
    }
}

impl MoveTowards for Vec3 {
    fn distance(&self, target: &Self) -> f32 {
        Vec3::distance(self, *target)
    }

    fn move_towards(&self, target: &Self, max_delta: f32) -> Self {
        let delta = *target - *self;
        let dist = delta.length();
        if dist <= max_delta + SNAP_EPSILON {
            return *target;
        }
        *self + delta * (max_delta / dist)
    }
}

// ============================================================================
// Color Implementation
// ============================================================================

impl MoveTowards for Color {
    fn distance(&self, target: &Self) -> f32 {
        Color::distance(self, target)
    }

    fn move_towards(&self, target: &Self, max_delta: f32) -> Self {
        let dist = Color::distance(self, target);
        if dist <= max_delta + SNAP_EPSILON {
            return *target;
        }
        let t = max_delta / dist;
        Color::rgba(
            self.r + (target.r - self.r) * t,
            self.g + (target.g - self.g) * t,
            self.b + (target.b - self.b) * t,
            self.a + (target.a - self.a) * t,
        )
    }
}
