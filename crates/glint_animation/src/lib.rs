//! Glint Effects
//!
//! Per-element visual effects and timers driven by a single tick pump.
//!
//! # Features
//!
//! - **Fades**: fade in, fade out, or fade to any color
//! - **Glow**: perpetual alpha pulse until stopped
//! - **Tweens**: position, scale and font size, linear at a fixed per-tick rate
//! - **One slot per category**: a new effect on the same element and category
//!   replaces the running one
//! - **Waiters**: poll or `.await` an effect's completion
//! - **Shared timers**: one per element, extendable while running
//! - **Background pump**: optional thread ticking at a fixed rate
//!
//! # Example
//!
//! ```rust
//! use glint_animation::EffectScheduler;
//! use glint_core::Element;
//!
//! let scheduler = EffectScheduler::new();
//! let handle = scheduler.handle();
//! let panel = Element::new("panel").into_ref();
//!
//! let waiter = handle.fade_out(&panel, 0.25).unwrap();
//! while waiter.is_waiting() {
//!     scheduler.tick_with_delta(1.0 / 60.0);
//! }
//! assert_eq!(panel.color().a, 0.0);
//! ```

pub mod config;
pub mod driver;
mod effects;
pub mod error;
pub mod property;
pub mod registry;
pub mod scheduler;
pub mod timer;
pub mod values;
pub mod waiter;

#[cfg(test)]
mod test_util;

pub use config::{ConfigError, EffectsConfig};
pub use driver::{DriverStatus, EffectDriver, Glow, Tween};
pub use error::{EffectError, Result};
pub use property::{
    AnimatedProperty, ColorProperty, EffectCategory, FontSizeProperty, PositionProperty,
    ScaleProperty,
};
pub use registry::{EffectId, EffectKey, EffectRegistry};
pub use scheduler::{EffectScheduler, SchedulerHandle, WakeCallback};
pub use timer::EffectTimer;
pub use values::{step_per_tick, MoveTowards, SNAP_EPSILON};
pub use waiter::{Completion, FadeWaiter, FontSizeWaiter, PositionWaiter, ScaleWaiter, Waiter};
