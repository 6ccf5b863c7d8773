//! Effect operations
//!
//! The public effect API is implemented on [`SchedulerHandle`] across these
//! modules:
//!
//! - `color`: `fade`, `fade_in`, `fade_out`, `glow`, `stop_glowing`
//! - `transform`: `set_position`, `set_scale`
//! - `text`: `set_font_size`
//!
//! Each operation validates its request, samples the step size once from the
//! scheduler's current frame delta, and registers a driver in the registry,
//! replacing whatever held the same `(element, category)` slot.

mod color;
mod text;
mod transform;

use glint_core::GraphicRef;

use crate::driver::Tween;
use crate::error::{check_duration, reject, EffectError, Result};
use crate::property::AnimatedProperty;
use crate::scheduler::SchedulerHandle;
use crate::values::{step_per_tick, MoveTowards};
use crate::waiter::Waiter;

/// Per-tick step for an effect starting `distance` away from its destination
///
/// A zero distance falls back to a unit distance so the driver still moves
/// if the host changes the property before the first tick.
pub(crate) fn start_step(duration: f32, distance: f32, frame_delta: f32) -> f32 {
    let distance = if distance > 0.0 { distance } else { 1.0 };
    step_per_tick(duration, distance, frame_delta)
}

/// Reject requests on inactive elements
pub(crate) fn ensure_active(operation: &'static str, target: &GraphicRef) -> Result<()> {
    let (active, name) = target.with(|g| (g.is_active_and_enabled(), g.name().to_string()));
    if active {
        Ok(())
    } else {
        reject(EffectError::Inactive {
            operation,
            element: name,
        })
    }
}

impl SchedulerHandle {
    /// Start a linear tween of `P` on `target` toward `destination`
    pub(crate) fn start_tween<P: AnimatedProperty>(
        &self,
        operation: &'static str,
        target: &GraphicRef,
        destination: P::Value,
        duration: f32,
    ) -> Result<Waiter<P>> {
        check_duration(operation, duration)?;
        ensure_active(operation, target)?;

        let Some(current) = target.with(P::read) else {
            return reject(EffectError::MissingProperty {
                operation,
                element: target.name(),
                category: P::CATEGORY,
            });
        };

        let registered = self.with_inner(|inner| {
            inner.touch_if_idle();
            let step = start_step(duration, current.distance(&destination), inner.frame_delta);
            let driver = Tween::<P>::new(target.clone(), destination, step);
            inner.registry.add(P::CATEGORY, Box::new(driver)).is_some()
        })?;

        if !registered {
            return reject(EffectError::Inactive {
                operation,
                element: target.name(),
            });
        }

        Ok(Waiter::new(self.clone(), target.clone(), destination))
    }
}
