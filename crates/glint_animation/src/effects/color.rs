//! Fades and glows

use glint_core::{Color, GraphicRef};

use super::{ensure_active, start_step};
use crate::driver::Glow;
use crate::error::{check_duration, reject, EffectError, Result};
use crate::property::{ColorProperty, EffectCategory};
use crate::registry::EffectKey;
use crate::scheduler::SchedulerHandle;
use crate::waiter::FadeWaiter;

impl SchedulerHandle {
    /// Fade `target`'s alpha to 1 over `duration` seconds
    ///
    /// Returns `Ok(None)` without starting anything if the element is
    /// already fully opaque.
    pub fn fade_in(&self, target: &GraphicRef, duration: f32) -> Result<Option<FadeWaiter>> {
        ensure_active("fade_in", target)?;

        let current = target.color();
        let destination = current.with_alpha(1.0);
        if current == destination {
            return Ok(None);
        }

        self.start_tween::<ColorProperty>("fade_in", target, destination, duration)
            .map(Some)
    }

    /// Fade `target`'s alpha to 0 over `duration` seconds
    pub fn fade_out(&self, target: &GraphicRef, duration: f32) -> Result<FadeWaiter> {
        ensure_active("fade_out", target)?;

        let destination = target.color().with_alpha(0.0);
        self.start_tween::<ColorProperty>("fade_out", target, destination, duration)
    }

    /// Fade `target` to `color` over `duration` seconds
    pub fn fade(&self, target: &GraphicRef, duration: f32, color: Color) -> Result<FadeWaiter> {
        self.start_tween::<ColorProperty>("fade", target, color, duration)
    }

    /// Pulse `target` between its current color and the same color at
    /// `alpha`, each leg taking `duration` seconds, until [`stop_glowing`]
    ///
    /// [`stop_glowing`]: SchedulerHandle::stop_glowing
    pub fn glow(&self, target: &GraphicRef, duration: f32, alpha: f32) -> Result<()> {
        check_duration("glow", duration)?;
        ensure_active("glow", target)?;

        self.with_inner(|inner| {
            if inner.registry.is_glowing(target.id()) {
                return reject(EffectError::AlreadyGlowing {
                    element: target.name(),
                });
            }

            inner.touch_if_idle();
            let initial = target.color();
            let dimmed = initial.with_alpha(alpha);
            let step = start_step(duration, initial.distance(&dimmed), inner.frame_delta);
            let driver = Glow::new(target.clone(), initial, dimmed, step);
            match inner.registry.add(EffectCategory::Color, Box::new(driver)) {
                Some(_) => Ok(()),
                None => reject(EffectError::Inactive {
                    operation: "glow",
                    element: target.name(),
                }),
            }
        })?
    }

    /// End a glow and snap the element back to full opacity
    pub fn stop_glowing(&self, target: &GraphicRef) -> Result<()> {
        self.with_inner(|inner| {
            if !inner.registry.is_glowing(target.id()) {
                return reject(EffectError::NotGlowing {
                    element: target.name(),
                });
            }
            inner
                .registry
                .remove(EffectKey::new(target.id(), EffectCategory::Color));
            Ok(())
        })??;

        target.set_color(target.color().with_alpha(1.0));
        Ok(())
    }

    /// Whether `target` is currently glowing
    pub fn is_glowing(&self, target: &GraphicRef) -> bool {
        self.with_inner(|inner| inner.registry.is_glowing(target.id()))
            .unwrap_or(false)
    }
}
