//! Effect drivers
//!
//! A driver is a small state machine advanced exactly once per tick by the
//! scheduler. Each step reads the element, moves one property toward its
//! destination, writes it back, and reports whether it is done. Drivers never
//! deregister themselves: they report [`DriverStatus::Finished`] and the
//! registry removes them through its single removal path.

use std::marker::PhantomData;

use glint_core::{Color, GraphicRef};

use crate::property::{AnimatedProperty, ColorProperty};
use crate::values::MoveTowards;

/// Outcome of one driver step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverStatus {
    Running,
    Finished,
}

/// A per-tick effect state machine
pub trait EffectDriver: Send {
    /// Advance one tick
    fn step(&mut self) -> DriverStatus;

    /// The element this driver mutates
    fn target(&self) -> &GraphicRef;

    /// Glow drivers keep their element in the glow set while registered
    fn is_glow(&self) -> bool {
        false
    }
}

/// Linear move-towards tween of a single property
///
/// Used for fades, position, scale and font size.
pub struct Tween<P: AnimatedProperty> {
    target: GraphicRef,
    destination: P::Value,
    step: f32,
    _property: PhantomData<fn() -> P>,
}

impl<P: AnimatedProperty> Tween<P> {
    /// `step` is the per-tick distance, sampled once by the caller
    pub fn new(target: GraphicRef, destination: P::Value, step: f32) -> Self {
        Self {
            target,
            destination,
            step,
            _property: PhantomData,
        }
    }

    pub fn destination(&self) -> P::Value {
        self.destination
    }
}

impl<P: AnimatedProperty> EffectDriver for Tween<P> {
    fn step(&mut self) -> DriverStatus {
        let destination = self.destination;
        let step = self.step;

        self.target.with_mut(|graphic| {
            if !graphic.is_active_and_enabled() {
                tracing::debug!(
                    element = graphic.name(),
                    category = %P::CATEGORY,
                    "element deactivated mid-effect, stopping"
                );
                return DriverStatus::Finished;
            }

            let Some(current) = P::read(graphic) else {
                return DriverStatus::Finished;
            };

            let next = current.move_towards(&destination, step);
            P::write(graphic, next);

            if next == destination {
                DriverStatus::Finished
            } else {
                DriverStatus::Running
            }
        })
    }

    fn target(&self) -> &GraphicRef {
        &self.target
    }
}

/// Which way a glow is currently heading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GlowLeg {
    Dimming,
    Brightening,
}

/// Perpetual back-and-forth color fade
///
/// Never finishes on its own; it runs until removed from the registry or its
/// element is deactivated.
pub struct Glow {
    target: GraphicRef,
    initial: Color,
    dimmed: Color,
    step: f32,
    leg: GlowLeg,
}

impl Glow {
    pub fn new(target: GraphicRef, initial: Color, dimmed: Color, step: f32) -> Self {
        Self {
            target,
            initial,
            dimmed,
            step,
            leg: GlowLeg::Dimming,
        }
    }
}

impl EffectDriver for Glow {
    fn step(&mut self) -> DriverStatus {
        let goal = match self.leg {
            GlowLeg::Dimming => self.dimmed,
            GlowLeg::Brightening => self.initial,
        };
        let step = self.step;

        let reached = self.target.with_mut(|graphic| {
            if !graphic.is_active_and_enabled() {
                return None;
            }
            let current = ColorProperty::read(graphic)?;
            let next = current.move_towards(&goal, step);
            ColorProperty::write(graphic, next);
            Some(next == goal)
        });

        match reached {
            None => DriverStatus::Finished,
            Some(true) => {
                self.leg = match self.leg {
                    GlowLeg::Dimming => GlowLeg::Brightening,
                    GlowLeg::Brightening => GlowLeg::Dimming,
                };
                DriverStatus::Running
            }
            Some(false) => DriverStatus::Running,
        }
    }

    fn target(&self) -> &GraphicRef {
        &self.target
    }

    fn is_glow(&self) -> bool {
        true
    }
}
