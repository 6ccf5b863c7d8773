//! Completion waiters
//!
//! A waiter is returned when an effect starts. It keeps waiting while the
//! element has not reached the destination value *and* the effect still holds
//! its slot in the registry. Reaching the value and being superseded or
//! stopped look the same to the caller.
//!
//! Waiters can be polled with [`Waiter::is_waiting`] from a frame loop, or
//! awaited: the scheduler wakes pending futures after every tick.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use glint_core::GraphicRef;

use crate::property::{
    AnimatedProperty, ColorProperty, FontSizeProperty, PositionProperty, ScaleProperty,
};
use crate::scheduler::SchedulerHandle;

/// Something that eventually completes, checked once per tick
pub trait Completion: Send {
    fn is_complete(&self) -> bool;
}

/// Waits for an effect on one property to reach its destination or lose its slot
pub struct Waiter<P: AnimatedProperty> {
    handle: SchedulerHandle,
    target: GraphicRef,
    destination: P::Value,
    _property: PhantomData<fn() -> P>,
}

/// Waiter for `fade`, `fade_in` and `fade_out`
pub type FadeWaiter = Waiter<ColorProperty>;
/// Waiter for `set_position`
pub type PositionWaiter = Waiter<PositionProperty>;
/// Waiter for `set_scale`
pub type ScaleWaiter = Waiter<ScaleProperty>;
/// Waiter for `set_font_size`
pub type FontSizeWaiter = Waiter<FontSizeProperty>;

impl<P: AnimatedProperty> Waiter<P> {
    pub(crate) fn new(handle: SchedulerHandle, target: GraphicRef, destination: P::Value) -> Self {
        Self {
            handle,
            target,
            destination,
            _property: PhantomData,
        }
    }

    pub fn target(&self) -> &GraphicRef {
        &self.target
    }

    pub fn destination(&self) -> P::Value {
        self.destination
    }

    /// True until the destination is reached or the effect stops running
    pub fn is_waiting(&self) -> bool {
        let current = self.target.with(P::read);
        current != Some(self.destination) && self.handle.is_running(&self.target, P::CATEGORY)
    }
}

impl<P: AnimatedProperty> Clone for Waiter<P> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            target: self.target.clone(),
            destination: self.destination,
            _property: PhantomData,
        }
    }
}

impl<P: AnimatedProperty> fmt::Debug for Waiter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("target", &self.target.id())
            .field("category", &P::CATEGORY)
            .field("destination", &self.destination)
            .finish()
    }
}

impl<P: AnimatedProperty> Completion for Waiter<P> {
    fn is_complete(&self) -> bool {
        !self.is_waiting()
    }
}

impl<P: AnimatedProperty> Future for Waiter<P> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // Register before checking so a tick landing in between still wakes us
        self.handle.register_waker(cx.waker());
        if self.is_waiting() {
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}
