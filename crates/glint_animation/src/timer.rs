//! Element timers
//!
//! A timer is an elapsed-time countdown bound to one element. Asking for a
//! timer on an element that already has one hands back the same timer,
//! re-armed with the new duration, so a repeating trigger can keep pushing
//! the deadline out while any number of waiters share it.
//!
//! ```ignore
//! let timer = handle.create_timer(3.0, &tooltip)?;
//! // ... every hover event:
//! handle.create_timer(3.0, &tooltip)?;
//! timer.await; // resolves 3s after the last hover
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use glint_core::{ElementId, GraphicRef};

use crate::effects::ensure_active;
use crate::error::{check_duration, reject, EffectError, Result};
use crate::scheduler::{lock, SchedulerHandle};
use crate::waiter::Completion;

#[derive(Debug)]
pub(crate) struct TimerState {
    duration: f32,
    elapsed: f32,
    /// Set once the timer leaves the table, by completing or being stopped
    finished: bool,
    name: String,
}

impl TimerState {
    fn is_waiting(&self) -> bool {
        !self.finished && self.elapsed < self.duration
    }
}

type SharedTimerState = Arc<Mutex<TimerState>>;

/// Timers still counting, at most one per element
#[derive(Default)]
pub(crate) struct TimerTable {
    timers: FxHashMap<ElementId, SharedTimerState>,
}

impl TimerTable {
    /// Re-arm the element's timer, or register a new one
    ///
    /// A timer that finished but has not left the table yet (a `stop` in
    /// flight) is replaced rather than re-armed.
    fn get_or_create(&mut self, element: ElementId, name: String, duration: f32) -> SharedTimerState {
        if let Some(existing) = self.timers.get(&element) {
            let mut state = lock(existing);
            if !state.finished {
                tracing::trace!(element = %state.name, duration, "re-arming existing timer");
                state.duration = duration;
                state.elapsed = 0.0;
                return Arc::clone(existing);
            }
        }

        tracing::trace!(element = %name, duration, "creating timer");
        let state = Arc::new(Mutex::new(TimerState {
            duration,
            elapsed: 0.0,
            finished: false,
            name,
        }));
        self.timers.insert(element, Arc::clone(&state));
        state
    }

    /// Accumulate `dt` into every waiting timer and retire the ones that
    /// reached their duration
    pub(crate) fn advance(&mut self, dt: f32) -> usize {
        let mut done: SmallVec<[ElementId; 4]> = SmallVec::new();

        for (element, shared) in &self.timers {
            let mut state = lock(shared);
            if state.elapsed < state.duration {
                state.elapsed += dt;
            }
            if state.elapsed >= state.duration {
                state.finished = true;
                done.push(*element);
            }
        }

        for element in &done {
            self.timers.remove(element);
        }
        done.len()
    }

    /// Remove `state` from the table, but only if it is still the element's
    /// current timer
    fn remove_if_current(&mut self, element: ElementId, state: &SharedTimerState) -> bool {
        match self.timers.get(&element) {
            Some(current) if Arc::ptr_eq(current, state) => {
                self.timers.remove(&element);
                true
            }
            _ => false,
        }
    }

    /// Force the element's timer to completion
    pub(crate) fn finish(&mut self, element: ElementId) -> bool {
        match self.timers.remove(&element) {
            Some(shared) => {
                let mut state = lock(&shared);
                state.elapsed = state.duration;
                state.finished = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Handle to an element's timer
///
/// Clones share the same countdown. The handle stays readable after the
/// timer finishes and leaves the scheduler.
#[derive(Clone)]
pub struct EffectTimer {
    element: ElementId,
    state: SharedTimerState,
    handle: SchedulerHandle,
}

impl EffectTimer {
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Seconds the timer waits for
    pub fn duration(&self) -> f32 {
        lock(&self.state).duration
    }

    /// Seconds counted so far
    pub fn elapsed(&self) -> f32 {
        lock(&self.state).elapsed
    }

    /// Whether waiters on this timer should keep waiting
    pub fn is_waiting(&self) -> bool {
        lock(&self.state).is_waiting()
    }

    /// Restart the countdown without changing the duration
    pub fn extend(&self) -> Result<()> {
        self.adjust("extend", |state| state.elapsed = 0.0)
    }

    /// Push the deadline out by `seconds` (a negative value pulls it in)
    pub fn extend_by(&self, seconds: f32) -> Result<()> {
        self.adjust("extend_by", |state| state.elapsed -= seconds)
    }

    fn adjust(&self, operation: &'static str, f: impl FnOnce(&mut TimerState)) -> Result<()> {
        let mut state = lock(&self.state);
        if state.finished {
            let element = state.name.clone();
            drop(state);
            tracing::debug!(operation, "timer adjustment after completion");
            return reject(EffectError::TimerFinished { element });
        }
        f(&mut *state);
        Ok(())
    }

    /// Complete the timer now and release it from the scheduler
    ///
    /// Anything waiting on it resumes on its next poll. Stopping a timer
    /// that already finished is a no-op; a newer timer created for the same
    /// element is never affected.
    pub fn stop(&self) {
        {
            let mut state = lock(&self.state);
            if state.finished {
                return;
            }
            state.elapsed = state.duration;
            state.finished = true;
        }
        let _ = self
            .handle
            .with_inner(|inner| inner.timers.remove_if_current(self.element, &self.state));
    }
}

impl std::fmt::Debug for EffectTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("EffectTimer")
            .field("element", &self.element)
            .field("duration", &state.duration)
            .field("elapsed", &state.elapsed)
            .field("finished", &state.finished)
            .finish()
    }
}

impl Completion for EffectTimer {
    fn is_complete(&self) -> bool {
        !self.is_waiting()
    }
}

impl Future for EffectTimer {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.handle.register_waker(cx.waker());
        if self.is_waiting() && self.handle.is_alive() {
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

impl SchedulerHandle {
    /// Get the timer for `target`, creating it or re-arming the existing one
    /// with `duration` seconds
    pub fn create_timer(&self, duration: f32, target: &GraphicRef) -> Result<EffectTimer> {
        check_duration("create_timer", duration)?;
        ensure_active("create_timer", target)?;

        let element = target.id();
        let name = target.name();
        let state = self.with_inner(|inner| {
            inner.touch_if_idle();
            inner.timers.get_or_create(element, name, duration)
        })?;

        Ok(EffectTimer {
            element,
            state,
            handle: self.clone(),
        })
    }
}
