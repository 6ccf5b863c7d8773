//! Effect scheduler
//!
//! The tick pump that owns every running effect and timer. One call to
//! [`EffectScheduler::tick`] (or [`EffectScheduler::tick_with_delta`])
//! advances each driver and each timer exactly one step, then wakes any
//! futures waiting on them.
//!
//! The scheduler is an explicit context object: create one at host startup,
//! hand out [`SchedulerHandle`]s to components, drop it at shutdown. Handles
//! are weak and fail with [`EffectError::SchedulerDropped`] once it is gone.
//!
//! # Background Thread Mode
//!
//! Hosts without a frame loop of their own can run the pump on a background
//! thread via `start_background()`, pacing it at `background_fps`.
//!
//! ```ignore
//! let mut scheduler = EffectScheduler::new();
//! scheduler.set_wake_callback(move || proxy.wake());
//! scheduler.start_background();
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::Waker;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glint_core::GraphicRef;

use crate::config::EffectsConfig;
use crate::error::{EffectError, Result};
use crate::property::EffectCategory;
use crate::registry::{EffectKey, EffectRegistry};
use crate::timer::TimerTable;
use crate::waiter::Completion;

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Disables an element once something it waits on completes
struct Followup {
    completion: Box<dyn Completion>,
    target: GraphicRef,
}

/// Internal state of the effect scheduler
pub(crate) struct SchedulerInner {
    pub(crate) config: EffectsConfig,
    pub(crate) registry: EffectRegistry,
    pub(crate) timers: TimerTable,
    followups: Vec<Followup>,
    wakers: Vec<Waker>,
    /// Delta of the most recent tick; step sizes are sampled from it
    pub(crate) frame_delta: f32,
    last_frame: Instant,
    frame_count: u64,
}

impl SchedulerInner {
    fn new(config: EffectsConfig) -> Self {
        Self {
            registry: EffectRegistry::new(config.warn_on_missing_effect),
            timers: TimerTable::default(),
            followups: Vec::new(),
            wakers: Vec::new(),
            frame_delta: config.default_frame_delta(),
            last_frame: Instant::now(),
            frame_count: 0,
            config,
        }
    }

    fn has_active(&self) -> bool {
        !self.registry.is_empty() || !self.timers.is_empty() || !self.followups.is_empty()
    }

    /// Reset the wall clock when work arrives on an idle scheduler so the
    /// first measured delta doesn't include the idle time
    pub(crate) fn touch_if_idle(&mut self) {
        if !self.has_active() {
            self.last_frame = Instant::now();
        }
    }

    fn measure_delta(&mut self) -> f32 {
        let now = Instant::now();
        let mut dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        if let Some(max) = self.config.max_frame_delta {
            dt = dt.min(max);
        }
        dt
    }
}

/// Run one pump step against shared scheduler state
///
/// `dt` of `None` measures the wall clock since the previous tick.
fn tick_shared(inner: &Mutex<SchedulerInner>, dt: Option<f32>) -> bool {
    let (wakers, followups) = {
        let mut inner = lock(inner);
        let dt = match dt {
            Some(dt) => {
                inner.last_frame = Instant::now();
                dt
            }
            None => inner.measure_delta(),
        };
        if dt > 0.0 {
            inner.frame_delta = dt;
        }
        inner.frame_count += 1;

        inner.registry.step_all();
        inner.timers.advance(dt);

        (
            std::mem::take(&mut inner.wakers),
            std::mem::take(&mut inner.followups),
        )
    };

    // Completions consult the scheduler themselves, so they are checked
    // with the lock released
    let mut pending = Vec::with_capacity(followups.len());
    for followup in followups {
        if followup.completion.is_complete() {
            tracing::debug!(element = %followup.target.id(), "disabling element after completion");
            followup.target.set_enabled(false);
        } else {
            pending.push(followup);
        }
    }

    let has_active = {
        let mut inner = lock(inner);
        inner.followups.extend(pending);
        inner.has_active()
    };

    for waker in wakers {
        waker.wake();
    }

    has_active
}

/// Callback type for waking up the main thread from the background pump
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// The scheduler that ticks all running effects and timers
///
/// Hosts hold the scheduler and pass [`SchedulerHandle`]s to components.
pub struct EffectScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the background thread when effects changed something on screen
    needs_redraw: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::with_config(EffectsConfig::default())
    }

    pub fn with_config(config: EffectsConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner::new(config))),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a callback invoked from the background thread whenever effects
    /// are active and the host should redraw
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Run the pump on a background thread at `background_fps`
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();
        let fps = lock(&self.inner).config.background_fps.max(1);

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / fps as u64);
            static COUNTER: AtomicU64 = AtomicU64::new(0);

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                if tick_shared(&inner, None) {
                    needs_redraw.store(true, Ordering::Release);

                    if let Some(ref callback) = wake_callback {
                        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
                        if count % fps as u64 == 0 {
                            tracing::debug!("effect thread: waking event loop");
                        }
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the redraw flag set by the background thread
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance everything one step using the wall-clock delta since the
    /// previous tick
    ///
    /// Returns true if any effects, timers or follow-ups are still active.
    pub fn tick(&self) -> bool {
        tick_shared(&self.inner, None)
    }

    /// Advance everything one step with an explicit delta in seconds
    pub fn tick_with_delta(&self, dt: f32) -> bool {
        tick_shared(&self.inner, Some(dt))
    }

    pub fn has_active_effects(&self) -> bool {
        lock(&self.inner).has_active()
    }

    /// Number of registered effects
    pub fn effect_count(&self) -> usize {
        lock(&self.inner).registry.len()
    }

    /// Number of timers still counting
    pub fn timer_count(&self) -> usize {
        lock(&self.inner).timers.len()
    }

    /// Number of ticks run so far
    pub fn frame_count(&self) -> u64 {
        lock(&self.inner).frame_count
    }

    /// Frame delta new effects will size their steps from
    pub fn frame_delta(&self) -> f32 {
        lock(&self.inner).frame_delta
    }

    pub fn config(&self) -> EffectsConfig {
        lock(&self.inner).config.clone()
    }
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EffectScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the effect scheduler
///
/// All effect, query and timer operations live on the handle; see the
/// `effects` and `timer` modules.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Run `f` against the live scheduler state
    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Result<R> {
        let inner = self.inner.upgrade().ok_or(EffectError::SchedulerDropped)?;
        let mut guard = lock(&inner);
        Ok(f(&mut guard))
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Whether an effect of `category` is running on `target`
    pub fn is_running(&self, target: &GraphicRef, category: EffectCategory) -> bool {
        let key = EffectKey::new(target.id(), category);
        self.with_inner(|inner| inner.registry.is_running(key))
            .unwrap_or(false)
    }

    /// Stop the effect of `category` on `target`
    ///
    /// Returns false if none was running.
    pub fn stop(&self, target: &GraphicRef, category: EffectCategory) -> bool {
        let key = EffectKey::new(target.id(), category);
        self.with_inner(|inner| inner.registry.remove(key))
            .unwrap_or(false)
    }

    /// Stop every effect and the timer attached to `target`
    ///
    /// Call before the host destroys an element; running effects keep their
    /// element alive otherwise.
    pub fn stop_all(&self, target: &GraphicRef) -> usize {
        self.with_inner(|inner| {
            let stopped = inner.registry.remove_all(target.id());
            inner.timers.finish(target.id());
            stopped
        })
        .unwrap_or(0)
    }

    /// Disable `target` once `completion` reports complete
    pub fn disable_after<C>(&self, completion: C, target: &GraphicRef) -> Result<()>
    where
        C: Completion + 'static,
    {
        self.with_inner(|inner| {
            inner.touch_if_idle();
            inner.followups.push(Followup {
                completion: Box::new(completion),
                target: target.clone(),
            });
        })
    }

    /// Wake `waker` after the next tick
    pub(crate) fn register_waker(&self, waker: &Waker) {
        let _ = self.with_inner(|inner| {
            if !inner.wakers.iter().any(|w| w.will_wake(waker)) {
                inner.wakers.push(waker.clone());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Color, Element};

    #[test]
    fn test_idle_tick() {
        let scheduler = EffectScheduler::new();
        assert!(!scheduler.tick_with_delta(1.0 / 60.0));
        assert!(!scheduler.has_active_effects());
        assert_eq!(scheduler.frame_count(), 1);
    }

    #[test]
    fn test_frame_delta_follows_ticks() {
        let scheduler = EffectScheduler::new();
        assert!((scheduler.frame_delta() - 1.0 / 60.0).abs() < 1e-6);

        scheduler.tick_with_delta(0.05);
        assert_eq!(scheduler.frame_delta(), 0.05);

        // A zero delta keeps the last useful sample
        scheduler.tick_with_delta(0.0);
        assert_eq!(scheduler.frame_delta(), 0.05);
    }

    #[test]
    fn test_frame_delta_from_config() {
        let config = EffectsConfig {
            target_fps: 30,
            ..EffectsConfig::default()
        };
        let scheduler = EffectScheduler::with_config(config);
        assert!((scheduler.frame_delta() - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_handle_weak_reference() {
        let el = Element::new("box").into_ref();
        let handle = {
            let scheduler = EffectScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(!handle.is_running(&el, EffectCategory::Color));
        assert_eq!(
            handle.fade_out(&el, 1.0).unwrap_err(),
            EffectError::SchedulerDropped
        );
    }

    #[test]
    fn test_stop_all_clears_element() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        handle.fade_out(&el, 1.0).unwrap();
        handle.set_position(&el, glint_core::Vec2::new(5.0, 5.0), 1.0).unwrap();
        handle.create_timer(2.0, &el).unwrap();
        assert_eq!(scheduler.effect_count(), 2);
        assert_eq!(scheduler.timer_count(), 1);

        assert_eq!(handle.stop_all(&el), 2);
        assert_eq!(scheduler.effect_count(), 0);
        assert_eq!(scheduler.timer_count(), 0);
        assert!(!scheduler.has_active_effects());
    }

    #[test]
    fn test_missing_effect_warning_follows_config() {
        let el = Element::new("box").into_ref();

        let logs = crate::test_util::capture_logs(|| {
            let scheduler = EffectScheduler::new();
            assert!(!scheduler.handle().stop(&el, EffectCategory::Position));
        });
        assert_eq!(crate::test_util::warnings(&logs).len(), 1, "{logs}");

        let quiet = EffectsConfig {
            warn_on_missing_effect: false,
            ..EffectsConfig::default()
        };
        let logs = crate::test_util::capture_logs(|| {
            let scheduler = EffectScheduler::with_config(quiet);
            assert!(!scheduler.handle().stop(&el, EffectCategory::Position));
        });
        assert!(crate::test_util::warnings(&logs).is_empty(), "{logs}");
    }

    #[test]
    fn test_explicit_stop() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        let waiter = handle.fade(&el, 1.0, Color::RED).unwrap();
        scheduler.tick_with_delta(1.0 / 60.0);
        assert!(waiter.is_waiting());

        assert!(handle.stop(&el, EffectCategory::Color));
        assert!(!waiter.is_waiting());
        assert!(!handle.stop(&el, EffectCategory::Color));

        // Stopped mid-way: color is left where the effect was
        let frozen = el.color();
        scheduler.tick_with_delta(1.0 / 60.0);
        assert_eq!(el.color(), frozen);
        assert_ne!(frozen, Color::RED);
    }

    #[test]
    fn test_disable_after_fade() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("toast").into_ref();

        let waiter = handle.fade_out(&el, 0.1).unwrap();
        handle.disable_after(waiter, &el).unwrap();

        let mut ticks = 0;
        while el.is_active_and_enabled() {
            scheduler.tick_with_delta(0.05);
            ticks += 1;
            assert!(ticks < 10);
        }
        assert_eq!(el.color().a, 0.0);
        assert!(!scheduler.has_active_effects());
    }

    #[test]
    fn test_background_pump_resolves_waiter() {
        let mut scheduler = EffectScheduler::new();
        let woke = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&woke);
        scheduler.set_wake_callback(move || flag.store(true, Ordering::Relaxed));

        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();
        let waiter = handle.fade_out(&el, 0.05).unwrap();

        scheduler.start_background();
        assert!(scheduler.is_background_running());
        pollster::block_on(waiter);
        scheduler.stop_background();

        assert!(!scheduler.is_background_running());
        assert_eq!(el.color().a, 0.0);
        assert!(woke.load(Ordering::Relaxed));
        assert!(scheduler.take_needs_redraw());
        assert!(!scheduler.take_needs_redraw());
    }
}
