//! Position and scale tweens

use glint_core::{GraphicRef, Vec2, Vec3};

use crate::error::Result;
use crate::property::{PositionProperty, ScaleProperty};
use crate::scheduler::SchedulerHandle;
use crate::waiter::{PositionWaiter, ScaleWaiter};

impl SchedulerHandle {
    /// Move `target` to `position` over `duration` seconds
    pub fn set_position(
        &self,
        target: &GraphicRef,
        position: Vec2,
        duration: f32,
    ) -> Result<PositionWaiter> {
        self.start_tween::<PositionProperty>("set_position", target, position, duration)
    }

    /// Scale `target` to `scale` over `duration` seconds
    pub fn set_scale(&self, target: &GraphicRef, scale: Vec3, duration: f32) -> Result<ScaleWaiter> {
        self.start_tween::<ScaleProperty>("set_scale", target, scale, duration)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EffectError;
    use crate::property::EffectCategory;
    use crate::scheduler::EffectScheduler;
    use glint_core::{Color, Element, Vec2, Vec3};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_set_position() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        let waiter = handle.set_position(&el, Vec2::new(300.0, 400.0), 0.5).unwrap();
        assert_eq!(waiter.destination(), Vec2::new(300.0, 400.0));

        let mut ticks = 0;
        while waiter.is_waiting() {
            scheduler.tick_with_delta(DT);
            ticks += 1;
            assert!(ticks <= 60);
        }
        assert!((29..=31).contains(&ticks), "took {ticks} ticks");
        assert_eq!(el.position(), Vec2::new(300.0, 400.0));
        assert!(!handle.is_running(&el, EffectCategory::Position));
    }

    #[test]
    fn test_set_position_moves_in_a_straight_line() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        handle.set_position(&el, Vec2::new(60.0, 30.0), 1.0).unwrap();
        for _ in 0..20 {
            scheduler.tick_with_delta(DT);
        }
        let p = el.position();
        assert!((p.x - 2.0 * p.y).abs() < 1e-3, "{p:?} left the line");
        assert!(p.x > 0.0 && p.x < 60.0);
    }

    #[test]
    fn test_set_position_zero_duration_snaps() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        let waiter = handle.set_position(&el, Vec2::new(5.0, 5.0), 0.0).unwrap();
        scheduler.tick_with_delta(DT);
        assert!(!waiter.is_waiting());
        assert_eq!(el.position(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_set_position_superseded() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        handle.set_position(&el, Vec2::new(100.0, 0.0), 1.0).unwrap();
        for _ in 0..10 {
            scheduler.tick_with_delta(DT);
        }
        let waiter = handle.set_position(&el, Vec2::new(0.0, 100.0), 1.0).unwrap();
        assert_eq!(scheduler.effect_count(), 1);

        while waiter.is_waiting() {
            scheduler.tick_with_delta(DT);
        }
        assert_eq!(el.position(), Vec2::new(0.0, 100.0));
    }

    #[test]
    fn test_set_scale() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        let waiter = handle.set_scale(&el, Vec3::splat(2.0), 0.25).unwrap();
        let mut ticks = 0;
        while waiter.is_waiting() {
            scheduler.tick_with_delta(DT);
            ticks += 1;
            assert!(ticks <= 30);
        }
        assert_eq!(el.scale(), Vec3::splat(2.0));
    }

    #[test]
    fn test_set_scale_inactive_rejected() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").inactive().into_ref();

        assert!(matches!(
            handle.set_scale(&el, Vec3::splat(2.0), 1.0),
            Err(EffectError::Inactive { operation: "set_scale", .. })
        ));
        assert_eq!(el.scale(), Vec3::ONE);
    }

    #[test]
    fn test_categories_run_side_by_side() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").with_color(Color::WHITE).into_ref();

        let fade = handle.fade_out(&el, 0.5).unwrap();
        let moved = handle.set_position(&el, Vec2::new(10.0, 0.0), 0.5).unwrap();
        let scaled = handle.set_scale(&el, Vec3::splat(0.5), 0.5).unwrap();
        assert_eq!(scheduler.effect_count(), 3);

        while fade.is_waiting() || moved.is_waiting() || scaled.is_waiting() {
            scheduler.tick_with_delta(DT);
        }
        assert_eq!(el.color().a, 0.0);
        assert_eq!(el.position(), Vec2::new(10.0, 0.0));
        assert_eq!(el.scale(), Vec3::splat(0.5));
        assert_eq!(scheduler.effect_count(), 0);
    }

    #[test]
    fn test_deactivation_stops_transform() {
        let scheduler = EffectScheduler::new();
        let handle = scheduler.handle();
        let el = Element::new("box").into_ref();

        let waiter = handle.set_position(&el, Vec2::new(100.0, 0.0), 1.0).unwrap();
        scheduler.tick_with_delta(DT);
        el.set_enabled(false);
        scheduler.tick_with_delta(DT);

        assert!(!handle.is_running(&el, EffectCategory::Position));
        assert!(!waiter.is_waiting());
        assert!(el.position().x < 100.0);
    }
}
