//! Font size tweens

use glint_core::GraphicRef;

use crate::error::Result;
use crate::property::FontSizeProperty;
use crate::scheduler::SchedulerHandle;
use crate::waiter::FontSizeWaiter;

impl SchedulerHandle {
    /// Animate a text element's font size to `size` over `duration` seconds
    ///
    /// Fails with [`EffectError::MissingProperty`] if `target` has no font
    /// size.
    ///
    /// [`EffectError::MissingProperty`]: crate::EffectError::MissingProperty
    pub fn set_font_size(
        &self,
        target: &GraphicRef,
        size: u32,
        duration: f32,
    ) -> Result<FontSizeWaiter> {
        self.start_tween::<FontSizeProperty>("set_font_size", target, size, duration)
    }
}
