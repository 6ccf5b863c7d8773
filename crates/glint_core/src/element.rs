//! Graphic elements
//!
//! The host scene graph owns its elements; this module defines the narrow
//! surface the animation layer needs from them:
//!
//! - [`Graphic`]: mutable color, position, scale and (for text) font size
//! - [`GraphicRef`]: a cloneable handle pairing a graphic with a stable [`ElementId`]
//! - [`Element`]: a plain in-memory graphic for hosts without their own node type
//!
//! Identity always comes from the [`ElementId`] assigned when the handle is
//! created, never from property values, so two elements with identical
//! colors and positions are still distinct keys.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::color::Color;
use crate::geometry::{Vec2, Vec3};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a graphic element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A renderable element whose visual properties can be animated
pub trait Graphic: Send {
    /// Human readable name used in diagnostics
    fn name(&self) -> &str;

    /// Whether the element is both active in the scene and enabled
    fn is_active_and_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);

    /// Anchored position in parent space
    fn position(&self) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    /// Local scale
    fn scale(&self) -> Vec3;

    fn set_scale(&mut self, scale: Vec3);

    /// Font size for text-like elements, `None` otherwise
    fn font_size(&self) -> Option<u32> {
        None
    }

    /// Ignored by elements without a font size
    fn set_font_size(&mut self, _size: u32) {}
}

/// Shared handle to a graphic element
///
/// Cloning the handle shares both the element and its identity.
#[derive(Clone)]
pub struct GraphicRef {
    id: ElementId,
    inner: Arc<Mutex<dyn Graphic>>,
}

impl GraphicRef {
    pub fn new<G: Graphic + 'static>(graphic: G) -> Self {
        Self {
            id: ElementId::next(),
            inner: Arc::new(Mutex::new(graphic)),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, dyn Graphic + 'static> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!(element = %self.id, "graphic lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Read from the graphic
    pub fn with<R>(&self, f: impl FnOnce(&dyn Graphic) -> R) -> R {
        let guard = self.lock();
        f(&*guard)
    }

    /// Mutate the graphic
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn Graphic) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    pub fn name(&self) -> String {
        self.with(|g| g.name().to_string())
    }

    pub fn is_active_and_enabled(&self) -> bool {
        self.with(|g| g.is_active_and_enabled())
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.with_mut(|g| g.set_enabled(enabled));
    }

    pub fn color(&self) -> Color {
        self.with(|g| g.color())
    }

    pub fn set_color(&self, color: Color) {
        self.with_mut(|g| g.set_color(color));
    }

    pub fn position(&self) -> Vec2 {
        self.with(|g| g.position())
    }

    pub fn set_position(&self, position: Vec2) {
        self.with_mut(|g| g.set_position(position));
    }

    pub fn scale(&self) -> Vec3 {
        self.with(|g| g.scale())
    }

    pub fn set_scale(&self, scale: Vec3) {
        self.with_mut(|g| g.set_scale(scale));
    }

    pub fn font_size(&self) -> Option<u32> {
        self.with(|g| g.font_size())
    }

    pub fn set_font_size(&self, size: u32) {
        self.with_mut(|g| g.set_font_size(size));
    }

    /// Whether both handles point at the same element
    pub fn same_element(&self, other: &GraphicRef) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for GraphicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicRef").field("id", &self.id).finish()
    }
}

/// A plain retained element
#[derive(Clone, Debug)]
pub struct Element {
    name: String,
    active: bool,
    enabled: bool,
    color: Color,
    position: Vec2,
    scale: Vec3,
    font_size: Option<u32>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            enabled: true,
            color: Color::WHITE,
            position: Vec2::ZERO,
            scale: Vec3::ONE,
            font_size: None,
        }
    }

    /// A text element with the given font size
    pub fn text(name: impl Into<String>, font_size: u32) -> Self {
        Self::new(name).with_font_size(font_size)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Mark the element as inactive in the scene (distinct from disabled)
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Wrap into a shared handle
    pub fn into_ref(self) -> GraphicRef {
        GraphicRef::new(self)
    }
}

impl Graphic for Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active_and_enabled(&self) -> bool {
        self.active && self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    fn font_size(&self) -> Option<u32> {
        self.font_size
    }

    fn set_font_size(&mut self, size: u32) {
        if self.font_size.is_some() {
            self.font_size = Some(size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Element::new("a").into_ref();
        let b = Element::new("a").into_ref();
        assert_ne!(a.id(), b.id());
        assert!(!a.same_element(&b));
    }

    #[test]
    fn test_clone_shares_identity_and_state() {
        let a = Element::new("a").into_ref();
        let b = a.clone();
        assert!(a.same_element(&b));

        b.set_color(Color::RED);
        assert_eq!(a.color(), Color::RED);
    }

    #[test]
    fn test_active_and_enabled() {
        let el = Element::new("a").into_ref();
        assert!(el.is_active_and_enabled());
        el.set_enabled(false);
        assert!(!el.is_active_and_enabled());

        let inactive = Element::new("b").inactive().into_ref();
        assert!(!inactive.is_active_and_enabled());
        inactive.set_enabled(true);
        assert!(!inactive.is_active_and_enabled());
    }

    #[test]
    fn test_font_size_only_on_text() {
        let plain = Element::new("plain").into_ref();
        plain.set_font_size(20);
        assert_eq!(plain.font_size(), None);

        let text = Element::text("label", 12).into_ref();
        text.set_font_size(20);
        assert_eq!(text.font_size(), Some(20));
    }
}
