//! Effect categories and the element properties they own

use std::fmt;

use glint_core::{Color, Graphic, Vec2, Vec3};

use crate::values::MoveTowards;

/// Which mutable property of an element an effect controls
///
/// An element runs at most one effect per category; different categories
/// run side by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    Color,
    Position,
    Scale,
    FontSize,
}

impl EffectCategory {
    pub const ALL: [EffectCategory; 4] = [
        EffectCategory::Color,
        EffectCategory::Position,
        EffectCategory::Scale,
        EffectCategory::FontSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectCategory::Color => "color",
            EffectCategory::Position => "position",
            EffectCategory::Scale => "scale",
            EffectCategory::FontSize => "font-size",
        }
    }
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed access to the element property behind a category
pub trait AnimatedProperty: Send + 'static {
    type Value: MoveTowards + fmt::Debug + Send + 'static;

    const CATEGORY: EffectCategory;

    /// Current value, `None` if the element doesn't carry this property
    fn read(graphic: &dyn Graphic) -> Option<Self::Value>;

    fn write(graphic: &mut dyn Graphic, value: Self::Value);
}

/// Element color, including alpha
pub struct ColorProperty;

impl AnimatedProperty for ColorProperty {
    type Value = Color;
    const CATEGORY: EffectCategory = EffectCategory::Color;

    fn read(graphic: &dyn Graphic) -> Option<Color> {
        Some(graphic.color())
    }

    fn write(graphic: &mut dyn Graphic, value: Color) {
        graphic.set_color(value);
    }
}

/// Anchored 2D position
pub struct PositionProperty;

impl AnimatedProperty for PositionProperty {
    type Value = Vec2;
    const CATEGORY: EffectCategory = EffectCategory::Position;

    fn read(graphic: &dyn Graphic) -> Option<Vec2> {
        Some(graphic.position())
    }

    fn write(graphic: &mut dyn Graphic, value: Vec2) {
        graphic.set_position(value);
    }
}

/// Local scale
pub struct ScaleProperty;

impl AnimatedProperty for ScaleProperty {
    type Value = Vec3;
    const CATEGORY: EffectCategory = EffectCategory::Scale;

    fn read(graphic: &dyn Graphic) -> Option<Vec3> {
        Some(graphic.scale())
    }

    fn write(graphic: &mut dyn Graphic, value: Vec3) {
        graphic.set_scale(value);
    }
}

/// Integer font size of text elements
pub struct FontSizeProperty;

impl AnimatedProperty for FontSizeProperty {
    type Value = u32;
    const CATEGORY: EffectCategory = EffectCategory::FontSize;

    fn read(graphic: &dyn Graphic) -> Option<u32> {
        graphic.font_size()
    }

    fn write(graphic: &mut dyn Graphic, value: u32) {
        graphic.set_font_size(value);
    }
}
