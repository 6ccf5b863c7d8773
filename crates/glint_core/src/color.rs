//! RGBA color

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Same RGB channels with a replaced alpha
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Euclidean distance between two colors treated as 4D vectors
    pub fn distance(&self, other: &Color) -> f32 {
        let dr = other.r - self.r;
        let dg = other.g - self.g;
        let db = other.b - self.b;
        let da = other.a - self.a;
        (dr * dr + dg * dg + db * db + da * da).sqrt()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_keeps_rgb() {
        let c = Color::rgb(0.2, 0.4, 0.6).with_alpha(0.0);
        assert_eq!(c, Color::rgba(0.2, 0.4, 0.6, 0.0));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex(0xFF0000), Color::RED);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Color::WHITE.distance(&Color::WHITE.with_alpha(0.0)), 1.0);
        assert!((Color::WHITE.distance(&Color::RED) - 2f32.sqrt()).abs() < 1e-6);
    }
}
