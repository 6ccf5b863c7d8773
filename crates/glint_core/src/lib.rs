//! Glint Core
//!
//! Foundational types shared by the Glint effect layer:
//!
//! - **Color**: RGBA color with alpha helpers
//! - **Geometry**: `Vec2` positions and `Vec3` scales
//! - **Elements**: the [`Graphic`] trait hosts implement, and [`GraphicRef`],
//!   a shared handle carrying a stable identity
//!
//! # Example
//!
//! ```rust
//! use glint_core::{Color, Element};
//!
//! let label = Element::text("score", 14).with_color(Color::WHITE).into_ref();
//! label.set_color(Color::RED);
//! assert_eq!(label.color(), Color::RED);
//! ```

pub mod color;
pub mod element;
pub mod geometry;

pub use color::Color;
pub use element::{Element, ElementId, Graphic, GraphicRef};
pub use geometry::{Vec2, Vec3};
