//! Coordinate and geometry types shared between the renderer and the game.
//!
//! Two CPU spaces exist, both in drawable pixels:
//! - World: origin at the center of the drawable, +X right, +Y up.
//! - UI: origin top-left, +X right, +Y down.
//!
//! The renderer transforms world/UI coordinates to clip space on the CPU;
//! shaders receive finished clip-space positions.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
