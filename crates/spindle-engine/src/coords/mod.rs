//! Logical-pixel geometry: origin top-left, +Y down.

mod edges;
mod rect;
mod vec2;

pub use edges::Edges;
pub use rect::Rect;
pub use vec2::Vec2;
