//! Paint model shared between apps and the renderer.
//!
//! Colors are linear, premultiplied RGBA. Texture pixels uploaded through
//! `render::TextureImage` follow the same convention, so vertex color and
//! texel multiply straight through in the shader.

pub mod color;

pub use color::Color;
