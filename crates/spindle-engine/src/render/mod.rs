//! GPU rendering subsystem.
//!
//! Apps describe a frame through [`Immediate`], an immediate-mode recorder
//! with fixed-function style state (projection/model-view matrices, bound
//! texture, current color). [`ImmediateRenderer`] replays the recording with
//! wgpu inside the bounds the app was given.
//!
//! Convention:
//! - Bounds are logical pixels (top-left origin, +Y down).
//! - Geometry passed to `Immediate::quad` is in model space; it is transformed
//!   to clip space on the CPU when recorded.

mod context;
mod ctx;
mod image;
mod immediate;
mod plan;
mod renderable;
mod renderer;
mod state;

pub use context::{ContextCtx, TextureId, TextureUpload};
pub use ctx::{RenderCtx, RenderTarget};
pub use image::TextureImage;
pub use immediate::{Immediate, ImmediateCmd, QuadVertex};
pub use renderable::Renderable;
pub use renderer::ImmediateRenderer;
pub use state::{RenderState, TextureFilter};
