use anyhow::Result;

use super::context::ContextCtx;
use super::immediate::Immediate;

/// A visual that draws itself through the immediate-mode API.
///
/// `context_created` runs every time a rendering context is (re)created and
/// must rebuild everything context-bound from scratch. `render` runs on every
/// repaint with a fresh recorder sized to the visual's bounds.
pub trait Renderable {
    fn context_created(&mut self, ctx: &mut ContextCtx) -> Result<()>;

    fn render(&mut self, gl: &mut Immediate);
}
