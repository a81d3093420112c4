use crate::device::SurfaceConfigInfo;

use super::image::TextureImage;
use super::state::RenderState;

/// Handle to a texture uploaded into a rendering context.
///
/// Only valid for the context that issued it; a recreated context starts
/// numbering again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// Built-in 1x1 white texture present in every context.
    pub const WHITE: TextureId = TextureId(0);

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A texture queued for upload when the context's renderer is built.
#[derive(Debug, Clone)]
pub struct TextureUpload {
    pub id: TextureId,
    pub image: TextureImage,
}

/// Context-creation callback argument.
///
/// Collects the textures and fixed-function state a `Renderable` wants in a
/// freshly created context. The runtime hands the result to the context's
/// `ImmediateRenderer`.
#[derive(Debug)]
pub struct ContextCtx {
    surface_info: SurfaceConfigInfo,
    state: RenderState,
    uploads: Vec<TextureUpload>,
    next_id: u32,
    generation: u64,
}

impl ContextCtx {
    /// `generation` counts context creations, starting at 1.
    pub fn new(surface_info: SurfaceConfigInfo, generation: u64) -> Self {
        Self {
            surface_info,
            state: RenderState::default(),
            uploads: Vec::new(),
            next_id: 1,
            generation,
        }
    }

    /// Surface configurations offered for this context (diagnostic).
    pub fn surface_info(&self) -> &SurfaceConfigInfo {
        &self.surface_info
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn render_state(&self) -> RenderState {
        self.state
    }

    pub fn set_render_state(&mut self, state: RenderState) {
        self.state = state;
    }

    /// Queues `image` for upload and returns its handle.
    pub fn upload_texture(&mut self, image: &TextureImage) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.uploads.push(TextureUpload { id, image: image.clone() });
        id
    }

    pub fn uploads(&self) -> &[TextureUpload] {
        &self.uploads
    }

    pub(crate) fn into_parts(self) -> (RenderState, Vec<TextureUpload>) {
        (self.state, self.uploads)
    }
}
