/// Texture sampling filter.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TextureFilter {
    #[default]
    Nearest,
    Linear,
}

/// Fixed-function toggles for one rendering context.
///
/// Chosen when the context is created and baked into the pipelines built for
/// it. The default mirrors a fresh fixed-function context: no depth test, no
/// blending, nearest sampling. Colors always interpolate smoothly.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct RenderState {
    pub depth_test: bool,
    pub blend: bool,
    pub texture_filter: TextureFilter,
}

impl RenderState {
    pub(crate) fn depth_stencil(self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = if self.depth_test {
            (true, wgpu::CompareFunction::Less)
        } else {
            (false, wgpu::CompareFunction::Always)
        };

        wgpu::DepthStencilState {
            format,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Premultiplied-alpha "over" blending when enabled.
    pub(crate) fn blend_state(self) -> Option<wgpu::BlendState> {
        self.blend.then_some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING)
    }

    pub(crate) fn filter_mode(self) -> wgpu::FilterMode {
        match self.texture_filter {
            TextureFilter::Nearest => wgpu::FilterMode::Nearest,
            TextureFilter::Linear => wgpu::FilterMode::Linear,
        }
    }

    /// Blending for clears. The canvas is a layer over the window, so a
    /// translucent clear lets the window show through and an opaque one
    /// replaces it.
    pub(crate) fn clear_blend() -> wgpu::BlendState {
        wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_fresh_context() {
        let s = RenderState::default();
        assert!(!s.depth_test);
        assert!(s.blend_state().is_none());
        assert_eq!(s.filter_mode(), wgpu::FilterMode::Nearest);
    }

    #[test]
    fn depth_test_uses_less_and_writes() {
        let s = RenderState { depth_test: true, ..RenderState::default() };
        let ds = s.depth_stencil(wgpu::TextureFormat::Depth32Float);
        assert!(ds.depth_write_enabled);
        assert_eq!(ds.depth_compare, wgpu::CompareFunction::Less);
    }

    #[test]
    fn transparent_clear_keeps_what_is_underneath() {
        let blend = RenderState::clear_blend();
        // Premultiplied transparent source: src * 1 + dst * (1 - 0) == dst.
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(blend.alpha.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }
}
