/// Knobs for creating a rendering context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format if the adapter offers one.
    pub prefer_srgb: bool,

    /// Falls back to FIFO when unsupported.
    pub present_mode: wgpu::PresentMode,

    /// `None` takes the first mode the surface reports.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    /// Downlevel limits would cap textures at 2048 texels.
    pub required_limits: wgpu::Limits,

    /// Frames the surface may queue ahead (a hint).
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_limits: wgpu::Limits::default(),
            frame_latency: 2,
        }
    }
}
