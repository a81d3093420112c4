use winit::dpi::PhysicalSize;

/// GPU handles and surface facts a renderer needs for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Physical size of the surface texture being drawn into.
    pub surface_size: PhysicalSize<u32>,
    /// Logical to physical pixels.
    pub scale_factor: f32,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        surface_size: PhysicalSize<u32>,
        scale_factor: f32,
    ) -> Self {
        Self { device, queue, surface_format, surface_size, scale_factor }
    }
}

/// Attachments for the frame: the encoder records into `color_view` and
/// tests against `depth_view`.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: &'a wgpu::TextureView,
    ) -> Self {
        Self { encoder, color_view, depth_view }
    }
}
