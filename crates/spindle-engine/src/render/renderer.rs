use std::collections::HashMap;

use winit::dpi::PhysicalSize;

use crate::coords::Rect;
use crate::device::DEPTH_FORMAT;

use super::context::{ContextCtx, TextureId, TextureUpload};
use super::ctx::{RenderCtx, RenderTarget};
use super::image::TextureImage;
use super::immediate::Immediate;
use super::plan::{plan_frame, DrawKind, GpuVertex};
use super::state::RenderState;

/// Texel format for uploaded images. Their bytes are sRGB-encoded, so sampling
/// decodes to linear before the surface encodes again.
pub(crate) const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Replays [`Immediate`] recordings with wgpu.
///
/// One renderer belongs to one rendering context: it owns the context's
/// textures and the pipelines built for its [`RenderState`]. When the context
/// is recreated the renderer is dropped and a new one is built from the new
/// [`ContextCtx`].
pub struct ImmediateRenderer {
    state: RenderState,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    clear_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureId, GpuTexture>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,

    warned_missing_texture: bool,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl ImmediateRenderer {
    /// Builds the renderer for a freshly created context and uploads the
    /// textures queued in `ctx`.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, ctx: ContextCtx) -> Self {
        let (state, uploads) = ctx.into_parts();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("spindle immediate bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("spindle immediate sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: state.filter_mode(),
            min_filter: state.filter_mode(),
            ..Default::default()
        });

        let mut renderer = Self {
            state,
            pipeline_format: None,
            pipeline: None,
            clear_pipeline: None,
            bind_group_layout,
            sampler,
            textures: HashMap::new(),
            vbo: None,
            vbo_capacity: 0,
            warned_missing_texture: false,
        };

        renderer.upload(device, queue, TextureId::WHITE, &TextureImage::white());
        for TextureUpload { id, image } in &uploads {
            renderer.upload(device, queue, *id, image);
        }
        log::debug!(
            "immediate renderer ready: {} texture(s), {:?}",
            renderer.textures.len(),
            renderer.state
        );

        renderer
    }

    /// Draws `gl` into `target`, clipped to `gl.bounds()`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, gl: &Immediate) {
        let Some((vx, vy, vw, vh)) = physical_bounds(gl.bounds(), ctx.surface_size, ctx.scale_factor)
        else {
            return;
        };

        let plan = plan_frame(gl.commands());
        if plan.vertices.is_empty() {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_vbo_capacity(ctx, plan.vertices.len());

        let Some(vbo) = self.vbo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&plan.vertices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(clear_pipeline) = self.clear_pipeline.as_ref() else { return };

        for pass in plan.drawing_passes() {
            let depth_load = if pass.clear_depth {
                wgpu::LoadOp::Clear(1.0)
            } else {
                wgpu::LoadOp::Load
            };

            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spindle immediate pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_viewport(vx as f32, vy as f32, vw as f32, vh as f32, 0.0, 1.0);
            rpass.set_scissor_rect(vx, vy, vw, vh);
            rpass.set_vertex_buffer(0, vbo.slice(..));

            for batch in &pass.batches {
                let texture = match self.textures.get(&batch.texture) {
                    Some(t) => t,
                    None => {
                        if !self.warned_missing_texture {
                            log::warn!("texture {:?} not in this context; using white", batch.texture);
                            self.warned_missing_texture = true;
                        }
                        let Some(white) = self.textures.get(&TextureId::WHITE) else { continue };
                        white
                    }
                };

                match batch.kind {
                    DrawKind::Clear => rpass.set_pipeline(clear_pipeline),
                    DrawKind::Geometry => rpass.set_pipeline(pipeline),
                }
                rpass.set_bind_group(0, &texture.bind_group, &[]);
                rpass.draw(batch.vertices.clone(), 0..1);
            }
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, id: TextureId, image: &TextureImage) {
        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("spindle immediate texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width()),
                rows_per_image: Some(image.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spindle immediate texture bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.textures.insert(id, GpuTexture { _texture: texture, bind_group });
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format)
            && self.pipeline.is_some()
            && self.clear_pipeline.is_some()
        {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spindle immediate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("spindle immediate pipeline layout"),
            bind_group_layouts: &[&self.bind_group_layout],
            immediate_size: 0,
        });

        let geometry = PipelineDesc {
            label: "spindle immediate pipeline",
            blend: self.state.blend_state(),
            depth_stencil: self.state.depth_stencil(DEPTH_FORMAT),
        };

        // Clears ignore the context's depth and blend toggles.
        let clear = PipelineDesc {
            label: "spindle immediate clear pipeline",
            blend: Some(RenderState::clear_blend()),
            depth_stencil: RenderState::default().depth_stencil(DEPTH_FORMAT),
        };

        self.pipeline = Some(build_pipeline(ctx, &shader, &layout, geometry));
        self.clear_pipeline = Some(build_pipeline(ctx, &shader, &layout, clear));
        self.pipeline_format = Some(ctx.surface_format);
    }

    fn ensure_vbo_capacity(&mut self, ctx: &RenderCtx<'_>, required_vertices: usize) {
        if required_vertices <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let new_cap = required_vertices.next_power_of_two().max(64);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spindle immediate vbo"),
            size: (new_cap * std::mem::size_of::<GpuVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

struct PipelineDesc {
    label: &'static str,
    blend: Option<wgpu::BlendState>,
    depth_stencil: wgpu::DepthStencilState,
}

fn build_pipeline(
    ctx: &RenderCtx<'_>,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    desc: PipelineDesc,
) -> wgpu::RenderPipeline {
    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[GpuVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        // Fixed-function quads are two-sided.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(desc.depth_stencil),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Converts logical `bounds` to a physical viewport clamped to the surface.
/// `None` when nothing of it is visible.
fn physical_bounds(
    bounds: Rect,
    surface: PhysicalSize<u32>,
    scale_factor: f32,
) -> Option<(u32, u32, u32, u32)> {
    let to_px = |v: f32, limit: u32| (v.max(0.0) as u32).min(limit);

    let lo = bounds.min().scale(scale_factor);
    let hi = bounds.max().scale(scale_factor);
    let (x, y) = (to_px(lo.x, surface.width), to_px(lo.y, surface.height));
    let (x2, y2) = (to_px(hi.x, surface.width), to_px(hi.y, surface.height));

    let (w, h) = (x2.saturating_sub(x), y2.saturating_sub(y));
    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_upload_as_srgb() {
        assert!(TEXTURE_FORMAT.is_srgb());
        assert_eq!(TEXTURE_FORMAT.remove_srgb_suffix(), wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn bounds_scale_and_clamp_to_surface() {
        let bounds = Rect::new(10.0, 10.0, 620.0, 420.0);
        let surface = PhysicalSize::new(1000, 600);
        assert_eq!(physical_bounds(bounds, surface, 1.5), Some((15, 15, 930, 585)));
    }

    #[test]
    fn offscreen_bounds_are_skipped() {
        let surface = PhysicalSize::new(100, 100);
        assert_eq!(physical_bounds(Rect::new(120.0, 0.0, 50.0, 50.0), surface, 1.0), None);
        assert_eq!(physical_bounds(Rect::from_size(0.0, 50.0), surface, 1.0), None);
    }
}
