//! Turns an immediate-mode recording into GPU passes and draw batches.
//!
//! A pass boundary is needed wherever depth must be reset mid-frame, because
//! wgpu only clears attachments at pass start. Within a pass, consecutive
//! quads sharing a texture collapse into one draw.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use super::context::TextureId;
use super::immediate::ImmediateCmd;

/// Vertex as uploaded to the GPU: clip-space position, uv, premultiplied color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuVertex {
    pub clip: [f32; 4],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x4, // clip
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Triangle-list order for a 0-1-2-3 quad.
const QUAD_INDICES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Full-viewport quad in clip space, used to clear color inside the bounds.
const CLEAR_CORNERS: [[f32; 4]; 4] = [
    [-1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, 1.0],
];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum DrawKind {
    /// Drawn with the clear pipeline: composited over the window, no depth test.
    Clear,
    /// Drawn with the context's fixed-function pipeline.
    Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawBatch {
    pub kind: DrawKind,
    pub texture: TextureId,
    pub vertices: Range<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PassPlan {
    pub clear_depth: bool,
    pub batches: Vec<DrawBatch>,
}

impl PassPlan {
    fn new() -> Self {
        Self { clear_depth: true, batches: Vec::new() }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FramePlan {
    pub vertices: Vec<GpuVertex>,
    pub passes: Vec<PassPlan>,
}

impl FramePlan {
    /// Passes that actually draw something.
    pub(crate) fn drawing_passes(&self) -> impl Iterator<Item = &PassPlan> {
        self.passes.iter().filter(|p| !p.batches.is_empty())
    }
}

/// Plans a frame. The first pass always clears depth so nothing leaks in
/// from the previous frame.
pub(crate) fn plan_frame(cmds: &[ImmediateCmd]) -> FramePlan {
    let mut plan = FramePlan {
        vertices: Vec::new(),
        passes: vec![PassPlan::new()],
    };

    for cmd in cmds {
        match cmd {
            ImmediateCmd::Clear(color) => {
                plan.reset_depth();
                let uv = [[0.0, 0.0]; 4];
                plan.push_quad(DrawKind::Clear, TextureId::WHITE, &CLEAR_CORNERS, &uv, color.to_array());
            }
            ImmediateCmd::ClearDepth => plan.reset_depth(),
            ImmediateCmd::Quad { texture, color, clip, uv } => {
                plan.push_quad(DrawKind::Geometry, *texture, clip, uv, color.to_array());
            }
        }
    }

    plan
}

impl FramePlan {
    fn current(&mut self) -> &mut PassPlan {
        if self.passes.is_empty() {
            self.passes.push(PassPlan::new());
        }
        let last = self.passes.len() - 1;
        &mut self.passes[last]
    }

    fn reset_depth(&mut self) {
        let pass = self.current();
        if pass.batches.is_empty() {
            pass.clear_depth = true;
        } else {
            self.passes.push(PassPlan::new());
        }
    }

    fn push_quad(
        &mut self,
        kind: DrawKind,
        texture: TextureId,
        clip: &[[f32; 4]; 4],
        uv: &[[f32; 2]; 4],
        color: [f32; 4],
    ) {
        let start = self.vertices.len() as u32;
        for i in QUAD_INDICES {
            self.vertices.push(GpuVertex { clip: clip[i], uv: uv[i], color });
        }
        let end = self.vertices.len() as u32;

        let pass = self.current();
        match pass.batches.last_mut() {
            Some(b) if b.kind == kind && b.texture == texture && b.vertices.end == start => {
                b.vertices.end = end;
            }
            _ => pass.batches.push(DrawBatch { kind, texture, vertices: start..end }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;
    use crate::render::context::ContextCtx;
    use crate::render::immediate::{Immediate, QuadVertex};
    use crate::render::TextureImage;
    use crate::device::SurfaceConfigInfo;

    fn quad() -> [QuadVertex; 4] {
        [
            QuadVertex::new([0.0, 0.0, 0.0], [0.0, 0.0]),
            QuadVertex::new([1.0, 0.0, 0.0], [1.0, 0.0]),
            QuadVertex::new([1.0, 1.0, 0.0], [1.0, 1.0]),
            QuadVertex::new([0.0, 1.0, 0.0], [0.0, 1.0]),
        ]
    }

    fn two_textures() -> (TextureId, TextureId) {
        let mut ctx = ContextCtx::new(SurfaceConfigInfo::default(), 1);
        let img = TextureImage::white();
        (ctx.upload_texture(&img), ctx.upload_texture(&img))
    }

    #[test]
    fn empty_recording_draws_nothing() {
        let plan = plan_frame(&[]);
        assert!(plan.vertices.is_empty());
        assert_eq!(plan.drawing_passes().count(), 0);
    }

    #[test]
    fn quads_with_same_texture_merge() {
        let (t1, _) = two_textures();
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.bind_texture(t1);
        gl.quad(quad());
        gl.quad(quad());
        gl.quad(quad());

        let plan = plan_frame(gl.commands());
        assert_eq!(plan.vertices.len(), 18);
        assert_eq!(plan.passes.len(), 1);
        assert_eq!(
            plan.passes[0].batches,
            vec![DrawBatch { kind: DrawKind::Geometry, texture: t1, vertices: 0..18 }]
        );
    }

    #[test]
    fn texture_change_splits_batches() {
        let (t1, t2) = two_textures();
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.bind_texture(t1);
        gl.quad(quad());
        gl.bind_texture(t2);
        gl.quad(quad());
        gl.bind_texture(t1);
        gl.quad(quad());

        let plan = plan_frame(gl.commands());
        let textures: Vec<_> = plan.passes[0].batches.iter().map(|b| b.texture).collect();
        assert_eq!(textures, vec![t1, t2, t1]);
    }

    #[test]
    fn clear_depth_after_geometry_starts_new_pass() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.clear(Color::gray(0.25));
        gl.quad(quad());
        gl.clear_depth();
        gl.quad(quad());

        let plan = plan_frame(gl.commands());
        assert_eq!(plan.passes.len(), 2);
        assert!(plan.passes.iter().all(|p| p.clear_depth));

        let first: Vec<_> = plan.passes[0].batches.iter().map(|b| b.kind).collect();
        assert_eq!(first, vec![DrawKind::Clear, DrawKind::Geometry]);
        assert_eq!(plan.passes[1].batches.len(), 1);
    }

    #[test]
    fn leading_clears_do_not_add_empty_passes() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.clear_depth();
        gl.clear(Color::BLACK);

        let plan = plan_frame(gl.commands());
        assert_eq!(plan.passes.len(), 1);
        assert_eq!(plan.passes[0].batches[0].kind, DrawKind::Clear);
    }

    #[test]
    fn clear_quad_carries_clear_color() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.clear(Color::gray(0.25));
        let plan = plan_frame(gl.commands());
        assert_eq!(plan.vertices.len(), 6);
        assert!(plan.vertices.iter().all(|v| v.color == Color::gray(0.25).to_array()));
    }
}
