use nalgebra::{Matrix4, Unit, Vector3, Vector4};

use crate::coords::Rect;
use crate::paint::Color;

use super::context::TextureId;

/// Maps fixed-function clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
const GL_TO_WGPU: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Model-space quad corner with its texture coordinate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    #[inline]
    pub const fn new(pos: [f32; 3], uv: [f32; 2]) -> Self {
        Self { pos, uv }
    }
}

/// One recorded immediate-mode command.
#[derive(Debug, Clone, PartialEq)]
pub enum ImmediateCmd {
    /// Composite a color over the bounds and reset depth.
    Clear(Color),

    /// Reset depth only.
    ClearDepth,

    /// Textured quad; corners are already in wgpu clip space.
    Quad {
        texture: TextureId,
        color: Color,
        clip: [[f32; 4]; 4],
        uv: [[f32; 2]; 4],
    },
}

/// Immediate-mode recorder for one repaint of one visual.
///
/// Carries fixed-function style current state: a projection matrix, a
/// model-view matrix, the bound texture and the current color. Each `quad`
/// call snapshots that state into an [`ImmediateCmd::Quad`].
///
/// Both matrices start as identity, the bound texture as [`TextureId::WHITE`]
/// and the color as opaque white.
#[derive(Debug)]
pub struct Immediate {
    bounds: Rect,
    projection: Matrix4<f32>,
    modelview: Matrix4<f32>,
    texture: TextureId,
    color: Color,
    cmds: Vec<ImmediateCmd>,
}

impl Immediate {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            projection: Matrix4::identity(),
            modelview: Matrix4::identity(),
            texture: TextureId::WHITE,
            color: Color::WHITE,
            cmds: Vec::new(),
        }
    }

    /// Bounds of the visual, in window logical pixels.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Width over height of the bounds; 1.0 for degenerate bounds.
    pub fn aspect(&self) -> f32 {
        if self.bounds.height() > 0.0 && self.bounds.width() > 0.0 {
            self.bounds.width() / self.bounds.height()
        } else {
            1.0
        }
    }

    // ── clears ────────────────────────────────────────────────────────────

    /// Clears color and depth inside the bounds. A transparent color leaves
    /// the window background visible.
    pub fn clear(&mut self, color: Color) {
        self.cmds.push(ImmediateCmd::Clear(color));
    }

    pub fn clear_depth(&mut self) {
        self.cmds.push(ImmediateCmd::ClearDepth);
    }

    // ── projection ────────────────────────────────────────────────────────

    /// Orthographic projection with fixed-function argument order.
    ///
    /// Degenerate volumes (equal planes) are ignored with a warning.
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        if left == right || bottom == top || near == far {
            log::warn!("ignoring degenerate ortho volume");
            return;
        }
        self.projection = Matrix4::new_orthographic(left, right, bottom, top, near, far);
    }

    /// Perspective projection using the bounds' aspect ratio.
    pub fn perspective(&mut self, fovy_degrees: f32, near: f32, far: f32) {
        if near == far || fovy_degrees <= 0.0 {
            log::warn!("ignoring degenerate perspective volume");
            return;
        }
        self.projection =
            Matrix4::new_perspective(self.aspect(), fovy_degrees.to_radians(), near, far);
    }

    // ── model-view ────────────────────────────────────────────────────────

    pub fn load_identity(&mut self) {
        self.modelview = Matrix4::identity();
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.modelview *= Matrix4::new_translation(&Vector3::new(x, y, z));
    }

    /// Rotates by `degrees` about `(x, y, z)`. A zero axis is a no-op.
    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) {
        let Some(axis) = Unit::try_new(Vector3::new(x, y, z), f32::EPSILON) else {
            return;
        };
        self.modelview *= Matrix4::from_axis_angle(&axis, degrees.to_radians());
    }

    // ── current state ─────────────────────────────────────────────────────

    pub fn bind_texture(&mut self, texture: TextureId) {
        self.texture = texture;
    }

    pub fn color(&mut self, color: Color) {
        self.color = color;
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Records a quad with the current texture, color and matrices.
    ///
    /// Corners are expected in winding order (0-1-2-3).
    pub fn quad(&mut self, corners: [QuadVertex; 4]) {
        let mvp = GL_TO_WGPU * self.projection * self.modelview;
        let clip = corners.map(|v| {
            let p = mvp * Vector4::new(v.pos[0], v.pos[1], v.pos[2], 1.0);
            [p.x, p.y, p.z, p.w]
        });

        self.cmds.push(ImmediateCmd::Quad {
            texture: self.texture,
            color: self.color,
            clip,
            uv: corners.map(|v| v.uv),
        });
    }

    // ── inspection ────────────────────────────────────────────────────────

    pub fn commands(&self) -> &[ImmediateCmd] {
        &self.cmds
    }

    /// Textures of the recorded quads, in order.
    pub fn quad_textures(&self) -> Vec<TextureId> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                ImmediateCmd::Quad { texture, .. } => Some(*texture),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad(z: f32) -> [QuadVertex; 4] {
        [
            QuadVertex::new([0.0, 0.0, z], [0.0, 0.0]),
            QuadVertex::new([1.0, 0.0, z], [1.0, 0.0]),
            QuadVertex::new([1.0, 1.0, z], [1.0, 1.0]),
            QuadVertex::new([0.0, 1.0, z], [0.0, 1.0]),
        ]
    }

    fn first_quad_clip(gl: &Immediate) -> [[f32; 4]; 4] {
        match &gl.commands()[0] {
            ImmediateCmd::Quad { clip, .. } => *clip,
            other => panic!("expected quad, got {other:?}"),
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn aspect_follows_bounds() {
        assert!(approx(Immediate::new(Rect::from_size(400.0, 200.0)).aspect(), 2.0));
        assert_eq!(Immediate::new(Rect::from_size(400.0, 0.0)).aspect(), 1.0);
    }

    #[test]
    fn identity_maps_gl_depth_into_zero_one() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.quad(unit_quad(-1.0));
        let clip = first_quad_clip(&gl);
        assert!(approx(clip[0][2], 0.0));
        assert!(approx(clip[0][3], 1.0));
    }

    #[test]
    fn ortho_unit_square_flipped_y() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.ortho(0.0, 1.0, 1.0, 0.0, 0.0, 1.0);
        gl.quad(unit_quad(0.0));
        let clip = first_quad_clip(&gl);

        // (0, 0) is the top-left corner, (1, 1) the bottom-right.
        assert!(approx(clip[0][0], -1.0) && approx(clip[0][1], 1.0));
        assert!(approx(clip[2][0], 1.0) && approx(clip[2][1], -1.0));
        // z = 0 sits on the near plane.
        assert!(approx(clip[0][2], 0.0));
    }

    #[test]
    fn degenerate_ortho_is_ignored() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.ortho(1.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        gl.quad(unit_quad(0.0));
        let clip = first_quad_clip(&gl);
        assert!(approx(clip[1][0], 1.0));
    }

    #[test]
    fn translate_then_perspective_puts_quad_in_front() {
        let mut gl = Immediate::new(Rect::from_size(300.0, 300.0));
        gl.perspective(45.0, 0.1, 100.0);
        gl.translate(0.0, 0.0, -5.0);
        gl.quad(unit_quad(0.0));
        let clip = first_quad_clip(&gl);
        for c in clip {
            let ndc_z = c[2] / c[3];
            assert!(c[3] > 0.0);
            assert!((0.0..=1.0).contains(&ndc_z), "depth {ndc_z} out of range");
        }
    }

    #[test]
    fn rotate_about_zero_axis_is_noop() {
        let mut a = Immediate::new(Rect::from_size(10.0, 10.0));
        let mut b = Immediate::new(Rect::from_size(10.0, 10.0));
        a.rotate(90.0, 0.0, 0.0, 0.0);
        a.quad(unit_quad(0.0));
        b.quad(unit_quad(0.0));
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn rotate_quarter_turn_about_z() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.rotate(90.0, 0.0, 0.0, 1.0);
        gl.quad(unit_quad(0.0));
        let clip = first_quad_clip(&gl);
        // (1, 0) -> (0, 1)
        assert!(approx(clip[1][0], 0.0) && approx(clip[1][1], 1.0));
    }

    #[test]
    fn quads_snapshot_current_texture_and_color() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.quad(unit_quad(0.0));
        gl.color(Color::white_alpha(0.5));
        gl.quad(unit_quad(0.0));

        match (&gl.commands()[0], &gl.commands()[1]) {
            (
                ImmediateCmd::Quad { texture: t0, color: c0, .. },
                ImmediateCmd::Quad { color: c1, .. },
            ) => {
                assert_eq!(*t0, TextureId::WHITE);
                assert_eq!(*c0, Color::WHITE);
                assert_eq!(*c1, Color::white_alpha(0.5));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn load_identity_resets_modelview_only() {
        let mut gl = Immediate::new(Rect::from_size(10.0, 10.0));
        gl.translate(5.0, 0.0, 0.0);
        gl.load_identity();
        gl.quad(unit_quad(0.0));
        assert!(approx(first_quad_clip(&gl)[0][0], 0.0));
    }
}
