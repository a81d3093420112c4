//! The spinning cube visual.

use std::time::{Duration, Instant};

use anyhow::Result;
use spindle_engine::coords::Rect;
use spindle_engine::paint::Color;
use spindle_engine::render::{
    ContextCtx, Immediate, QuadVertex, RenderState, Renderable, TextureFilter, TextureId,
};
use spindle_engine::time::Timer;

use crate::textures;

/// Unit-square texture coordinates, in corner order.
const UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Cube faces as (corners, uses second texture).
#[rustfmt::skip]
const FACES: [([[f32; 3]; 4], bool); 6] = [
    // front
    ([[-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0]], false),
    // back
    ([[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]], false),
    // top
    ([[-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]], false),
    // bottom
    ([[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0]], true),
    // right
    ([[ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0]], true),
    // left
    ([[-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0]], true),
];

/// Distance from the canvas edges to the backdrop quad, in logical pixels.
const BACKDROP_INSET: f32 = 50.0;

/// Eye-space distance from the camera to the cube center.
const CAMERA_DISTANCE: f32 = 5.0;

/// Rotation angle (degrees) and per-tick increment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpinState {
    pub rotation: f32,
    pub delta: f32,
}

impl Default for SpinState {
    fn default() -> Self {
        Self { rotation: 0.0, delta: 1.0 }
    }
}

/// Canvas configuration.
#[derive(Debug, Clone)]
pub struct CanvasOptions {
    /// Log every surface configuration on the first context creation.
    pub list_surface_configs: bool,

    pub tick_interval: Duration,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            list_surface_configs: true,
            tick_interval: Duration::from_millis(20),
        }
    }
}

/// Textures uploaded into the current context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CubeTextures {
    pub primary: TextureId,
    pub secondary: TextureId,
}

/// Spinning textured cube over a fading backdrop.
///
/// Holds its own repaint timer; the host polls `deadline` and calls
/// `on_timer`. Textures are rebuilt from scratch in every new context.
#[derive(Debug)]
pub struct CubeCanvas {
    options: CanvasOptions,
    spin: SpinState,
    timer: Timer,
    bounds: Rect,
    textures: Option<CubeTextures>,
    configs_listed: bool,
}

impl CubeCanvas {
    pub fn new(options: CanvasOptions, now: Instant) -> Self {
        let timer = Timer::started(options.tick_interval, now);
        Self {
            options,
            spin: SpinState::default(),
            timer,
            bounds: Rect::default(),
            textures: None,
            configs_listed: false,
        }
    }

    #[inline]
    pub fn spin(&self) -> SpinState {
        self.spin
    }

    pub fn tick(&mut self) {
        self.spin.rotation += self.spin.delta;
    }

    /// Horizontal drag distance sets the speed; left drags spin backwards.
    pub fn on_drag(&mut self, offset_x: f32) {
        self.spin.delta = offset_x / 100.0;
    }

    /// Advances the spin if the repaint timer is due. Returns `true` when a
    /// repaint is needed.
    pub fn on_timer(&mut self, now: Instant) -> bool {
        if !self.timer.poll(now) {
            return false;
        }
        self.tick();
        true
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    #[inline]
    pub fn textures(&self) -> Option<CubeTextures> {
        self.textures
    }

    fn list_surface_configs(&mut self, ctx: &ContextCtx) {
        if !self.options.list_surface_configs || self.configs_listed {
            return;
        }
        self.configs_listed = true;

        let info = ctx.surface_info();
        log::info!("{} surface configurations available", info.combinations());
        for format in &info.formats {
            log::info!("  format: {format:?}");
        }
        for mode in &info.present_modes {
            log::info!("  present mode: {mode:?}");
        }
        for mode in &info.alpha_modes {
            log::info!("  alpha mode: {mode:?}");
        }
    }
}

impl Renderable for CubeCanvas {
    fn context_created(&mut self, ctx: &mut ContextCtx) -> Result<()> {
        self.list_surface_configs(ctx);

        let image1 = textures::image1()?;
        let image2 = textures::image2()?;
        self.textures = Some(CubeTextures {
            primary: ctx.upload_texture(&image1),
            secondary: ctx.upload_texture(&image2),
        });

        ctx.set_render_state(RenderState {
            depth_test: true,
            blend: true,
            texture_filter: TextureFilter::Linear,
        });

        log::debug!("cube textures rebuilt for context #{}", ctx.generation());
        Ok(())
    }

    fn render(&mut self, gl: &mut Immediate) {
        let Some(tex) = self.textures else {
            return;
        };
        let rotation = self.spin.rotation;

        // Transparent, so the window background shows around the backdrop.
        gl.clear(Color::transparent());

        let bounds = gl.bounds();
        if !bounds.is_empty() {
            // Backdrop in canvas pixels, y down, fading with the spin.
            let (w, h) = (bounds.width(), bounds.height());
            let (lo_x, lo_y) = (BACKDROP_INSET, BACKDROP_INSET);
            let (hi_x, hi_y) = (w - BACKDROP_INSET, h - BACKDROP_INSET);

            gl.ortho(0.0, w, h, 0.0, 0.0, 1.0);
            gl.load_identity();
            gl.bind_texture(tex.primary);
            gl.color(Color::white_alpha((rotation / 100.0).sin().abs()));
            gl.quad([
                QuadVertex::new([lo_x, lo_y, 0.0], UV[0]),
                QuadVertex::new([hi_x, lo_y, 0.0], UV[1]),
                QuadVertex::new([hi_x, hi_y, 0.0], UV[2]),
                QuadVertex::new([lo_x, hi_y, 0.0], UV[3]),
            ]);
        }

        gl.clear_depth();

        gl.perspective(45.0, 0.1, 100.0);
        gl.load_identity();
        gl.translate(0.0, 0.0, -CAMERA_DISTANCE);
        gl.rotate(rotation, 0.5, 1.0, 0.0);
        gl.color(Color::WHITE);

        for (corners, secondary) in FACES {
            gl.bind_texture(if secondary { tex.secondary } else { tex.primary });
            gl.quad([
                QuadVertex::new(corners[0], UV[0]),
                QuadVertex::new(corners[1], UV[1]),
                QuadVertex::new(corners[2], UV[2]),
                QuadVertex::new(corners[3], UV[3]),
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use spindle_engine::device::SurfaceConfigInfo;
    use spindle_engine::render::ImmediateCmd;

    use super::*;

    fn canvas() -> CubeCanvas {
        CubeCanvas::new(CanvasOptions::default(), Instant::now())
    }

    fn with_context(canvas: &mut CubeCanvas, generation: u64) -> ContextCtx {
        let mut ctx = ContextCtx::new(SurfaceConfigInfo::default(), generation);
        canvas.context_created(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn tick_adds_delta() {
        let mut c = canvas();
        c.tick();
        c.tick();
        assert_eq!(c.spin().rotation, 2.0);

        c.on_drag(250.0);
        c.tick();
        assert_eq!(c.spin().rotation, 4.5);
    }

    #[test]
    fn drag_sets_delta_from_offset() {
        let mut c = canvas();
        c.on_drag(50.0);
        assert_eq!(c.spin().delta, 0.5);
        c.on_drag(-300.0);
        assert_eq!(c.spin().delta, -3.0);
        c.tick();
        assert_eq!(c.spin().rotation, -3.0);
    }

    #[test]
    fn timer_ticks_only_when_due() {
        let start = Instant::now();
        let mut c = CubeCanvas::new(CanvasOptions::default(), start);
        assert!(!c.on_timer(start));
        assert_eq!(c.spin().rotation, 0.0);

        assert!(c.on_timer(start + Duration::from_millis(20)));
        assert_eq!(c.spin().rotation, 1.0);
        assert!(c.deadline().unwrap() > start + Duration::from_millis(20));
    }

    #[test]
    fn every_context_gets_two_fresh_textures() {
        let mut c = canvas();
        for generation in 1..=3 {
            let ctx = with_context(&mut c, generation);
            let sizes: Vec<_> = ctx.uploads().iter().map(|u| u.image.size()).collect();
            assert_eq!(sizes, vec![(256, 256), (128, 128)]);
            assert!(ctx.render_state().depth_test && ctx.render_state().blend);
            assert_eq!(ctx.render_state().texture_filter, TextureFilter::Linear);
        }
    }

    #[test]
    fn render_without_context_draws_nothing() {
        let mut c = canvas();
        let mut gl = Immediate::new(Rect::from_size(100.0, 100.0));
        c.render(&mut gl);
        assert!(gl.is_empty());
    }

    #[test]
    fn repaint_sequence() {
        let mut c = canvas();
        let _ctx = with_context(&mut c, 1);
        let tex = c.textures().unwrap();

        let mut gl = Immediate::new(Rect::new(10.0, 10.0, 620.0, 420.0));
        c.render(&mut gl);

        let cmds = gl.commands();
        assert_eq!(cmds.len(), 9);
        assert_eq!(cmds[0], ImmediateCmd::Clear(Color::transparent()));
        assert!(matches!(cmds[1], ImmediateCmd::Quad { texture, .. } if texture == tex.primary));
        assert_eq!(cmds[2], ImmediateCmd::ClearDepth);

        let (p, s) = (tex.primary, tex.secondary);
        assert_eq!(gl.quad_textures(), vec![p, p, p, p, s, s, s]);
    }

    #[test]
    fn backdrop_alpha_follows_rotation() {
        let mut c = canvas();
        let _ctx = with_context(&mut c, 1);
        for _ in 0..150 {
            c.tick();
        }

        let mut gl = Immediate::new(Rect::from_size(200.0, 100.0));
        c.render(&mut gl);

        let ImmediateCmd::Quad { color, .. } = gl.commands()[1] else {
            panic!("expected the backdrop quad");
        };
        assert!((color.a - 1.5f32.sin().abs()).abs() < 1e-6);
    }

    #[test]
    fn cube_lies_inside_the_depth_range() {
        let mut c = canvas();
        let _ctx = with_context(&mut c, 1);
        let mut gl = Immediate::new(Rect::from_size(640.0, 480.0));
        c.render(&mut gl);

        for cmd in &gl.commands()[3..] {
            let ImmediateCmd::Quad { clip, .. } = cmd else {
                panic!("expected cube quads only");
            };
            for [_, _, z, w] in clip {
                let depth = z / w;
                assert!(*w > 0.0 && (0.0..=1.0).contains(&depth), "depth {depth}");
            }
        }
    }

    #[test]
    fn backdrop_is_inset_from_the_canvas_edges() {
        let mut c = canvas();
        let _ctx = with_context(&mut c, 1);
        let mut gl = Immediate::new(Rect::new(10.0, 10.0, 620.0, 420.0));
        c.render(&mut gl);

        let ImmediateCmd::Quad { clip, uv, .. } = &gl.commands()[1] else {
            panic!("expected the backdrop quad");
        };
        let (x, y) = (1.0 - 100.0 / 620.0, 1.0 - 100.0 / 420.0);
        let expected = [[-x, y], [x, y], [x, -y], [-x, -y]];
        for ([cx, cy, _, w], [ex, ey]) in clip.iter().zip(expected) {
            assert!((cx / w - ex).abs() < 1e-5 && (cy / w - ey).abs() < 1e-5, "({cx}, {cy})");
        }
        assert_eq!(uv[0], [0.0, 0.0]);
    }

    #[test]
    fn empty_canvas_skips_the_backdrop() {
        let mut c = canvas();
        let _ctx = with_context(&mut c, 1);
        let mut gl = Immediate::new(Rect::new(10.0, 10.0, 20.0, 0.0));
        c.render(&mut gl);

        assert_eq!(gl.commands()[1], ImmediateCmd::ClearDepth);
        assert_eq!(gl.quad_textures().len(), 6);
    }

    #[test]
    fn camera_sits_five_units_from_the_cube_center() {
        let mut c = canvas();
        let _ctx = with_context(&mut c, 1);
        let mut gl = Immediate::new(Rect::from_size(640.0, 480.0));
        c.render(&mut gl);

        // Front face at rotation 0 is one unit nearer than the center.
        let ImmediateCmd::Quad { clip, .. } = &gl.commands()[3] else {
            panic!("expected the front face");
        };
        for [_, _, _, w] in clip {
            assert!((w - 4.0).abs() < 1e-5, "w {w}");
        }
    }
}
