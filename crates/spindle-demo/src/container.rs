//! Window-level host for the cube canvas.

use std::time::Instant;

use anyhow::Result;
use spindle_engine::coords::{Edges, Rect, Vec2};
use spindle_engine::core::{App, AppControl, FrameCtx};
use spindle_engine::input::{InputEvent, Key, KeyState};
use spindle_engine::paint::Color;
use spindle_engine::render::{ContextCtx, Renderable};
use spindle_engine::window::RuntimeCtx;

use crate::canvas::CubeCanvas;

/// Margins around the canvas: top, right, bottom, left.
pub const CANVAS_MARGINS: Edges = Edges::new(10.0, 10.0, 50.0, 10.0);

const WINDOW_BACKGROUND: f32 = 0.12;

/// Lays out the canvas as the only child of the window.
#[derive(Debug)]
pub struct DemoContainer {
    canvas: CubeCanvas,
}

impl DemoContainer {
    pub fn new(canvas: CubeCanvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &CubeCanvas {
        &self.canvas
    }

    /// Canvas bounds for a window of `size` logical pixels.
    pub fn layout(size: Vec2) -> Rect {
        Rect::from_size(size.x, size.y).inset(CANVAS_MARGINS)
    }
}

impl App for DemoContainer {
    fn on_context_created(&mut self, ctx: &mut ContextCtx) -> Result<()> {
        self.canvas.context_created(ctx)
    }

    fn on_resize(&mut self, size: Vec2, runtime: &mut RuntimeCtx) {
        self.canvas.set_bounds(Self::layout(size));
        runtime.request_redraw();
    }

    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        match event {
            InputEvent::Key { key: Key::Escape, state: KeyState::Pressed, .. } => {
                log::info!("escape pressed; exiting");
                AppControl::Exit
            }
            InputEvent::PointerDragged(drag) if self.canvas.bounds().contains(drag.start) => {
                self.canvas.on_drag(drag.offset().x);
                runtime.request_redraw();
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.canvas.deadline()
    }

    fn on_timer(&mut self, now: Instant, runtime: &mut RuntimeCtx) -> AppControl {
        if self.canvas.on_timer(now) {
            runtime.request_redraw();
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let bounds = self.canvas.bounds();
        let canvas = &mut self.canvas;
        ctx.render(Color::gray(WINDOW_BACKGROUND), bounds, |gl| canvas.render(gl))
    }
}
