use std::time::Instant;

use anyhow::Result;
use winit::event::WindowEvent;

use crate::coords::Vec2;
use crate::input::InputEvent;
use crate::render::ContextCtx;
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread, one at a time. Repaints are
/// never implicit: request them through `RuntimeCtx::request_redraw`.
pub trait App {
    /// A rendering context was created or recreated. Everything bound to the
    /// previous context is gone and must be rebuilt here.
    fn on_context_created(&mut self, ctx: &mut ContextCtx) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// The window's logical size changed (also sent once after each context creation).
    fn on_resize(&mut self, size: Vec2, runtime: &mut RuntimeCtx) {
        let _ = (size, runtime);
    }

    /// Called for each translated input event, plus derived drag events.
    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (event, runtime);
        AppControl::Continue
    }

    /// Earliest instant the app wants `on_timer` called, if any.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    /// Called once `next_deadline()` has passed.
    fn on_timer(&mut self, now: Instant, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (now, runtime);
        AppControl::Continue
    }

    /// Raw window events, before runtime handling.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called for every repaint.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
