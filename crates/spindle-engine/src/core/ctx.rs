use winit::window::{Window, WindowId};

use crate::coords::{Rect, Vec2};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{Immediate, ImmediateRenderer, RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Window handle and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

pub(crate) fn logical_size(window: &Window) -> Vec2 {
    let logi: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    Vec2::new(logi.width as f32, logi.height as f32)
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:   WindowCtx<'a>,
    pub gpu:      &'a mut Gpu<'w>,
    pub renderer: &'a mut ImmediateRenderer,
    pub runtime:  &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the whole surface with `background`, lets `draw` record an
    /// immediate-mode frame for `bounds`, replays it, and presents.
    pub fn render<F>(&mut self, background: Color, bounds: Rect, draw: F) -> AppControl
    where
        F: FnOnce(&mut Immediate),
    {
        let scale_factor = self.window.window.scale_factor() as f32;

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("fatal surface error; exiting");
                    return AppControl::Exit;
                }
                // Try again on the next repaint.
                self.runtime.request_redraw();
                return AppControl::Continue;
            }
        };

        // Clear pass; dropped before the encoder is reused.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spindle background"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });
        }

        let mut gl = Immediate::new(bounds);
        draw(&mut gl);

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.size(),
            scale_factor,
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, self.gpu.depth_view());
            self.renderer.render(&rctx, &mut target, &gl);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
