use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::core::logical_size;
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::InputState;
use crate::render::{ContextCtx, ImmediateRenderer};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "spindle".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Runtime requests made from inside an app callback.
///
/// Requests are buffered and applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    redraw: bool,
    exit: bool,
}

impl RuntimeCtx {
    /// Schedules a repaint of the window.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Stops the event loop once the current callback returns.
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// The window and the rendering context bound to it.
///
/// Created on `resumed`, dropped on `suspended`; each creation is a new
/// rendering context.
#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    renderer: Option<ImmediateRenderer>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    contexts_created: u64,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            contexts_created: 0,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Creates the window and its context, then runs the context-created and
    /// resize callbacks.
    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<RuntimeCtx> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            renderer: None,
            window,
            gpu_builder: |w: &Window| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.contexts_created += 1;
        let generation = self.contexts_created;
        let app = &mut self.app;

        entry.with_mut(|fields| -> Result<()> {
            let mut ctx = ContextCtx::new(fields.gpu.surface_info().clone(), generation);
            app.on_context_created(&mut ctx)
                .context("context-created callback failed")?;

            *fields.renderer = Some(ImmediateRenderer::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                ctx,
            ));
            Ok(())
        })?;
        log::info!("rendering context #{generation} created");

        let mut runtime_ctx = RuntimeCtx::default();
        let size = entry.with_window(|w| logical_size(w));
        self.app.on_resize(size, &mut runtime_ctx);
        runtime_ctx.request_redraw();

        self.window = Some(entry);
        Ok(runtime_ctx)
    }

    fn apply_runtime_ctx(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        if ctx.exit_requested() {
            self.request_exit(event_loop);
            return;
        }
        if ctx.redraw_requested() {
            if let Some(entry) = self.window.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn dispatch_input(&mut self, event: &WindowEvent) -> RuntimeCtx {
        let mut runtime_ctx = RuntimeCtx::default();
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return runtime_ctx;
        };

        entry.with_mut(|fields| {
            let Some(ev) = translate_window_event(fields.window, fields.input_state, event) else {
                return;
            };
            let derived = fields.input_state.apply_event(&ev);

            for ev in std::iter::once(ev).chain(derived) {
                if app.on_input(&ev, &mut runtime_ctx) == AppControl::Exit {
                    runtime_ctx.exit();
                }
            }
        });

        runtime_ctx
    }

    fn draw_frame(&mut self, window_id: WindowId) -> RuntimeCtx {
        let mut runtime_ctx = RuntimeCtx::default();
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return runtime_ctx;
        };

        let mut control = AppControl::Continue;
        entry.with_mut(|fields| {
            let Some(renderer) = fields.renderer.as_mut() else {
                return;
            };

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                renderer,
                runtime: &mut runtime_ctx,
            };

            control = app.on_frame(&mut ctx);
        });

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }
        runtime_ctx
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(ctx) => self.apply_runtime_ctx(event_loop, ctx),
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.request_exit(event_loop);
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if self.window.take().is_some() {
            log::info!("rendering context destroyed");
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if self.app.next_deadline().is_some_and(|due| due <= now) {
            let mut runtime_ctx = RuntimeCtx::default();
            if self.app.on_timer(now, &mut runtime_ctx) == AppControl::Exit {
                runtime_ctx.exit();
            }
            self.apply_runtime_ctx(event_loop, runtime_ctx);
        }

        match self.app.next_deadline() {
            Some(due) => event_loop.set_control_flow(ControlFlow::WaitUntil(due)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        let input_ctx = self.dispatch_input(&event);
        self.apply_runtime_ctx(event_loop, input_ctx);
        if self.exit_requested {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let Some(entry) = self.window.as_mut() else { return };

                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                let size = entry.with_window(|w| logical_size(w));

                let mut runtime_ctx = RuntimeCtx::default();
                self.app.on_resize(size, &mut runtime_ctx);
                runtime_ctx.request_redraw();
                self.apply_runtime_ctx(event_loop, runtime_ctx);
            }

            WindowEvent::RedrawRequested => {
                let frame_ctx = self.draw_frame(window_id);
                self.apply_runtime_ctx(event_loop, frame_ctx);
            }

            _ => {}
        }
    }
}
