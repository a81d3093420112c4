//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer,
//! the input subsystem and the application's timers.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
