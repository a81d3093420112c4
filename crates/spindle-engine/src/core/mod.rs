//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application, plus the per-frame context handed to `App::on_frame`.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
pub(crate) use ctx::logical_size;
