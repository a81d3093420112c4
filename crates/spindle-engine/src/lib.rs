//! Spindle engine: one window, one GPU context, an immediate-mode renderer.
//!
//! An [`core::App`] receives lifecycle, timer and input callbacks from
//! [`window::Runtime`] and draws through [`render::Immediate`].

pub mod coords;
pub mod logging;
pub mod paint;
pub mod time;

pub mod core;
pub mod device;
pub mod input;
pub mod render;
pub mod window;
