//! Spinning textured cube.
//!
//! Drag horizontally across the cube to change its speed and direction;
//! press Escape to quit.

mod canvas;
mod container;
mod textures;

use std::time::Instant;

use anyhow::Result;
use spindle_engine::device::GpuInit;
use spindle_engine::logging::{init_logging, LoggingConfig};
use spindle_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::canvas::{CanvasOptions, CubeCanvas};
use crate::container::DemoContainer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let canvas = CubeCanvas::new(CanvasOptions::default(), Instant::now());
    let config = RuntimeConfig {
        title: "Spindle: textured cube".to_string(),
        initial_size: LogicalSize::new(640.0, 480.0),
    };

    log::info!("starting spindle demo");
    Runtime::run(config, GpuInit::default(), DemoContainer::new(canvas))
}
