//! Time subsystem.
//!
//! Provides polled, testable timers without coupling to the runtime.
//! Intended usage:
//! - a component owns a `Timer` and starts it when constructed
//! - the app reports `Timer::deadline()` to the runtime, which sleeps until then
//! - the runtime calls back, and the component calls `poll(now)` to see if it fired

mod timer;

pub use timer::Timer;
