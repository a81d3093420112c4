//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; the binary decides when the backend comes up.

mod init;

pub use init::{init_logging, LoggingConfig};
