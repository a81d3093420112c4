use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` names one. The GPU
/// stack is chatty at `info`.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger settings for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` directives, e.g. `"spindle_engine=debug"`. Takes priority
    /// over `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, write_style: env_logger::WriteStyle::Auto }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self { env_filter: Some(filter.into()), ..Self::default() }
    }

    /// Directives to install: the explicit filter, else `rust_log`, else the default.
    fn directives(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log.filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Installs the global `env_logger` backend. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directives = config.directives(std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&directives)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with `{directives}`");
    });
}
