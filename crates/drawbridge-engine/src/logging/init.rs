use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"drawbridge_engine=debug,wgpu=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // wgpu is chatty at info.
                builder.filter_level(log::LevelFilter::Info).filter_module("wgpu_core", log::LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            // Another logger was installed first (e.g. by a host); keep it.
            return;
        }
        log::debug!("logging initialized");
    });
}
