use std::sync::Once;

/// Directives appended to the default filter.
///
/// wgpu's internal crates are very chatty at `info`; they are capped unless the
/// caller supplies an explicit filter.
const QUIET_GPU_CRATES: &str = "wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "selene_engine=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
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
    /// Resolves the filter string actually handed to `env_logger`.
    ///
    /// Precedence: explicit `env_filter`, then `RUST_LOG`, then `info` with the
    /// GPU crates capped at `warn`.
    pub fn resolve_filter(&self, rust_log: Option<&str>) -> String {
        if let Some(filter) = &self.env_filter {
            return filter.clone();
        }
        match rust_log {
            Some(filter) if !filter.trim().is_empty() => filter.to_string(),
            _ => format!("info,{QUIET_GPU_CRATES}"),
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = config.resolve_filter(rust_log.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized (filter: {filter})");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let cfg = LoggingConfig {
            env_filter: Some("debug".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(cfg.resolve_filter(Some("trace")), "debug");
    }

    #[test]
    fn rust_log_used_when_no_explicit_filter() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.resolve_filter(Some("selene_viewer=trace")), "selene_viewer=trace");
    }

    #[test]
    fn default_filter_caps_gpu_crates() {
        let cfg = LoggingConfig::default();
        let filter = cfg.resolve_filter(None);
        assert!(filter.starts_with("info,"));
        assert!(filter.contains("wgpu_core=warn"));
    }

    #[test]
    fn blank_rust_log_falls_back_to_default() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.resolve_filter(Some("  ")), cfg.resolve_filter(None));
    }
}
