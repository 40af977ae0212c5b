//! Structured logging for cubit tools.
//!
//! Console output carries uptime timestamps and targets. An optional log file
//! receives the same events as plain text or JSON lines. `RUST_LOG` wins over
//! the configured `debug.log_level`.

use std::fs::File;
use std::path::{Path, PathBuf};

use cubit_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for `cubit.log`; no file is written when `None`
/// * `json_file` - write the file as JSON lines instead of plain text
/// * `config` - source of the `debug.log_level` filter
///
/// A log file that cannot be created is reported once on the console and
/// skipped.
///
/// ```no_run
/// use cubit_config::Config;
/// use cubit_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, json_file: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let Some(log_dir) = log_dir else {
        subscriber.init();
        return;
    };

    let path = log_file_path(log_dir, json_file);
    match open_log_file(log_dir, &path) {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime());
            if json_file {
                subscriber.with(file_layer.json()).init();
            } else {
                subscriber.with(file_layer).init();
            }
            tracing::debug!(path = %path.display(), "file logging enabled");
        }
        Err(err) => {
            subscriber.init();
            tracing::warn!(path = %path.display(), %err, "log file unavailable, console only");
        }
    }
}

/// `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Filter directives taken from the config, or [`DEFAULT_FILTER`] when it has none.
pub fn filter_directives(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Path of the log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path, json_file: bool) -> PathBuf {
    log_dir.join(if json_file { "cubit.json" } else { "cubit.log" })
}

fn open_log_file(log_dir: &Path, path: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(log_dir)?;
    File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(filter.to_string().contains("info"));
    }

    #[test]
    fn test_config_level_used() {
        let mut config = Config::default();
        config.debug.log_level = "warn,cubit_world=trace".to_string();
        assert_eq!(filter_directives(Some(&config)), "warn,cubit_world=trace");
    }

    #[test]
    fn test_blank_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directives(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,cubit_world=trace",
            "warn,cubit_world::sync=debug",
            "error",
        ];
        for filter_str in valid_filters {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "Failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_log_file_name_follows_format() {
        let dir = Path::new("logs");
        assert_eq!(log_file_path(dir, false), dir.join("cubit.log"));
        assert_eq!(log_file_path(dir, true), dir.join("cubit.json"));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");
        let path = log_file_path(&log_dir, true);
        open_log_file(&log_dir, &path).unwrap();
        assert!(path.exists());
    }
}
