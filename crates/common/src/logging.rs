//! Logging configuration for tracelog components
//!
//! Report output goes to stdout, so diagnostics are kept on stderr and
//! default to WARN. `RUST_LOG` overrides the level; an optional file layer
//! writes everything to a daily-rotated log under the temp directory.

use std::{env, fs, io, path::PathBuf, sync::Once};

use thiserror::Error;
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Errors raised while installing the tracing subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created
    #[error("failed to create log directory: {0}")]
    LogDirectory(#[from] io::Error),
    /// A global subscriber is already installed
    #[error("failed to initialize tracing subscriber: {0}")]
    Init(String),
}

/// Initialize logging for a tracelog component
///
/// # Arguments
/// * `component_name` - Name of the component (e.g., "tracelog")
/// * `enable_file_logging` - Also write logs to `$TMP/tracelog-logs/<component>`
pub fn init_logging(component_name: &str, enable_file_logging: bool) -> Result<(), LoggingError> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(true)
        .compact()
        .with_filter(env_filter_or(Level::WARN));

    if enable_file_logging {
        let log_dir = create_log_directory(component_name)?;

        let file_appender = rolling::daily(&log_dir, format!("{component_name}.log"));
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        // The guard flushes on drop; the subscriber lives for the whole process
        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(LocalTime::rfc_3339())
            .with_ansi(false)
            .with_writer(non_blocking_appender)
            .with_filter(env_filter_or(Level::DEBUG));

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;

        tracing::debug!(
            component = component_name,
            log_dir = %log_dir.display(),
            "Logging initialized with console and file output"
        );
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;

        tracing::debug!(component = component_name, "Logging initialized with console output only");
    }

    Ok(())
}

/// `RUST_LOG` if set and valid, `default` otherwise
fn env_filter_or(default: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default.as_str()))
}

/// Create log directory in system temp folder
fn create_log_directory(component_name: &str) -> Result<PathBuf, io::Error> {
    let log_dir = env::temp_dir().join("tracelog-logs").join(component_name);
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Initialize simple logging (console only, no fancy formatting)
///
/// # Arguments
/// * `level` - The default log level to use
pub fn init_simple_logging(level: Level) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter_or(level))
        .with_target(false)
        .with_test_writer()
        .compact()
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests - can be called multiple times without crashing
///
/// # Usage
/// ```rust
/// use tracelog_common::logging;
///
/// logging::ensure_test_logging(None);
/// tracing::info!("This will work safely in any test!");
/// ```
pub fn ensure_test_logging(default_level: Option<Level>) {
    TEST_LOGGING_INIT.call_once(|| {
        // Another subscriber may already be installed, which is fine for tests
        let _ = init_simple_logging(default_level.unwrap_or(Level::INFO));
    });
}
