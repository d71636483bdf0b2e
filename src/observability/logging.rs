//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Console output, pretty or JSON
//! - Optional daily-rolling log file
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured filter
//! - File output never carries ANSI escapes

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, ObservabilityConfig};

/// Error type for logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    LogDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error(transparent)]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// for the life of the process.
pub fn init_logging(config: &ObservabilityConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|source| LoggingError::Filter {
            filter: config.log_filter.clone(),
            source,
        })?,
    };

    let console: BoxedLayer = match config.log_format {
        LogFormat::Pretty => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };
    let mut layers = vec![console];

    let guard = match &config.log_dir {
        Some(dir) => {
            ensure_log_dir(Path::new(dir))?;
            let appender = tracing_appender::rolling::daily(dir, &config.log_file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file: BoxedLayer = match config.log_format {
                LogFormat::Pretty => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
                LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
            };
            layers.push(file);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(guard)
}

/// Create the log directory if it does not exist.
pub fn ensure_log_dir(dir: &Path) -> Result<(), LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
        path: dir.display().to_string(),
        source,
    })
}
