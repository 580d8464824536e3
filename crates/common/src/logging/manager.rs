//! Logging initialization and shutdown management.

use std::io;

use tracing::*;
use tracing_appender::{non_blocking::WorkerGuard, rolling::RollingFileAppender};
use tracing_subscriber::{
    EnvFilter, Layer, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt,
};

use super::types::LoggerConfig;

/// Keeps the non-blocking file writer alive. Dropping it flushes buffered lines.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops the file writer"]
pub struct LoggingGuard {
    file_guard: Option<WorkerGuard>,
}

pub(crate) fn build_filter(config: &LoggerConfig) -> EnvFilter {
    // RUST_LOG still overrides the default directive.
    EnvFilter::builder()
        .with_default_directive(config.default_level.into())
        .from_env_lossy()
}

/// Initializes the logging subsystem with the provided config.
///
/// Installs the global subscriber; a second call in the same process is ignored.
pub fn init(config: LoggerConfig) -> LoggingGuard {
    let filt = build_filter(&config);
    let stdout = &config.stdout_config;

    let stdout_sub = match (stdout.json_format, stdout.use_stderr) {
        (true, true) => layer()
            .json()
            .with_writer(io::stderr)
            .with_filter(filt.clone())
            .boxed(),
        (true, false) => layer()
            .json()
            .with_filter(filt.clone())
            .boxed(),
        (false, true) => layer()
            .compact()
            .with_writer(io::stderr)
            .with_filter(filt.clone())
            .boxed(),
        (false, false) => layer()
            .compact()
            .with_filter(filt.clone())
            .boxed(),
    };

    let mut guard = LoggingGuard::default();

    // Build optional file logging layer
    let file_layer = config.file_logging_config.as_ref().map(|file_config| {
        let file_appender = RollingFileAppender::new(
            file_config.rotation.clone(),
            &file_config.directory,
            &file_config.file_name_prefix,
        );
        let (writer, worker) = tracing_appender::non_blocking(file_appender);
        guard.file_guard = Some(worker);

        if file_config.json_format {
            layer()
                .json()
                .with_writer(writer)
                .with_ansi(false) // No color codes in files
                .with_filter(filt.clone())
                .boxed()
        } else {
            layer()
                .compact()
                .with_writer(writer)
                .with_ansi(false) // No color codes in files
                .with_filter(filt.clone())
                .boxed()
        }
    });

    let installed = tracing_subscriber::registry()
        .with(stdout_sub)
        .with(file_layer)
        .try_init();

    if installed.is_ok() {
        debug!(
            service_name = %config.service_name,
            file_logging = config.file_logging_config.is_some(),
            "logging initialized"
        );
    }

    guard
}

/// Shuts down the logging subsystem, flushing any buffered file output.
pub fn finalize(guard: LoggingGuard) {
    debug!("shutting down logging");
    drop(guard);
}
