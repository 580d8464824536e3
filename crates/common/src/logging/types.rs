//! Configuration types for the logging subsystem.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::rolling::Rotation;

/// Configuration for the stdout/stderr logging layer
#[derive(Debug, Clone)]
pub struct StdoutConfig {
    /// Use JSON format instead of compact format
    pub json_format: bool,
    /// Write to stderr so command output on stdout stays machine-readable
    pub use_stderr: bool,
}

impl Default for StdoutConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            use_stderr: true,
        }
    }
}

/// Configuration for file-based logging with rotation
#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    /// Directory where log files will be written
    pub directory: PathBuf,
    /// Base filename prefix (e.g., "msig" -> "msig.log")
    pub file_name_prefix: String,
    /// Rotation strategy (daily, hourly, never)
    pub rotation: Rotation,
    /// Use JSON format for file logs (default: false, uses compact)
    pub json_format: bool,
}

impl FileLoggingConfig {
    pub fn new(directory: PathBuf, file_name_prefix: String) -> Self {
        Self {
            directory,
            file_name_prefix,
            rotation: Rotation::DAILY,
            json_format: false,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_json_format(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }
}

/// Main logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Name reported in the startup line
    pub service_name: String,
    /// Filter level used when `RUST_LOG` is unset
    pub default_level: Level,
    /// Stdout logging configuration
    pub stdout_config: StdoutConfig,
    /// File logging configuration (optional)
    pub file_logging_config: Option<FileLoggingConfig>,
}

impl LoggerConfig {
    /// Creates a new configuration with service name
    pub fn new(service_name: String) -> Self {
        Self {
            service_name,
            default_level: Level::INFO,
            stdout_config: StdoutConfig::default(),
            file_logging_config: None,
        }
    }

    /// Enable JSON logging format
    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.stdout_config.json_format = enabled;
        self
    }

    /// Enable file logging with configuration
    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file_logging_config = Some(config);
        self
    }

    /// Set the fallback filter level
    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new("(msig-service)".to_string())
    }
}
