//! coursegen utilities
//!
//! Helpers shared by the coursegen crates: path handling that mirrors how
//! course descriptors name their files, configuration loading in several
//! formats, and `tracing` subscriber setup.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod file;
pub mod logging;

/// Re-export commonly used utilities
pub use file::{base_name, ensure_dir, make_executable, normalize_path, safe_path_join};
pub use config::{load_config, ConfigBuilder};
pub use logging::{init_logging, LogLevel, LoggerConfig};

/// Result type used throughout coursegen utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path operation error
    #[error("Path operation error: {0}")]
    PathOperation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
