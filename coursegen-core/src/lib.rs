//! coursegen core - course model and project materialization
//!
//! This crate provides:
//! - the course / lesson / task model and its renumbered, indexed view
//! - storage backends (real filesystem and in-memory)
//! - the course materializer that lays a course out as directories and files
//! - resolution of filesystem entries back to lessons and tasks for deletion
//! - build-wrapper generation strategies and root build-script templates
//! - the project builder that runs all of the above in order

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions, // Often necessary for clarity
)]

pub mod config;
pub mod constants;
pub mod deletion;
pub mod materializer;
pub mod models;
pub mod project;
pub mod storage;
pub mod templates;
pub mod wrapper;

pub use config::{CourseGenConfig, DirectoryLayout, WrapperConfig};
pub use deletion::{CourseContext, DeleteLesson, DeleteStudyItem, DeleteTask, StudyItemRef};
pub use materializer::{CourseMaterializer, MaterializationReport};
pub use models::{Course, IndexedCourse, IndexedLesson, IndexedTask, Lesson, Task};
pub use project::{CourseProjectBuilder, ProjectReport};
pub use storage::{FsStorage, MemoryStorage, StorageBackend};
pub use wrapper::{WrapperGenerator, WrapperOutcome};

use std::path::PathBuf;

/// Result type used throughout coursegen core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for coursegen core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory or file already exists where one was about to be created
    #[error("Already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// Underlying storage operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Build-wrapper generation capability is not available in this environment
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Entry does not correspond to a course item, or the operation does not apply to it
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// External tool error
    #[error("External tool error: {tool}: {message}")]
    ExternalTool { tool: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] coursegen_utils::UtilError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error raised while touching `path`.
    ///
    /// `ErrorKind::AlreadyExists` becomes [`Error::AlreadyExists`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            Error::AlreadyExists { path }
        } else {
            Error::Io { path, source }
        }
    }

    /// Whether the error came from an existing target
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }
}

/// Host application flavour, which decides how the build wrapper is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum HostVariant {
    /// Full IDE with a Gradle installation available on the PATH
    #[default]
    Full,
    /// Cut-down IDE variant shipping a pre-built wrapper distribution
    CutDown,
}

impl std::fmt::Display for HostVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostVariant::Full => write!(f, "full"),
            HostVariant::CutDown => write!(f, "cut-down"),
        }
    }
}

impl std::str::FromStr for HostVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(HostVariant::Full),
            "cut-down" | "cutdown" | "studio" => Ok(HostVariant::CutDown),
            _ => Err(format!("Invalid host variant: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let exists = std::io::Error::from(std::io::ErrorKind::AlreadyExists);
        assert!(Error::io("/tmp/x", exists).is_already_exists());

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = Error::io("/tmp/x", denied);
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/tmp/x"));
    }

    #[test]
    fn test_host_variant_parsing() {
        assert_eq!("full".parse::<HostVariant>().unwrap(), HostVariant::Full);
        assert_eq!("Cut-Down".parse::<HostVariant>().unwrap(), HostVariant::CutDown);
        assert_eq!("studio".parse::<HostVariant>().unwrap(), HostVariant::CutDown);
        assert!("ide".parse::<HostVariant>().is_err());
        assert_eq!(HostVariant::CutDown.to_string(), "cut-down");
    }
}
