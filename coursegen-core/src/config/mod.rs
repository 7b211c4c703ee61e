//! coursegen configuration
//!
//! Every section has a `Default` so a configuration file only needs to list
//! the values it changes; see [`CourseGenConfig::load`].

use crate::constants::{CourseNames, GradleNames};
use crate::HostVariant;
use coursegen_utils::{ConfigBuilder, LogLevel, LoggerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseGenConfig {
    /// Host flavour, selects the wrapper strategy
    pub host: HostVariant,
    /// Whether the course is being authored rather than studied
    pub creator_mode: bool,
    /// Directory naming used by the materializer and the deletion resolvers
    pub layout: DirectoryLayout,
    /// Build-wrapper generation settings
    pub wrapper: WrapperConfig,
    /// Root build-script templates
    pub templates: TemplateConfig,
    /// Logging settings for binaries
    pub logging: LoggingSection,
}

impl CourseGenConfig {
    /// Defaults, overlaid with `path` when given
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        Ok(ConfigBuilder::new().load_optional_file(path)?.build()?)
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("TOML serialization error: {}", e)))
    }
}

/// Directory naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryLayout {
    pub lesson_prefix: String,
    pub task_prefix: String,
    pub source_dir: String,
    pub test_dir: String,
    pub util_dir: String,
}

impl Default for DirectoryLayout {
    fn default() -> Self {
        Self {
            lesson_prefix: CourseNames::LESSON.to_string(),
            task_prefix: CourseNames::TASK.to_string(),
            source_dir: CourseNames::SOURCE.to_string(),
            test_dir: CourseNames::TEST.to_string(),
            util_dir: CourseNames::UTIL.to_string(),
        }
    }
}

impl DirectoryLayout {
    /// `lesson<index>`
    pub fn lesson_dir(&self, index: usize) -> String {
        format!("{}{}", self.lesson_prefix, index)
    }

    /// `task<index>`
    pub fn task_dir(&self, index: usize) -> String {
        format!("{}{}", self.task_prefix, index)
    }

    /// Substring a shared test path must contain to belong to a task:
    /// `lesson<N>/task<M>/`
    pub fn task_path_marker(&self, lesson_index: usize, task_index: usize) -> String {
        format!(
            "{}/{}/",
            self.lesson_dir(lesson_index),
            self.task_dir(task_index)
        )
    }

    /// Index encoded in a `lesson<N>` directory name
    pub fn parse_lesson_dir(&self, name: &str) -> Option<usize> {
        parse_indexed_name(name, &self.lesson_prefix)
    }

    /// Index encoded in a `task<M>` directory name
    pub fn parse_task_dir(&self, name: &str) -> Option<usize> {
        parse_indexed_name(name, &self.task_prefix)
    }
}

/// Accept `<prefix><digits>` with no leading zero, so that `lesson01` does
/// not alias `lesson1`.
fn parse_indexed_name(name: &str, prefix: &str) -> Option<usize> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Build-wrapper generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// Run wrapper generation at all
    pub enabled: bool,
    /// Gradle executable used by the full host variant
    pub gradle_command: String,
    /// Pre-built wrapper distribution used by the cut-down host variant
    pub bundled_dir: Option<PathBuf>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gradle_command: GradleNames::GRADLE_COMMAND.to_string(),
            bundled_dir: None,
        }
    }
}

/// Root build-script templates; `None` uses the built-in template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub build_gradle: Option<PathBuf>,
    pub settings_gradle: Option<PathBuf>,
}

/// Logging section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: LogLevel,
    pub colored: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            colored: true,
        }
    }
}

impl LoggingSection {
    /// Subscriber settings for this section, `verbosity` levels more verbose
    pub fn logger_config(&self, verbosity: u8) -> LoggerConfig {
        let level = (0..verbosity).fold(self.level, |level, _| level.more_verbose());
        LoggerConfig {
            level,
            colored_output: self.colored,
            ..LoggerConfig::default()
        }
    }
}
