//! Build-wrapper generation
//!
//! Two strategies produce the Gradle wrapper next to a materialized course:
//! running `gradle wrapper` where a Gradle installation is available, or
//! copying a pre-built wrapper distribution for the cut-down host variant.
//! The strategy is picked from configuration when the project builder is
//! constructed. Generation is best effort: failures are logged and reported,
//! never propagated.

use crate::config::WrapperConfig;
use crate::constants::GradleNames;
use crate::storage::StorageBackend;
use crate::{Error, HostVariant};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Produces the build wrapper in a project root
pub trait WrapperGenerator {
    fn name(&self) -> &'static str;

    fn generate(&self, root: &Path) -> crate::Result<()>;
}

/// Strategy for `variant`
pub fn for_host(variant: HostVariant, config: &WrapperConfig) -> Box<dyn WrapperGenerator> {
    match variant {
        HostVariant::Full => Box::new(GradleCommandWrapper::new(&config.gradle_command)),
        HostVariant::CutDown => Box::new(BundledWrapper::new(config.bundled_dir.clone())),
    }
}

/// Runs `<gradle> wrapper` inside the project root
#[derive(Debug, Clone)]
pub struct GradleCommandWrapper {
    command: String,
}

impl GradleCommandWrapper {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn locate(&self) -> crate::Result<PathBuf> {
        which::which(&self.command).map_err(|e| {
            Error::CapabilityUnavailable(format!("{} not found: {}", self.command, e))
        })
    }
}

impl WrapperGenerator for GradleCommandWrapper {
    fn name(&self) -> &'static str {
        "gradle-command"
    }

    fn generate(&self, root: &Path) -> crate::Result<()> {
        let gradle = self.locate()?;
        debug!("Running {} wrapper in {}", gradle.display(), root.display());

        let output = Command::new(&gradle)
            .arg("wrapper")
            .current_dir(root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::io(&gradle, e))?;

        if !output.status.success() {
            return Err(Error::ExternalTool {
                tool: self.command.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Copies a pre-built wrapper distribution into the project root
#[derive(Debug, Clone)]
pub struct BundledWrapper {
    source: Option<PathBuf>,
}

impl BundledWrapper {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }

    fn source_dir(&self) -> crate::Result<&Path> {
        let source = self.source.as_deref().ok_or_else(|| {
            Error::CapabilityUnavailable("no bundled wrapper directory configured".to_string())
        })?;
        if !source.is_dir() {
            return Err(Error::CapabilityUnavailable(format!(
                "bundled wrapper directory {} does not exist",
                source.display()
            )));
        }
        Ok(source)
    }
}

impl WrapperGenerator for BundledWrapper {
    fn name(&self) -> &'static str {
        "bundled"
    }

    fn generate(&self, root: &Path) -> crate::Result<()> {
        let source = self.source_dir()?;

        for entry in WalkDir::new(source).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source).to_path_buf();
                match e.into_io_error() {
                    Some(io) => Error::io(path, io),
                    None => Error::InvalidTarget(format!("filesystem loop at {}", path.display())),
                }
            })?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| Error::InvalidTarget(e.to_string()))?;
            let target = coursegen_utils::safe_path_join(root, relative)?;

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            } else {
                std::fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
                debug!("copied {}", target.display());
            }
        }
        Ok(())
    }
}

/// Result of a best-effort wrapper run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WrapperOutcome {
    Generated { generator: String },
    Skipped,
    Failed { generator: String, reason: String },
}

impl WrapperOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, WrapperOutcome::Generated { .. })
    }
}

/// Run `generator`, logging and swallowing any failure
pub fn generate_best_effort(generator: &dyn WrapperGenerator, root: &Path) -> WrapperOutcome {
    match generator.generate(root) {
        Ok(()) => {
            info!("Generated build wrapper with {}", generator.name());
            WrapperOutcome::Generated {
                generator: generator.name().to_string(),
            }
        }
        Err(e) => {
            error!("Failed to generate build wrapper ({}): {}", generator.name(), e);
            WrapperOutcome::Failed {
                generator: generator.name().to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Make `<root>/gradlew` executable through `storage` when it exists.
///
/// Returns whether the script is present and executable afterwards.
pub fn mark_wrapper_executable<S: StorageBackend>(storage: &S, root: &Path) -> bool {
    let gradlew = root.join(GradleNames::GRADLEW);
    if !storage.exists(&gradlew) || storage.is_dir(&gradlew) {
        debug!("No {} in {}", GradleNames::GRADLEW, root.display());
        return false;
    }

    match storage.set_executable(&gradlew) {
        Ok(()) => true,
        Err(e) => {
            warn!("Unable to make {} executable: {}", gradlew.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FsStorage, MemoryStorage};
    use tempfile::tempdir;

    struct FailingWrapper;

    impl WrapperGenerator for FailingWrapper {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn generate(&self, _root: &Path) -> crate::Result<()> {
            Err(Error::CapabilityUnavailable("not here".to_string()))
        }
    }

    #[test]
    fn test_missing_gradle_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let wrapper = GradleCommandWrapper::new("coursegen-no-such-gradle-binary");

        let result = wrapper.generate(temp_dir.path());
        assert!(matches!(result, Err(Error::CapabilityUnavailable(_))));
        Ok(())
    }

    #[test]
    fn test_bundled_without_source_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;

        let unset = BundledWrapper::new(None).generate(temp_dir.path());
        assert!(matches!(unset, Err(Error::CapabilityUnavailable(_))));

        let missing = BundledWrapper::new(Some(temp_dir.path().join("nope"))).generate(temp_dir.path());
        assert!(matches!(missing, Err(Error::CapabilityUnavailable(_))));
        Ok(())
    }

    #[test]
    fn test_bundled_copies_distribution() -> Result<(), Box<dyn std::error::Error>> {
        let dist = tempdir()?;
        std::fs::write(dist.path().join("gradlew"), "#!/bin/sh\n")?;
        std::fs::write(dist.path().join("gradlew.bat"), "@echo off\r\n")?;
        std::fs::create_dir_all(dist.path().join("gradle/wrapper"))?;
        std::fs::write(
            dist.path().join("gradle/wrapper/gradle-wrapper.properties"),
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-4.1-all.zip\n",
        )?;

        let project = tempdir()?;
        let wrapper = for_host(
            HostVariant::CutDown,
            &WrapperConfig {
                bundled_dir: Some(dist.path().to_path_buf()),
                ..WrapperConfig::default()
            },
        );
        assert_eq!(wrapper.name(), "bundled");

        let outcome = generate_best_effort(wrapper.as_ref(), project.path());
        assert!(outcome.is_generated());
        assert!(project.path().join("gradlew").is_file());
        assert!(project.path().join("gradlew.bat").is_file());
        assert!(project
            .path()
            .join("gradle/wrapper/gradle-wrapper.properties")
            .is_file());
        Ok(())
    }

    #[test]
    fn test_best_effort_swallows_errors() {
        let outcome = generate_best_effort(&FailingWrapper, Path::new("/nowhere"));
        assert_eq!(
            outcome,
            WrapperOutcome::Failed {
                generator: "failing".to_string(),
                reason: "Capability unavailable: not here".to_string(),
            }
        );
    }

    #[test]
    fn test_for_host_full() {
        let wrapper = for_host(HostVariant::Full, &WrapperConfig::default());
        assert_eq!(wrapper.name(), "gradle-command");
    }

    #[test]
    fn test_mark_wrapper_executable() -> Result<(), Box<dyn std::error::Error>> {
        let project = tempdir()?;
        let storage = FsStorage::new();
        assert!(!mark_wrapper_executable(&storage, project.path()));

        std::fs::write(project.path().join("gradlew"), "#!/bin/sh\n")?;
        assert!(mark_wrapper_executable(&storage, project.path()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(project.path().join("gradlew"))?.permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
        Ok(())
    }

    #[test]
    fn test_mark_wrapper_executable_in_memory() {
        let storage = MemoryStorage::with_root("/course");
        let root = Path::new("/course");
        assert!(!mark_wrapper_executable(&storage, root));

        let gradlew = storage.create_file(root, "gradlew", b"#!/bin/sh\n").unwrap();
        assert!(mark_wrapper_executable(&storage, root));
        assert!(storage.is_executable(&gradlew));

        storage.deny_writes(gradlew.clone());
        assert!(!mark_wrapper_executable(&storage, root));
    }
}
