//! Course project builder
//!
//! Creates a complete course project in an existing directory. Steps run in
//! a fixed order:
//!
//! 1. seed the first lesson and task (creator mode, empty course only)
//! 2. materialize the course tree
//! 3. write `build.gradle` and `settings.gradle`
//! 4. generate the build wrapper (best effort)
//! 5. make `gradlew` executable (best effort)
//!
//! Steps 2 and 3 abort on the first error; 4 and 5 only log.

use crate::config::CourseGenConfig;
use crate::materializer::{CourseMaterializer, MaterializationReport};
use crate::models::Course;
use crate::storage::StorageBackend;
use crate::templates::ProjectTemplates;
use crate::wrapper::{self, WrapperGenerator, WrapperOutcome};
use crate::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a project build produced
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub course_name: String,
    pub generated_at: DateTime<Utc>,
    /// The course was empty and received a first lesson
    pub seeded: bool,
    pub materialization: MaterializationReport,
    pub build_files: Vec<PathBuf>,
    pub wrapper: WrapperOutcome,
    pub wrapper_executable: bool,
}

/// Orchestrates materialization, templates and the build wrapper
pub struct CourseProjectBuilder<S> {
    materializer: CourseMaterializer<S>,
    templates: ProjectTemplates,
    wrapper: Option<Box<dyn WrapperGenerator>>,
    creator_mode: bool,
}

impl<S: StorageBackend> CourseProjectBuilder<S> {
    /// Builder configured from `config`; the wrapper strategy is fixed here
    pub fn from_config(storage: S, config: &CourseGenConfig) -> crate::Result<Self> {
        let wrapper = config
            .wrapper
            .enabled
            .then(|| wrapper::for_host(config.host, &config.wrapper));

        Ok(Self {
            materializer: CourseMaterializer::with_layout(storage, config.layout.clone()),
            templates: ProjectTemplates::from_config(&config.templates)?,
            wrapper,
            creator_mode: config.creator_mode,
        })
    }

    /// Replace the wrapper strategy, or disable it with `None`
    pub fn with_wrapper(mut self, wrapper: Option<Box<dyn WrapperGenerator>>) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Build the project for `course` in `root`, which must exist.
    ///
    /// The course is taken by value: in creator mode it may be seeded, and
    /// the returned course is the one that was written.
    pub fn build(&self, mut course: Course, root: &Path) -> crate::Result<(Course, ProjectReport)> {
        let storage = self.materializer.storage();
        if !storage.is_dir(root) {
            return Err(Error::InvalidTarget(format!(
                "destination {} is not an existing directory",
                root.display()
            )));
        }

        let seeded = self.creator_mode && course.seed_first_lesson();
        if seeded {
            info!("Seeded empty course '{}' with a first lesson", course.name);
        }

        let materialization = self.materializer.materialize(&course, root)?;

        let build_files = self.templates.write(
            storage,
            root,
            &course,
            self.materializer.layout(),
            materialization.util_dir.is_some(),
        )?;

        let wrapper = match &self.wrapper {
            Some(generator) => wrapper::generate_best_effort(generator.as_ref(), root),
            None => {
                info!("Build wrapper generation disabled");
                WrapperOutcome::Skipped
            }
        };
        let wrapper_executable = if wrapper.is_generated() {
            wrapper::mark_wrapper_executable(storage, root)
        } else {
            false
        };

        let report = ProjectReport {
            course_name: course.name.clone(),
            generated_at: Utc::now(),
            seeded,
            materialization,
            build_files,
            wrapper,
            wrapper_executable,
        };
        info!("Course project '{}' ready in {}", course.name, root.display());
        Ok((course, report))
    }
}
