//! Root build scripts
//!
//! `build.gradle` and `settings.gradle` are written next to the lesson
//! directories. Both are minijinja templates; the built-in ones can be
//! replaced through [`TemplateConfig`]. An unknown variable is an error.
//!
//! | variable | value |
//! |---|---|
//! | `course_name` | course name, quotes escaped |
//! | `source_dir` / `test_dir` | task subdirectory names |
//! | `util_dir` | utility directory name |
//! | `modules` | Gradle module paths (`lesson1:task1`, `util`) |
//! | `includes` | one `include` line per module |

use crate::config::{DirectoryLayout, TemplateConfig};
use crate::constants::GradleNames;
use crate::models::Course;
use crate::storage::StorageBackend;
use crate::Error;
use minijinja::{context, Environment, UndefinedBehavior};
use std::path::{Path, PathBuf};
use tracing::debug;

const BUILD_GRADLE: &str = r"subprojects {
    apply plugin: 'java'

    repositories {
        mavenCentral()
    }

    sourceSets {
        main.java.srcDirs = ['{{ source_dir }}']
        test.java.srcDirs = ['{{ test_dir }}']
    }

    dependencies {
        testCompile 'junit:junit:4.12'
    }

    if (project.name != '{{ util_dir }}' && rootProject.findProject(':{{ util_dir }}') != null) {
        dependencies {
            compile project(':{{ util_dir }}')
        }
    }
}

if (rootProject.findProject(':{{ util_dir }}') != null) {
    project(':{{ util_dir }}') {
        sourceSets {
            main.java.srcDirs = ['.']
        }
    }
}
";

const SETTINGS_GRADLE: &str = "rootProject.name = '{{ course_name }}'\n\n\
{% for module in modules %}include ':{{ module }}'\n{% endfor %}";

/// Loaded build-script templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTemplates {
    build_gradle: String,
    settings_gradle: String,
}

impl Default for ProjectTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProjectTemplates {
    pub fn builtin() -> Self {
        Self {
            build_gradle: BUILD_GRADLE.to_string(),
            settings_gradle: SETTINGS_GRADLE.to_string(),
        }
    }

    /// Built-in templates, with any configured template files read over them
    pub fn from_config(config: &TemplateConfig) -> crate::Result<Self> {
        let mut templates = Self::builtin();
        if let Some(path) = &config.build_gradle {
            templates.build_gradle = read_template(path)?;
        }
        if let Some(path) = &config.settings_gradle {
            templates.settings_gradle = read_template(path)?;
        }

        // Syntax errors surface here, before anything is written
        let env = environment();
        for template in [&templates.build_gradle, &templates.settings_gradle] {
            env.template_from_str(template).map_err(template_error)?;
        }
        Ok(templates)
    }

    /// Gradle module paths for every task, plus the utility module
    pub fn module_paths(course: &Course, layout: &DirectoryLayout, has_util: bool) -> Vec<String> {
        let indexed = course.indexed();
        let mut modules: Vec<String> = indexed
            .tasks()
            .map(|task| {
                format!(
                    "{}:{}",
                    layout.lesson_dir(task.lesson_index),
                    layout.task_dir(task.index)
                )
            })
            .collect();
        if has_util {
            modules.push(layout.util_dir.clone());
        }
        modules
    }

    pub fn render_build(&self, layout: &DirectoryLayout) -> crate::Result<String> {
        render(
            &self.build_gradle,
            context! {
                source_dir => &layout.source_dir,
                test_dir => &layout.test_dir,
                util_dir => &layout.util_dir,
            },
        )
    }

    pub fn render_settings(&self, course: &Course, modules: &[String]) -> crate::Result<String> {
        let includes: String = modules
            .iter()
            .map(|module| format!("include ':{}'\n", module))
            .collect();
        let name = course.name.replace('\\', "\\\\").replace('\'', "\\'");
        render(
            &self.settings_gradle,
            context! {
                course_name => name,
                modules => modules,
                includes => includes,
            },
        )
    }

    /// Write both scripts into `root`; fails if either already exists
    pub fn write<S: StorageBackend>(
        &self,
        storage: &S,
        root: &Path,
        course: &Course,
        layout: &DirectoryLayout,
        has_util: bool,
    ) -> crate::Result<Vec<PathBuf>> {
        let modules = Self::module_paths(course, layout, has_util);
        let build_text = self.render_build(layout)?;
        let settings_text = self.render_settings(course, &modules)?;

        let build = storage.create_file(root, GradleNames::BUILD_GRADLE, build_text.as_bytes())?;
        let settings = storage.create_file(root, GradleNames::SETTINGS_GRADLE, settings_text.as_bytes())?;
        debug!("wrote {} and {}", build.display(), settings.display());
        Ok(vec![build, settings])
    }
}

fn read_template(path: &Path) -> crate::Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

fn render(template: &str, ctx: minijinja::Value) -> crate::Result<String> {
    environment().render_str(template, ctx).map_err(template_error)
}

fn template_error(e: minijinja::Error) -> Error {
    Error::Config(format!("template error: {}", e))
}
