//! Directory and file names
//!
//! Defaults for [`crate::DirectoryLayout`] plus the Gradle file names the
//! project builder writes or expects.

/// Names of course directories
#[derive(Debug, Clone, Copy)]
pub struct CourseNames;

impl CourseNames {
    pub const LESSON: &'static str = "lesson";      // Prefix of lesson<N> directories
    pub const TASK: &'static str = "task";          // Prefix of task<M> directories
    pub const SOURCE: &'static str = "source";      // Task source subdirectory
    pub const TEST: &'static str = "test";          // Task test subdirectory
    pub const UTIL: &'static str = "util";          // Shared utility directory at the root

    /// Marker looked for in additional-materials test paths
    pub const UTIL_MARKER: &'static str = "util";

    /// Default content of a freshly seeded course
    pub const DEFAULT_TASK_FILE: &'static str = "Task.java";
    pub const DEFAULT_TEST_FILE: &'static str = "Tests.java";
}

/// Names of Gradle build files
#[derive(Debug, Clone, Copy)]
pub struct GradleNames;

impl GradleNames {
    pub const BUILD_GRADLE: &'static str = "build.gradle";
    pub const SETTINGS_GRADLE: &'static str = "settings.gradle";
    pub const GRADLEW: &'static str = "gradlew";
    pub const GRADLE_COMMAND: &'static str = "gradle";
}
