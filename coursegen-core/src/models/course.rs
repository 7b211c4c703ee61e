//! Course Model
//!
//! Course descriptors are plain serde documents (JSON, YAML or TOML). Field
//! names also accept the camelCase spelling used by exported course archives.

use crate::constants::CourseNames;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::indexed::IndexedCourse;

/// Top-level course: ordered lessons plus optional shared materials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    /// Display name of the course
    pub name: String,
    /// Lessons in presentation order
    pub lessons: Vec<Lesson>,
    /// Course-wide bag of shared source and test files
    #[serde(alias = "additionalMaterialsTask", skip_serializing_if = "Option::is_none")]
    pub additional_materials: Option<Task>,
}

/// Ordered collection of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lesson {
    pub name: String,
    /// Stored position; never trusted, see [`Course::indexed`]
    pub index: usize,
    #[serde(alias = "taskList")]
    pub tasks: Vec<Task>,
}

/// A unit of exercise content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub name: String,
    /// Stored position; never trusted, see [`Course::indexed`]
    pub index: usize,
    /// File name to content
    #[serde(alias = "taskFiles")]
    pub task_files: BTreeMap<String, String>,
    /// File path to content
    #[serde(alias = "testsText")]
    pub test_files: BTreeMap<String, String>,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Read a course descriptor; format follows the file extension
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        Ok(coursegen_utils::load_config(path)?)
    }

    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    pub fn with_additional_materials(mut self, materials: Task) -> Self {
        self.additional_materials = Some(materials);
        self
    }

    /// Renumbered view: lessons and tasks get 1-based positions in sequence
    /// order, whatever their stored `index` says.
    pub fn indexed(&self) -> IndexedCourse<'_> {
        IndexedCourse::new(self)
    }

    /// Total number of tasks across all lessons
    pub fn task_count(&self) -> usize {
        self.lessons.iter().map(|lesson| lesson.tasks.len()).sum()
    }

    /// A course being authored starts with one lesson holding one task.
    ///
    /// Returns `true` when the course was empty and has been seeded.
    pub fn seed_first_lesson(&mut self) -> bool {
        if !self.lessons.is_empty() {
            return false;
        }

        let task = Task::new("task1")
            .with_file(CourseNames::DEFAULT_TASK_FILE, "public class Task {\n}\n")
            .with_test(
                CourseNames::DEFAULT_TEST_FILE,
                "import org.junit.Test;\n\npublic class Tests {\n    @Test\n    public void testSolution() {\n    }\n}\n",
            );
        self.lessons.push(Lesson::new("lesson1").with_task(task));
        true
    }
}

impl Lesson {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.task_files.insert(name.into(), content.into());
        self
    }

    pub fn with_test(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.test_files.insert(path.into(), content.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_descriptor_aliases() -> crate::Result<()> {
        let json = r#"{
            "name": "Kotlin Koans",
            "lessons": [
                {
                    "name": "Introduction",
                    "index": 7,
                    "taskList": [
                        {
                            "name": "Hello",
                            "taskFiles": {"Task.kt": "fun start() = \"OK\""},
                            "testsText": {"tests/Tests.kt": "class Tests"}
                        }
                    ]
                }
            ],
            "additionalMaterialsTask": {
                "taskFiles": {"Util.kt": "object Util"}
            }
        }"#;

        let course: Course = serde_json::from_str(json)?;
        assert_eq!(course.lessons.len(), 1);
        assert_eq!(course.lessons[0].index, 7);
        assert_eq!(course.lessons[0].tasks[0].task_files.len(), 1);
        assert!(course.lessons[0].tasks[0].test_files.contains_key("tests/Tests.kt"));
        assert!(course.additional_materials.is_some());

        Ok(())
    }

    #[test]
    fn test_from_yaml_file() -> crate::Result<()> {
        let temp_dir = tempdir().map_err(coursegen_utils::UtilError::from)?;
        let path = temp_dir.path().join("course.yaml");
        std::fs::write(
            &path,
            r#"
name: Android basics
lessons:
  - name: Views
    tasks:
      - name: Layouts
        task_files:
          Main.kt: "fun main() {}"
  - name: Empty
"#,
        )
        .map_err(coursegen_utils::UtilError::from)?;

        let course = Course::from_file(&path)?;
        assert_eq!(course.name, "Android basics");
        assert_eq!(course.lessons.len(), 2);
        assert_eq!(course.task_count(), 1);
        assert!(course.additional_materials.is_none());

        Ok(())
    }

    #[test]
    fn test_seed_first_lesson() {
        let mut course = Course::new("New course");
        assert!(course.seed_first_lesson());
        assert_eq!(course.lessons.len(), 1);
        assert_eq!(course.task_count(), 1);

        let task = &course.lessons[0].tasks[0];
        assert!(task.task_files.contains_key(CourseNames::DEFAULT_TASK_FILE));
        assert!(task.test_files.contains_key(CourseNames::DEFAULT_TEST_FILE));

        assert!(!course.seed_first_lesson());
        assert_eq!(course.lessons.len(), 1);
    }
}
