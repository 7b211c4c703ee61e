//! Course materialization
//!
//! Lays a [`Course`] out under a destination root:
//!
//! ```text
//! <root>/lesson<N>/task<M>/<source>/...   task files
//! <root>/lesson<N>/task<M>/<test>/...     resolved test files
//! <root>/<util>/...                       shared utility files
//! ```
//!
//! Every created entry is named after the last segment of its key; keys that
//! share a last segment within one directory produce a single file. The run
//! stops at the first failure and leaves whatever was already created in
//! place.

use crate::config::DirectoryLayout;
use crate::constants::CourseNames;
use crate::models::{Course, IndexedLesson, IndexedTask};
use crate::storage::StorageBackend;
use coursegen_utils::base_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything created by one materialization run, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializationReport {
    pub root: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub lesson_count: usize,
    pub task_count: usize,
    /// Utility directory, when one was created
    pub util_dir: Option<PathBuf>,
}

impl MaterializationReport {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }
}

/// Writes a course tree through a [`StorageBackend`]
#[derive(Debug, Clone)]
pub struct CourseMaterializer<S> {
    storage: S,
    layout: DirectoryLayout,
}

impl<S: StorageBackend> CourseMaterializer<S> {
    /// Materializer with the default directory layout
    pub fn new(storage: S) -> Self {
        Self::with_layout(storage, DirectoryLayout::default())
    }

    pub fn with_layout(storage: S, layout: DirectoryLayout) -> Self {
        Self { storage, layout }
    }

    pub fn layout(&self) -> &DirectoryLayout {
        &self.layout
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Create the lesson/task tree and the utility directory under `root`.
    ///
    /// `root` must already exist. Nothing is overwritten: an existing target
    /// aborts the run with [`crate::Error::AlreadyExists`].
    pub fn materialize(&self, course: &Course, root: &Path) -> crate::Result<MaterializationReport> {
        info!(
            "Materializing course '{}' ({} lessons) into {}",
            course.name,
            course.lessons.len(),
            root.display()
        );

        let mut report = MaterializationReport::new(root);
        let indexed = course.indexed();

        for lesson in &indexed.lessons {
            self.create_lesson(course, lesson, root, &mut report)?;
        }

        let util_files = utility_files(course);
        if !util_files.is_empty() {
            let util_dir = self.create_dir(root, &self.layout.util_dir, &mut report)?;
            for (name, content) in &util_files {
                self.create_file(&util_dir, name, content, &mut report)?;
            }
            report.util_dir = Some(util_dir);
        }

        info!(
            "Materialized {} lessons, {} tasks, {} files",
            report.lesson_count,
            report.task_count,
            report.files.len()
        );
        Ok(report)
    }

    fn create_lesson(
        &self,
        course: &Course,
        lesson: &IndexedLesson<'_>,
        root: &Path,
        report: &mut MaterializationReport,
    ) -> crate::Result<()> {
        let lesson_dir = self.create_dir(root, &self.layout.lesson_dir(lesson.index), report)?;
        info!(
            "Lesson {} '{}' -> {}",
            lesson.index,
            lesson.lesson.name,
            lesson_dir.display()
        );
        report.lesson_count += 1;

        for task in &lesson.tasks {
            self.create_task(course, task, &lesson_dir, report)?;
        }
        Ok(())
    }

    fn create_task(
        &self,
        course: &Course,
        task: &IndexedTask<'_>,
        lesson_dir: &Path,
        report: &mut MaterializationReport,
    ) -> crate::Result<()> {
        let task_dir = self.create_dir(lesson_dir, &self.layout.task_dir(task.index), report)?;
        let source_dir = self.create_dir(&task_dir, &self.layout.source_dir, report)?;
        let test_dir = self.create_dir(&task_dir, &self.layout.test_dir, report)?;

        for (name, content) in by_file_name(&task.task.task_files) {
            self.create_file(&source_dir, name, content, report)?;
        }

        for (name, content) in by_file_name(effective_test_files(course, task, &self.layout)) {
            self.create_file(&test_dir, name, content, report)?;
        }

        report.task_count += 1;
        Ok(())
    }

    fn create_dir(
        &self,
        parent: &Path,
        name: &str,
        report: &mut MaterializationReport,
    ) -> crate::Result<PathBuf> {
        let path = self.storage.create_directory(parent, name)?;
        report.directories.push(path.clone());
        Ok(path)
    }

    fn create_file(
        &self,
        parent: &Path,
        name: &str,
        content: &str,
        report: &mut MaterializationReport,
    ) -> crate::Result<()> {
        let path = self.storage.create_file(parent, name, content.as_bytes())?;
        debug!("wrote {}", path.display());
        report.files.push(path);
        Ok(())
    }
}

/// Test files a task is materialized with.
///
/// A task's own tests win. A task without tests borrows the shared test files
/// whose key contains `lesson<N>/task<M>/`; this is a plain substring match,
/// so `xlesson1/task1/` would match too.
pub fn effective_test_files<'a>(
    course: &'a Course,
    task: &IndexedTask<'a>,
    layout: &DirectoryLayout,
) -> Vec<(&'a String, &'a String)> {
    match &course.additional_materials {
        Some(materials) if task.task.test_files.is_empty() => {
            let marker = layout.task_path_marker(task.lesson_index, task.index);
            materials
                .test_files
                .iter()
                .filter(|(key, _)| key.contains(&marker))
                .collect()
        }
        _ => task.task.test_files.iter().collect(),
    }
}

/// Collapse descriptor keys onto their file names; the last key wins
fn by_file_name<'a>(
    files: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> BTreeMap<&'a str, &'a String> {
    let mut collapsed = BTreeMap::new();
    for (key, content) in files {
        if let Some(previous) = collapsed.insert(base_name(key), content) {
            debug!("{} replaces an earlier entry ({} bytes)", key, previous.len());
        }
    }
    collapsed
}

/// Utility directory content keyed by file name.
///
/// All shared task files plus the shared test files whose key contains
/// `util`. Keys that end in the same file name collapse into one entry; which
/// one survives is unspecified.
pub fn utility_files(course: &Course) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let Some(materials) = &course.additional_materials else {
        return files;
    };

    let task_files = materials.task_files.iter();
    let util_tests = materials
        .test_files
        .iter()
        .filter(|(key, _)| key.contains(CourseNames::UTIL_MARKER));

    for (key, content) in task_files.chain(util_tests) {
        files.insert(base_name(key).to_string(), content.clone());
    }
    files
}
