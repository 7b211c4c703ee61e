//! Deletion targets
//!
//! Maps filesystem entries below a course root back to the lessons and tasks
//! they were materialized from, and exposes "delete lesson" / "delete task"
//! actions on top of that lookup. Entries are matched by directory names
//! (`lesson<N>`, `task<M>`) against the renumbered course, so only the
//! layout the materializer writes is recognised.

use crate::config::DirectoryLayout;
use crate::models::{Course, Lesson, Task};
use crate::storage::StorageBackend;
use crate::Error;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Course plus where and how it is laid out on disk
#[derive(Debug, Clone)]
pub struct CourseContext {
    pub course: Course,
    pub root: PathBuf,
    pub layout: DirectoryLayout,
    /// Deletion is only offered while authoring a course
    pub creator_mode: bool,
}

impl CourseContext {
    pub fn new(course: Course, root: impl Into<PathBuf>) -> Self {
        Self {
            course,
            root: root.into(),
            layout: DirectoryLayout::default(),
            creator_mode: true,
        }
    }

    pub fn with_layout(mut self, layout: DirectoryLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_creator_mode(mut self, creator_mode: bool) -> Self {
        self.creator_mode = creator_mode;
        self
    }

    /// Path components of `entry` below the course root, if it is below it
    fn relative_components(&self, entry: &Path) -> Option<Vec<String>> {
        let relative = entry.strip_prefix(&self.root).ok()?;
        relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => name.to_str().map(str::to_string),
                _ => None,
            })
            .collect()
    }

    /// Resolve `entry` to a lesson, then to a task
    pub fn resolve(&self, entry: &Path) -> Option<StudyItemRef<'_>> {
        LessonResolver
            .resolve(self, entry)
            .or_else(|| TaskResolver.resolve(self, entry))
    }
}

/// Course item an entry resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StudyItemRef<'a> {
    Lesson {
        index: usize,
        #[serde(rename = "name", serialize_with = "serialize_lesson_name")]
        lesson: &'a Lesson,
    },
    Task {
        lesson_index: usize,
        index: usize,
        #[serde(rename = "name", serialize_with = "serialize_task_name")]
        task: &'a Task,
    },
}

fn serialize_lesson_name<S: serde::Serializer>(lesson: &&Lesson, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&lesson.name)
}

fn serialize_task_name<S: serde::Serializer>(task: &&Task, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&task.name)
}

impl StudyItemRef<'_> {
    /// Directory of the item below the course root
    pub fn path(&self, context: &CourseContext) -> PathBuf {
        let layout = &context.layout;
        match self {
            StudyItemRef::Lesson { index, .. } => context.root.join(layout.lesson_dir(*index)),
            StudyItemRef::Task {
                lesson_index,
                index,
                ..
            } => context
                .root
                .join(layout.lesson_dir(*lesson_index))
                .join(layout.task_dir(*index)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StudyItemRef::Lesson { lesson, .. } => &lesson.name,
            StudyItemRef::Task { task, .. } => &task.name,
        }
    }
}

impl std::fmt::Display for StudyItemRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyItemRef::Lesson { index, lesson } => {
                write!(f, "lesson {} '{}'", index, lesson.name)
            }
            StudyItemRef::Task {
                lesson_index,
                index,
                task,
            } => write!(f, "task {}.{} '{}'", lesson_index, index, task.name),
        }
    }
}

/// Finds the course item of one kind an entry stands for
pub trait StudyItemResolver {
    /// Human readable action title, e.g. "Delete Lesson"
    fn title(&self) -> &'static str;

    fn resolve<'c>(&self, context: &'c CourseContext, entry: &Path) -> Option<StudyItemRef<'c>>;
}

/// Lessons, by the name of their directory directly under the course root
#[derive(Debug, Clone, Copy, Default)]
pub struct LessonResolver;

impl StudyItemResolver for LessonResolver {
    fn title(&self) -> &'static str {
        "Delete Lesson"
    }

    fn resolve<'c>(&self, context: &'c CourseContext, entry: &Path) -> Option<StudyItemRef<'c>> {
        let components = context.relative_components(entry)?;
        let [dir_name] = components.as_slice() else {
            return None;
        };

        let index = context.layout.parse_lesson_dir(dir_name)?;
        let lesson = context.course.lessons.get(index - 1)?;
        Some(StudyItemRef::Lesson { index, lesson })
    }
}

/// Tasks, by any entry at or below a `lesson<N>/task<M>` directory
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskResolver;

impl StudyItemResolver for TaskResolver {
    fn title(&self) -> &'static str {
        "Delete Task"
    }

    fn resolve<'c>(&self, context: &'c CourseContext, entry: &Path) -> Option<StudyItemRef<'c>> {
        let components = context.relative_components(entry)?;
        let [lesson_dir, task_dir, ..] = components.as_slice() else {
            return None;
        };

        let lesson_index = context.layout.parse_lesson_dir(lesson_dir)?;
        let index = context.layout.parse_task_dir(task_dir)?;
        let task = context
            .course
            .lessons
            .get(lesson_index - 1)?
            .tasks
            .get(index - 1)?;

        Some(StudyItemRef::Task {
            lesson_index,
            index,
            task,
        })
    }
}

/// A delete action: a resolver plus the storage the item lives on.
///
/// Only availability and the removal itself live here; confirmation, undo
/// and updating the in-memory course are left to the caller.
#[derive(Debug, Clone)]
pub struct DeleteStudyItem<R, S> {
    resolver: R,
    storage: S,
}

/// Delete action for lessons
pub type DeleteLesson<S> = DeleteStudyItem<LessonResolver, S>;

/// Delete action for tasks
pub type DeleteTask<S> = DeleteStudyItem<TaskResolver, S>;

impl<S: StorageBackend> DeleteStudyItem<LessonResolver, S> {
    pub fn lesson(storage: S) -> Self {
        Self::new(LessonResolver, storage)
    }
}

impl<S: StorageBackend> DeleteStudyItem<TaskResolver, S> {
    pub fn task(storage: S) -> Self {
        Self::new(TaskResolver, storage)
    }
}

impl<R: StudyItemResolver, S: StorageBackend> DeleteStudyItem<R, S> {
    pub fn new(resolver: R, storage: S) -> Self {
        Self { resolver, storage }
    }

    pub fn title(&self) -> &'static str {
        self.resolver.title()
    }

    /// Item the action would delete, if it is available for `entry`
    pub fn target<'c>(&self, context: &'c CourseContext, entry: &Path) -> Option<StudyItemRef<'c>> {
        if !context.creator_mode {
            return None;
        }
        self.resolver.resolve(context, entry)
    }

    /// Whether the action should be offered for `entry`
    pub fn is_deletable(&self, context: &CourseContext, entry: &Path) -> bool {
        let deletable = self.target(context, entry).is_some();
        debug!(
            "{} for {}: {}",
            self.title(),
            entry.display(),
            if deletable { "available" } else { "unavailable" }
        );
        deletable
    }

    /// Remove `entry` itself, a file or a directory with everything below it.
    ///
    /// The resolved item only decides whether the action applies; siblings of
    /// `entry` inside the same task are kept.
    pub fn delete<'c>(&self, context: &'c CourseContext, entry: &Path) -> crate::Result<StudyItemRef<'c>> {
        let item = self.target(context, entry).ok_or_else(|| {
            Error::InvalidTarget(format!(
                "{}: {} is not a course item",
                self.title(),
                entry.display()
            ))
        })?;

        self.storage.remove(entry)?;
        info!("{}: removed {} of {}", self.title(), entry.display(), item);
        Ok(item)
    }
}
