//! Indexed course view
//!
//! Positions are assigned fresh every time a view is built, so the same
//! [`Course`] can be materialized repeatedly without carrying state between
//! runs.

use super::course::{Course, Lesson, Task};

/// Course with 1-based lesson and task positions
#[derive(Debug, Clone)]
pub struct IndexedCourse<'a> {
    pub course: &'a Course,
    pub lessons: Vec<IndexedLesson<'a>>,
}

/// Lesson at a 1-based position
#[derive(Debug, Clone)]
pub struct IndexedLesson<'a> {
    pub index: usize,
    pub lesson: &'a Lesson,
    pub tasks: Vec<IndexedTask<'a>>,
}

/// Task at a 1-based position inside the lesson at `lesson_index`
#[derive(Debug, Clone, Copy)]
pub struct IndexedTask<'a> {
    pub lesson_index: usize,
    pub index: usize,
    pub task: &'a Task,
}

impl<'a> IndexedCourse<'a> {
    pub fn new(course: &'a Course) -> Self {
        let lessons = course
            .lessons
            .iter()
            .enumerate()
            .map(|(i, lesson)| IndexedLesson::new(i + 1, lesson))
            .collect();

        Self { course, lessons }
    }

    /// Lesson at 1-based `index`
    pub fn lesson(&self, index: usize) -> Option<&IndexedLesson<'a>> {
        index.checked_sub(1).and_then(|i| self.lessons.get(i))
    }

    /// Task at 1-based `(lesson_index, task_index)`
    pub fn task(&self, lesson_index: usize, task_index: usize) -> Option<&IndexedTask<'a>> {
        self.lesson(lesson_index)?.task(task_index)
    }

    /// All tasks in lesson order
    pub fn tasks(&self) -> impl Iterator<Item = &IndexedTask<'a>> {
        self.lessons.iter().flat_map(|lesson| lesson.tasks.iter())
    }
}

impl<'a> IndexedLesson<'a> {
    fn new(index: usize, lesson: &'a Lesson) -> Self {
        let tasks = lesson
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| IndexedTask {
                lesson_index: index,
                index: i + 1,
                task,
            })
            .collect();

        Self { index, lesson, tasks }
    }

    /// Task at 1-based `index`
    pub fn task(&self, index: usize) -> Option<&IndexedTask<'a>> {
        index.checked_sub(1).and_then(|i| self.tasks.get(i))
    }
}
