//! Data models module for coursegen core
//!
//! The course tree as read from a descriptor, and the renumbered view of it
//! that materialization and deletion work from.

pub mod course;
pub mod indexed;

pub use course::{Course, Lesson, Task};
pub use indexed::{IndexedCourse, IndexedLesson, IndexedTask};
