//! Constants module for coursegen core
//!
//! Fixed names used when laying out a course on disk and when generating the
//! root Gradle project around it.

pub mod names;

pub use names::{CourseNames, GradleNames};
