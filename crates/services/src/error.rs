//! Shared error types for the services crate.

use thiserror::Error;

use compass_core::model::{CourseId, LessonId};
use storage::sqlite::SqliteInitError;

/// Errors emitted by the checked `ProgressManager` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrainingError {
    #[error("lesson {lesson_id} is not part of course {course_id}")]
    UnknownLesson {
        course_id: CourseId,
        lesson_id: LessonId,
    },
    #[error("course {0} has not been started")]
    NotStarted(CourseId),
    #[error("course {course_id} has {completed} of {total} lessons completed")]
    CourseIncomplete {
        course_id: CourseId,
        completed: usize,
        total: usize,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
