//! Shared error types for the services crate.

use thiserror::Error;

use lms_core::model::{CourseError, CourseId, LessonError, LessonId, QuizError};
use lms_core::progress::ProgressError;
use storage::repository::StorageError;

use crate::session::AccessError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthoringService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error("course must be saved before lessons can be added")]
    CourseNotSaved,
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizAnswerError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("lesson {0} not found in course")]
    LessonNotFound(LessonId),
    #[error("lesson {0} is not a quiz")]
    NotQuiz(LessonId),
    #[error("question {index} does not exist in this quiz")]
    QuestionNotFound { index: usize },
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
