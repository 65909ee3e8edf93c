use thiserror::Error;

use crate::model::content::{AssetError, ContentError, QuizError};
use crate::model::{CourseError, LessonError};
use crate::progress::ProgressError;

/// Aggregate error for callers that cross module boundaries, such as
/// doc examples and embedding code.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
