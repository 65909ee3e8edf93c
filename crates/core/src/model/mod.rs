mod course;
mod ids;
mod lesson;
pub mod content;

pub use content::{
    AnswerOutcome, AssetError, AssetRef, ContentDraft, ContentError, ContentKind, LessonContent,
    QuestionDraft, QuestionError, QuizError, QuizQuestion,
};
pub use ids::{CourseId, LearnerId, LessonId, ParseIdError};

pub use course::{Course, CourseDraft, CourseError, ValidatedCourse};
pub use lesson::{Lesson, LessonDraft, LessonError, ValidatedLesson};
