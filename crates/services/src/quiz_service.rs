use std::sync::Arc;

use lms_core::model::content::AnswerOutcome;
use lms_core::model::{CourseId, LessonId};
use storage::repository::CourseRepository;

use crate::error::QuizAnswerError;

/// Checks quiz answers against stored courses.
///
/// Stateless by design: a check reads the course, compares the chosen
/// option, and reports the verdict. No attempt history exists anywhere.
#[derive(Clone)]
pub struct QuizService {
    courses: Arc<dyn CourseRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Evaluate one answer to one question of a quiz lesson.
    ///
    /// # Errors
    ///
    /// Returns `QuizAnswerError::CourseNotFound` for an unknown course,
    /// `QuizAnswerError::LessonNotFound` for a lesson outside the course,
    /// `QuizAnswerError::NotQuiz` when the lesson holds other content,
    /// `QuizAnswerError::QuestionNotFound` for an index past the questions,
    /// `QuizAnswerError::Quiz` when the chosen option does not exist.
    /// Returns `QuizAnswerError::Storage` if repository access fails.
    pub async fn check_answer(
        &self,
        course_id: CourseId,
        lesson_id: LessonId,
        question_index: usize,
        chosen_index: usize,
    ) -> Result<AnswerOutcome, QuizAnswerError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(QuizAnswerError::CourseNotFound(course_id))?;
        let lesson = course
            .lesson(lesson_id)
            .ok_or(QuizAnswerError::LessonNotFound(lesson_id))?;
        let questions = lesson
            .content()
            .as_quiz()
            .ok_or(QuizAnswerError::NotQuiz(lesson_id))?;
        let question = questions
            .get(question_index)
            .ok_or(QuizAnswerError::QuestionNotFound {
                index: question_index,
            })?;

        let outcome = question.evaluate(chosen_index)?;
        Ok(outcome)
    }
}
