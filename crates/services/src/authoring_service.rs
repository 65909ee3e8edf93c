use std::sync::Arc;

use lms_core::model::{Course, CourseDraft, CourseId, Lesson, LessonDraft};
use storage::repository::{CourseRepository, NewCourseRecord, NewLessonRecord};

use crate::error::AuthoringError;
use crate::session::Session;
use crate::Clock;

/// Orchestrates admin course authoring and persistence.
///
/// Every operation takes the acting session and refuses non-admins before
/// touching storage.
#[derive(Clone)]
pub struct AuthoringService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
}

impl AuthoringService {
    #[must_use]
    pub fn new(clock: Clock, courses: Arc<dyn CourseRepository>) -> Self {
        Self { clock, courses }
    }

    /// Create a course from a draft, or replace the metadata of a saved one.
    ///
    /// Without an id the draft becomes a new unpublished course; the creator
    /// name is stamped from the session and `created_at` from the clock.
    /// With an id the draft replaces the editable metadata while identity,
    /// publication state, creator, creation time, and the lesson sequence
    /// stay as they are.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Access` for a non-admin session.
    /// Returns `AuthoringError::Course` for validation failures.
    /// Returns `AuthoringError::CourseNotFound` for an unknown id.
    /// Returns `AuthoringError::Storage` if persistence fails.
    pub async fn save_course(
        &self,
        session: &Session,
        course_id: Option<CourseId>,
        draft: CourseDraft,
    ) -> Result<Course, AuthoringError> {
        session.require_admin()?;
        let now = self.clock.now();

        match course_id {
            None => {
                let validated = draft.validate(now, session.display_name())?;
                let id = self
                    .courses
                    .insert_new_course(NewCourseRecord::from_validated(&validated))
                    .await?;
                Ok(validated.assign_id(id))
            }
            Some(id) => {
                let course = self
                    .courses
                    .get_course(id)
                    .await?
                    .ok_or(AuthoringError::CourseNotFound(id))?;
                let meta = draft.validate(now, session.display_name())?;
                let updated = course.with_updated_metadata(meta);
                self.courses.update_course(&updated).await?;
                Ok(updated)
            }
        }
    }

    /// Validate a lesson draft and attach it at the end of a saved course.
    ///
    /// The position is assigned here, from the course's current sequence;
    /// callers never pick one.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Access` for a non-admin session.
    /// Returns `AuthoringError::CourseNotSaved` when the course has no id
    /// yet, which is how an unsaved editor state arrives here.
    /// Returns `AuthoringError::CourseNotFound` for an unknown id.
    /// Returns `AuthoringError::Lesson` for validation failures.
    /// Returns `AuthoringError::Storage` if persistence fails.
    pub async fn add_lesson(
        &self,
        session: &Session,
        course_id: Option<CourseId>,
        draft: LessonDraft,
    ) -> Result<Lesson, AuthoringError> {
        session.require_admin()?;
        let course_id = course_id.ok_or(AuthoringError::CourseNotSaved)?;
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(AuthoringError::CourseNotFound(course_id))?;

        let validated = draft.validate()?;
        let order_index = course.next_order_index();
        let lesson_id = self
            .courses
            .insert_new_lesson(
                course_id,
                NewLessonRecord::from_validated(&validated, order_index)?,
            )
            .await?;
        Ok(validated.assign(lesson_id, order_index))
    }

    /// Flip a course's publication flag and persist it.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Access` for a non-admin session.
    /// Returns `AuthoringError::CourseNotFound` for an unknown id.
    /// Returns `AuthoringError::Storage` if persistence fails.
    pub async fn set_published(
        &self,
        session: &Session,
        course_id: CourseId,
        published: bool,
    ) -> Result<(), AuthoringError> {
        session.require_admin()?;
        let mut course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(AuthoringError::CourseNotFound(course_id))?;
        course.set_published(published);
        self.courses.update_course(&course).await?;
        Ok(())
    }
}
