use std::sync::Arc;

use chrono::{DateTime, Utc};
use lms_core::model::content::AssetRef;
use lms_core::model::{CourseId, LessonId};
use lms_core::progress::{CompletionEvent, LearnerProgress, ProgressState};
use storage::repository::{CourseRepository, ProgressStore};

use crate::error::ProgressServiceError;
use crate::session::Session;
use crate::Clock;

/// A learner's standing on one course, as shown on the course page.
///
/// `started_at` is `None` for a course the learner has not touched; the
/// percentage then reads 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub percent: u8,
    pub started_at: Option<DateTime<Utc>>,
}

/// One row on the learner's progress overview page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressOverviewItem {
    pub course_id: CourseId,
    pub title: String,
    pub cover_image: Option<AssetRef>,
    pub percent: u8,
    pub started_at: DateTime<Utc>,
}

/// Orchestrates completion recording and progress reads for the acting
/// learner.
///
/// Percentages are recomputed from the completion set against the course's
/// current lesson sequence on every read; nothing derived is ever stored.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            clock,
            courses,
            progress,
        }
    }

    /// Record that the session's learner completed a lesson.
    ///
    /// The first interaction with a course creates its progress record,
    /// stamped with the clock's current time. Re-recording a completed
    /// lesson succeeds without changing anything. A failed call persists
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` for an unknown course.
    /// Returns `ProgressServiceError::Progress` if the lesson is not part
    /// of the course.
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn record_completion(
        &self,
        session: &Session,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<CompletionEvent, ProgressServiceError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(ProgressServiceError::CourseNotFound(course_id))?;

        let mut record = match self
            .progress
            .get_progress(session.learner_id(), course_id)
            .await?
        {
            Some(record) => record,
            None => LearnerProgress::start(session.learner_id(), course_id, self.clock.now()),
        };

        let event = record.record_completion(&course, lesson_id)?;
        self.progress.upsert_progress(&record).await?;
        Ok(event)
    }

    /// The learner's snapshot for a course. An untouched course reads as
    /// percent 0 with no start time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` for an unknown course.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn get_progress(
        &self,
        session: &Session,
        course_id: CourseId,
    ) -> Result<ProgressSnapshot, ProgressServiceError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(ProgressServiceError::CourseNotFound(course_id))?;

        let snapshot = match self
            .progress
            .get_progress(session.learner_id(), course_id)
            .await?
        {
            Some(record) => ProgressSnapshot {
                percent: record.percent(&course),
                started_at: Some(record.started_at()),
            },
            None => ProgressSnapshot {
                percent: 0,
                started_at: None,
            },
        };
        Ok(snapshot)
    }

    /// True when the learner has completed every lesson the course
    /// currently has.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` for an unknown course.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn is_complete(
        &self,
        session: &Session,
        course_id: CourseId,
    ) -> Result<bool, ProgressServiceError> {
        let snapshot = self.get_progress(session, course_id).await?;
        Ok(snapshot.percent == 100)
    }

    /// Where the learner stands on a course: not started, in progress, or
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` for an unknown course.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn course_state(
        &self,
        session: &Session,
        course_id: CourseId,
    ) -> Result<ProgressState, ProgressServiceError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(ProgressServiceError::CourseNotFound(course_id))?;

        let state = match self
            .progress
            .get_progress(session.learner_id(), course_id)
            .await?
        {
            Some(record) => record.state(&course),
            None => ProgressState::NotStarted,
        };
        Ok(state)
    }

    /// Overview rows for every course the learner has started, most
    /// recently started first. Records pointing at courses that no longer
    /// exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn list_progress(
        &self,
        session: &Session,
    ) -> Result<Vec<ProgressOverviewItem>, ProgressServiceError> {
        let records = self.progress.list_for_learner(session.learner_id()).await?;

        let mut items = Vec::with_capacity(records.len());
        for record in records {
            let Some(course) = self.courses.get_course(record.course_id()).await? else {
                continue;
            };
            items.push(ProgressOverviewItem {
                course_id: course.id(),
                title: course.title().to_owned(),
                cover_image: course.cover_image().cloned(),
                percent: record.percent(&course),
                started_at: record.started_at(),
            });
        }
        Ok(items)
    }
}
