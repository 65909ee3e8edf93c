use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lms_core::model::content::{AssetRef, ContentDraft};
use lms_core::model::{
    Course, CourseId, LearnerId, Lesson, LessonDraft, LessonId, ValidatedCourse, ValidatedLesson,
};
use lms_core::progress::LearnerProgress;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Insert shape for a course row. The id is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewCourseRecord {
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub duration_hours: u32,
    pub is_published: bool,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
}

impl NewCourseRecord {
    /// Record for a freshly validated course. New courses start unpublished.
    #[must_use]
    pub fn from_validated(course: &ValidatedCourse) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            cover_image: course.cover_image.as_ref().map(|c| c.as_str().to_owned()),
            duration_hours: course.duration_hours,
            is_published: false,
            creator_name: course.creator_name.clone(),
            created_at: course.created_at,
        }
    }
}

/// Insert shape for a lesson row. The content travels as a tagged JSON
/// document next to its `content_type` discriminant column.
#[derive(Debug, Clone)]
pub struct NewLessonRecord {
    pub title: String,
    pub order_index: u32,
    pub duration_minutes: u32,
    pub content_type: String,
    pub content: String,
}

impl NewLessonRecord {
    /// Record for a validated lesson at the position the course assigned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the content document cannot
    /// be encoded.
    pub fn from_validated(
        lesson: &ValidatedLesson,
        order_index: u32,
    ) -> Result<Self, StorageError> {
        let content = serde_json::to_string(&lesson.content.to_draft())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Self {
            title: lesson.title.clone(),
            order_index,
            duration_minutes: lesson.duration_minutes,
            content_type: lesson.content.kind().as_str().to_owned(),
            content,
        })
    }
}

/// Persisted shape for a lesson.
///
/// Rehydration goes record to draft to validated entity, so a corrupt
/// document surfaces as a storage error instead of a half-valid lesson.
#[derive(Debug, Clone)]
pub struct LessonRecord {
    pub id: LessonId,
    pub title: String,
    pub order_index: u32,
    pub duration_minutes: u32,
    pub content_type: String,
    pub content: String,
}

impl LessonRecord {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the content document cannot
    /// be encoded.
    pub fn from_lesson(lesson: &Lesson) -> Result<Self, StorageError> {
        let content = serde_json::to_string(&lesson.content().to_draft())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Self {
            id: lesson.id(),
            title: lesson.title().to_owned(),
            order_index: lesson.order_index(),
            duration_minutes: lesson.duration_minutes(),
            content_type: lesson.content_kind().as_str().to_owned(),
            content,
        })
    }

    /// Convert the record back into a domain `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the document does not parse,
    /// does not match the stored `content_type`, or fails re-validation.
    pub fn into_lesson(self) -> Result<Lesson, StorageError> {
        let draft: ContentDraft = serde_json::from_str(&self.content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        if draft.kind().as_str() != self.content_type {
            return Err(StorageError::Serialization(format!(
                "content document is {} but stored type is {}",
                draft.kind(),
                self.content_type
            )));
        }

        let lesson = LessonDraft::new(self.title, self.duration_minutes, draft)
            .validate()
            .map_err(|e| StorageError::Serialization(e.to_string()))?
            .assign(self.id, self.order_index);
        Ok(lesson)
    }
}

/// Persisted shape for a course and its lesson rows.
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub duration_hours: u32,
    pub is_published: bool,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
    pub lessons: Vec<LessonRecord>,
}

impl CourseRecord {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any lesson content cannot
    /// be encoded.
    pub fn from_course(course: &Course) -> Result<Self, StorageError> {
        let lessons = course
            .lessons()
            .iter()
            .map(LessonRecord::from_lesson)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: course.id(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            cover_image: course.cover_image().map(|c| c.as_str().to_owned()),
            duration_hours: course.duration_hours(),
            is_published: course.is_published(),
            creator_name: course.creator_name().to_owned(),
            created_at: course.created_at(),
            lessons,
        })
    }

    /// Convert the record back into a domain `Course`, lessons in position
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if a lesson fails to decode or
    /// the assembled course violates its invariants.
    pub fn into_course(mut self) -> Result<Course, StorageError> {
        self.lessons.sort_by_key(|lesson| lesson.order_index);

        let cover_image = match self.cover_image {
            None => None,
            Some(raw) => Some(
                AssetRef::parse(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?,
            ),
        };
        let lessons = self
            .lessons
            .into_iter()
            .map(LessonRecord::into_lesson)
            .collect::<Result<Vec<_>, _>>()?;

        Course::from_persisted(
            self.id,
            self.title,
            self.description,
            cover_image,
            self.duration_hours,
            self.is_published,
            self.creator_name,
            self.created_at,
            lessons,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Persisted shape for a learner's progress on one course.
#[derive(Debug, Clone)]
pub struct ProgressRecord {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub completed_lessons: Vec<LessonId>,
    pub started_at: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &LearnerProgress) -> Self {
        Self {
            learner_id: progress.learner_id(),
            course_id: progress.course_id(),
            completed_lessons: progress.completed_lessons().iter().copied().collect(),
            started_at: progress.started_at(),
        }
    }

    #[must_use]
    pub fn into_progress(self) -> LearnerProgress {
        let completed: BTreeSet<LessonId> = self.completed_lessons.into_iter().collect();
        LearnerProgress::from_persisted(
            self.learner_id,
            self.course_id,
            completed,
            self.started_at,
        )
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for courses and their lessons.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course and assign its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn insert_new_course(&self, record: NewCourseRecord) -> Result<CourseId, StorageError>;

    /// Persist a new lesson row under an existing course and assign its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist, or
    /// other storage errors.
    async fn insert_new_lesson(
        &self,
        course_id: CourseId,
        record: NewLessonRecord,
    ) -> Result<LessonId, StorageError>;

    /// Persist the current state of an existing course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn update_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course with its lessons in position order.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError>;

    /// List courses, newest first, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError>;

    /// List published courses, newest first, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_published(&self, limit: u32) -> Result<Vec<Course>, StorageError>;
}

/// Store contract for learner progress records.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch one learner's record for one course.
    ///
    /// Returns `Ok(None)` when the learner has not started the course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_progress(
        &self,
        learner_id: LearnerId,
        course_id: CourseId,
    ) -> Result<Option<LearnerProgress>, StorageError>;

    /// Insert or replace a progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(&self, progress: &LearnerProgress) -> Result<(), StorageError>;

    /// All records for a learner, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<LearnerProgress>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and embedding.
///
/// Rows are held in their persisted record shape and decoded on every read,
/// the same path a durable backend would take.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, CourseRecord>>>,
    progress: Arc<Mutex<HashMap<(LearnerId, CourseId), ProgressRecord>>>,
    next_course_id: Arc<Mutex<u64>>,
    next_lesson_id: Arc<Mutex<u64>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(counter: &Mutex<u64>) -> Result<u64, StorageError> {
        let mut guard = counter
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard += 1;
        Ok(*guard)
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_new_course(&self, record: NewCourseRecord) -> Result<CourseId, StorageError> {
        let id = CourseId::new(Self::next_id(&self.next_course_id)?);
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            id,
            CourseRecord {
                id,
                title: record.title,
                description: record.description,
                cover_image: record.cover_image,
                duration_hours: record.duration_hours,
                is_published: record.is_published,
                creator_name: record.creator_name,
                created_at: record.created_at,
                lessons: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn insert_new_lesson(
        &self,
        course_id: CourseId,
        record: NewLessonRecord,
    ) -> Result<LessonId, StorageError> {
        let id = LessonId::new(Self::next_id(&self.next_lesson_id)?);
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let course = guard.get_mut(&course_id).ok_or(StorageError::NotFound)?;
        course.lessons.push(LessonRecord {
            id,
            title: record.title,
            order_index: record.order_index,
            duration_minutes: record.duration_minutes,
            content_type: record.content_type,
            content: record.content,
        });
        Ok(id)
    }

    async fn update_course(&self, course: &Course) -> Result<(), StorageError> {
        let record = CourseRecord::from_course(course)?;
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if !guard.contains_key(&course.id()) {
            return Err(StorageError::NotFound);
        }
        guard.insert(course.id(), record);
        Ok(())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let record = {
            let guard = self
                .courses
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.get(&id).cloned()
        };
        record.map(CourseRecord::into_course).transpose()
    }

    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError> {
        let mut records: Vec<CourseRecord> = {
            let guard = self
                .courses
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.values().cloned().collect()
        };
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.value().cmp(&a.id.value()))
        });
        records.truncate(limit as usize);
        records.into_iter().map(CourseRecord::into_course).collect()
    }

    async fn list_published(&self, limit: u32) -> Result<Vec<Course>, StorageError> {
        let mut records: Vec<CourseRecord> = {
            let guard = self
                .courses
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.values().filter(|r| r.is_published).cloned().collect()
        };
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.value().cmp(&a.id.value()))
        });
        records.truncate(limit as usize);
        records.into_iter().map(CourseRecord::into_course).collect()
    }
}

#[async_trait]
impl ProgressStore for InMemoryRepository {
    async fn get_progress(
        &self,
        learner_id: LearnerId,
        course_id: CourseId,
    ) -> Result<Option<LearnerProgress>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&(learner_id, course_id))
            .cloned()
            .map(ProgressRecord::into_progress))
    }

    async fn upsert_progress(&self, progress: &LearnerProgress) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            (progress.learner_id(), progress.course_id()),
            ProgressRecord::from_progress(progress),
        );
        Ok(())
    }

    async fn list_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<LearnerProgress>, StorageError> {
        let mut records: Vec<ProgressRecord> = {
            let guard = self
                .progress
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard
                .values()
                .filter(|r| r.learner_id == learner_id)
                .cloned()
                .collect()
        };
        records.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| b.course_id.value().cmp(&a.course_id.value()))
        });
        Ok(records
            .into_iter()
            .map(ProgressRecord::into_progress)
            .collect())
    }
}

/// Aggregates course and progress stores behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressStore> = Arc::new(repo);
        Self { courses, progress }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lms_core::model::content::{ContentKind, QuestionDraft};
    use lms_core::model::CourseDraft;
    use lms_core::time::fixed_now;

    fn build_validated(title: &str, created_at: DateTime<Utc>) -> ValidatedCourse {
        CourseDraft::new(title, "about", 6)
            .validate(created_at, "Dana Admin")
            .unwrap()
    }

    fn text_lesson(title: &str) -> ValidatedLesson {
        LessonDraft::new(title, 15, ContentDraft::text("body"))
            .validate()
            .unwrap()
    }

    fn quiz_lesson(title: &str) -> ValidatedLesson {
        let questions = vec![QuestionDraft::new(
            "2 + 2?",
            vec!["3".into(), "4".into()],
            1,
        )];
        LessonDraft::new(title, 5, ContentDraft::quiz(questions))
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn course_round_trips_with_lessons() {
        let repo = InMemoryRepository::new();
        let course_id = repo
            .insert_new_course(NewCourseRecord::from_validated(&build_validated(
                "Rust",
                fixed_now(),
            )))
            .await
            .unwrap();

        let first = text_lesson("Intro");
        let second = quiz_lesson("Check yourself");
        repo.insert_new_lesson(course_id, NewLessonRecord::from_validated(&first, 1).unwrap())
            .await
            .unwrap();
        repo.insert_new_lesson(course_id, NewLessonRecord::from_validated(&second, 2).unwrap())
            .await
            .unwrap();

        let course = repo.get_course(course_id).await.unwrap().unwrap();
        assert_eq!(course.title(), "Rust");
        assert_eq!(course.total_lessons(), 2);
        assert_eq!(course.lessons()[0].order_index(), 1);
        assert_eq!(course.lessons()[0].content_kind(), ContentKind::Text);
        assert_eq!(course.lessons()[1].content_kind(), ContentKind::Quiz);

        let quiz = course.lessons()[1].content().as_quiz().unwrap();
        assert_eq!(quiz[0].correct_index(), 1);
        assert_eq!(quiz[0].options().len(), 2);
    }

    #[tokio::test]
    async fn course_and_lesson_ids_are_sequential() {
        let repo = InMemoryRepository::new();
        let a = repo
            .insert_new_course(NewCourseRecord::from_validated(&build_validated(
                "A",
                fixed_now(),
            )))
            .await
            .unwrap();
        let b = repo
            .insert_new_course(NewCourseRecord::from_validated(&build_validated(
                "B",
                fixed_now(),
            )))
            .await
            .unwrap();
        assert_eq!(a, CourseId::new(1));
        assert_eq!(b, CourseId::new(2));

        let l1 = repo
            .insert_new_lesson(a, NewLessonRecord::from_validated(&text_lesson("1"), 1).unwrap())
            .await
            .unwrap();
        let l2 = repo
            .insert_new_lesson(b, NewLessonRecord::from_validated(&text_lesson("2"), 1).unwrap())
            .await
            .unwrap();
        assert_eq!(l1, LessonId::new(1));
        assert_eq!(l2, LessonId::new(2));
    }

    #[tokio::test]
    async fn lesson_insert_requires_an_existing_course() {
        let repo = InMemoryRepository::new();
        let err = repo
            .insert_new_lesson(
                CourseId::new(404),
                NewLessonRecord::from_validated(&text_lesson("x"), 1).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn update_requires_an_existing_course() {
        let repo = InMemoryRepository::new();
        let course = build_validated("Ghost", fixed_now()).assign_id(CourseId::new(9));
        let err = repo.update_course(&course).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn listing_orders_newest_first_and_respects_publication() {
        let repo = InMemoryRepository::new();
        let older = repo
            .insert_new_course(NewCourseRecord::from_validated(&build_validated(
                "Older",
                fixed_now(),
            )))
            .await
            .unwrap();
        let newer = repo
            .insert_new_course(NewCourseRecord::from_validated(&build_validated(
                "Newer",
                fixed_now() + Duration::hours(1),
            )))
            .await
            .unwrap();

        let all = repo.list_courses(10).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), newer);
        assert_eq!(all[1].id(), older);

        let mut published = repo.get_course(older).await.unwrap().unwrap();
        published.set_published(true);
        repo.update_course(&published).await.unwrap();

        let visible = repo.list_published(10).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id(), older);
    }

    #[tokio::test]
    async fn progress_round_trips() {
        let repo = InMemoryRepository::new();
        let mut progress =
            LearnerProgress::start(LearnerId::new(7), CourseId::new(1), fixed_now());
        let course = {
            let course_id = repo
                .insert_new_course(NewCourseRecord::from_validated(&build_validated(
                    "Rust",
                    fixed_now(),
                )))
                .await
                .unwrap();
            repo.insert_new_lesson(
                course_id,
                NewLessonRecord::from_validated(&text_lesson("Intro"), 1).unwrap(),
            )
            .await
            .unwrap();
            repo.get_course(course_id).await.unwrap().unwrap()
        };
        progress
            .record_completion(&course, course.lessons()[0].id())
            .unwrap();

        repo.upsert_progress(&progress).await.unwrap();
        let fetched = repo
            .get_progress(LearnerId::new(7), CourseId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, progress);

        let absent = repo
            .get_progress(LearnerId::new(8), CourseId::new(1))
            .await
            .unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn learner_records_list_most_recent_first() {
        let repo = InMemoryRepository::new();
        let learner = LearnerId::new(7);
        let earlier = LearnerProgress::start(learner, CourseId::new(1), fixed_now());
        let later = LearnerProgress::start(
            learner,
            CourseId::new(2),
            fixed_now() + Duration::days(1),
        );
        let other = LearnerProgress::start(LearnerId::new(8), CourseId::new(1), fixed_now());

        repo.upsert_progress(&earlier).await.unwrap();
        repo.upsert_progress(&later).await.unwrap();
        repo.upsert_progress(&other).await.unwrap();

        let records = repo.list_for_learner(learner).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].course_id(), CourseId::new(2));
        assert_eq!(records[1].course_id(), CourseId::new(1));
    }

    #[test]
    fn garbage_content_document_fails_to_decode() {
        let record = LessonRecord {
            id: LessonId::new(1),
            title: "Broken".into(),
            order_index: 1,
            duration_minutes: 5,
            content_type: "text".into(),
            content: "not json".into(),
        };
        let err = record.into_lesson().unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn mismatched_content_type_fails_to_decode() {
        let record = LessonRecord {
            id: LessonId::new(1),
            title: "Mismatch".into(),
            order_index: 1,
            duration_minutes: 5,
            content_type: "video".into(),
            content: r#"{"type":"text","body":"hi","images":[]}"#.into(),
        };
        let err = record.into_lesson().unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn content_document_wire_shape_is_stable() {
        let draft: ContentDraft = serde_json::from_str(
            r#"{"type":"quiz","questions":[{"prompt":"2+2?","options":["3","4"],"correct_index":1}]}"#,
        )
        .unwrap();
        assert_eq!(draft.kind().as_str(), "quiz");

        let video: ContentDraft =
            serde_json::from_str(r#"{"type":"video","video_ref":"https://v.example.com/1.mp4"}"#)
                .unwrap();
        assert_eq!(video.kind().as_str(), "video");
    }
}
