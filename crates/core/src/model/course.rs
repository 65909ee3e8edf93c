use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::content::{AssetError, AssetRef};
use crate::model::ids::{CourseId, LessonId};
use crate::model::lesson::Lesson;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("invalid cover image reference: {0}")]
    CoverRef(#[source] AssetError),

    #[error("lesson order must continue the sequence: expected {expected}, found {found}")]
    LessonOutOfOrder { expected: u32, found: u32 },
}

//
// ─── COURSE DRAFT (unvalidated input) ──────────────────────────────────────────
//

/// Author input for course metadata. Lessons are attached separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub duration_hours: u32,
}

impl CourseDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        duration_hours: u32,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            cover_image: None,
            duration_hours,
        }
    }

    #[must_use]
    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    /// Validates the metadata and stamps creation details.
    ///
    /// The creator name comes from the authoring session, not from the
    /// author-entered fields. An empty cover field counts as "no cover".
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is empty or
    /// whitespace-only, `CourseError::CoverRef` for an unusable cover
    /// reference.
    pub fn validate(
        self,
        now: DateTime<Utc>,
        creator_name: impl Into<String>,
    ) -> Result<ValidatedCourse, CourseError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let cover_image = match self.cover_image.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(AssetRef::parse(raw).map_err(CourseError::CoverRef)?),
        };

        Ok(ValidatedCourse {
            title,
            description: self.description.trim().to_owned(),
            cover_image,
            duration_hours: self.duration_hours,
            creator_name: creator_name.into().trim().to_owned(),
            created_at: now,
        })
    }
}

/// Course metadata that passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCourse {
    pub title: String,
    pub description: String,
    pub cover_image: Option<AssetRef>,
    pub duration_hours: u32,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
}

impl ValidatedCourse {
    /// Attaches the storage-assigned id. New courses start unpublished
    /// and without lessons.
    #[must_use]
    pub fn assign_id(self, id: CourseId) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            cover_image: self.cover_image,
            duration_hours: self.duration_hours,
            is_published: false,
            creator_name: self.creator_name,
            created_at: self.created_at,
            lessons: Vec::new(),
        }
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course: metadata, a publication flag, and an ordered lesson sequence.
///
/// The lesson sequence is append-only. Positions are 1-based, unique, and
/// strictly increasing; a new lesson always continues the sequence at
/// [`next_order_index`](Self::next_order_index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    cover_image: Option<AssetRef>,
    duration_hours: u32,
    is_published: bool,
    creator_name: String,
    created_at: DateTime<Utc>,
    lessons: Vec<Lesson>,
}

impl Course {
    /// Rebuilds a course from persisted parts, re-checking the invariants.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` for a blank stored title and
    /// `CourseError::LessonOutOfOrder` if the stored lesson positions do
    /// not strictly increase.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        cover_image: Option<AssetRef>,
        duration_hours: u32,
        is_published: bool,
        creator_name: impl Into<String>,
        created_at: DateTime<Utc>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let mut previous: Option<u32> = None;
        for lesson in &lessons {
            let found = lesson.order_index();
            if previous.is_some_and(|p| found <= p) || found == 0 {
                return Err(CourseError::LessonOutOfOrder {
                    expected: previous.map_or(1, |p| p + 1),
                    found,
                });
            }
            previous = Some(found);
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            cover_image,
            duration_hours,
            is_published,
            creator_name: creator_name.into(),
            created_at,
            lessons,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn cover_image(&self) -> Option<&AssetRef> {
        self.cover_image.as_ref()
    }

    #[must_use]
    pub fn duration_hours(&self) -> u32 {
        self.duration_hours
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.is_published
    }

    #[must_use]
    pub fn creator_name(&self) -> &str {
        &self.creator_name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Lessons in course order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn contains_lesson(&self, lesson_id: LessonId) -> bool {
        self.lessons.iter().any(|lesson| lesson.id() == lesson_id)
    }

    #[must_use]
    pub fn lesson(&self, lesson_id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == lesson_id)
    }

    pub fn lesson_ids(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.lessons.iter().map(Lesson::id)
    }

    /// The position the next lesson must take: one past the current end,
    /// `1` for a course without lessons.
    #[must_use]
    pub fn next_order_index(&self) -> u32 {
        self.lessons.last().map_or(0, Lesson::order_index) + 1
    }

    /// Appends a lesson at the end of the sequence.
    ///
    /// There is no reordering and no removal; the sequence only grows.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::LessonOutOfOrder` if the lesson's position
    /// does not continue the sequence.
    pub fn attach_lesson(&mut self, lesson: Lesson) -> Result<(), CourseError> {
        let expected = self.next_order_index();
        if lesson.order_index() != expected {
            return Err(CourseError::LessonOutOfOrder {
                expected,
                found: lesson.order_index(),
            });
        }
        self.lessons.push(lesson);
        Ok(())
    }

    /// Flips the publication flag. A course with zero lessons may be
    /// published; it simply has nothing to complete yet.
    pub fn set_published(&mut self, published: bool) {
        self.is_published = published;
    }

    /// Replaces the editable metadata, keeping identity, publication state,
    /// creator, creation time, and the lesson sequence.
    #[must_use]
    pub fn with_updated_metadata(mut self, meta: ValidatedCourse) -> Self {
        self.title = meta.title;
        self.description = meta.description;
        self.cover_image = meta.cover_image;
        self.duration_hours = meta.duration_hours;
        self
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
