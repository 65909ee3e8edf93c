use thiserror::Error;

use crate::model::content::{ContentDraft, ContentError, ContentKind, LessonContent};
use crate::model::ids::LessonId;

//
// ─── LESSON VALIDATION ERRORS ──────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("invalid lesson content: {0}")]
    Content(#[from] ContentError),
}

//
// ─── LESSON TYPES ──────────────────────────────────────────────────────────────
//

/// Author input for a new lesson. The order index is assigned by the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    pub title: String,
    pub duration_minutes: u32,
    pub content: ContentDraft,
}

impl LessonDraft {
    pub fn new(
        title: impl Into<String>,
        duration_minutes: u32,
        content: ContentDraft,
    ) -> Self {
        Self {
            title: title.into(),
            duration_minutes,
            content,
        }
    }

    /// Validates the title and the content.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is empty or
    /// whitespace-only, `LessonError::Content` for content failures.
    pub fn validate(self) -> Result<ValidatedLesson, LessonError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }

        let content = self.content.validate()?;

        Ok(ValidatedLesson {
            title,
            duration_minutes: self.duration_minutes,
            content,
        })
    }
}

/// A lesson that passed validation but has no identity or position yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLesson {
    pub title: String,
    pub duration_minutes: u32,
    pub content: LessonContent,
}

impl ValidatedLesson {
    /// Attaches the storage-assigned id and the course-assigned position.
    #[must_use]
    pub fn assign(self, id: LessonId, order_index: u32) -> Lesson {
        Lesson {
            id,
            title: self.title,
            order_index,
            duration_minutes: self.duration_minutes,
            content: self.content,
        }
    }
}

/// A lesson inside a course: one unit of content at a fixed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    order_index: u32,
    duration_minutes: u32,
    content: LessonContent,
}

impl Lesson {
    // Accessors
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// 1-based position within the course.
    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    #[must_use]
    pub fn content_kind(&self) -> ContentKind {
        self.content.kind()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
