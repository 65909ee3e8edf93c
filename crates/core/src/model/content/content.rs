use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::content::asset::{AssetError, AssetRef};
use crate::model::content::quiz::{QuestionDraft, QuestionError, QuizQuestion};

//
// ─── CONTENT VALIDATION ERRORS ─────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("invalid video reference: {0}")]
    VideoRef(#[source] AssetError),

    #[error("invalid image reference at position {position}: {source}")]
    Image {
        position: usize,
        #[source]
        source: AssetError,
    },

    #[error("a quiz needs at least one question")]
    EmptyQuiz,

    #[error("invalid question at position {position}: {source}")]
    Question {
        position: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── CONTENT KIND ──────────────────────────────────────────────────────────────
//

/// Discriminant of a lesson's content, as stored in the `content_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Video,
    Quiz,
}

impl ContentKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Video => "video",
            ContentKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CONTENT DRAFT (unvalidated input) ─────────────────────────────────────────
//

/// Author-entered lesson content, one variant per kind.
///
/// This is the wire shape: the serialized form carries a `type` tag next to
/// the variant's own fields, so a stored document reads back into exactly
/// one kind or fails to parse at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDraft {
    Text {
        #[serde(default)]
        body: String,
        #[serde(default)]
        images: Vec<String>,
    },
    Video {
        video_ref: String,
        #[serde(default)]
        description: String,
    },
    Quiz {
        questions: Vec<QuestionDraft>,
    },
}

impl ContentDraft {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text {
            body: body.into(),
            images: Vec::new(),
        }
    }

    pub fn text_with_images(body: impl Into<String>, images: Vec<String>) -> Self {
        Self::Text {
            body: body.into(),
            images,
        }
    }

    pub fn video(video_ref: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Video {
            video_ref: video_ref.into(),
            description: description.into(),
        }
    }

    pub fn quiz(questions: Vec<QuestionDraft>) -> Self {
        Self::Quiz { questions }
    }

    /// The empty editor state for a kind.
    ///
    /// Switching an editor between kinds starts from this, so data from the
    /// previous kind cannot leak into the new one. The video and quiz
    /// defaults intentionally do not pass [`validate`](Self::validate); they
    /// are starting points, not publishable content.
    #[must_use]
    pub fn default_for(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Text => Self::Text {
                body: String::new(),
                images: Vec::new(),
            },
            ContentKind::Video => Self::Video {
                video_ref: String::new(),
                description: String::new(),
            },
            ContentKind::Quiz => Self::Quiz {
                questions: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentDraft::Text { .. } => ContentKind::Text,
            ContentDraft::Video { .. } => ContentKind::Video,
            ContentDraft::Quiz { .. } => ContentKind::Quiz,
        }
    }

    /// Checks the structural rules and produces validated content.
    ///
    /// An empty text body passes: text lessons are saveable as drafts.
    /// Unusual but well-formed data never fails here.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` naming the violated part: a bad video or
    /// image reference, a quiz without questions, or a question whose
    /// correct index misses its options.
    pub fn validate(self) -> Result<LessonContent, ContentError> {
        match self {
            ContentDraft::Text { body, images } => {
                let mut parsed = Vec::with_capacity(images.len());
                for (position, image) in images.into_iter().enumerate() {
                    let asset = AssetRef::parse(image)
                        .map_err(|source| ContentError::Image { position, source })?;
                    parsed.push(asset);
                }
                Ok(LessonContent::Text {
                    body,
                    images: parsed,
                })
            }
            ContentDraft::Video {
                video_ref,
                description,
            } => {
                let video_ref = AssetRef::parse(video_ref).map_err(ContentError::VideoRef)?;
                Ok(LessonContent::Video {
                    video_ref,
                    description,
                })
            }
            ContentDraft::Quiz { questions } => {
                if questions.is_empty() {
                    return Err(ContentError::EmptyQuiz);
                }
                let mut validated = Vec::with_capacity(questions.len());
                for (position, question) in questions.into_iter().enumerate() {
                    let question = question
                        .validate()
                        .map_err(|source| ContentError::Question { position, source })?;
                    validated.push(question);
                }
                Ok(LessonContent::Quiz {
                    questions: validated,
                })
            }
        }
    }
}

//
// ─── VALIDATED CONTENT ─────────────────────────────────────────────────────────
//

/// Lesson content that passed structural validation. Exactly one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    Text {
        body: String,
        images: Vec<AssetRef>,
    },
    Video {
        video_ref: AssetRef,
        description: String,
    },
    Quiz {
        questions: Vec<QuizQuestion>,
    },
}

impl LessonContent {
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            LessonContent::Text { .. } => ContentKind::Text,
            LessonContent::Video { .. } => ContentKind::Video,
            LessonContent::Quiz { .. } => ContentKind::Quiz,
        }
    }

    /// The question list, when this is quiz content.
    #[must_use]
    pub fn as_quiz(&self) -> Option<&[QuizQuestion]> {
        match self {
            LessonContent::Quiz { questions } => Some(questions),
            _ => None,
        }
    }

    /// Back to the wire shape, for persistence.
    #[must_use]
    pub fn to_draft(&self) -> ContentDraft {
        match self {
            LessonContent::Text { body, images } => ContentDraft::Text {
                body: body.clone(),
                images: images.iter().map(|image| image.as_str().to_owned()).collect(),
            },
            LessonContent::Video {
                video_ref,
                description,
            } => ContentDraft::Video {
                video_ref: video_ref.as_str().to_owned(),
                description: description.clone(),
            },
            LessonContent::Quiz { questions } => ContentDraft::Quiz {
                questions: questions.iter().map(QuizQuestion::to_draft).collect(),
            },
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_body_passes() {
        let content = ContentDraft::text("").validate().unwrap();
        assert_eq!(content.kind(), ContentKind::Text);
    }

    #[test]
    fn text_with_bad_image_names_the_position() {
        let draft = ContentDraft::text_with_images(
            "Ownership",
            vec!["images/a.png".into(), "   ".into()],
        );
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            ContentError::Image {
                position: 1,
                source: AssetError::EmptyAssetRef
            }
        );
    }

    #[test]
    fn video_requires_a_reference() {
        let err = ContentDraft::video("", "intro").validate().unwrap_err();
        assert_eq!(err, ContentError::VideoRef(AssetError::EmptyAssetRef));
    }

    #[test]
    fn video_with_url_passes() {
        let content = ContentDraft::video("https://videos.example.com/intro.mp4", "Welcome")
            .validate()
            .unwrap();
        assert_eq!(content.kind(), ContentKind::Video);
    }

    #[test]
    fn quiz_needs_at_least_one_question() {
        let err = ContentDraft::quiz(vec![]).validate().unwrap_err();
        assert_eq!(err, ContentError::EmptyQuiz);
    }

    #[test]
    fn quiz_with_bad_correct_index_names_the_question() {
        let draft = ContentDraft::quiz(vec![
            QuestionDraft::new("ok", vec!["a".into(), "b".into()], 1),
            QuestionDraft::new("bad", vec!["a".into(), "b".into()], 2),
        ]);
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, ContentError::Question { position: 1, .. }));
    }

    #[test]
    fn default_for_matches_each_kind() {
        for kind in [ContentKind::Text, ContentKind::Video, ContentKind::Quiz] {
            assert_eq!(ContentDraft::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn default_text_is_publishable_but_video_and_quiz_are_not() {
        assert!(ContentDraft::default_for(ContentKind::Text).validate().is_ok());
        assert!(ContentDraft::default_for(ContentKind::Video).validate().is_err());
        assert!(ContentDraft::default_for(ContentKind::Quiz).validate().is_err());
    }

    #[test]
    fn validated_content_round_trips_through_draft() {
        let drafts = vec![
            ContentDraft::text_with_images("Borrowing", vec!["images/stack.png".into()]),
            ContentDraft::video("https://videos.example.com/1.mp4", "Watch this first"),
            ContentDraft::quiz(vec![QuestionDraft::new(
                "What does `mut` mean?",
                vec!["mutable".into(), "muted".into()],
                0,
            )]),
        ];

        for draft in drafts {
            let content = draft.clone().validate().unwrap();
            assert_eq!(content.to_draft(), draft);
        }
    }
}
