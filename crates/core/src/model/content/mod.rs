pub mod asset;
pub mod content;
pub mod quiz;

pub use asset::{AssetError, AssetRef};

pub use content::{ContentDraft, ContentError, ContentKind, LessonContent};
pub use quiz::{AnswerOutcome, QuestionDraft, QuestionError, QuizError, QuizQuestion};
