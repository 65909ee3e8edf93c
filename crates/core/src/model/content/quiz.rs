use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Structural problems with an authored quiz question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("correct index {correct_index} is out of range for {options} option(s)")]
    CorrectIndexOutOfRange { correct_index: usize, options: usize },
}

/// Failures while evaluating a learner's answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("answer index {chosen} is out of range for {options} option(s)")]
    InvalidAnswerIndex { chosen: usize, options: usize },
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Author-entered question, exactly as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionDraft {
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options,
            correct_index,
        }
    }

    /// Checks the structural invariant and produces a usable question.
    ///
    /// A question with a single option is legal; only the correct index
    /// has to land inside the option list. An empty option list can never
    /// satisfy that, so it is rejected through the same check.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::CorrectIndexOutOfRange` if `correct_index`
    /// does not point at an existing option.
    pub fn validate(self) -> Result<QuizQuestion, QuestionError> {
        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                correct_index: self.correct_index,
                options: self.options.len(),
            });
        }

        Ok(QuizQuestion {
            prompt: self.prompt,
            options: self.options,
            correct_index: self.correct_index,
        })
    }
}

/// A validated quiz question whose correct index is known to be in bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

/// Verdict for a single answered question. Nothing is recorded anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

impl QuizQuestion {
    // Accessors
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Compares a chosen option against the correct one.
    ///
    /// Deterministic: the same question and the same index always produce
    /// the same outcome.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidAnswerIndex` if `chosen` does not point
    /// at an existing option.
    pub fn evaluate(&self, chosen: usize) -> Result<AnswerOutcome, QuizError> {
        if chosen >= self.options.len() {
            return Err(QuizError::InvalidAnswerIndex {
                chosen,
                options: self.options.len(),
            });
        }

        if chosen == self.correct_index {
            Ok(AnswerOutcome::Correct)
        } else {
            Ok(AnswerOutcome::Incorrect)
        }
    }

    /// Back to the wire shape, for persistence.
    #[must_use]
    pub fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            prompt: self.prompt.clone(),
            options: self.options.clone(),
            correct_index: self.correct_index,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
