use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::TopicId;
use crate::model::lesson::UserLevel;

/// Number of questions requested when the caller does not say otherwise.
pub const DEFAULT_QUIZ_QUESTIONS: u32 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("correct index {index} out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A fixed-choice quiz question.
///
/// Immutable once delivered; construction enforces that `correct_index`
/// addresses one of the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: Option<String>,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, no options are given,
    /// or `correct_index` does not address an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                options: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_index,
            explanation,
        })
    }

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

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Whether the option at `index` is the keyed answer.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions generated for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    topic_id: TopicId,
    questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn new(topic_id: TopicId, questions: Vec<Question>) -> Self {
        Self {
            topic_id,
            questions,
        }
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

//
// ─── REQUEST ───────────────────────────────────────────────────────────────────
//

/// Requested difficulty for a standalone quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Easy,
    #[default]
    Intermediate,
    Hard,
}

/// Body of a standalone quiz-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizRequest {
    pub user_level: UserLevel,
    pub focus_areas: Vec<String>,
    pub num_questions: u32,
    pub difficulty: QuizDifficulty,
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self {
            user_level: UserLevel::default(),
            focus_areas: Vec::new(),
            num_questions: DEFAULT_QUIZ_QUESTIONS,
            difficulty: QuizDifficulty::default(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
