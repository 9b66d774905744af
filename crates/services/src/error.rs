//! Shared error types for the services crate.

use thiserror::Error;

use gateway::GatewayError;

/// Errors emitted by the lesson acquisition controller and learning flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("no topic is selected")]
    NoTopicSelected,

    #[error("select a sub-topic before generating a lesson")]
    NoSubTopicSelected,

    #[error("follow-up question cannot be empty")]
    EmptyQuestion,

    #[error("generate a lesson before asking follow-up questions")]
    NoLesson,

    /// A newer generation request was started while this one was in flight;
    /// the stale response was discarded.
    #[error("superseded by a newer generation request")]
    Superseded,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,

    #[error("answer all questions before submitting ({answered}/{total})")]
    Incomplete { answered: usize, total: usize },

    #[error("quiz already submitted")]
    AlreadySubmitted,

    #[error("no quiz is available for this lesson")]
    NoQuiz,
}
