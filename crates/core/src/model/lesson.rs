use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{SubTopicId, TopicId};
use crate::model::quiz::Question;

/// Separator placed between explanation blocks when they are concatenated
/// into conversational context for a follow-up request.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

//
// ─── USER LEVEL ────────────────────────────────────────────────────────────────
//

/// Requested depth of a generated lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl UserLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Beginner => "beginner",
            UserLevel::Intermediate => "intermediate",
            UserLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── LESSON PAYLOAD ────────────────────────────────────────────────────────────
//

/// A worked code sample inside a lesson or follow-up block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub explanation: String,
}

/// The generated instructional payload for a (topic, sub-topic, level)
/// request.
///
/// Transient per-view state: re-selecting a sub-topic or re-invoking
/// generation discards the previous lesson entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub topic_id: TopicId,
    pub topic_title: String,
    pub explanation: String,
    pub key_points: Vec<String>,
    pub code_examples: Vec<CodeExample>,
    pub math_formulas: Vec<String>,
    pub quiz: Vec<Question>,
    pub further_reading: Vec<String>,
    pub model_used: Option<String>,
}

/// One renderable section of a lesson, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonSection {
    Explanation,
    /// Index into `Lesson::code_examples`.
    CodeExample(usize),
    Quiz,
}

impl Lesson {
    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }

    /// The ordered section list the learning view reveals: explanation first,
    /// then each code example, then the quiz when one was generated.
    #[must_use]
    pub fn sections(&self) -> Vec<LessonSection> {
        let mut sections = Vec::with_capacity(2 + self.code_examples.len());
        sections.push(LessonSection::Explanation);
        for idx in 0..self.code_examples.len() {
            sections.push(LessonSection::CodeExample(idx));
        }
        if self.has_quiz() {
            sections.push(LessonSection::Quiz);
        }
        sections
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        1 + self.code_examples.len() + usize::from(self.has_quiz())
    }

    /// Concatenates this lesson's explanation with all follow-up block
    /// explanations, in arrival order, as conversational context for the next
    /// follow-up request. This is the only memory passed to the backend.
    #[must_use]
    pub fn context_with(&self, blocks: &[AdditionalContext]) -> String {
        let mut parts = Vec::with_capacity(1 + blocks.len());
        parts.push(self.explanation.as_str());
        parts.extend(blocks.iter().map(|b| b.explanation.as_str()));
        parts.join(CONTEXT_SEPARATOR)
    }
}

/// Explanation and code examples returned from a follow-up question; appended
/// in arrival order, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdditionalContext {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub code_examples: Vec<CodeExample>,
}

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

/// Body of a lesson-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnRequest {
    pub user_level: UserLevel,
    pub focus_areas: Vec<String>,
    pub include_code: bool,
    pub include_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_topic_id: Option<SubTopicId>,
}

impl Default for LearnRequest {
    fn default() -> Self {
        Self {
            user_level: UserLevel::default(),
            focus_areas: Vec::new(),
            include_code: true,
            include_quiz: true,
            sub_topic_id: None,
        }
    }
}

impl LearnRequest {
    /// Request scoped to a specific sub-topic at the given level.
    #[must_use]
    pub fn for_sub_topic(sub_topic_id: SubTopicId, user_level: UserLevel) -> Self {
        Self {
            user_level,
            sub_topic_id: Some(sub_topic_id),
            ..Self::default()
        }
    }
}

/// A lesson previously generated for a topic and kept by the backend cache.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CachedLesson {
    pub id: u64,
    pub topic_id: TopicId,
    pub content_type: String,
    pub content_json: serde_json::Value,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
