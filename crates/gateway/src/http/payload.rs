//! Wire payloads and their conversion into validated domain types.
//!
//! The backend's JSON is deserialized into these private shapes first so the
//! quiz invariants are checked in one place; a violating payload becomes
//! `GatewayError::InvalidPayload`, never a panic.

use serde::Deserialize;

use study_core::model::{CodeExample, Lesson, Question, Quiz, TopicId};

use crate::contract::GatewayError;

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionPayload {
    question: String,
    options: Vec<String>,
    correct_index: Option<usize>,
    #[serde(default)]
    explanation: Option<String>,
}

impl QuestionPayload {
    fn into_question(self) -> Result<Question, GatewayError> {
        let correct_index = self
            .correct_index
            .ok_or_else(|| GatewayError::InvalidPayload("question missing correct_index".into()))?;
        Question::new(self.question, self.options, correct_index, self.explanation)
            .map_err(|e| GatewayError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonPayload {
    topic_id: u64,
    #[serde(default)]
    topic_title: String,
    explanation: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    code_examples: Vec<CodeExample>,
    #[serde(default)]
    math_formulas: Vec<String>,
    #[serde(default)]
    quiz: Vec<QuestionPayload>,
    #[serde(default)]
    further_reading: Vec<String>,
    #[serde(default)]
    model_used: Option<String>,
}

impl LessonPayload {
    pub(crate) fn into_lesson(self) -> Result<Lesson, GatewayError> {
        let quiz = self
            .quiz
            .into_iter()
            .map(QuestionPayload::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Lesson {
            topic_id: TopicId::new(self.topic_id),
            topic_title: self.topic_title,
            explanation: self.explanation,
            key_points: self.key_points,
            code_examples: self.code_examples,
            math_formulas: self.math_formulas,
            quiz,
            further_reading: self.further_reading,
            model_used: self.model_used,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizPayload {
    #[serde(default)]
    topic_id: Option<u64>,
    #[serde(default)]
    questions: Vec<QuestionPayload>,
}

impl QuizPayload {
    /// `requested_topic` covers backends that omit the id in the body.
    pub(crate) fn into_quiz(self, requested_topic: TopicId) -> Result<Quiz, GatewayError> {
        let topic_id = self.topic_id.map_or(requested_topic, TopicId::new);
        let questions = self
            .questions
            .into_iter()
            .map(QuestionPayload::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Quiz::new(topic_id, questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_payload_validates_quiz_invariant() {
        let json = r#"{
            "topic_id": 5,
            "topic_title": "Gradient Descent",
            "explanation": "text",
            "quiz": [{"question": "Pick", "options": ["a", "b"], "correct_index": 5}]
        }"#;
        let payload: LessonPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_lesson().unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPayload(_)));
    }

    #[test]
    fn lesson_payload_tolerates_missing_optional_lists() {
        let json = r#"{"topic_id": 5, "explanation": "text"}"#;
        let payload: LessonPayload = serde_json::from_str(json).unwrap();
        let lesson = payload.into_lesson().unwrap();
        assert_eq!(lesson.topic_id, TopicId::new(5));
        assert!(lesson.quiz.is_empty());
        assert!(!lesson.has_quiz());
    }

    #[test]
    fn quiz_payload_falls_back_to_requested_topic() {
        let json = r#"{"questions": [{"question": "Pick", "options": ["a"], "correct_index": 0}]}"#;
        let payload: QuizPayload = serde_json::from_str(json).unwrap();
        let quiz = payload.into_quiz(TopicId::new(9)).unwrap();
        assert_eq!(quiz.topic_id(), TopicId::new(9));
        assert_eq!(quiz.len(), 1);
    }
}
