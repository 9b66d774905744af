use std::collections::BTreeMap;

use study_core::model::{Quiz, TopicId};

use crate::error::QuizError;

/// How a quiz option renders after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    Correct,
    IncorrectlySelected,
    Unselected,
}

/// One attempt at a delivered quiz.
///
/// Answers accumulate until `submit`; afterwards the answer set is frozen and
/// further selections are silently ignored. Scoring happens exactly once.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: BTreeMap<usize, usize>,
    submitted: bool,
    score: Option<u8>,
}

impl QuizSession {
    /// Start an attempt over `quiz`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the quiz has no questions.
    pub fn new(quiz: Quiz) -> Result<Self, QuizError> {
        if quiz.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            quiz,
            answers: BTreeMap::new(),
            submitted: false,
            score: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.quiz.topic_id()
    }

    /// Record (or replace) the answer for a question. A no-op once the quiz
    /// is submitted.
    ///
    /// # Panics
    ///
    /// Out-of-range indices are a programmer error, not recoverable user
    /// input: panics if `question` or `option` does not exist.
    pub fn select_answer(&mut self, question: usize, option: usize) {
        if self.submitted {
            return;
        }
        let total = self.quiz.len();
        assert!(question < total, "question index {question} out of range for {total} questions");
        let options = self.quiz.questions()[question].options().len();
        assert!(option < options, "option index {option} out of range for {options} options");
        self.answers.insert(question, option);
    }

    #[must_use]
    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Whether every question has an answer; the submit control stays
    /// disabled until this holds.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.quiz.len()
    }

    #[must_use]
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn score(&self) -> Option<u8> {
        self.score
    }

    /// Freeze the answer set and compute the percentage score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` on a second submission and
    /// `QuizError::Incomplete` while any question is unanswered.
    pub fn submit(&mut self) -> Result<u8, QuizError> {
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.is_complete() {
            return Err(QuizError::Incomplete {
                answered: self.answers.len(),
                total: self.quiz.len(),
            });
        }

        let correct = self
            .quiz
            .questions()
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.answers.get(index).copied() == Some(question.correct_index())
            })
            .count();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = ((correct as f64 / self.quiz.len() as f64) * 100.0).round() as u8;

        self.submitted = true;
        self.score = Some(score);
        Ok(score)
    }

    /// Classify one option for rendering. `None` before submission; after
    /// submission every option is exactly one of correct,
    /// incorrectly-selected, or unselected. Pure: never mutates state.
    #[must_use]
    pub fn option_status(&self, question: usize, option: usize) -> Option<OptionStatus> {
        if !self.submitted {
            return None;
        }
        let q = self.quiz.question(question)?;
        Some(if q.is_correct(option) {
            OptionStatus::Correct
        } else if self.answer(question) == Some(option) {
            OptionStatus::IncorrectlySelected
        } else {
            OptionStatus::Unselected
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::Question;

    fn three_question_quiz() -> Quiz {
        // correct_index = [2, 2, 2]
        let questions = (0..3)
            .map(|i| {
                Question::new(
                    format!("Question {i}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    2,
                    None,
                )
                .unwrap()
            })
            .collect();
        Quiz::new(TopicId::new(5), questions)
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = QuizSession::new(Quiz::new(TopicId::new(5), Vec::new())).unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[test]
    fn submit_requires_every_answer() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        session.select_answer(0, 2);
        assert!(!session.is_complete());
        assert_eq!(
            session.submit().unwrap_err(),
            QuizError::Incomplete {
                answered: 1,
                total: 3
            }
        );

        session.select_answer(1, 2);
        session.select_answer(2, 2);
        assert!(session.is_complete());
        assert_eq!(session.submit().unwrap(), 100);
    }

    #[test]
    fn all_incorrect_scores_zero() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        for i in 0..3 {
            session.select_answer(i, 0);
        }
        assert_eq!(session.submit().unwrap(), 0);
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        session.select_answer(0, 2);
        session.select_answer(1, 0);
        session.select_answer(2, 2);
        assert_eq!(session.submit().unwrap(), 67);
    }

    #[test]
    fn selection_after_submit_is_a_no_op() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        for i in 0..3 {
            session.select_answer(i, 2);
        }
        session.submit().unwrap();

        session.select_answer(1, 0);
        assert_eq!(session.answer(1), Some(2));
        assert_eq!(session.submit().unwrap_err(), QuizError::AlreadySubmitted);
        assert_eq!(session.score(), Some(100));
    }

    #[test]
    fn answers_can_be_changed_before_submit() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        session.select_answer(0, 1);
        session.select_answer(0, 2);
        assert_eq!(session.answer(0), Some(2));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn option_statuses_classify_every_option_after_submit() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        session.select_answer(0, 2);
        session.select_answer(1, 0);
        session.select_answer(2, 2);
        assert_eq!(session.option_status(1, 0), None);
        session.submit().unwrap();

        // Question 1 answered incorrectly with option 0.
        assert_eq!(session.option_status(1, 0), Some(OptionStatus::IncorrectlySelected));
        assert_eq!(session.option_status(1, 1), Some(OptionStatus::Unselected));
        assert_eq!(session.option_status(1, 2), Some(OptionStatus::Correct));
        // The keyed option is flagged correct on every question.
        for q in 0..3 {
            assert_eq!(session.option_status(q, 2), Some(OptionStatus::Correct));
        }
    }

    #[test]
    #[should_panic(expected = "question index")]
    fn out_of_range_question_is_a_programmer_error() {
        let mut session = QuizSession::new(three_question_quiz()).unwrap();
        session.select_answer(3, 0);
    }
}
