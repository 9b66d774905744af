use std::sync::Arc;

use study_core::model::{AdditionalContext, Lesson, Quiz, SubTopicId, TopicId, UserLevel};

use crate::error::{LessonError, QuizError};
use crate::lesson_service::LessonService;
use crate::progress_service::{CompletionReport, ProgressService};
use crate::quiz_service::QuizSession;
use crate::reveal::{RevealPacing, RevealPresenter};

/// Result of a quiz submission.
///
/// The score is computed locally and is always present, even when the
/// completion report to the backend failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: u8,
    pub report: CompletionReport,
}

/// Per-view orchestration of the learning flow: lesson acquisition,
/// progressive reveal, follow-up questions, quiz scoring and completion
/// reporting.
///
/// All lesson state here is transient. Generating again, or opening another
/// topic, discards the previous lesson, its quiz answers and every appended
/// follow-up block: a full reset, never a merge.
pub struct LearnFlow {
    lessons: Arc<LessonService>,
    progress: Arc<ProgressService>,
    topic_id: Option<TopicId>,
    sub_topic_id: Option<SubTopicId>,
    level: UserLevel,
    focus_areas: Vec<String>,
    lesson: Option<Lesson>,
    additional: Vec<AdditionalContext>,
    follow_up: String,
    quiz: Option<QuizSession>,
    reveal: RevealPresenter,
    error: Option<String>,
    generating: bool,
    generating_more: bool,
}

impl LearnFlow {
    #[must_use]
    pub fn new(
        lessons: Arc<LessonService>,
        progress: Arc<ProgressService>,
        pacing: RevealPacing,
    ) -> Self {
        Self {
            lessons,
            progress,
            topic_id: None,
            sub_topic_id: None,
            level: UserLevel::default(),
            focus_areas: Vec::new(),
            lesson: None,
            additional: Vec::new(),
            follow_up: String::new(),
            quiz: None,
            reveal: RevealPresenter::new(pacing),
            error: None,
            generating: false,
            generating_more: false,
        }
    }

    //
    // ─── SELECTION ─────────────────────────────────────────────────────────
    //

    /// Point the view at a topic. Changing topics discards all lesson state.
    pub fn open_topic(&mut self, topic_id: TopicId) {
        if self.topic_id == Some(topic_id) {
            return;
        }
        self.topic_id = Some(topic_id);
        self.sub_topic_id = None;
        self.reset_lesson_state();
    }

    pub fn select_sub_topic(&mut self, sub_topic_id: SubTopicId) {
        self.sub_topic_id = Some(sub_topic_id);
    }

    pub fn set_level(&mut self, level: UserLevel) {
        self.level = level;
    }

    pub fn set_focus_areas(&mut self, focus_areas: Vec<String>) {
        self.focus_areas = focus_areas;
    }

    #[must_use]
    pub fn topic_id(&self) -> Option<TopicId> {
        self.topic_id
    }

    #[must_use]
    pub fn sub_topic_id(&self) -> Option<SubTopicId> {
        self.sub_topic_id
    }

    #[must_use]
    pub fn level(&self) -> UserLevel {
        self.level
    }

    //
    // ─── LESSON ACQUISITION ────────────────────────────────────────────────
    //

    /// Whether the generate control is enabled: a topic and sub-topic are
    /// selected and no generation is in flight.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.topic_id.is_some() && self.sub_topic_id.is_some() && !self.generating
    }

    /// Generate a lesson for the current selection, replacing all prior
    /// lesson, quiz and follow-up state.
    ///
    /// On failure the view holds no lesson and carries a user-visible error
    /// message; a superseded response leaves the newer request's state
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` on missing selection or gateway failure.
    pub async fn generate(&mut self) -> Result<(), LessonError> {
        let Some(topic_id) = self.topic_id else {
            return Err(LessonError::NoTopicSelected);
        };
        if self.sub_topic_id.is_none() {
            return Err(LessonError::NoSubTopicSelected);
        }

        self.reset_lesson_state();
        self.generating = true;
        let result = self
            .lessons
            .generate(
                topic_id,
                self.sub_topic_id,
                self.level,
                self.focus_areas.clone(),
            )
            .await;
        self.generating = false;

        match result {
            Ok(lesson) => {
                self.install_lesson(lesson);
                Ok(())
            }
            // A newer generate call owns the view now; keep its state.
            Err(LessonError::Superseded) => Ok(()),
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn install_lesson(&mut self, lesson: Lesson) {
        self.quiz = if lesson.has_quiz() {
            QuizSession::new(Quiz::new(lesson.topic_id, lesson.quiz.clone())).ok()
        } else {
            None
        };
        self.reveal.begin(lesson.section_count());
        self.lesson = Some(lesson);
    }

    fn reset_lesson_state(&mut self) {
        self.lesson = None;
        self.additional.clear();
        self.follow_up.clear();
        self.quiz = None;
        self.reveal.cancel();
        self.error = None;
    }

    #[must_use]
    pub fn lesson(&self) -> Option<&Lesson> {
        self.lesson.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    //
    // ─── FOLLOW-UP QUESTIONS ───────────────────────────────────────────────
    //

    pub fn set_follow_up(&mut self, question: impl Into<String>) {
        self.follow_up = question.into();
    }

    #[must_use]
    pub fn follow_up(&self) -> &str {
        &self.follow_up
    }

    #[must_use]
    pub fn additional_context(&self) -> &[AdditionalContext] {
        &self.additional
    }

    /// Send the pending follow-up question.
    ///
    /// On success exactly one block is appended and the question input is
    /// cleared; on failure prior blocks are untouched and the question stays
    /// so the user can retry without retyping.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoLesson` before a base lesson exists,
    /// `LessonError::EmptyQuestion` for a blank question, and gateway errors
    /// otherwise.
    pub async fn send_follow_up(&mut self) -> Result<(), LessonError> {
        let Some(topic_id) = self.topic_id else {
            return Err(LessonError::NoTopicSelected);
        };
        let Some(lesson) = &self.lesson else {
            return Err(LessonError::NoLesson);
        };
        if self.generating_more {
            return Ok(());
        }

        let prior_context = lesson.context_with(&self.additional);
        let question = self.follow_up.clone();
        self.generating_more = true;
        let result = self
            .lessons
            .more_context(topic_id, &question, &prior_context)
            .await;
        self.generating_more = false;

        match result {
            Ok(block) => {
                self.additional.push(block);
                self.follow_up.clear();
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn is_generating_more(&self) -> bool {
        self.generating_more
    }

    //
    // ─── QUIZ ──────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    /// Record an answer; a no-op when no quiz exists or it was submitted.
    pub fn select_answer(&mut self, question: usize, option: usize) {
        if let Some(quiz) = &mut self.quiz {
            quiz.select_answer(question, option);
        }
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit_quiz(&self) -> bool {
        self.quiz
            .as_ref()
            .is_some_and(|q| q.is_complete() && !q.submitted())
    }

    /// Score the quiz and report topic completion.
    ///
    /// The completion report is awaited here (it sequences the aggregate
    /// cache invalidation) but its failure is best-effort: the outcome comes
    /// back in [`QuizOutcome::report`] and the score is always returned.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when no quiz exists, answers are missing, or the
    /// quiz was already submitted.
    pub async fn submit_quiz(&mut self) -> Result<QuizOutcome, QuizError> {
        let Some(quiz) = &mut self.quiz else {
            return Err(QuizError::NoQuiz);
        };
        let score = quiz.submit()?;
        let topic_id = quiz.topic_id();

        let report = self.progress.report_completion(topic_id, Some(score)).await;
        Ok(QuizOutcome { score, report })
    }

    //
    // ─── REVEAL ────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn reveal(&self) -> &RevealPresenter {
        &self.reveal
    }

    pub fn reveal_mut(&mut self) -> &mut RevealPresenter {
        &mut self.reveal
    }
}
