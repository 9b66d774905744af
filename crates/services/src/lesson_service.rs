use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gateway::LessonGateway;
use study_core::model::{
    AdditionalContext, CachedLesson, LearnRequest, Lesson, SubTopicId, TopicId, UserLevel,
};

use crate::error::LessonError;

/// Orchestrates lesson generation and follow-up context requests.
///
/// Generation is not deterministic, so every successful call hands back fresh
/// content; nothing is cached here. A new `generate` call fully supersedes
/// any previous call still in flight: each request carries a sequence token,
/// and a response whose token is no longer the latest is discarded.
pub struct LessonService {
    gateway: Arc<dyn LessonGateway>,
    latest: AtomicU64,
}

impl LessonService {
    #[must_use]
    pub fn new(gateway: Arc<dyn LessonGateway>) -> Self {
        Self {
            gateway,
            latest: AtomicU64::new(0),
        }
    }

    /// Generate a lesson for `(topic, sub-topic, level)`.
    ///
    /// A sub-topic must be selected; this is checked before any request is
    /// issued.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoSubTopicSelected` without touching the
    /// backend when `sub_topic_id` is `None`, `LessonError::Superseded` when
    /// a newer request started while this one was in flight, and gateway
    /// errors otherwise.
    pub async fn generate(
        &self,
        topic_id: TopicId,
        sub_topic_id: Option<SubTopicId>,
        level: UserLevel,
        focus_areas: Vec<String>,
    ) -> Result<Lesson, LessonError> {
        let Some(sub_topic_id) = sub_topic_id else {
            return Err(LessonError::NoSubTopicSelected);
        };

        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut request = LearnRequest::for_sub_topic(sub_topic_id, level);
        request.focus_areas = focus_areas;

        let result = self.gateway.generate(topic_id, &request).await;
        if self.latest.load(Ordering::SeqCst) != token {
            tracing::debug!(%topic_id, token, "discarding superseded lesson response");
            return Err(LessonError::Superseded);
        }
        Ok(result?)
    }

    /// Ask a follow-up question against already-generated content.
    ///
    /// `prior_context` is the concatenated explanation history (see
    /// [`Lesson::context_with`]); it is the only memory the backend sees.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyQuestion` without touching the backend
    /// when the trimmed question is empty, and gateway errors otherwise.
    pub async fn more_context(
        &self,
        topic_id: TopicId,
        question: &str,
        prior_context: &str,
    ) -> Result<AdditionalContext, LessonError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(LessonError::EmptyQuestion);
        }
        Ok(self
            .gateway
            .more_context(topic_id, question, prior_context)
            .await?)
    }

    /// Fetch the backend-cached lesson for a topic, `None` on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns gateway errors other than the 404 cache miss.
    pub async fn cached(&self, topic_id: TopicId) -> Result<Option<CachedLesson>, LessonError> {
        Ok(self.gateway.cached(topic_id).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
