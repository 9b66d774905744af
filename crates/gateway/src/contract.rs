//! Backend contract for the StudyAI REST API.
//!
//! Services depend on these traits rather than on the HTTP client, so the
//! flow stays unit-testable against [`InMemoryGateway`].

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use study_core::model::{
    AdditionalContext, CachedLesson, DashboardData, HealthStatus, LearnRequest, Lesson,
    PartProgressItem, PartId, ProgressSummary, Quiz, QuizRequest, SearchResult, SyllabusPart,
    Topic, TopicId,
};

/// Result limit applied to syllabus search when the caller does not pick one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by gateway implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GatewayError {
    /// Non-2xx response; `detail` is taken from the JSON body when present.
    #[error("request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered 2xx but the payload violated a domain invariant.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

//
// ─── GATEWAY TRAITS ────────────────────────────────────────────────────────────
//

/// Read-only syllabus endpoints.
#[async_trait]
pub trait SyllabusGateway: Send + Sync {
    /// Fetch the backend health report (`GET /health`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn health(&self) -> Result<HealthStatus, GatewayError>;

    /// List all curriculum parts (`GET /syllabus`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn list_parts(&self) -> Result<Vec<SyllabusPart>, GatewayError>;

    /// Fetch one part with its nested units (`GET /syllabus/{id}`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn part(&self, id: PartId) -> Result<SyllabusPart, GatewayError>;

    /// Fetch one topic with its sub-topics (`GET /syllabus/topics/{id}`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn topic(&self, id: TopicId) -> Result<Topic, GatewayError>;

    /// Search topics (`GET /syllabus/search?q=&limit=`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, GatewayError>;

    /// Per-part completion counts (`GET /syllabus/part-progress`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn part_progress(&self) -> Result<Vec<PartProgressItem>, GatewayError>;
}

/// Lesson generation endpoints.
///
/// Generation is not deterministic: re-invoking with identical arguments may
/// return different content, so callers must treat every response as fresh.
#[async_trait]
pub trait LessonGateway: Send + Sync {
    /// Generate a lesson for a topic (`POST /learn/{topic_id}`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, a non-2xx status, or a
    /// payload violating the quiz invariants.
    async fn generate(
        &self,
        topic_id: TopicId,
        request: &LearnRequest,
    ) -> Result<Lesson, GatewayError>;

    /// Fetch the backend-cached lesson for a topic
    /// (`GET /learn/{topic_id}/cached`); a 404 maps to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx, non-404
    /// status.
    async fn cached(&self, topic_id: TopicId) -> Result<Option<CachedLesson>, GatewayError>;

    /// Ask a follow-up question against prior explanation text
    /// (`POST /learn/{topic_id}/more-context`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn more_context(
        &self,
        topic_id: TopicId,
        question: &str,
        existing_explanation: &str,
    ) -> Result<AdditionalContext, GatewayError>;
}

/// Standalone quiz generation (`POST /quiz/{topic_id}`).
#[async_trait]
pub trait QuizGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, a non-2xx status, or a
    /// payload violating the quiz invariants.
    async fn generate(&self, topic_id: TopicId, request: &QuizRequest)
        -> Result<Quiz, GatewayError>;
}

/// Progress aggregates and completion reporting.
#[async_trait]
pub trait ProgressGateway: Send + Sync {
    /// Overall completion counts (`GET /progress`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn summary(&self) -> Result<ProgressSummary, GatewayError>;

    /// Report a topic as completed (`POST /progress/{topic_id}/complete`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn complete_topic(
        &self,
        topic_id: TopicId,
        quiz_score: Option<u8>,
    ) -> Result<(), GatewayError>;

    /// Dashboard aggregates (`GET /dashboard`).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-2xx status.
    async fn dashboard(&self) -> Result<DashboardData, GatewayError>;
}

//
// ─── IN-MEMORY GATEWAY ─────────────────────────────────────────────────────────
//

#[derive(Default)]
struct State {
    health: Option<HealthStatus>,
    parts: Vec<SyllabusPart>,
    topics: HashMap<TopicId, Topic>,
    search_results: Vec<SearchResult>,
    part_progress: Vec<PartProgressItem>,
    lessons: HashMap<TopicId, VecDeque<Lesson>>,
    cached_lessons: HashMap<TopicId, CachedLesson>,
    context_blocks: VecDeque<AdditionalContext>,
    quizzes: HashMap<TopicId, Quiz>,
    summary: ProgressSummary,
    dashboard: Option<DashboardData>,
    completions: Vec<(TopicId, Option<u8>)>,
    fail_generate: bool,
    fail_more_context: bool,
    fail_complete: bool,
    calls: Vec<String>,
}

/// Scriptable in-memory gateway for tests and prototyping.
///
/// Every trait call is recorded, so tests can assert not only on results but
/// on whether a request was issued at all.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<Mutex<State>>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_health(&self, health: HealthStatus) {
        self.state().health = Some(health);
    }

    pub fn set_parts(&self, parts: Vec<SyllabusPart>) {
        self.state().parts = parts;
    }

    pub fn insert_topic(&self, topic: Topic) {
        self.state().topics.insert(topic.id, topic);
    }

    pub fn set_search_results(&self, results: Vec<SearchResult>) {
        self.state().search_results = results;
    }

    pub fn set_part_progress(&self, items: Vec<PartProgressItem>) {
        self.state().part_progress = items;
    }

    /// Queue a lesson to be served by the next `generate` call for its topic.
    /// When the queue holds a single lesson it is served repeatedly.
    pub fn queue_lesson(&self, lesson: Lesson) {
        self.state()
            .lessons
            .entry(lesson.topic_id)
            .or_default()
            .push_back(lesson);
    }

    pub fn insert_cached_lesson(&self, lesson: CachedLesson) {
        self.state().cached_lessons.insert(lesson.topic_id, lesson);
    }

    /// Queue the block returned by the next `more_context` call.
    pub fn queue_context_block(&self, block: AdditionalContext) {
        self.state().context_blocks.push_back(block);
    }

    pub fn insert_quiz(&self, quiz: Quiz) {
        self.state().quizzes.insert(quiz.topic_id(), quiz);
    }

    pub fn set_summary(&self, summary: ProgressSummary) {
        self.state().summary = summary;
    }

    pub fn set_dashboard(&self, dashboard: DashboardData) {
        self.state().dashboard = Some(dashboard);
    }

    pub fn fail_generate(&self, fail: bool) {
        self.state().fail_generate = fail;
    }

    pub fn fail_more_context(&self, fail: bool) {
        self.state().fail_more_context = fail;
    }

    pub fn fail_complete(&self, fail: bool) {
        self.state().fail_complete = fail;
    }

    /// Labels of every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Completion reports received via `complete_topic`, in order.
    #[must_use]
    pub fn completions(&self) -> Vec<(TopicId, Option<u8>)> {
        self.state().completions.clone()
    }

    fn record(&self, label: String) {
        self.state().calls.push(label);
    }

    fn scripted_failure(endpoint: &str) -> GatewayError {
        GatewayError::Status {
            status: 500,
            detail: format!("scripted {endpoint} failure"),
        }
    }
}

#[async_trait]
impl SyllabusGateway for InMemoryGateway {
    async fn health(&self) -> Result<HealthStatus, GatewayError> {
        self.record("GET /health".into());
        self.state().health.clone().ok_or(GatewayError::Status {
            status: 503,
            detail: "health not scripted".into(),
        })
    }

    async fn list_parts(&self) -> Result<Vec<SyllabusPart>, GatewayError> {
        self.record("GET /syllabus".into());
        Ok(self.state().parts.clone())
    }

    async fn part(&self, id: PartId) -> Result<SyllabusPart, GatewayError> {
        self.record(format!("GET /syllabus/{id}"));
        self.state()
            .parts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(GatewayError::Status {
                status: 404,
                detail: "part not found".into(),
            })
    }

    async fn topic(&self, id: TopicId) -> Result<Topic, GatewayError> {
        self.record(format!("GET /syllabus/topics/{id}"));
        self.state()
            .topics
            .get(&id)
            .cloned()
            .ok_or(GatewayError::Status {
                status: 404,
                detail: "topic not found".into(),
            })
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, GatewayError> {
        self.record(format!("GET /syllabus/search?q={query}&limit={limit}"));
        let results = self.state().search_results.clone();
        Ok(results.into_iter().take(limit as usize).collect())
    }

    async fn part_progress(&self) -> Result<Vec<PartProgressItem>, GatewayError> {
        self.record("GET /syllabus/part-progress".into());
        Ok(self.state().part_progress.clone())
    }
}

#[async_trait]
impl LessonGateway for InMemoryGateway {
    async fn generate(
        &self,
        topic_id: TopicId,
        _request: &LearnRequest,
    ) -> Result<Lesson, GatewayError> {
        self.record(format!("POST /learn/{topic_id}"));
        let mut state = self.state();
        if state.fail_generate {
            return Err(Self::scripted_failure("generate"));
        }
        let queue = state
            .lessons
            .get_mut(&topic_id)
            .ok_or(GatewayError::Status {
                status: 404,
                detail: "no lesson scripted for topic".into(),
            })?;
        if queue.len() > 1 {
            queue.pop_front().ok_or(GatewayError::Status {
                status: 404,
                detail: "no lesson scripted for topic".into(),
            })
        } else {
            queue.front().cloned().ok_or(GatewayError::Status {
                status: 404,
                detail: "no lesson scripted for topic".into(),
            })
        }
    }

    async fn cached(&self, topic_id: TopicId) -> Result<Option<CachedLesson>, GatewayError> {
        self.record(format!("GET /learn/{topic_id}/cached"));
        Ok(self.state().cached_lessons.get(&topic_id).cloned())
    }

    async fn more_context(
        &self,
        topic_id: TopicId,
        _question: &str,
        _existing_explanation: &str,
    ) -> Result<AdditionalContext, GatewayError> {
        self.record(format!("POST /learn/{topic_id}/more-context"));
        let mut state = self.state();
        if state.fail_more_context {
            return Err(Self::scripted_failure("more-context"));
        }
        state
            .context_blocks
            .pop_front()
            .ok_or(GatewayError::Status {
                status: 404,
                detail: "no context block scripted".into(),
            })
    }
}

#[async_trait]
impl QuizGateway for InMemoryGateway {
    async fn generate(
        &self,
        topic_id: TopicId,
        _request: &QuizRequest,
    ) -> Result<Quiz, GatewayError> {
        self.record(format!("POST /quiz/{topic_id}"));
        self.state()
            .quizzes
            .get(&topic_id)
            .cloned()
            .ok_or(GatewayError::Status {
                status: 404,
                detail: "no quiz scripted for topic".into(),
            })
    }
}

#[async_trait]
impl ProgressGateway for InMemoryGateway {
    async fn summary(&self) -> Result<ProgressSummary, GatewayError> {
        self.record("GET /progress".into());
        Ok(self.state().summary)
    }

    async fn complete_topic(
        &self,
        topic_id: TopicId,
        quiz_score: Option<u8>,
    ) -> Result<(), GatewayError> {
        self.record(format!("POST /progress/{topic_id}/complete"));
        let mut state = self.state();
        if state.fail_complete {
            return Err(Self::scripted_failure("complete"));
        }
        state.completions.push((topic_id, quiz_score));
        Ok(())
    }

    async fn dashboard(&self) -> Result<DashboardData, GatewayError> {
        self.record("GET /dashboard".into());
        self.state().dashboard.clone().ok_or(GatewayError::Status {
            status: 404,
            detail: "dashboard not scripted".into(),
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
