use std::sync::Arc;

use gateway::{
    GatewayConfig, GatewayError, HttpGateway, LessonGateway, ProgressGateway, QuizGateway,
    SyllabusGateway,
};
use study_core::Clock;
use study_core::model::{Quiz, QuizRequest, TopicId};

use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;
use crate::reveal::RevealPacing;
use crate::syllabus_service::SyllabusService;
use crate::learn_flow::LearnFlow;

/// Assembles the client-side services behind one backend gateway.
#[derive(Clone)]
pub struct AppServices {
    syllabus: Arc<SyllabusService>,
    lessons: Arc<LessonService>,
    quizzes: Arc<dyn QuizGateway>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services over the HTTP gateway.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the HTTP client cannot be constructed.
    pub fn new_http(config: GatewayConfig, clock: Clock) -> Result<Self, GatewayError> {
        let gateway = Arc::new(HttpGateway::new(config)?);
        Ok(Self::with_gateways(
            gateway.clone(),
            gateway.clone(),
            gateway.clone(),
            gateway,
            clock,
        ))
    }

    /// Wire services over arbitrary gateway implementations; tests pass the
    /// in-memory gateway here.
    #[must_use]
    pub fn with_gateways(
        syllabus: Arc<dyn SyllabusGateway>,
        lessons: Arc<dyn LessonGateway>,
        quizzes: Arc<dyn QuizGateway>,
        progress: Arc<dyn ProgressGateway>,
        clock: Clock,
    ) -> Self {
        Self {
            syllabus: Arc::new(SyllabusService::new(Arc::clone(&syllabus), clock)),
            lessons: Arc::new(LessonService::new(lessons)),
            quizzes,
            progress: Arc::new(ProgressService::new(progress, syllabus, clock)),
        }
    }

    #[must_use]
    pub fn syllabus(&self) -> Arc<SyllabusService> {
        Arc::clone(&self.syllabus)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    /// Fresh learning-view flow with the default paced reveal.
    #[must_use]
    pub fn learn_flow(&self) -> LearnFlow {
        self.learn_flow_with_pacing(RevealPacing::default())
    }

    /// Fresh learning-view flow; tests pick `RevealPacing::Immediate`.
    #[must_use]
    pub fn learn_flow_with_pacing(&self, pacing: RevealPacing) -> LearnFlow {
        LearnFlow::new(
            Arc::clone(&self.lessons),
            Arc::clone(&self.progress),
            pacing,
        )
    }

    /// Generate a standalone quiz for a topic.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or an invalid payload.
    pub async fn generate_quiz(
        &self,
        topic_id: TopicId,
        request: &QuizRequest,
    ) -> Result<Quiz, GatewayError> {
        self.quizzes.generate(topic_id, request).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
