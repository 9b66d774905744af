use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use study_core::model::{AdditionalContext, CachedLesson, LearnRequest, Lesson, TopicId};

use crate::contract::{GatewayError, LessonGateway};
use crate::http::HttpGateway;
use crate::http::payload::LessonPayload;

#[derive(Debug, Serialize)]
struct MoreContextBody<'a> {
    question: &'a str,
    existing_explanation: &'a str,
}

#[async_trait]
impl LessonGateway for HttpGateway {
    async fn generate(
        &self,
        topic_id: TopicId,
        request: &LearnRequest,
    ) -> Result<Lesson, GatewayError> {
        let payload: LessonPayload = self.post_json(&format!("learn/{topic_id}"), request).await?;
        payload.into_lesson()
    }

    async fn cached(&self, topic_id: TopicId) -> Result<Option<CachedLesson>, GatewayError> {
        let builder = self.request(Method::GET, &format!("learn/{topic_id}/cached"));
        Self::send_optional(builder).await
    }

    async fn more_context(
        &self,
        topic_id: TopicId,
        question: &str,
        existing_explanation: &str,
    ) -> Result<AdditionalContext, GatewayError> {
        let body = MoreContextBody {
            question,
            existing_explanation,
        };
        self.post_json(&format!("learn/{topic_id}/more-context"), &body)
            .await
    }
}
