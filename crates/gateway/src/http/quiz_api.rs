use async_trait::async_trait;

use study_core::model::{Quiz, QuizRequest, TopicId};

use crate::contract::{GatewayError, QuizGateway};
use crate::http::HttpGateway;
use crate::http::payload::QuizPayload;

#[async_trait]
impl QuizGateway for HttpGateway {
    async fn generate(
        &self,
        topic_id: TopicId,
        request: &QuizRequest,
    ) -> Result<Quiz, GatewayError> {
        let payload: QuizPayload = self.post_json(&format!("quiz/{topic_id}"), request).await?;
        payload.into_quiz(topic_id)
    }
}
