use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use study_core::model::{DashboardData, ProgressSummary, TopicId};

use crate::contract::{GatewayError, ProgressGateway};
use crate::http::HttpGateway;

#[derive(Debug, Serialize)]
struct CompleteBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz_score: Option<u8>,
}

#[async_trait]
impl ProgressGateway for HttpGateway {
    async fn summary(&self) -> Result<ProgressSummary, GatewayError> {
        self.get_json("progress").await
    }

    async fn complete_topic(
        &self,
        topic_id: TopicId,
        quiz_score: Option<u8>,
    ) -> Result<(), GatewayError> {
        let body = CompleteBody { quiz_score };
        let builder = self
            .request(Method::POST, &format!("progress/{topic_id}/complete"))
            .json(&body);
        Self::send_expect_ok(builder).await
    }

    async fn dashboard(&self) -> Result<DashboardData, GatewayError> {
        self.get_json("dashboard").await
    }
}
