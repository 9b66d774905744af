use async_trait::async_trait;
use reqwest::Method;

use study_core::model::{
    HealthStatus, PartId, PartProgressItem, SearchResult, SyllabusPart, Topic, TopicId,
};

use crate::contract::{GatewayError, SyllabusGateway};
use crate::http::HttpGateway;

#[async_trait]
impl SyllabusGateway for HttpGateway {
    async fn health(&self) -> Result<HealthStatus, GatewayError> {
        self.get_json("health").await
    }

    async fn list_parts(&self) -> Result<Vec<SyllabusPart>, GatewayError> {
        self.get_json("syllabus").await
    }

    async fn part(&self, id: PartId) -> Result<SyllabusPart, GatewayError> {
        self.get_json(&format!("syllabus/{id}")).await
    }

    async fn topic(&self, id: TopicId) -> Result<Topic, GatewayError> {
        self.get_json(&format!("syllabus/topics/{id}")).await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, GatewayError> {
        let builder = self
            .request(Method::GET, "syllabus/search")
            .query(&[("q", query), ("limit", &limit.to_string())]);
        Self::send(builder).await
    }

    async fn part_progress(&self) -> Result<Vec<PartProgressItem>, GatewayError> {
        self.get_json("syllabus/part-progress").await
    }
}
