use chrono::Duration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gateway::{DEFAULT_SEARCH_LIMIT, GatewayError, SyllabusGateway};
use study_core::Clock;
use study_core::model::{
    HealthStatus, PartId, SearchResult, SubTopicId, SyllabusPart, Topic, TopicId, UnitId,
};

use crate::cache::Cached;

/// Queries shorter than this never reach the backend.
pub const MIN_SEARCH_QUERY_LEN: usize = 3;

const PARTS_STALE_HOURS: i64 = 1;

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// The currently selected part/unit/topic/sub-topic.
///
/// Pure selection state: picking a new ancestor clears everything below it,
/// so a sub-topic can never point outside the selected topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyllabusSelection {
    part: Option<PartId>,
    unit: Option<UnitId>,
    topic: Option<TopicId>,
    sub_topic: Option<SubTopicId>,
}

impl SyllabusSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_part(&mut self, part: PartId) {
        self.part = Some(part);
        self.unit = None;
        self.topic = None;
        self.sub_topic = None;
    }

    pub fn select_unit(&mut self, unit: UnitId) {
        self.unit = Some(unit);
        self.topic = None;
        self.sub_topic = None;
    }

    pub fn select_topic(&mut self, topic: TopicId) {
        self.topic = Some(topic);
        self.sub_topic = None;
    }

    pub fn select_sub_topic(&mut self, sub_topic: SubTopicId) {
        self.sub_topic = Some(sub_topic);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn part(&self) -> Option<PartId> {
        self.part
    }

    #[must_use]
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    #[must_use]
    pub fn topic(&self) -> Option<TopicId> {
        self.topic
    }

    #[must_use]
    pub fn sub_topic(&self) -> Option<SubTopicId> {
        self.sub_topic
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Read-only syllabus access with client-side caching.
///
/// Syllabus data is immutable once fetched, so topics are kept for the
/// lifetime of the service; the parts list refreshes after an hour.
pub struct SyllabusService {
    gateway: Arc<dyn SyllabusGateway>,
    clock: Clock,
    parts: Cached<Vec<SyllabusPart>>,
    topics: Mutex<HashMap<TopicId, Topic>>,
}

impl SyllabusService {
    #[must_use]
    pub fn new(gateway: Arc<dyn SyllabusGateway>, clock: Clock) -> Self {
        Self {
            gateway,
            clock,
            parts: Cached::new(Duration::hours(PARTS_STALE_HOURS)),
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Backend health report, uncached.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthStatus, GatewayError> {
        self.gateway.health().await
    }

    /// All curriculum parts, cached.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn parts(&self) -> Result<Vec<SyllabusPart>, GatewayError> {
        let now = self.clock.now();
        if let Some(parts) = self.parts.get(now) {
            return Ok(parts);
        }
        let parts = self.gateway.list_parts().await?;
        self.parts.put(parts.clone(), now);
        Ok(parts)
    }

    /// One part with its nested units, fetched on drill-in.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn part(&self, id: PartId) -> Result<SyllabusPart, GatewayError> {
        self.gateway.part(id).await
    }

    /// One topic with its sub-topics, cached for the service lifetime.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn topic(&self, id: TopicId) -> Result<Topic, GatewayError> {
        if let Some(topic) = self.lock_topics().get(&id) {
            return Ok(topic.clone());
        }
        let topic = self.gateway.topic(id).await?;
        self.lock_topics().insert(id, topic.clone());
        Ok(topic)
    }

    /// Search topics with the default result limit.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, GatewayError> {
        self.search_with_limit(query, DEFAULT_SEARCH_LIMIT).await
    }

    /// Search topics; a trimmed query shorter than [`MIN_SEARCH_QUERY_LEN`]
    /// returns no results without issuing a request.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn search_with_limit(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchResult>, GatewayError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(Vec::new());
        }
        self.gateway.search(query, limit).await
    }

    fn lock_topics(&self) -> MutexGuard<'_, HashMap<TopicId, Topic>> {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::InMemoryGateway;
    use study_core::model::SubTopic;
    use study_core::time::fixed_now;

    fn topic(id: u64) -> Topic {
        Topic {
            id: TopicId::new(id),
            number: "1.1".into(),
            title: "Linear Regression".into(),
            unit_id: Some(UnitId::new(2)),
            unit_name: "Supervised Learning".into(),
            part_name: "Machine Learning".into(),
            sub_topics: vec![SubTopic {
                id: SubTopicId::new(12),
                topic_id: TopicId::new(id),
                content: "least squares".into(),
            }],
        }
    }

    #[test]
    fn selecting_a_topic_clears_the_sub_topic() {
        let mut selection = SyllabusSelection::new();
        selection.select_part(PartId::new(1));
        selection.select_unit(UnitId::new(2));
        selection.select_topic(TopicId::new(5));
        selection.select_sub_topic(SubTopicId::new(12));
        assert_eq!(selection.sub_topic(), Some(SubTopicId::new(12)));

        selection.select_topic(TopicId::new(6));
        assert_eq!(selection.topic(), Some(TopicId::new(6)));
        assert_eq!(selection.sub_topic(), None);

        selection.select_part(PartId::new(3));
        assert_eq!(selection.unit(), None);
        assert_eq!(selection.topic(), None);
    }

    #[tokio::test]
    async fn topics_are_fetched_once() {
        let gw = InMemoryGateway::new();
        gw.insert_topic(topic(5));
        let service = SyllabusService::new(Arc::new(gw.clone()), Clock::fixed(fixed_now()));

        let first = service.topic(TopicId::new(5)).await.unwrap();
        let second = service.topic(TopicId::new(5)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(gw.call_count(), 1);
    }

    #[tokio::test]
    async fn short_queries_never_reach_the_backend() {
        let gw = InMemoryGateway::new();
        let service = SyllabusService::new(Arc::new(gw.clone()), Clock::fixed(fixed_now()));

        let results = service.search("ml").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(gw.call_count(), 0);
    }
}
