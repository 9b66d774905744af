use serde::{Deserialize, Serialize};

use crate::model::ids::{PartId, SubTopicId, TopicId, UnitId};

/// Top-level curriculum grouping (e.g. "Machine Learning").
///
/// Immutable once fetched; counts are present on the list endpoint, nested
/// units only when a single part is fetched by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusPart {
    pub id: PartId,
    pub name: String,
    #[serde(default)]
    pub sub_topic_count: Option<u32>,
    #[serde(default)]
    pub unit_count: Option<u32>,
    #[serde(default)]
    pub topic_count: Option<u32>,
    #[serde(default)]
    pub units: Option<Vec<Unit>>,
}

/// Grouping of topics within a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    #[serde(default, rename = "main_topic_id")]
    pub part_id: Option<PartId>,
    #[serde(default, rename = "topics_count")]
    pub topic_count: Option<u32>,
    #[serde(default)]
    pub topics: Option<Vec<TopicBrief>>,
}

/// Topic listing entry nested under a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicBrief {
    pub id: TopicId,
    pub number: String,
    pub title: String,
}

/// A single lesson-worthy subject, fetched on demand when a user drills into
/// a unit. Carries its parent names so the learning view can render
/// breadcrumbs without a second fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub unit_id: Option<UnitId>,
    pub unit_name: String,
    #[serde(rename = "main_topic_name")]
    pub part_name: String,
    pub sub_topics: Vec<SubTopic>,
}

/// A prompt fragment selected to scope lesson generation.
///
/// The content is not renderable lesson material itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTopic {
    pub id: SubTopicId,
    pub topic_id: TopicId,
    pub content: String,
}

/// One hit from the syllabus search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub topic_id: TopicId,
    pub topic_number: String,
    pub topic_title: String,
    pub unit_name: String,
    #[serde(rename = "main_topic_name")]
    pub part_name: String,
    pub matched_sub_topic: Option<String>,
}

/// Backend health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub app: String,
    pub version: String,
    pub database: String,
    pub llm_provider: String,
    pub llm_model: String,
}

impl Topic {
    /// Looks up a sub-topic of this topic by id.
    #[must_use]
    pub fn sub_topic(&self, id: SubTopicId) -> Option<&SubTopic> {
        self.sub_topics.iter().find(|st| st.id == id)
    }
}
