use serde::{Deserialize, Serialize};

use crate::model::ids::{PartId, TopicId};

/// Overall completed/total topic counts, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub completed: u32,
    pub total: u32,
}

impl ProgressSummary {
    /// Completion as a 0-100 percentage, 0 for an empty curriculum.
    #[must_use]
    pub fn percent_complete(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }
}

/// Completed/total counts for one curriculum part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartProgressItem {
    pub part_id: PartId,
    pub completed: u32,
    pub total: u32,
}

/// A topic the backend suggests revisiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueForReviewItem {
    pub topic_id: TopicId,
    pub title: String,
}

/// One day of the dashboard's weekly activity strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyActivity {
    pub day: String,
    pub topics: u32,
    pub mins: u32,
}

/// Aggregate counters for the progress dashboard.
///
/// The client never mutates these; it only triggers recomputation by
/// reporting topic completion and then re-fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub completed: u32,
    pub total: u32,
    pub streak: u32,
    pub personal_best_streak: u32,
    pub study_hours: f32,
    pub topics_this_month: u32,
    pub avg_quiz_score: f32,
    pub due_for_review: Vec<DueForReviewItem>,
    pub weekly_activity: Vec<WeeklyActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_complete_handles_empty_total() {
        let summary = ProgressSummary {
            completed: 0,
            total: 0,
        };
        assert_eq!(summary.percent_complete(), 0);

        let summary = ProgressSummary {
            completed: 3,
            total: 12,
        };
        assert_eq!(summary.percent_complete(), 25);
    }
}
