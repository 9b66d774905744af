use chrono::Duration;
use std::sync::Arc;

use gateway::{GatewayError, ProgressGateway, SyllabusGateway};
use study_core::Clock;
use study_core::model::{DashboardData, PartProgressItem, ProgressSummary, TopicId};

use crate::cache::Cached;

/// Staleness window for the progress aggregates.
pub const AGGREGATE_STALE_SECS: i64 = 30;

/// Outcome of a best-effort completion report.
///
/// Callers are free to ignore this: the locally computed quiz result stands
/// either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReport {
    Reported,
    Failed,
}

impl CompletionReport {
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, CompletionReport::Reported)
    }
}

/// Progress aggregates plus completion reporting.
///
/// The aggregates are backend-owned; this service only caches them and
/// invalidates the caches after a write so readers re-fetch lazily instead
/// of trusting a stale local copy.
pub struct ProgressService {
    progress: Arc<dyn ProgressGateway>,
    syllabus: Arc<dyn SyllabusGateway>,
    clock: Clock,
    summary: Cached<ProgressSummary>,
    part_progress: Cached<Vec<PartProgressItem>>,
    dashboard: Cached<DashboardData>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        progress: Arc<dyn ProgressGateway>,
        syllabus: Arc<dyn SyllabusGateway>,
        clock: Clock,
    ) -> Self {
        let stale_after = Duration::seconds(AGGREGATE_STALE_SECS);
        Self {
            progress,
            syllabus,
            clock,
            summary: Cached::new(stale_after),
            part_progress: Cached::new(stale_after),
            dashboard: Cached::new(stale_after),
        }
    }

    /// Overall completed/total counts, cached.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn summary(&self) -> Result<ProgressSummary, GatewayError> {
        let now = self.clock.now();
        if let Some(summary) = self.summary.get(now) {
            return Ok(summary);
        }
        let summary = self.progress.summary().await?;
        self.summary.put(summary, now);
        Ok(summary)
    }

    /// Per-part completion counts for the curriculum grid, cached.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn part_progress(&self) -> Result<Vec<PartProgressItem>, GatewayError> {
        let now = self.clock.now();
        if let Some(items) = self.part_progress.get(now) {
            return Ok(items);
        }
        let items = self.syllabus.part_progress().await?;
        self.part_progress.put(items.clone(), now);
        Ok(items)
    }

    /// Dashboard aggregates, cached.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails.
    pub async fn dashboard(&self) -> Result<DashboardData, GatewayError> {
        let now = self.clock.now();
        if let Some(data) = self.dashboard.get(now) {
            return Ok(data);
        }
        let data = self.progress.dashboard().await?;
        self.dashboard.put(data.clone(), now);
        Ok(data)
    }

    /// Report a topic as completed, with the quiz score when one exists.
    ///
    /// Best-effort: a failed report is logged and returned as
    /// [`CompletionReport::Failed`], never an error, because the learning
    /// feedback already happened locally. The aggregate caches are
    /// invalidated regardless of the outcome; over-invalidating is a safe
    /// no-op.
    pub async fn report_completion(
        &self,
        topic_id: TopicId,
        quiz_score: Option<u8>,
    ) -> CompletionReport {
        let outcome = match self.progress.complete_topic(topic_id, quiz_score).await {
            Ok(()) => CompletionReport::Reported,
            Err(err) => {
                tracing::warn!(%topic_id, error = %err, "completion report failed; keeping local quiz result");
                CompletionReport::Failed
            }
        };
        self.invalidate_aggregates();
        outcome
    }

    /// Drop all three cached aggregates so the next reads re-fetch.
    pub fn invalidate_aggregates(&self) {
        self.summary.invalidate();
        self.part_progress.invalidate();
        self.dashboard.invalidate();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
