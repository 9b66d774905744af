mod ids;
mod lesson;
mod progress;
mod quiz;
mod syllabus;

pub use ids::{ParseIdError, PartId, SubTopicId, TopicId, UnitId};

pub use lesson::{
    AdditionalContext, CachedLesson, CodeExample, LearnRequest, Lesson, LessonSection, UserLevel,
    CONTEXT_SEPARATOR,
};
pub use progress::{DashboardData, DueForReviewItem, PartProgressItem, ProgressSummary, WeeklyActivity};
pub use quiz::{Question, QuestionError, Quiz, QuizDifficulty, QuizRequest, DEFAULT_QUIZ_QUESTIONS};
pub use syllabus::{HealthStatus, SearchResult, SubTopic, SyllabusPart, Topic, TopicBrief, Unit};
