#![forbid(unsafe_code)]

pub mod app_services;
pub mod cache;
pub mod error;
pub mod learn_flow;
pub mod lesson_service;
pub mod progress_service;
pub mod quiz_service;
pub mod reveal;
pub mod syllabus_service;
pub mod view;

pub use study_core::Clock;

pub use app_services::AppServices;
pub use cache::Cached;
pub use error::{LessonError, QuizError};
pub use learn_flow::{LearnFlow, QuizOutcome};
pub use lesson_service::LessonService;
pub use progress_service::{AGGREGATE_STALE_SECS, CompletionReport, ProgressService};
pub use quiz_service::{OptionStatus, QuizSession};
pub use reveal::{DEFAULT_REVEAL_PERIOD, RevealPacing, RevealPresenter, RevealState};
pub use syllabus_service::{MIN_SEARCH_QUERY_LEN, SyllabusSelection, SyllabusService};
pub use view::{LearnViewModel, QuizOptionView, SectionView};
