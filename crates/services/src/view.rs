//! Presentation-agnostic snapshots of the learning view.
//!
//! Deliberately not a UI view-model: no pre-formatted strings, no styling
//! assumptions. The rendering layer maps these however it likes.

use study_core::model::{AdditionalContext, LessonSection};

use crate::learn_flow::LearnFlow;
use crate::quiz_service::{OptionStatus, QuizSession};

/// One lesson section and whether the reveal has exposed it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionView {
    pub section: LessonSection,
    pub visible: bool,
}

/// One quiz option with its post-submission classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOptionView {
    pub label: String,
    pub selected: bool,
    pub status: Option<OptionStatus>,
}

/// Snapshot of everything the learning view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnViewModel {
    pub topic_title: Option<String>,
    pub generating: bool,
    pub error: Option<String>,
    pub sections: Vec<SectionView>,
    pub revealing: bool,
    pub additional_context: Vec<AdditionalContext>,
    pub can_generate: bool,
    pub can_submit_quiz: bool,
    pub quiz_submitted: bool,
    pub score: Option<u8>,
}

/// Map the flow state into a renderable snapshot.
#[must_use]
pub fn learn_view(flow: &LearnFlow) -> LearnViewModel {
    let visible = flow.reveal().visible_sections();
    let sections = flow
        .lesson()
        .map(|lesson| {
            lesson
                .sections()
                .into_iter()
                .enumerate()
                .map(|(index, section)| SectionView {
                    section,
                    visible: index < visible,
                })
                .collect()
        })
        .unwrap_or_default();

    LearnViewModel {
        topic_title: flow.lesson().map(|l| l.topic_title.clone()),
        generating: flow.is_generating(),
        error: flow.error().map(str::to_owned),
        sections,
        revealing: flow.reveal().is_revealing(),
        additional_context: flow.additional_context().to_vec(),
        can_generate: flow.can_generate(),
        can_submit_quiz: flow.can_submit_quiz(),
        quiz_submitted: flow.quiz().is_some_and(QuizSession::submitted),
        score: flow.quiz().and_then(QuizSession::score),
    }
}

/// Classify every option of one question for rendering.
#[must_use]
pub fn quiz_option_views(session: &QuizSession, question: usize) -> Vec<QuizOptionView> {
    let Some(q) = session.quiz().question(question) else {
        return Vec::new();
    };
    q.options()
        .iter()
        .enumerate()
        .map(|(index, label)| QuizOptionView {
            label: label.clone(),
            selected: session.answer(question) == Some(index),
            status: session.option_status(question, index),
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson_service::LessonService;
    use crate::progress_service::ProgressService;
    use crate::reveal::RevealPacing;
    use gateway::InMemoryGateway;
    use std::sync::Arc;
    use study_core::Clock;
    use study_core::model::{Question, Quiz, TopicId};
    use study_core::time::fixed_now;

    fn empty_flow() -> LearnFlow {
        let gw = InMemoryGateway::new();
        LearnFlow::new(
            Arc::new(LessonService::new(Arc::new(gw.clone()))),
            Arc::new(ProgressService::new(
                Arc::new(gw.clone()),
                Arc::new(gw),
                Clock::fixed(fixed_now()),
            )),
            RevealPacing::Immediate,
        )
    }

    #[test]
    fn empty_flow_maps_to_an_empty_snapshot() {
        let view = learn_view(&empty_flow());
        assert!(view.sections.is_empty());
        assert!(view.topic_title.is_none());
        assert!(!view.can_generate);
        assert!(view.score.is_none());
    }

    #[test]
    fn option_views_reflect_selection_and_verdict() {
        let quiz = Quiz::new(
            TopicId::new(5),
            vec![
                Question::new("Pick c", vec!["a".into(), "b".into(), "c".into()], 2, None)
                    .unwrap(),
            ],
        );
        let mut session = QuizSession::new(quiz).unwrap();
        session.select_answer(0, 1);

        let before = quiz_option_views(&session, 0);
        assert!(before[1].selected);
        assert!(before.iter().all(|o| o.status.is_none()));

        session.submit().unwrap();
        let after = quiz_option_views(&session, 0);
        assert_eq!(after[1].status, Some(OptionStatus::IncorrectlySelected));
        assert_eq!(after[2].status, Some(OptionStatus::Correct));
        assert_eq!(after[0].status, Some(OptionStatus::Unselected));

        assert!(quiz_option_views(&session, 9).is_empty());
    }
}
