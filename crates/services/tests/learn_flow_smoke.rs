use std::sync::Arc;

use gateway::InMemoryGateway;
use services::{
    AppServices, Clock, CompletionReport, LessonError, OptionStatus, RevealPacing, RevealState,
};
use study_core::model::{
    AdditionalContext, CodeExample, DashboardData, Lesson, Question, SubTopicId, TopicId,
    UserLevel,
};
use study_core::time::fixed_now;

fn quizzed_lesson(topic_id: u64, explanation: &str) -> Lesson {
    // Three questions, all keyed to option 2.
    let quiz = (0..3)
        .map(|i| {
            Question::new(
                format!("Question {i}"),
                vec!["a".into(), "b".into(), "c".into()],
                2,
                None,
            )
            .unwrap()
        })
        .collect();
    Lesson {
        topic_id: TopicId::new(topic_id),
        topic_title: "Gradient Descent".into(),
        explanation: explanation.into(),
        key_points: vec!["step size matters".into()],
        code_examples: vec![CodeExample {
            language: "python".into(),
            code: "w -= lr * grad".into(),
            explanation: "one update step".into(),
        }],
        math_formulas: Vec::new(),
        quiz,
        further_reading: Vec::new(),
        model_used: Some("test-model".into()),
    }
}

fn app(gw: &InMemoryGateway) -> AppServices {
    AppServices::with_gateways(
        Arc::new(gw.clone()),
        Arc::new(gw.clone()),
        Arc::new(gw.clone()),
        Arc::new(gw.clone()),
        Clock::fixed(fixed_now()),
    )
}

#[tokio::test]
async fn generate_without_sub_topic_issues_no_request() {
    let gw = InMemoryGateway::new();
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Immediate);

    flow.open_topic(TopicId::new(7));
    assert!(!flow.can_generate());
    let err = flow.generate().await.unwrap_err();
    assert_eq!(err, LessonError::NoSubTopicSelected);

    assert_eq!(gw.call_count(), 0);
    assert!(flow.lesson().is_none());
}

#[tokio::test]
async fn lesson_quiz_and_completion_flow_end_to_end() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(quizzed_lesson(5, "Follow the negative gradient."));
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Immediate);

    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    flow.set_level(UserLevel::Beginner);
    assert!(flow.can_generate());
    flow.generate().await.unwrap();

    let lesson = flow.lesson().expect("lesson installed");
    assert_eq!(lesson.topic_title, "Gradient Descent");
    // Immediate pacing exposes every section at once: explanation, one code
    // example, quiz.
    assert_eq!(flow.reveal().state(), RevealState::Complete);
    assert_eq!(flow.reveal().visible_sections(), 3);

    // Answer [2, 0, 2] against a key of [2, 2, 2].
    flow.select_answer(0, 2);
    flow.select_answer(1, 0);
    assert!(!flow.can_submit_quiz());
    flow.select_answer(2, 2);
    assert!(flow.can_submit_quiz());

    let outcome = flow.submit_quiz().await.unwrap();
    assert_eq!(outcome.score, 67);
    assert_eq!(outcome.report, CompletionReport::Reported);
    assert_eq!(gw.completions(), vec![(TopicId::new(5), Some(67))]);

    let quiz = flow.quiz().unwrap();
    assert_eq!(
        quiz.option_status(1, 0),
        Some(OptionStatus::IncorrectlySelected)
    );
    for question in 0..3 {
        assert_eq!(quiz.option_status(question, 2), Some(OptionStatus::Correct));
    }
}

#[tokio::test]
async fn regeneration_fully_replaces_lesson_state() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(quizzed_lesson(5, "first lesson"));
    gw.queue_lesson(quizzed_lesson(5, "second lesson"));
    gw.queue_context_block(AdditionalContext {
        explanation: "a follow-up answer".into(),
        code_examples: Vec::new(),
    });
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Immediate);

    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    flow.generate().await.unwrap();

    flow.set_follow_up("why the negative direction?");
    flow.send_follow_up().await.unwrap();
    flow.select_answer(0, 2);
    assert_eq!(flow.additional_context().len(), 1);

    // Same arguments, fresh content: everything from the first lesson goes.
    flow.generate().await.unwrap();
    assert_eq!(flow.lesson().unwrap().explanation, "second lesson");
    assert!(flow.additional_context().is_empty());
    assert_eq!(flow.quiz().unwrap().answered_count(), 0);
}

#[tokio::test]
async fn failed_follow_up_keeps_question_and_blocks() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(quizzed_lesson(5, "base"));
    gw.queue_context_block(AdditionalContext {
        explanation: "first answer".into(),
        code_examples: Vec::new(),
    });
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Immediate);

    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    flow.generate().await.unwrap();

    flow.set_follow_up("first question");
    flow.send_follow_up().await.unwrap();
    assert_eq!(flow.follow_up(), "");

    gw.fail_more_context(true);
    flow.set_follow_up("second question");
    let err = flow.send_follow_up().await.unwrap_err();
    assert!(matches!(err, LessonError::Gateway(_)));

    // Prior blocks untouched, question preserved for retry.
    assert_eq!(flow.additional_context().len(), 1);
    assert_eq!(flow.follow_up(), "second question");
    assert!(flow.error().is_some());
}

#[tokio::test]
async fn follow_up_requires_a_lesson_and_a_question() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(quizzed_lesson(5, "base"));
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Immediate);

    flow.open_topic(TopicId::new(5));
    flow.set_follow_up("too early");
    assert_eq!(flow.send_follow_up().await.unwrap_err(), LessonError::NoLesson);

    flow.select_sub_topic(SubTopicId::new(12));
    flow.generate().await.unwrap();
    flow.set_follow_up("   ");
    assert_eq!(
        flow.send_follow_up().await.unwrap_err(),
        LessonError::EmptyQuestion
    );
}

#[tokio::test]
async fn quiz_score_survives_a_failed_completion_report() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(quizzed_lesson(5, "base"));
    gw.set_dashboard(DashboardData {
        completed: 3,
        total: 31,
        streak: 2,
        personal_best_streak: 6,
        study_hours: 4.5,
        topics_this_month: 3,
        avg_quiz_score: 71.0,
        due_for_review: Vec::new(),
        weekly_activity: Vec::new(),
    });
    gw.fail_complete(true);

    let services = app(&gw);
    let mut flow = services.learn_flow_with_pacing(RevealPacing::Immediate);
    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    flow.generate().await.unwrap();

    for question in 0..3 {
        flow.select_answer(question, 2);
    }
    let outcome = flow.submit_quiz().await.unwrap();

    // The learning feedback already happened locally.
    assert_eq!(outcome.score, 100);
    assert_eq!(outcome.report, CompletionReport::Failed);
    assert_eq!(flow.quiz().unwrap().score(), Some(100));

    // The dashboard remains reachable; its counts may be stale until the
    // backend write eventually succeeds.
    let dashboard = services.progress().dashboard().await.unwrap();
    assert_eq!(dashboard.completed, 3);
}

#[tokio::test]
async fn generation_failure_surfaces_an_error_and_no_lesson() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(quizzed_lesson(5, "base"));
    gw.fail_generate(true);
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Immediate);

    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    let err = flow.generate().await.unwrap_err();
    assert!(matches!(err, LessonError::Gateway(_)));

    assert!(flow.lesson().is_none());
    assert!(flow.quiz().is_none());
    assert_eq!(flow.reveal().state(), RevealState::Idle);
    assert!(flow.error().is_some());
}
