use std::sync::Arc;
use std::time::Duration;

use gateway::InMemoryGateway;
use services::{AppServices, Clock, RevealPacing, RevealState};
use study_core::model::{Lesson, SubTopicId, TopicId};
use study_core::time::fixed_now;

fn lesson_with_sections(topic_id: u64, code_examples: usize) -> Lesson {
    Lesson {
        topic_id: TopicId::new(topic_id),
        topic_title: "Backpropagation".into(),
        explanation: "Chain rule, applied twice.".into(),
        key_points: Vec::new(),
        code_examples: (0..code_examples)
            .map(|i| study_core::model::CodeExample {
                language: "python".into(),
                code: format!("layer_{i}.backward()"),
                explanation: String::new(),
            })
            .collect(),
        math_formulas: Vec::new(),
        quiz: Vec::new(),
        further_reading: Vec::new(),
        model_used: None,
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

#[tokio::test(start_paused = true)]
async fn paced_reveal_exposes_sections_tick_by_tick() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(lesson_with_sections(5, 2));
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Paced {
        period: Duration::from_millis(1200),
    });

    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    flow.generate().await.unwrap();

    // The network call completed before the reveal started.
    assert_eq!(flow.reveal().state(), RevealState::Revealing { visible: 0 });
    assert_eq!(flow.reveal().total_sections(), 3);

    flow.reveal_mut().run().await;
    assert_eq!(flow.reveal().state(), RevealState::Complete);
    assert_eq!(flow.reveal().visible_sections(), 3);
}

#[tokio::test(start_paused = true)]
async fn regenerating_mid_reveal_restarts_the_sequence() {
    let gw = InMemoryGateway::new();
    gw.queue_lesson(lesson_with_sections(5, 3));
    gw.queue_lesson(lesson_with_sections(5, 1));
    let mut flow = app(&gw).learn_flow_with_pacing(RevealPacing::Paced {
        period: Duration::from_millis(1200),
    });

    flow.open_topic(TopicId::new(5));
    flow.select_sub_topic(SubTopicId::new(12));
    flow.generate().await.unwrap();

    flow.reveal_mut().tick();
    flow.reveal_mut().tick();
    assert_eq!(flow.reveal().visible_sections(), 2);

    // Replacing the lesson cancels the in-flight reveal and starts over.
    flow.generate().await.unwrap();
    assert_eq!(flow.reveal().state(), RevealState::Revealing { visible: 0 });
    assert_eq!(flow.reveal().total_sections(), 2);

    flow.reveal_mut().run().await;
    assert!(flow.reveal().is_complete());
    assert_eq!(flow.reveal().visible_sections(), 2);
}
