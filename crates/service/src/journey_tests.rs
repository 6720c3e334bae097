use std::sync::Arc;

use chrono::{TimeZone, Utc};
use inner_map_core::{
    FIRST_MILESTONE_REASON, InsightDraft, QUESTION_UNAVAILABLE_MESSAGE, Role, SKIP_SENTINEL,
    SYNTHESIS_FAILED_MESSAGE, Transcript, TurnLimits,
};
use inner_map_llm::parse_synthesized_insight;

use crate::testing::{
    FakeAsker, FakeImages, FakeInsights, insight, memory_journal, provider_down, synthesizer,
};
use crate::{
    DashboardTab, FlowError, JournalService, Journey, ServiceError, View, evolution_timeline,
};

struct Harness {
    journey: Journey,
    asker: Arc<FakeAsker>,
    insights: Arc<FakeInsights>,
    images: Arc<FakeImages>,
    journal: JournalService,
}

async fn harness_with(
    asker: FakeAsker,
    insights: FakeInsights,
    images: FakeImages,
    journal: JournalService,
) -> Harness {
    let asker = Arc::new(asker);
    let insights = Arc::new(insights);
    let images = Arc::new(images);
    let journey = Journey::launch(
        TurnLimits::default(),
        asker.clone(),
        synthesizer(&insights, &images),
        journal.clone(),
    )
    .await;
    Harness { journey, asker, insights, images, journal }
}

async fn harness() -> Harness {
    let (journal, _) = memory_journal();
    harness_with(FakeAsker::new(), FakeInsights::default(), FakeImages::ok(), journal).await
}

/// Start, answer "A", skip, and finish with "C".
async fn run_interview(journey: &mut Journey) -> Result<inner_map_core::InsightRecord, ServiceError> {
    journey.start().await?;
    journey.answer("A").await?;
    journey.skip().await?;
    journey.finish(Some("C")).await
}

async fn sample_draft() -> InsightDraft {
    let images = Arc::new(FakeImages::ok());
    let insights = Arc::new(FakeInsights::new(vec![Ok(insight(true))]));
    let mut transcript = Transcript::new();
    transcript.push_question("Q?");
    transcript.set_answer(0, "a").unwrap();
    synthesizer(&insights, &images).synthesize(transcript).await.unwrap()
}

#[tokio::test]
async fn test_launch_screen_depends_on_store() {
    let h = harness().await;
    assert_eq!(h.journey.view(), View::Welcome);

    h.journal.record(sample_draft().await, Utc::now()).await;
    let h = harness_with(FakeAsker::new(), FakeInsights::default(), FakeImages::ok(), h.journal)
        .await;
    assert_eq!(h.journey.view(), View::Dashboard { tab: DashboardTab::Journal });
}

#[tokio::test]
async fn test_first_record_is_always_milestone() {
    let mut h = harness().await;
    let record = run_interview(&mut h.journey).await.unwrap();

    assert_eq!(h.journey.view(), View::Results);
    assert!(record.is_milestone);
    assert_eq!(record.milestone_reason.as_deref(), Some(FIRST_MILESTONE_REASON));

    let stored = h.journal.list_sessions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], record);
    assert_eq!(h.journey.current(), Some(&record));
}

#[tokio::test]
async fn test_transcript_and_answers_handed_to_synthesis() {
    let mut h = harness().await;
    let record = run_interview(&mut h.journey).await.unwrap();

    let turns = record.transcript.turns();
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[1].content, "A");
    assert_eq!(turns[3].content, SKIP_SENTINEL);
    assert_eq!(turns[5].content, "C");
    assert_eq!(turns[0].role, Role::Asker);
    assert!(record.transcript.is_well_formed());

    assert_eq!(
        h.insights.last_answers().unwrap(),
        format!("Answer 1: A\n\nAnswer 2: {SKIP_SENTINEL}\n\nAnswer 3: C")
    );
    assert_eq!(h.images.prompts(), vec!["a lighthouse at dusk".to_owned()]);
}

#[tokio::test]
async fn test_later_records_keep_synthesized_milestone_fields() {
    let insights = FakeInsights::new(vec![Ok(insight(false)), Ok(insight(true)), Ok(insight(false))]);
    let (journal, _) = memory_journal();
    let mut h = harness_with(FakeAsker::new(), insights, FakeImages::ok(), journal).await;

    let first = run_interview(&mut h.journey).await.unwrap();
    let second = run_interview(&mut h.journey).await.unwrap();
    let third = run_interview(&mut h.journey).await.unwrap();

    assert!(first.is_milestone);
    assert!(second.is_milestone);
    assert_eq!(second.milestone_reason.as_deref(), Some("A new openness."));
    assert!(!third.is_milestone);
    assert_eq!(third.milestone_reason, None);

    let stored = h.journal.list_sessions().await;
    assert_eq!(stored.len(), 3);
    assert!(!stored[0].is_milestone);
    assert_eq!(h.insights.calls(), 3);
}

#[tokio::test]
async fn test_two_patterns_is_synthesis_error_and_nothing_saved() {
    let malformed = parse_synthesized_insight(
        &serde_json::json!({
            "reflection": "r",
            "poem": "p",
            "symbolicMapTitle": "t",
            "symbolicMapDescription": "d",
            "symbolicMapImagePrompt": "i",
            "patterns": [
                {"iconName": "Shield", "title": "a", "description": "a"},
                {"iconName": "Heart", "title": "b", "description": "b"}
            ],
            "isMilestone": false
        })
        .to_string(),
    );
    assert!(malformed.is_err());

    let (journal, _) = memory_journal();
    let mut h =
        harness_with(FakeAsker::new(), FakeInsights::new(vec![malformed]), FakeImages::ok(), journal)
            .await;

    let err = run_interview(&mut h.journey).await.unwrap_err();

    assert!(matches!(err, ServiceError::Synthesis(_)));
    assert!(h.journal.is_empty().await);
    assert!(h.images.prompts().is_empty());
    assert_eq!(h.journey.view(), View::Welcome);
    assert_eq!(h.journey.error(), Some(SYNTHESIS_FAILED_MESSAGE));
    assert!(h.journey.flow().is_none());
}

#[tokio::test]
async fn test_image_failure_is_provider_error() {
    let (journal, _) = memory_journal();
    let mut h =
        harness_with(FakeAsker::new(), FakeInsights::default(), FakeImages::failing(), journal)
            .await;

    let err = run_interview(&mut h.journey).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(h.journal.is_empty().await);
    assert_eq!(h.journey.view(), View::Welcome);

    // the error clears once a new journey starts
    h.journey.start().await.unwrap();
    assert_eq!(h.journey.error(), None);
}

#[tokio::test]
async fn test_revisited_question_is_not_refetched() {
    let mut h = harness().await;
    h.journey.start().await.unwrap();
    assert_eq!(h.asker.calls(), 1);

    h.journey.answer("A").await.unwrap();
    assert_eq!(h.asker.calls(), 2);
    assert_eq!(h.asker.contexts(), vec![2]);

    h.journey.previous(Some("draft for two".to_owned())).unwrap();
    h.journey.answer("A, again").await.unwrap();
    assert_eq!(h.asker.calls(), 2);

    let flow = h.journey.flow().unwrap();
    assert_eq!(flow.cursor(), 1);
    assert_eq!(flow.draft(), "draft for two");
    assert_eq!(flow.transcript().answer(0), Some("A, again"));
}

#[tokio::test]
async fn test_failed_question_fetch_can_be_retried() {
    let asker = FakeAsker::scripted(vec![Err(provider_down())]);
    let (journal, _) = memory_journal();
    let mut h = harness_with(asker, FakeInsights::default(), FakeImages::ok(), journal).await;

    h.journey.start().await.unwrap();
    let snapshot = h.journey.snapshot().interview.unwrap();
    assert_eq!(snapshot.question, None);
    assert_eq!(snapshot.error.as_deref(), Some(QUESTION_UNAVAILABLE_MESSAGE));

    let err = h.journey.answer("too early").await.unwrap_err();
    assert!(matches!(err, ServiceError::Flow(FlowError::NoQuestion)));

    h.journey.retry().await.unwrap();
    let snapshot = h.journey.snapshot().interview.unwrap();
    assert_eq!(snapshot.question.as_deref(), Some("Question 1?"));
    assert_eq!(snapshot.error, None);
    assert_eq!(h.asker.calls(), 2);
}

#[tokio::test]
async fn test_finish_before_minimum_is_rejected() {
    let mut h = harness().await;
    h.journey.start().await.unwrap();

    let err = h.journey.finish(Some("only one")).await.unwrap_err();

    assert!(matches!(err, ServiceError::Flow(FlowError::FinishNotAllowed { .. })));
    assert_eq!(h.journey.view(), View::Interviewing);
    assert_eq!(h.insights.calls(), 0);
}

#[tokio::test]
async fn test_interview_operations_need_a_running_interview() {
    let mut h = harness().await;
    assert!(matches!(h.journey.answer("x").await, Err(ServiceError::NoInterview)));
    assert!(matches!(h.journey.set_draft("x"), Err(ServiceError::NoInterview)));
    assert!(matches!(h.journey.finish(None).await, Err(ServiceError::NoInterview)));
    assert!(matches!(h.journey.back(), Err(ServiceError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_select_entry_and_back() {
    let (journal, _) = memory_journal();
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let saved = journal.record(sample_draft().await, at).await;
    let mut h =
        harness_with(FakeAsker::new(), FakeInsights::default(), FakeImages::ok(), journal).await;

    h.journey.open_dashboard(DashboardTab::Evolution).unwrap();
    let opened = h.journey.select_entry(saved.id()).await.unwrap();
    assert_eq!(opened, saved);
    assert_eq!(h.journey.view(), View::SessionDetail { return_tab: DashboardTab::Evolution });
    assert_eq!(h.journey.snapshot().entry, Some(saved));

    h.journey.back().unwrap();
    assert_eq!(h.journey.view(), View::Dashboard { tab: DashboardTab::Evolution });
    assert_eq!(h.journey.snapshot().entry, None);

    let missing = h.journey.select_entry(1).await.unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_evolution_is_milestones_oldest_first() {
    let (journal, store) = memory_journal();
    let day = |d| Utc.with_ymd_and_hms(2025, 1, d, 12, 0, 0).unwrap();

    let mut plain = sample_draft().await;
    plain.is_milestone = false;
    journal.record(sample_draft().await, day(1)).await;
    journal.record(plain, day(2)).await;
    journal.record(sample_draft().await, day(3)).await;

    let timeline = journal.evolution().await;
    assert_eq!(timeline.iter().map(|r| r.created_at).collect::<Vec<_>>(), vec![day(1), day(3)]);

    let journal_order = store.list_sessions().await;
    assert_eq!(journal_order.first().map(|r| r.created_at), Some(day(3)));
    assert_eq!(evolution_timeline(&journal_order), timeline);
}

#[tokio::test]
async fn test_concurrent_first_records_mark_one_milestone() {
    let (journal, store) = memory_journal();
    let plain = || async {
        let mut draft = sample_draft().await;
        draft.is_milestone = false;
        draft
    };
    let (a, b) = (plain().await, plain().await);
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let (first, second) =
        tokio::join!(journal.record(a, at), journal.record(b, at + chrono::Duration::seconds(1)));

    assert!(first.is_milestone ^ second.is_milestone);
    let stored = store.list_sessions().await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.iter().filter(|r| r.is_milestone).count(), 1);
    assert!(
        stored
            .iter()
            .filter(|r| r.is_milestone)
            .all(|r| r.milestone_reason.as_deref() == Some(FIRST_MILESTONE_REASON))
    );
}
