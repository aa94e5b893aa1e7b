//! End-to-end pipeline tests with mocked collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use mockall::predicate::eq;
use serde_json::{json, Value};
use std::sync::Mutex;

use inbox_triage::config::Config;
use inbox_triage::error::{Result, TriageError};
use inbox_triage::models::{EmailData, Quadrant};
use inbox_triage::pipeline::{Outcome, TriagePipeline};
use inbox_triage::stats::SessionStatistics;
use inbox_triage::store::{
    AiClassifier, CalendarStore, MailThread, NewTask, StatisticsStore, TaskStore,
};

mock! {
    Thread {}

    #[async_trait]
    impl MailThread for Thread {
        fn subject(&self) -> String;
        fn permalink(&self) -> String;
        async fn add_label(&self, label_key: &str) -> Result<()>;
        async fn move_to_trash(&self) -> Result<()>;
        async fn move_to_archive(&self) -> Result<()>;
        async fn mark_important(&self) -> Result<()>;
    }
}

mock! {
    Classifier {}

    #[async_trait]
    impl AiClassifier for Classifier {
        async fn classify(&self, email: &EmailData) -> Result<Option<Value>>;
    }
}

mock! {
    Calendar {}

    #[async_trait]
    impl CalendarStore for Calendar {
        async fn create_event(
            &self,
            title: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            description: &str,
        ) -> Result<String>;
        async fn add_popup_reminder(&self, event_id: &str, minutes_before: i64) -> Result<()>;
    }
}

mock! {
    Tasks {}

    #[async_trait]
    impl TaskStore for Tasks {
        async fn create_task(&self, task: &NewTask) -> Result<String>;
    }
}

/// In-memory statistics store so tests can observe the persisted tally
#[derive(Default)]
struct MemoryStatsStore {
    stats: Mutex<SessionStatistics>,
}

#[async_trait]
impl StatisticsStore for MemoryStatsStore {
    async fn load(&self) -> Result<SessionStatistics> {
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn save(&self, stats: &SessionStatistics) -> Result<()> {
        *self.stats.lock().unwrap() = stats.clone();
        Ok(())
    }
}

fn email(subject: &str) -> EmailData {
    EmailData {
        subject: subject.to_string(),
        sender: "Sam <sam@example.com>".to_string(),
        to: "me@example.com".to_string(),
        from: "sam@example.com".to_string(),
        body: "hello".to_string(),
    }
}

fn classifier_returning(raw: Value) -> MockClassifier {
    let mut classifier = MockClassifier::new();
    classifier
        .expect_classify()
        .returning(move |_| Ok(Some(raw.clone())));
    classifier
}

fn relaxed_thread() -> MockThread {
    let mut thread = MockThread::new();
    thread.expect_subject().return_const("A subject".to_string());
    thread
        .expect_permalink()
        .return_const("https://mail.example.com/t/1".to_string());
    thread
}

async fn pipeline_with(
    classifier: MockClassifier,
    calendar: MockCalendar,
    tasks: MockTasks,
) -> TriagePipeline {
    TriagePipeline::new(
        &Config::default(),
        Box::new(classifier),
        Box::new(calendar),
        Box::new(tasks),
        Box::new(MemoryStatsStore::default()),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn family_email_lands_in_schedule_quadrant() {
    // FAMILY is important but not urgent in the default policy, so an
    // AI baseline of false/false resolves to NotUrgentImportant
    let raw = json!({
        "categories": ["FAMILY"],
        "ai_urgent": false,
        "ai_important": false,
        "is_spam_or_junk": false,
    });
    let mut calendar = MockCalendar::new();
    calendar.expect_create_event().never();
    let mut tasks = MockTasks::new();
    tasks.expect_create_task().never();
    let mut pipeline = pipeline_with(classifier_returning(raw), calendar, tasks).await;

    let mut thread = relaxed_thread();
    thread
        .expect_add_label()
        .with(eq("Family"))
        .times(1)
        .returning(|_| Ok(()));
    thread
        .expect_add_label()
        .with(eq("Schedule"))
        .times(1)
        .returning(|_| Ok(()));
    thread
        .expect_add_label()
        .with(eq("To Plan"))
        .times(1)
        .returning(|_| Ok(()));
    thread.expect_mark_important().times(1).returning(|| Ok(()));
    // keep_in_inbox is true for this quadrant
    thread.expect_move_to_archive().never();
    thread.expect_move_to_trash().never();

    let outcome = pipeline.process_email(&thread, &email("Dinner?")).await.unwrap();
    assert_eq!(outcome, Outcome::Processed(Quadrant::NotUrgentImportant));

    let stats = pipeline.statistics();
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.by_category.get("Family"), Some(&1));
    assert_eq!(stats.by_priority.get("NOT_URGENT_IMPORTANT"), Some(&1));
}

#[tokio::test]
async fn spam_is_trashed_once_with_no_quadrant_label() {
    let raw = json!({
        "categories": ["SPAM"],
        "is_spam_or_junk": true,
        // AI urgency claims must not rescue spam
        "ai_urgent": true,
        "ai_important": true,
    });
    let mut calendar = MockCalendar::new();
    calendar.expect_create_event().never();
    let mut tasks = MockTasks::new();
    tasks.expect_create_task().never();
    let mut pipeline = pipeline_with(classifier_returning(raw), calendar, tasks).await;

    let mut thread = relaxed_thread();
    thread
        .expect_add_label()
        .with(eq("Spam"))
        .times(1)
        .returning(|_| Ok(()));
    thread.expect_move_to_trash().times(1).returning(|| Ok(()));
    thread.expect_mark_important().never();
    thread.expect_move_to_archive().never();

    let outcome = pipeline.process_email(&thread, &email("WIN BIG")).await.unwrap();
    assert_eq!(outcome, Outcome::Processed(Quadrant::NotUrgentNotImportant));
}

#[tokio::test]
async fn urgent_important_schedules_a_reminder() {
    let raw = json!({
        "categories": ["WORK"],
        "ai_urgent": true,
        "ai_important": false,
        "estimated_time": "1 hour",
        "calendar_scheduling": {
            "suggested_time": "2025-04-01T09:00:00",
            "is_ai_suggested": true,
            "ignore_calendar_event_creation": false,
        },
    });
    let mut calendar = MockCalendar::new();
    calendar
        .expect_create_event()
        .withf(|title, start, end, _desc| {
            title == "Follow up: A subject"
                && start.to_rfc3339().starts_with("2025-04-01T09:00:00")
                && (*end - *start) == chrono::Duration::hours(1)
        })
        .times(1)
        .returning(|_, _, _, _| Ok("evt-9".to_string()));
    calendar
        .expect_add_popup_reminder()
        .with(eq("evt-9"), eq(5i64))
        .times(1)
        .returning(|_, _| Ok(()));
    let mut tasks = MockTasks::new();
    tasks.expect_create_task().never();
    let mut pipeline = pipeline_with(classifier_returning(raw), calendar, tasks).await;

    let mut thread = relaxed_thread();
    thread.expect_add_label().returning(|_| Ok(()));
    thread.expect_mark_important().times(1).returning(|| Ok(()));
    thread.expect_move_to_archive().never();
    thread.expect_move_to_trash().never();

    let outcome = pipeline
        .process_email(&thread, &email("Board deck"))
        .await
        .unwrap();
    // WORK adds important on top of the AI's urgent
    assert_eq!(outcome, Outcome::Processed(Quadrant::UrgentImportant));
}

#[tokio::test]
async fn self_sent_email_creates_a_task() {
    let raw = json!({
        "categories": ["HOME"],
        "task_creation": {
            "should_create_task": true,
            "task_title": "Fix the gutter",
            "task_notes": "before the rain",
            "task_due_date": "2025-05-01",
            "task_priority": "low",
        },
    });
    let mut tasks = MockTasks::new();
    tasks
        .expect_create_task()
        .withf(|task| {
            task.title == "Fix the gutter"
                && task.priority_rank == 3
                && task.due == chrono::NaiveDate::from_ymd_opt(2025, 5, 1)
        })
        .times(1)
        .returning(|_| Ok("task-7".to_string()));
    let mut calendar = MockCalendar::new();
    calendar.expect_create_event().never();
    let mut pipeline = pipeline_with(classifier_returning(raw), calendar, tasks).await;

    let mut thread = relaxed_thread();
    thread.expect_add_label().returning(|_| Ok(()));
    thread.expect_move_to_archive().returning(|| Ok(()));

    // Headers say self-sent even though the AI did not flag it
    let mut note = email("Fix the gutter");
    note.from = "me@example.com".to_string();

    let outcome = pipeline.process_email(&thread, &note).await.unwrap();
    assert_eq!(outcome, Outcome::Processed(Quadrant::NotUrgentNotImportant));
}

#[tokio::test]
async fn missing_categories_flags_manual_review() {
    let raw = json!({ "confidence": 0.4 });
    let calendar = MockCalendar::new();
    let tasks = MockTasks::new();
    let mut pipeline = pipeline_with(classifier_returning(raw), calendar, tasks).await;

    let mut thread = relaxed_thread();
    thread
        .expect_add_label()
        .with(eq("Manual Review"))
        .times(1)
        .returning(|_| Ok(()));

    let outcome = pipeline
        .process_email(&thread, &email("???"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::SkippedInvalid);
    assert_eq!(pipeline.statistics().processed, 0);
}

#[tokio::test]
async fn null_classification_flags_manual_review() {
    let mut classifier = MockClassifier::new();
    classifier.expect_classify().returning(|_| Ok(None));
    let mut pipeline =
        pipeline_with(classifier, MockCalendar::new(), MockTasks::new()).await;

    let mut thread = relaxed_thread();
    thread
        .expect_add_label()
        .with(eq("Manual Review"))
        .times(1)
        .returning(|_| Ok(()));

    let outcome = pipeline
        .process_email(&thread, &email("anything"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::ClassifierUnavailable);
}

#[tokio::test]
async fn batch_continues_past_a_failing_email() {
    let mut classifier = MockClassifier::new();
    let mut call = 0;
    classifier.expect_classify().returning(move |_| {
        call += 1;
        if call == 1 {
            Ok(Some(json!({ "categories": ["SHOPPING"] })))
        } else {
            Ok(Some(json!({ "categories": ["WORK"] })))
        }
    });
    let mut pipeline =
        pipeline_with(classifier, MockCalendar::new(), MockTasks::new()).await;

    // First thread fails its essential label call
    let mut failing = relaxed_thread();
    failing
        .expect_add_label()
        .returning(|_| Err(TriageError::LabelError("store down".to_string())));

    let mut healthy = relaxed_thread();
    healthy.expect_add_label().returning(|_| Ok(()));
    healthy.expect_mark_important().returning(|| Ok(()));
    healthy.expect_move_to_archive().returning(|| Ok(()));
    healthy.expect_move_to_trash().never();

    let batch: Vec<(&dyn MailThread, EmailData)> = vec![
        (&failing, email("first")),
        (&healthy, email("second")),
    ];
    let summary = pipeline.process_batch(&batch).await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test]
async fn unknown_categories_are_filtered_before_actions() {
    let raw = json!({
        "categories": ["WORK", "TOTALLY_MADE_UP"],
        "ai_urgent": false,
        "ai_important": false,
    });
    let mut pipeline = pipeline_with(
        classifier_returning(raw),
        MockCalendar::new(),
        MockTasks::new(),
    )
    .await;

    let mut thread = relaxed_thread();
    // Only the known category's label may appear
    thread
        .expect_add_label()
        .with(eq("Work"))
        .times(1)
        .returning(|_| Ok(()));
    thread
        .expect_add_label()
        .with(eq("Schedule"))
        .times(1)
        .returning(|_| Ok(()));
    thread
        .expect_add_label()
        .with(eq("To Plan"))
        .times(1)
        .returning(|_| Ok(()));
    thread.expect_mark_important().returning(|| Ok(()));

    let outcome = pipeline
        .process_email(&thread, &email("mixed bag"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Processed(Quadrant::NotUrgentImportant));
}
