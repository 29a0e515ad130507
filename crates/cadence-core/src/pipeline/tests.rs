use super::*;
use crate::admission::{DelayPolicy, QuotaPolicy};
use crate::behavior::BehaviorProfile;
use crate::executor::{ExecutionFailure, FailureCategory};
use crate::jitter::JitterSampler;
use async_trait::async_trait;
use chrono::{Duration, TimeZone};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Executor returning queued results (success when the queue is empty)
#[derive(Default)]
struct ScriptedExecutor {
    results: Mutex<VecDeque<std::result::Result<(), ExecutionFailure>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    hold: Option<std::time::Duration>,
}

impl ScriptedExecutor {
    fn push_failure(&self, failure: ExecutionFailure) {
        self.results.lock().unwrap().push_back(Err(failure));
    }
}

#[async_trait]
impl ActionExecutor for ScriptedExecutor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(
        &self,
        _task: &PublishTask,
        plan: &ActionPlan,
    ) -> std::result::Result<ExecutionReport, ExecutionFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(hold) = self.hold {
            tokio::time::sleep(hold).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.results.lock().unwrap().pop_front();
        match next {
            Some(Err(failure)) => Err(failure),
            _ => Ok(ExecutionReport {
                executor: "scripted".to_string(),
                steps_executed: plan.len(),
                elapsed_ms: 0,
            }),
        }
    }
}

fn pipeline(
    daily_cap: u32,
    executor: Arc<ScriptedExecutor>,
    clock: Arc<ManualClock>,
) -> PublishPipeline {
    let admission = AdmissionController::new(
        QuotaPolicy::new(daily_cap),
        DelayPolicy::new(15 * 60_000, 60 * 60_000),
        JitterSampler::seeded(1),
    );
    let synthesizer =
        BehaviorSynthesizer::new(BehaviorProfile::default(), JitterSampler::seeded(2));
    PublishPipeline::new(admission, synthesizer, executor).with_clock(clock)
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap()
}

fn task() -> PublishTask {
    PublishTask::new("https://example.com/posts/1", "Great write-up!")
}

#[tokio::test]
async fn test_first_publish_commits() {
    let executor = Arc::new(ScriptedExecutor::default());
    let pipeline = pipeline(20, executor.clone(), ManualClock::new(start()));

    let outcome = pipeline.publish(task()).await.unwrap();
    match outcome {
        PublishOutcome::Published {
            report,
            daily_count,
        } => {
            assert_eq!(daily_count, 1);
            assert!(report.steps_executed >= "Great write-up!".len() + 1);
        }
        other => panic!("expected publish, got {other:?}"),
    }
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_second_publish_is_deferred_without_execution() {
    let executor = Arc::new(ScriptedExecutor::default());
    let clock = ManualClock::new(start());
    let pipeline = pipeline(20, executor.clone(), clock.clone());

    pipeline.publish(task()).await.unwrap();
    clock.advance(Duration::minutes(1));

    let outcome = pipeline.publish(task()).await.unwrap();
    assert!(matches!(outcome, PublishOutcome::Deferred { .. }));
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_does_not_commit() {
    let executor = Arc::new(ScriptedExecutor::default());
    executor.push_failure(
        ExecutionFailure::new(FailureCategory::NavigationTimeout, "page load timed out")
            .at_step(0),
    );
    let clock = ManualClock::new(start());
    let pipeline = pipeline(20, executor.clone(), clock.clone());

    let err = pipeline.publish(task()).await.unwrap_err();
    match err {
        Error::Execution(failure) => {
            assert_eq!(failure.category, FailureCategory::NavigationTimeout);
            assert_eq!(failure.step_index, Some(0));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let snapshot = pipeline.snapshot().await;
    assert_eq!(snapshot.daily_count, 0);
    assert!(snapshot.last_action_at.is_none());

    // Retry is not penalized: still the first action, so no spacing applies
    let outcome = pipeline.publish(task()).await.unwrap();
    assert!(matches!(
        outcome,
        PublishOutcome::Published { daily_count: 1, .. }
    ));
}

#[tokio::test]
async fn test_denied_after_daily_cap() {
    let executor = Arc::new(ScriptedExecutor::default());
    let clock = ManualClock::new(start());
    let pipeline = pipeline(2, executor.clone(), clock.clone());

    for _ in 0..2 {
        let outcome = pipeline.publish(task()).await.unwrap();
        assert!(matches!(outcome, PublishOutcome::Published { .. }));
        clock.advance(Duration::minutes(61));
    }

    let outcome = pipeline.publish(task()).await.unwrap();
    assert_eq!(
        outcome,
        PublishOutcome::Denied {
            reason: DenyReason::DailyLimitExceeded
        }
    );
    assert_eq!(executor.calls.load(Ordering::SeqCst), 2);

    clock.advance(Duration::days(1));
    let outcome = pipeline.publish(task()).await.unwrap();
    assert!(matches!(
        outcome,
        PublishOutcome::Published { daily_count: 1, .. }
    ));
}

/// Executor whose run moves the clock forward
struct SlowExecutor {
    clock: Arc<ManualClock>,
    takes: Duration,
}

#[async_trait]
impl ActionExecutor for SlowExecutor {
    fn name(&self) -> &str {
        "slow"
    }

    async fn execute(
        &self,
        _task: &PublishTask,
        plan: &ActionPlan,
    ) -> std::result::Result<ExecutionReport, ExecutionFailure> {
        self.clock.advance(self.takes);
        Ok(ExecutionReport {
            executor: "slow".to_string(),
            steps_executed: plan.len(),
            elapsed_ms: self.takes.num_milliseconds() as u64,
        })
    }
}

#[tokio::test]
async fn test_publish_spanning_midnight_counts_toward_admission_day() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 5, 4, 23, 58, 0).unwrap());
    let executor = Arc::new(SlowExecutor {
        clock: clock.clone(),
        takes: Duration::minutes(4),
    });
    let admission = AdmissionController::new(
        QuotaPolicy::new(1),
        DelayPolicy::new(15 * 60_000, 60 * 60_000),
        JitterSampler::seeded(1),
    );
    let synthesizer =
        BehaviorSynthesizer::new(BehaviorProfile::default(), JitterSampler::seeded(2));
    let pipeline =
        PublishPipeline::new(admission, synthesizer, executor).with_clock(clock.clone());

    let outcome = pipeline.publish(task()).await.unwrap();
    assert!(matches!(
        outcome,
        PublishOutcome::Published { daily_count: 1, .. }
    ));
    {
        let admission = pipeline.admission().lock().await;
        assert_eq!(
            admission.state().day_key,
            Some(chrono::NaiveDate::from_ymd_opt(2026, 5, 4).unwrap())
        );
        assert_eq!(
            admission.state().last_action_at,
            Some(Utc.with_ymd_and_hms(2026, 5, 5, 0, 2, 0).unwrap())
        );
    }

    // The new day starts empty; spacing from the late commit still applies
    assert_eq!(pipeline.snapshot().await.remaining, 1);
    clock.advance(Duration::minutes(61));
    let outcome = pipeline.publish(task()).await.unwrap();
    assert!(matches!(
        outcome,
        PublishOutcome::Published { daily_count: 1, .. }
    ));
}

#[tokio::test]
async fn test_rejects_empty_text_before_admission() {
    let executor = Arc::new(ScriptedExecutor::default());
    let pipeline = pipeline(20, executor.clone(), ManualClock::new(start()));

    let err = pipeline
        .publish(PublishTask::new("https://example.com", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    assert!(pipeline.admission().lock().await.state().day_key.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_are_serialized() {
    let executor = Arc::new(ScriptedExecutor {
        hold: Some(std::time::Duration::from_millis(500)),
        ..Default::default()
    });
    let pipeline = Arc::new(pipeline(20, executor.clone(), ManualClock::new(start())));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.publish(task()).await })
        })
        .collect();

    let mut published = 0;
    let mut deferred = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            PublishOutcome::Published { .. } => published += 1,
            PublishOutcome::Deferred { .. } => deferred += 1,
            PublishOutcome::Denied { .. } => panic!("unexpected denial"),
        }
    }

    assert_eq!(published, 1);
    assert_eq!(deferred, 3);
    assert_eq!(executor.max_in_flight.load(Ordering::SeqCst), 1);
}

#[test]
fn test_preview_does_not_touch_admission() {
    let executor = Arc::new(ScriptedExecutor::default());
    let pipeline = pipeline(20, executor, ManualClock::new(start()));

    let plan = pipeline.preview("hey").unwrap();
    assert_eq!(plan.typed_text(), "hey");
    assert_eq!(pipeline.executor_name(), "scripted");
}

#[test]
fn test_outcome_serialization() {
    let json = serde_json::to_value(PublishOutcome::Deferred { wait_ms: 1200 }).unwrap();
    assert_eq!(json["status"], "deferred");
    assert_eq!(json["wait_ms"], 1200);
}
