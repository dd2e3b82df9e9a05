//! Behaviour tests for review status change notifications.

use std::sync::Arc;
use std::time::Duration;

use eyre::eyre;
use mockable::DefaultClock;
use review_notifier::review::{
    adapters::memory::{RecordingNotifier, RecordingSleeper, ScriptedStatusSource},
    domain::{ReviewStatus, WorkItemRecord},
    services::{CycleOutcome, PollSettings, PollState, StatusPollService},
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

type TestService =
    StatusPollService<ScriptedStatusSource, RecordingNotifier, RecordingSleeper, DefaultClock>;

#[derive(Default)]
struct NotifierWorld {
    source: Arc<ScriptedStatusSource>,
    notifier: Arc<RecordingNotifier>,
    service: Option<TestService>,
    state: Option<PollState>,
    last_outcome: Option<CycleOutcome>,
}

impl NotifierWorld {
    fn service(&self) -> Result<&TestService, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre!("notifier should be started"))
    }
}

#[fixture]
fn world() -> NotifierWorld {
    NotifierWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[given("a freshly started notifier")]
fn fresh_notifier(world: &mut NotifierWorld) {
    let service = StatusPollService::new(
        world.source.clone(),
        world.notifier.clone(),
        Arc::new(RecordingSleeper::new()),
        Arc::new(DefaultClock),
        PollSettings::new(Duration::from_secs(600)),
    );
    world.state = Some(service.initial_state());
    world.service = Some(service);
}

#[given(r#"the endpoint reports "{name}" with status "{status}""#)]
fn endpoint_reports(world: &mut NotifierWorld, name: String, status: String) {
    world.source.push_response(json!({
        "homeworks": [{"homework_name": name, "status": status}]
    }));
}

#[given("the endpoint responds without a homeworks field")]
fn endpoint_without_homeworks(world: &mut NotifierWorld) {
    world.source.push_response(json!({"current_date": 0}));
}

#[when("a poll cycle runs")]
fn poll_cycle_runs(world: &mut NotifierWorld) -> Result<(), eyre::Report> {
    let mut state = world
        .state
        .take()
        .ok_or_else(|| eyre!("notifier state should exist"))?;
    let outcome = run_async(world.service()?.tick(&mut state));
    world.state = Some(state);
    world.last_outcome = Some(outcome);
    Ok(())
}

#[then(r"{count:usize} notifications have been sent")]
fn notifications_sent(world: &NotifierWorld, count: usize) -> Result<(), eyre::Report> {
    let sent = world.notifier.delivered().len();
    if sent != count {
        return Err(eyre!("expected {count} notifications, got {sent}"));
    }
    Ok(())
}

#[then(r#"the last notification reports "{name}" as "{status}""#)]
fn last_notification_reports(
    world: &NotifierWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let review_status = ReviewStatus::try_from(status.as_str())?;
    let expected = WorkItemRecord::new(name, review_status).render().into_inner();
    let delivered = world.notifier.delivered();
    let last = delivered
        .last()
        .ok_or_else(|| eyre!("at least one notification should exist"))?;
    if *last != expected {
        return Err(eyre!("expected '{expected}', got '{last}'"));
    }
    Ok(())
}

#[then(r#"the cycle failed at the "{stage}" stage"#)]
fn cycle_failed_at(world: &NotifierWorld, stage: String) -> Result<(), eyre::Report> {
    let failure = world
        .last_outcome
        .as_ref()
        .and_then(CycleOutcome::failure)
        .ok_or_else(|| eyre!("last cycle should have failed"))?;
    if failure.stage().as_str() != stage {
        return Err(eyre!(
            "expected failure at '{stage}', got '{}'",
            failure.stage()
        ));
    }
    Ok(())
}

#[scenario(
    path = "tests/features/status_change_notification.feature",
    name = "Notify each distinct status change once"
)]
#[tokio::test(flavor = "multi_thread")]
async fn notify_each_distinct_change_once(world: NotifierWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/status_change_notification.feature",
    name = "Malformed response is skipped without stopping the loop"
)]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_response_is_skipped(world: NotifierWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/status_change_notification.feature",
    name = "Unknown status is never rendered"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_is_never_rendered(world: NotifierWorld) {
    let _ = world;
}
