//! 최적화 워크플로우 통합 테스트.

mod common;

use assert_matches::assert_matches;
use common::{Call, FakeApi};
use netpulse_core::config::AppConfig;
use netpulse_core::models::optimization::{default_steps, COMPLETION_MARKER};
use netpulse_dashboard::workflow::OPTIMIZE_FAILED_MESSAGE;
use netpulse_dashboard::{Dashboard, TriggerOutcome, ViewEvent, WorkflowState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

fn mount(api: &Arc<FakeApi>) -> Dashboard {
    Dashboard::mount(api.clone(), &AppConfig::default_config())
}

#[tokio::test(start_paused = true)]
async fn full_run_logs_steps_then_completion_line() {
    let api = FakeApi::new();
    let dashboard = mount(&api);

    let outcome = dashboard.workflow().run().await;
    assert_eq!(outcome, TriggerOutcome::Started);

    let panel = dashboard.view().optimizer();
    let steps = default_steps();
    assert_eq!(panel.log.len(), 13);
    assert_eq!(&panel.log[..12], &steps[..]);
    assert!(panel.log[12].contains(COMPLETION_MARKER));
    assert!(panel.error.is_none());

    let result = panel.workflow.result().expect("completed");
    assert_eq!(result.efficiency_percent, 92.0);
    assert_eq!(result.stability_label.as_deref(), Some("Stable"));
    assert_eq!(result.signal_label.as_deref(), Some("Strong"));
    assert_eq!(result.suggestions.len(), 2);
    assert_eq!(api.optimize_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn backend_called_only_after_last_step() {
    let api = FakeApi::new();
    let dashboard = mount(&api);
    let started = tokio::time::Instant::now();

    let (_, handle) = dashboard.workflow().start();
    tokio::time::sleep(Duration::from_millis(11_500)).await;
    assert_eq!(dashboard.view().optimizer().log.len(), 12);
    assert_eq!(api.optimize_count(), 0);

    handle.expect("spawned").await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(12));
    assert_eq!(api.calls(), vec![Call::OptimizeStarted, Call::OptimizeSettled]);
}

#[tokio::test(start_paused = true)]
async fn accepted_start_always_progresses_to_completion() {
    let api = FakeApi::new();
    let dashboard = mount(&api);

    let (outcome, _handle) = dashboard.workflow().start();
    assert_eq!(outcome, TriggerOutcome::Started);

    // 핸들을 기다리지 않아도 백그라운드에서 끝까지 진행된다
    tokio::time::sleep(Duration::from_secs(60)).await;
    let panel = dashboard.view().optimizer();
    assert_matches!(panel.workflow, WorkflowState::Completed(_));
    assert_eq!(panel.log.len(), 13);
    assert_eq!(api.optimize_count(), 1);
    assert!(dashboard.workflow().can_trigger());

    let (again, handle) = dashboard.workflow().start();
    assert_eq!(again, TriggerOutcome::Started);
    handle.expect("spawned").await.unwrap();
    assert_eq!(api.optimize_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn second_trigger_while_running_is_ignored() {
    let api = FakeApi::new();
    let dashboard = mount(&api);

    let (first, handle) = dashboard.workflow().start();
    assert_eq!(first, TriggerOutcome::Started);
    assert!(!dashboard.workflow().can_trigger());

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let before = dashboard.view().optimizer();
    assert_eq!(before.workflow, WorkflowState::Running { step: 1 });

    let (second, second_handle) = dashboard.workflow().start();
    assert_eq!(second, TriggerOutcome::AlreadyRunning);
    assert!(second_handle.is_none());
    assert_eq!(dashboard.view().optimizer(), before);

    handle.expect("spawned").await.unwrap();
    assert_eq!(dashboard.view().optimizer().log.len(), 13);
    assert_eq!(api.optimize_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn trigger_rejected_while_awaiting_backend() {
    let api = FakeApi::new();
    api.gate_optimize();
    let dashboard = mount(&api);

    let (_, handle) = dashboard.workflow().start();
    tokio::time::sleep(Duration::from_secs(13)).await;
    assert_eq!(
        dashboard.view().workflow_state(),
        WorkflowState::AwaitingBackend
    );

    let (second, second_handle) = dashboard.workflow().start();
    assert_eq!(second, TriggerOutcome::AlreadyRunning);
    assert!(second_handle.is_none());
    assert_eq!(dashboard.view().optimizer().log.len(), 12);

    api.release_optimize();
    handle.expect("spawned").await.unwrap();
    assert_matches!(dashboard.view().workflow_state(), WorkflowState::Completed(_));
}

#[tokio::test(start_paused = true)]
async fn backend_failure_sets_error_and_reenables_trigger() {
    let api = FakeApi::new();
    api.set_optimize(Err("speedtest unavailable".to_string()));
    let dashboard = mount(&api);

    dashboard.workflow().run().await;

    let panel = dashboard.view().optimizer();
    assert_eq!(panel.error.as_deref(), Some(OPTIMIZE_FAILED_MESSAGE));
    assert_matches!(panel.workflow, WorkflowState::Failed { .. });
    assert!(panel.workflow.result().is_none());
    // 이미 표시된 진행 로그는 유지
    assert_eq!(panel.log, default_steps());
    assert!(dashboard.workflow().can_trigger());
}

#[tokio::test(start_paused = true)]
async fn rerun_after_failure_starts_fresh() {
    let api = FakeApi::new();
    api.set_optimize(Err("boom".to_string()));
    let dashboard = mount(&api);
    dashboard.workflow().run().await;

    api.set_optimize(Ok(common::optimize_ok()));
    let outcome = dashboard.workflow().run().await;
    assert_eq!(outcome, TriggerOutcome::Started);

    let panel = dashboard.view().optimizer();
    assert!(panel.error.is_none());
    assert_eq!(panel.log.len(), 13);
    assert_matches!(panel.workflow, WorkflowState::Completed(_));
    assert_eq!(api.optimize_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn missing_completion_line_appends_nothing() {
    let api = FakeApi::new();
    let mut resp = common::optimize_ok();
    resp.optimization_log = Some(vec!["Done".to_string()]);
    api.set_optimize(Ok(resp));
    let dashboard = mount(&api);

    dashboard.workflow().run().await;

    let panel = dashboard.view().optimizer();
    assert_eq!(panel.log.len(), 12);
    let result = panel.workflow.result().expect("completed");
    assert!(result.final_log_line.is_none());
}

#[tokio::test(start_paused = true)]
async fn custom_steps_drive_the_log() {
    let api = FakeApi::new();
    let steps = vec!["warm up".to_string(), "measure".to_string()];
    let dashboard = Dashboard::mount_with_steps(
        api.clone(),
        &AppConfig::default_config(),
        steps.clone(),
    );
    let mut spy = dashboard.view().subscribe();

    dashboard.workflow().run().await;

    let mut logged = Vec::new();
    loop {
        match spy.try_recv() {
            Ok(ViewEvent::LogAppended(line)) => logged.push(line),
            Ok(_) => {}
            Err(_) => break,
        }
    }
    assert_eq!(
        logged,
        vec![
            "warm up".to_string(),
            "measure".to_string(),
            "✅ Optimization complete.".to_string()
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn teardown_during_steps_stops_log() {
    let api = FakeApi::new();
    let dashboard = mount(&api);
    let (_, handle) = dashboard.workflow().start();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(dashboard.view().optimizer().log.len(), 3);

    let mut spy = dashboard.view().subscribe();
    dashboard.unmount();
    handle.expect("spawned").await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    let panel = dashboard.view().optimizer();
    assert_eq!(panel.log.len(), 3);
    assert_eq!(panel.workflow, WorkflowState::Running { step: 2 });
    assert_eq!(api.optimize_count(), 0);
    assert!(matches!(spy.try_recv(), Err(TryRecvError::Empty)));
    let (after, after_handle) = dashboard.workflow().start();
    assert_eq!(after, TriggerOutcome::ViewClosed);
    assert!(after_handle.is_none());
    assert_eq!(dashboard.workflow().run().await, TriggerOutcome::ViewClosed);
}

#[tokio::test(start_paused = true)]
async fn teardown_while_awaiting_backend_discards_response() {
    let api = FakeApi::new();
    api.gate_optimize();
    let dashboard = mount(&api);
    let (_, handle) = dashboard.workflow().start();

    tokio::time::sleep(Duration::from_secs(13)).await;
    assert_eq!(api.optimize_count(), 1);

    let mut spy = dashboard.view().subscribe();
    dashboard.unmount();
    api.release_optimize();
    handle.expect("spawned").await.unwrap();

    // 요청은 끝까지 갔지만 결과는 반영되지 않는다
    assert_eq!(
        api.calls(),
        vec![Call::OptimizeStarted, Call::OptimizeSettled]
    );
    let panel = dashboard.view().optimizer();
    assert_eq!(panel.workflow, WorkflowState::AwaitingBackend);
    assert_eq!(panel.log.len(), 12);
    assert!(panel.error.is_none());
    assert!(matches!(spy.try_recv(), Err(TryRecvError::Empty)));
}
