//! Integration tests for the service supervisor
//!
//! Readiness timing tests run on paused tokio time, so the 15 second budget
//! elapses instantly while still being measured by the runtime clock.

mod common;

use common::{endpoint, setup_test_logging, ProbeStep, ScriptedProbe};
use corenlp_client::domain::models::LivenessState;
use corenlp_client::infrastructure::supervisor::{
    ReadinessPolicy, ServiceCommand, ServiceSupervisor, SupervisorError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn supervisor_with(probe: Arc<ScriptedProbe>) -> Arc<ServiceSupervisor> {
    Arc::new(ServiceSupervisor::new(endpoint("http://localhost:9000"), probe))
}

#[tokio::test(start_paused = true)]
async fn test_ensure_ready_recovers_after_three_seconds() {
    setup_test_logging();
    let probe = ScriptedProbe::alive_after(3);
    let supervisor = supervisor_with(probe.clone());

    let started = Instant::now();
    supervisor.ensure_ready().await.expect("service should come up");
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(3), "returned too early: {elapsed:?}");
    assert!(elapsed <= Duration::from_secs(4), "returned too late: {elapsed:?}");
    assert_eq!(probe.calls(), 4);
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Active);
}

#[tokio::test(start_paused = true)]
async fn test_ensure_ready_gives_up_after_timeout() {
    let probe = ScriptedProbe::always(ProbeStep::Unreachable);
    let supervisor = supervisor_with(probe.clone());

    let started = Instant::now();
    let err = supervisor.ensure_ready().await.unwrap_err();

    match err {
        SupervisorError::PermanentlyFailed { waited } => {
            assert!(waited >= Duration::from_secs(15));
        }
        other => panic!("expected PermanentlyFailed, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(17));
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Inactive);

    // No background polling continues once the gate has given up
    let calls = probe.calls();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(probe.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_unhealthy_answers_are_retried() {
    let probe = ScriptedProbe::new(
        [ProbeStep::Unhealthy, ProbeStep::Unhealthy],
        ProbeStep::Alive,
    );
    let supervisor = supervisor_with(probe.clone());

    supervisor.ensure_ready().await.unwrap();
    assert_eq!(probe.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy_is_honored() {
    let probe = ScriptedProbe::always(ProbeStep::Unreachable);
    let supervisor = Arc::new(
        ServiceSupervisor::new(endpoint("http://localhost:9000"), probe.clone()).with_policy(
            ReadinessPolicy {
                timeout: Duration::from_secs(2),
                poll_interval: Duration::from_millis(500),
            },
        ),
    );

    let started = Instant::now();
    let err = supervisor.ensure_ready().await.unwrap_err();
    assert!(matches!(err, SupervisorError::PermanentlyFailed { .. }));
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(probe.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_active_service_probed_once() {
    let probe = ScriptedProbe::always(ProbeStep::Alive);
    let supervisor = supervisor_with(probe.clone());

    supervisor.ensure_ready().await.unwrap();
    supervisor.ensure_ready().await.unwrap();
    supervisor.ensure_ready().await.unwrap();

    assert_eq!(probe.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_active_service_that_went_away_is_recovered() {
    let probe = ScriptedProbe::always(ProbeStep::Alive);
    let supervisor = supervisor_with(probe.clone());
    supervisor.ensure_ready().await.unwrap();

    // Service drops: the quick check fails, then two polls fail, then it is back
    probe.push([
        ProbeStep::Unreachable,
        ProbeStep::Unreachable,
        ProbeStep::Unreachable,
    ]);

    let started = Instant::now();
    supervisor.ensure_ready().await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(probe.calls(), 5);
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Active);
}

#[tokio::test(start_paused = true)]
async fn test_hard_probe_failure_is_not_retried() {
    let probe = ScriptedProbe::always(ProbeStep::Broken);
    let supervisor = supervisor_with(probe.clone());

    let err = supervisor.ensure_ready().await.unwrap_err();
    assert!(matches!(err, SupervisorError::Probe(_)));
    assert!(!err.should_retry());
    assert_eq!(probe.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_is_alive_maps_unreachable_to_should_retry() {
    let supervisor = supervisor_with(ScriptedProbe::always(ProbeStep::Unreachable));

    let err = supervisor.is_alive().await.unwrap_err();
    assert!(matches!(err, SupervisorError::ShouldRetry(_)));
    assert!(err.should_retry());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_share_one_readiness_wait() {
    let probe = ScriptedProbe::alive_after(2);
    let supervisor = supervisor_with(probe.clone());

    let (a, b) = tokio::join!(supervisor.ensure_ready(), supervisor.ensure_ready());
    a.unwrap();
    b.unwrap();

    // Second caller finds the service active and needs a single probe
    assert_eq!(probe.calls(), 4);
}

#[tokio::test]
async fn test_spawned_service_lifecycle() {
    let probe = ScriptedProbe::always(ProbeStep::Alive);
    let supervisor = Arc::new(
        ServiceSupervisor::new(endpoint("http://localhost:9000"), probe)
            .with_start_command(ServiceCommand::parse("sleep 30").unwrap())
            .with_termination_grace(Duration::from_secs(1)),
    );
    assert!(!supervisor.is_externally_managed());

    supervisor.ensure_ready().await.unwrap();
    assert!(supervisor.has_process().unwrap());
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Active);

    supervisor.stop().await.unwrap();
    assert!(!supervisor.has_process().unwrap());
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Inactive);

    // Restart after stop behaves like a fresh start
    supervisor.start().unwrap();
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Starting);
    supervisor.ensure_ready().await.unwrap();
    assert!(supervisor.has_process().unwrap());

    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn test_crashed_process_is_respawned() {
    let probe = ScriptedProbe::always(ProbeStep::Alive);
    let supervisor = Arc::new(
        ServiceSupervisor::new(endpoint("http://localhost:9000"), probe.clone())
            .with_start_command(ServiceCommand::parse("true").unwrap()),
    );

    supervisor.start().unwrap();
    // Let `true` exit so the handle is stale
    tokio::time::sleep(Duration::from_millis(200)).await;

    probe.push([ProbeStep::Unreachable]);
    supervisor.ensure_ready().await.unwrap();
    assert!(supervisor.has_process().unwrap());

    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn test_scoped_guard_stops_on_release() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("stopped");
    let stop = format!("touch {}", marker.display());

    let supervisor = Arc::new(
        ServiceSupervisor::new(
            endpoint("http://localhost:9000"),
            ScriptedProbe::always(ProbeStep::Alive),
        )
        .with_start_command(ServiceCommand::parse("sleep 30").unwrap())
        .with_stop_command(ServiceCommand::parse(&stop).unwrap())
        .with_termination_grace(Duration::from_secs(1)),
    );

    let guard = supervisor.scoped().unwrap();
    assert!(guard.has_process().unwrap());
    guard.ensure_ready().await.unwrap();
    guard.release().await.unwrap();

    assert!(marker.exists());
    assert!(!supervisor.has_process().unwrap());
    assert_eq!(supervisor.liveness().unwrap(), LivenessState::Inactive);
}

#[tokio::test]
async fn test_scoped_guard_stops_on_early_exit() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("stopped");
    let stop = format!("touch {}", marker.display());

    let supervisor = Arc::new(
        ServiceSupervisor::new(
            endpoint("http://localhost:9000"),
            ScriptedProbe::always(ProbeStep::Alive),
        )
        .with_start_command(ServiceCommand::parse("sleep 30").unwrap())
        .with_stop_command(ServiceCommand::parse(&stop).unwrap()),
    );

    let work = |supervisor: &Arc<ServiceSupervisor>| -> Result<(), SupervisorError> {
        let _guard = supervisor.scoped()?;
        Err(SupervisorError::ShouldRetry("simulated failure".to_string()))
    };

    assert!(work(&supervisor).is_err());
    assert!(marker.exists());
    assert!(!supervisor.has_process().unwrap());
}
