//! OpenLineage event fan-out to registered listeners

mod common;

use common::{FailingListener, Fixture, PanickingListener, RecordingListener, SlowListener};
use lineage_integrator::listener::{FailureReason, OpenLineageDataset, RunEventType};
use lineage_integrator::{OpenLineageListener, OpenLineageListenerManager, OpenLineageRunEvent};
use std::sync::Arc;
use std::time::Duration;

fn run_event(job: &str) -> OpenLineageRunEvent {
    OpenLineageRunEvent::new(RunEventType::Complete, "airflow", job, "https://example.com/producer")
        .with_input(OpenLineageDataset::new("s3://raw", "orders.csv"))
        .with_output(OpenLineageDataset::new("postgres://dw", "public.orders"))
}

fn recorder(name: &str) -> Arc<RecordingListener> {
    Arc::new(RecordingListener::new(name))
}

#[tokio::test]
async fn every_listener_receives_the_event_and_its_json() {
    let fx = Fixture::new();
    let first = recorder("first");
    let second = recorder("second");
    fx.ctx.register_listener(first.clone());
    fx.ctx.register_listener(second.clone());

    let event = run_event("load_orders");
    let expected_raw = event.to_json().unwrap();
    let report = fx.ctx.publish_open_lineage_run_event(event).await;

    assert!(report.is_complete());
    assert_eq!(report.listeners_notified, 2);
    assert_eq!(report.delivered(), 2);
    for listener in [&first, &second] {
        let received = listener.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].job_name.as_deref(), Some("load_orders"));
        assert_eq!(received[0].raw, expected_raw);
    }

    // The raw form parses back to the same event
    let parsed = OpenLineageRunEvent::from_json(&first.received()[0].raw).unwrap();
    assert_eq!(parsed.job.name, "load_orders");
    assert_eq!(parsed.outputs.len(), 1);
}

#[tokio::test]
async fn raw_publish_passes_no_parsed_event() {
    let fx = Fixture::new();
    let listener = recorder("raw");
    fx.ctx.register_listener(listener.clone());

    let raw = r#"{"eventType":"START","custom":"not a full run event"}"#;
    let report = fx.ctx.publish_raw_open_lineage_run_event(raw).await;

    assert!(report.is_complete());
    let received = listener.received();
    assert_eq!(received[0].job_name, None);
    assert_eq!(received[0].raw, raw);
}

#[tokio::test]
async fn publishing_without_listeners_is_a_no_op() {
    let fx = Fixture::new();
    let report = fx.ctx.publish_open_lineage_run_event(run_event("idle")).await;
    assert_eq!(report.listeners_notified, 0);
    assert!(report.is_complete());
}

#[tokio::test]
async fn a_failing_listener_does_not_block_the_others() {
    let fx = Fixture::new();
    let healthy = recorder("healthy");
    fx.ctx.register_listener(Arc::new(FailingListener));
    fx.ctx.register_listener(healthy.clone());

    let report = fx.ctx.publish_open_lineage_run_event(run_event("load_orders")).await;

    assert_eq!(healthy.count(), 1);
    assert_eq!(report.listeners_notified, 2);
    assert_eq!(report.delivered(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].listener, "failing");
    assert!(matches!(report.failures[0].reason, FailureReason::Failed(ref m) if m.contains("refused")));
}

#[tokio::test]
async fn a_panicking_listener_is_contained() {
    let fx = Fixture::new();
    let healthy = recorder("healthy");
    fx.ctx.register_listener(Arc::new(PanickingListener));
    fx.ctx.register_listener(healthy.clone());

    let report = fx.ctx.publish_open_lineage_run_event(run_event("load_orders")).await;

    assert_eq!(healthy.count(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].listener, "panicking");
    assert_eq!(report.failures[0].reason, FailureReason::Panicked);

    // The context keeps working afterwards
    let again = fx.ctx.publish_open_lineage_run_event(run_event("load_orders")).await;
    assert_eq!(again.delivered(), 1);
    assert_eq!(healthy.count(), 2);
}

#[tokio::test]
async fn slow_listeners_time_out() {
    let manager = OpenLineageListenerManager::new().with_delivery_timeout(Duration::from_millis(50));
    let fast = recorder("fast");
    manager.register(Arc::new(SlowListener(Duration::from_secs(5))));
    manager.register(fast.clone());

    let started = std::time::Instant::now();
    let report = manager.publish(run_event("load_orders")).await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(fast.count(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].listener, "slow");
    assert_eq!(report.failures[0].reason, FailureReason::TimedOut);
}

#[tokio::test]
async fn registering_twice_delivers_once() {
    let fx = Fixture::new();
    let listener = recorder("once");
    assert!(fx.ctx.register_listener(listener.clone()));
    assert!(!fx.ctx.register_listener(listener.clone()));
    assert_eq!(fx.ctx.listener_count(), 1);

    fx.ctx.publish_open_lineage_run_event(run_event("load_orders")).await;
    assert_eq!(listener.count(), 1);
}

#[tokio::test]
async fn late_registration_and_unregistration() {
    let fx = Fixture::new();
    let early = recorder("early");
    let late = recorder("late");
    fx.ctx.register_listener(early.clone());

    fx.ctx.publish_open_lineage_run_event(run_event("one")).await;
    fx.ctx.register_listener(late.clone());
    fx.ctx.publish_open_lineage_run_event(run_event("two")).await;

    let early_dyn: Arc<dyn OpenLineageListener> = early.clone();
    assert!(fx.ctx.unregister_listener(&early_dyn));
    assert!(!fx.ctx.unregister_listener(&early_dyn));
    fx.ctx.publish_open_lineage_run_event(run_event("three")).await;

    let jobs = |l: &RecordingListener| -> Vec<String> {
        l.received().into_iter().filter_map(|r| r.job_name).collect()
    };
    assert_eq!(jobs(&*early), vec!["one", "two"]);
    assert_eq!(jobs(&*late), vec!["two", "three"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_publishes_all_arrive() {
    let fx = Fixture::new();
    let ctx = Arc::new(fx.ctx);
    let listener = recorder("concurrent");
    ctx.register_listener(listener.clone());

    let publishers: Vec<_> = (0..16)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                ctx.publish_open_lineage_run_event(run_event(&format!("job-{}", i)))
                    .await
            })
        })
        .collect();
    for publisher in publishers {
        assert!(publisher.await.unwrap().is_complete());
    }

    let mut jobs: Vec<String> = listener
        .received()
        .into_iter()
        .filter_map(|r| r.job_name)
        .collect();
    jobs.sort();
    let mut expected: Vec<String> = (0..16).map(|i| format!("job-{}", i)).collect();
    expected.sort();
    assert_eq!(jobs, expected);
}

#[tokio::test]
async fn context_uses_the_configured_timeout() {
    let mut config = common::config_for(common::SOURCE_A);
    config.listener_timeout_secs = 1;
    let fx = Fixture::with_config(config);
    fx.ctx
        .register_listener(Arc::new(SlowListener(Duration::from_secs(10))));

    let report = fx.ctx.publish_open_lineage_run_event(run_event("load_orders")).await;
    assert_eq!(report.failures[0].reason, FailureReason::TimedOut);
}
