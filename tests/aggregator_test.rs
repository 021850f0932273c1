// Integration tests for the aggregate-and-publish loop
//
// Controller reports are fed through UpdateIngress from concurrent tasks and
// snapshots are collected from an in-process BroadcastSink instead of NATS.

use joint_state_aggregator::config::AggregatorConfig;
use joint_state_aggregator::snapshot::BroadcastSink;
use joint_state_aggregator::{Aggregator, ControllerReport, JointStateMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{sleep, timeout};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn head_config(rate: f64) -> AggregatorConfig {
    let toml = format!(
        r#"
            rate = {rate:?}
            joint_controllers = ["tilt_controller", "pan_controller"]

            [controllers.pan_controller]
            joint_name = "head_pan_joint"

            [controllers.tilt_controller]
            joint_name = "head_tilt_joint"
        "#
    );
    toml::from_str(&toml).unwrap()
}

fn report(name: &str, position: f64, velocity: f64, effort: f64) -> ControllerReport {
    ControllerReport {
        name: name.to_string(),
        position,
        velocity,
        effort,
    }
}

async fn next_message(rx: &mut broadcast::Receiver<JointStateMessage>) -> JointStateMessage {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot channel closed")
}

fn assert_aligned(msg: &JointStateMessage) {
    assert_eq!(msg.name.len(), msg.position.len());
    assert_eq!(msg.name.len(), msg.velocity.len());
    assert_eq!(msg.name.len(), msg.effort.len());
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Before any report, snapshots carry every configured joint at zero.
#[tokio::test]
async fn test_first_snapshot_is_seeded_with_zeroes() {
    let aggregator = Aggregator::from_config(&head_config(100.0)).unwrap();
    let sink = BroadcastSink::new(16);
    let mut rx = sink.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(aggregator.scheduler(Arc::new(sink)).run(shutdown_rx));

    let msg = next_message(&mut rx).await;
    assert_aligned(&msg);
    // Sorted by controller name
    assert_eq!(msg.name, vec!["head_pan_joint", "head_tilt_joint"]);
    assert_eq!(msg.position, vec![0.0, 0.0]);
    assert_eq!(msg.velocity, vec![0.0, 0.0]);
    assert_eq!(msg.effort, vec![0.0, 0.0]);
    assert_eq!(msg.header.frame_id, "base_link");

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

/// Reports from concurrent producers all show up in later snapshots.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reports_reach_snapshot() {
    let aggregator = Aggregator::from_config(&head_config(200.0)).unwrap();
    let sink = BroadcastSink::new(64);
    let mut rx = sink.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(aggregator.scheduler(Arc::new(sink)).run(shutdown_rx));

    let mut producers = vec![];
    for (controller, joint, sign) in [
        ("pan_controller", "head_pan_joint", 1.0),
        ("tilt_controller", "head_tilt_joint", -1.0),
    ] {
        let ingress = aggregator.ingress();
        producers.push(tokio::spawn(async move {
            for step in 1..=50 {
                let v = sign * step as f64 / 100.0;
                ingress.on_report(controller, report(joint, v, v * 2.0, v * 3.0));
                tokio::task::yield_now().await;
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }

    // Drain until a snapshot taken after the last report arrives
    let mut msg = next_message(&mut rx).await;
    while msg.position != vec![0.5, -0.5] {
        assert_aligned(&msg);
        msg = match rx.recv().await {
            Ok(m) => m,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(e) => panic!("snapshot channel failed: {}", e),
        };
    }
    assert_eq!(msg.velocity, vec![1.0, -1.0]);
    assert_eq!(msg.effort, vec![1.5, -1.5]);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(aggregator.metrics().get_snapshot().reports_accepted, 100);
}

/// Reports for unconfigured joints never change the snapshot layout.
#[tokio::test]
async fn test_unknown_joint_does_not_change_snapshot() {
    let aggregator = Aggregator::from_config(&head_config(100.0)).unwrap();
    let ingress = aggregator.ingress();

    ingress.on_report("gripper_controller", report("gripper_joint", 1.0, 1.0, 1.0));
    ingress.on_report("pan_controller", report("head_pan_joint", 0.25, 0.0, 0.0));

    let sink = BroadcastSink::new(16);
    let mut rx = sink.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(aggregator.scheduler(Arc::new(sink)).run(shutdown_rx));

    let msg = next_message(&mut rx).await;
    assert_eq!(msg.name, vec!["head_pan_joint", "head_tilt_joint"]);
    assert_eq!(msg.position, vec![0.25, 0.0]);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    let metrics = aggregator.metrics().get_snapshot();
    assert_eq!(metrics.reports_accepted, 1);
    assert_eq!(metrics.reports_rejected, 1);
}

/// With no subscriber every tick fails to publish, yet the scheduler keeps going.
#[tokio::test]
async fn test_publish_failures_do_not_stop_scheduler() {
    let aggregator = Aggregator::from_config(&head_config(200.0)).unwrap();
    let sink = BroadcastSink::new(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(aggregator.scheduler(Arc::new(sink)).run(shutdown_rx));
    sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();
    let ticks = handle.await.unwrap();

    let metrics = aggregator.metrics().get_snapshot();
    assert!(ticks >= 2);
    assert_eq!(metrics.publish_failures, ticks);
    assert_eq!(metrics.snapshots_published, 0);
}

/// Zero configured controllers is fatal.
#[test]
fn test_empty_controller_list_is_fatal() {
    let config: AggregatorConfig = toml::from_str("rate = 20.0").unwrap();
    let result = Aggregator::from_config(&config);
    assert!(matches!(
        result,
        Err(joint_state_aggregator::AggregatorError::Configuration(_))
    ));
}
