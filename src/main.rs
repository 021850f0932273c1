use anyhow::{Context, Result};
use joint_state_aggregator::config::{load_config, AggregatorConfig};
use joint_state_aggregator::nats::{ControllerSubscriber, NatsClient, NatsSink};
use joint_state_aggregator::Aggregator;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "joint_state_aggregator=info".into()),
        )
        .init();

    info!("Joint state aggregator starting...");

    // Config path: first argument, then JSA_CONFIG, then ./config.toml
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("JSA_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());

    let mut config: AggregatorConfig = load_config(&config_path)?;
    config.apply_env_overrides();

    let aggregator = Aggregator::from_config(&config).map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!(
        joints = ?aggregator.table().names(),
        config = %config_path,
        "Configuration loaded"
    );

    let nats = NatsClient::connect(config.nats.clone()).await?;

    // One subscription task per controller
    let mut subscriber_handles = Vec::with_capacity(aggregator.controllers().len());
    for resolved in aggregator.controllers() {
        let subscriber = ControllerSubscriber::subscribe(
            nats.client(),
            resolved.controller.clone(),
            config.nats.state_subject(&resolved.controller),
            aggregator.ingress(),
        )
        .await?;
        subscriber_handles.push(tokio::spawn(subscriber.run()));
    }

    let sink = Arc::new(NatsSink::new(
        nats.client().clone(),
        config.nats.output_subject.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(aggregator.scheduler(sink).run(shutdown_rx));

    info!(
        rate_hz = config.rate,
        subject = %config.nats.output_subject,
        "Publishing joint states"
    );

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    // Let the in-flight tick finish before tearing down subscriptions
    let _ = shutdown_tx.send(true);
    let ticks = scheduler_handle
        .await
        .context("Snapshot scheduler task failed")?;

    for handle in subscriber_handles {
        handle.abort();
    }

    if let Err(e) = nats.flush().await {
        error!(error = %e, "Failed to flush NATS on shutdown");
    }

    let metrics = aggregator.metrics().get_snapshot();
    info!(
        ticks = ticks,
        reports_accepted = metrics.reports_accepted,
        reports_rejected = metrics.reports_rejected,
        snapshots_published = metrics.snapshots_published,
        publish_failures = metrics.publish_failures,
        "Joint state aggregator stopped"
    );

    Ok(())
}
