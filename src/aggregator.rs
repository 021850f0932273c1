//! Aggregator - owns the joint state table and wires the ingress and publish paths.
//!
//! ```text
//! controllers ──► UpdateIngress ──► StateTable ◄── SnapshotPublisher ◄── Scheduler
//!                                                        │
//!                                                        ▼
//!                                                   SnapshotSink
//! ```

use crate::config::{AggregatorConfig, ResolvedController};
use crate::error::AggregatorError;
use crate::ingress::UpdateIngress;
use crate::snapshot::scheduler::period_from_rate;
use crate::snapshot::{Scheduler, SnapshotPublisher, SnapshotSink};
use crate::state::{AggregatorMetrics, StateTable};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Joint state aggregator
///
/// Every joint in the table is seeded from the resolved controller list; the
/// table is shared with the ingress and publisher by `Arc`, never globally.
pub struct Aggregator {
    table: Arc<StateTable>,
    metrics: AggregatorMetrics,
    controllers: Vec<ResolvedController>,
    frame_id: String,
    period: Duration,
}

impl Aggregator {
    /// Build an aggregator from a loaded configuration
    pub fn from_config(config: &AggregatorConfig) -> Result<Self, AggregatorError> {
        let controllers = config.resolve_controllers()?;
        Self::new(controllers, &config.frame_id, config.rate)
    }

    /// Create an aggregator for the given controllers
    ///
    /// Fails with a configuration error on an empty controller list, duplicate
    /// joint names, or a rate that is not a positive number.
    pub fn new(
        controllers: Vec<ResolvedController>,
        frame_id: &str,
        rate_hz: f64,
    ) -> Result<Self, AggregatorError> {
        let period = period_from_rate(rate_hz)?;
        let table = StateTable::initialize(controllers.iter().map(|c| c.joint_name.clone()))?;

        let names: Vec<&str> = controllers.iter().map(|c| c.controller.as_str()).collect();
        debug!(
            controllers = ?names,
            rate_hz = rate_hz,
            frame_id = %frame_id,
            "Joint state aggregator configured"
        );

        Ok(Self {
            table: Arc::new(table),
            metrics: AggregatorMetrics::new(),
            controllers,
            frame_id: frame_id.to_string(),
            period,
        })
    }

    /// Handle for submitting controller reports
    pub fn ingress(&self) -> UpdateIngress {
        UpdateIngress::new(Arc::clone(&self.table), self.metrics.clone())
    }

    /// Scheduler publishing snapshots of this aggregator's table to `sink`
    pub fn scheduler(&self, sink: Arc<dyn SnapshotSink>) -> Scheduler {
        let publisher = SnapshotPublisher::new(
            Arc::clone(&self.table),
            sink,
            self.frame_id.clone(),
            self.metrics.clone(),
        );
        Scheduler::new(publisher, self.period)
    }

    pub fn table(&self) -> &Arc<StateTable> {
        &self.table
    }

    pub fn metrics(&self) -> &AggregatorMetrics {
        &self.metrics
    }

    /// Controllers in subscription order
    pub fn controllers(&self) -> &[ResolvedController] {
        &self.controllers
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
