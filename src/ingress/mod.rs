// Controller report ingestion

use crate::state::{AggregatorMetrics, StateEntry, StateTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{trace, warn};


/// State report published by one joint controller
///
/// Accepts both the plain field names and the servo controller names
/// (`current_pos`, `load`). Extra fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerReport {
    /// Joint the controller drives
    pub name: String,

    #[serde(alias = "current_pos")]
    pub position: f64,

    pub velocity: f64,

    #[serde(alias = "load")]
    pub effort: f64,
}

impl From<ControllerReport> for StateEntry {
    fn from(report: ControllerReport) -> Self {
        StateEntry::new(report.name, report.position, report.velocity, report.effort)
    }
}

/// Entry point for controller reports
///
/// Cloned into every subscription task. Each call performs exactly one
/// table write and never waits on the publish side.
#[derive(Clone)]
pub struct UpdateIngress {
    table: Arc<StateTable>,
    metrics: AggregatorMetrics,
}

impl UpdateIngress {
    pub fn new(table: Arc<StateTable>, metrics: AggregatorMetrics) -> Self {
        Self { table, metrics }
    }

    /// Write one report into the table
    ///
    /// Reports for unconfigured joints are logged and dropped.
    pub fn on_report(&self, producer_id: &str, report: ControllerReport) {
        let name = report.name.clone();

        match self.table.update(report.into()) {
            Ok(()) => {
                self.metrics.record_accepted();
                trace!(producer = %producer_id, joint = %name, "Joint state updated");
            }
            Err(e) => {
                self.metrics.record_rejected();
                warn!(
                    producer = %producer_id,
                    joint = %name,
                    error = %e,
                    "Dropping report for unconfigured joint"
                );
            }
        }
    }
}
