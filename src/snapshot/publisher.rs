use crate::snapshot::{JointStateMessage, SnapshotSink};
use crate::state::{AggregatorMetrics, StateTable};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error};

/// Reads the table and emits one composite message per tick
pub struct SnapshotPublisher {
    table: Arc<StateTable>,
    sink: Arc<dyn SnapshotSink>,
    frame_id: String,
    metrics: AggregatorMetrics,
}

impl SnapshotPublisher {
    pub fn new(
        table: Arc<StateTable>,
        sink: Arc<dyn SnapshotSink>,
        frame_id: impl Into<String>,
        metrics: AggregatorMetrics,
    ) -> Self {
        Self {
            table,
            sink,
            frame_id: frame_id.into(),
            metrics,
        }
    }

    /// Build the composite message from the current table contents
    pub fn build_message(&self) -> JointStateMessage {
        JointStateMessage::from_entries(self.table.snapshot(), &self.frame_id, Utc::now())
    }

    /// Snapshot the table and publish exactly one message
    ///
    /// Takes `&mut self` so two ticks on the same publisher cannot run at
    /// once. Publish failures are logged and counted; the table is untouched.
    pub async fn tick(&mut self) {
        let msg = self.build_message();

        match self.sink.publish(&msg).await {
            Ok(()) => {
                self.metrics.record_published();
                debug!(joints = msg.joint_count(), "Joint states published");
            }
            Err(e) => {
                self.metrics.record_publish_failure();
                error!(error = %e, "Failed to publish joint states");
            }
        }
    }
}
