use crate::error::AggregatorError;
use crate::snapshot::{JointStateMessage, SnapshotSink};
use async_trait::async_trait;
use tracing::trace;

/// Publishes composite snapshots to a NATS subject as JSON
#[derive(Clone)]
pub struct NatsSink {
    client: async_nats::Client,
    subject: String,
}

impl NatsSink {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl SnapshotSink for NatsSink {
    /// Subject: configured output subject
    /// Payload: JSON-serialized JointStateMessage
    async fn publish(&self, msg: &JointStateMessage) -> Result<(), AggregatorError> {
        let payload = serde_json::to_vec(msg).map_err(|e| {
            AggregatorError::PublishFailure(format!("failed to serialize snapshot: {}", e))
        })?;

        trace!(subject = %self.subject, bytes = payload.len(), "Publishing joint states to NATS");

        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| {
                AggregatorError::PublishFailure(format!(
                    "failed to publish to subject '{}': {}",
                    self.subject, e
                ))
            })
    }
}
