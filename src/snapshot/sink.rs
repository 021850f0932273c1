use crate::error::AggregatorError;
use crate::snapshot::JointStateMessage;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Output channel for composite snapshots
///
/// Implementations serialize the message for their transport. An error is
/// reported once per tick and never retried.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn publish(&self, msg: &JointStateMessage) -> Result<(), AggregatorError>;
}

/// In-process sink backed by a tokio broadcast channel
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<JointStateMessage>,
}

impl BroadcastSink {
    /// Create a sink whose channel keeps up to `capacity` unread messages
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to published snapshots
    pub fn subscribe(&self) -> broadcast::Receiver<JointStateMessage> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl SnapshotSink for BroadcastSink {
    async fn publish(&self, msg: &JointStateMessage) -> Result<(), AggregatorError> {
        self.tx
            .send(msg.clone())
            .map(|_| ())
            .map_err(|_| AggregatorError::PublishFailure("no snapshot subscribers".to_string()))
    }
}
