// Aggregator wiring
pub mod aggregator;

// Configuration loading and controller resolution
pub mod config;

// Error taxonomy
pub mod error;

// Controller report ingestion
pub mod ingress;

// NATS client integration
pub mod nats;

// Snapshot message, publisher and scheduler
pub mod snapshot;

// Joint state table
pub mod state;

pub use aggregator::Aggregator;
pub use error::AggregatorError;
pub use ingress::{ControllerReport, UpdateIngress};
pub use snapshot::{JointStateMessage, Scheduler, SnapshotPublisher, SnapshotSink};
pub use state::{StateEntry, StateTable};
