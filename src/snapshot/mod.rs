use crate::state::StateEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod publisher;
pub mod scheduler;
pub mod sink;


pub use publisher::SnapshotPublisher;
pub use scheduler::Scheduler;
pub use sink::{BroadcastSink, SnapshotSink};

/// Message header: capture time and reference frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Time the table was read
    pub stamp: DateTime<Utc>,

    /// Fixed frame label (e.g., "base_link")
    pub frame_id: String,
}

/// Composite joint state message built on every tick
///
/// The four sequences are index-aligned: index `i` in each one describes
/// the same joint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointStateMessage {
    pub header: Header,
    pub name: Vec<String>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub effort: Vec<f64>,
}

impl JointStateMessage {
    /// Build a message from one table snapshot
    pub fn from_entries(entries: Vec<StateEntry>, frame_id: &str, stamp: DateTime<Utc>) -> Self {
        let mut msg = Self {
            header: Header {
                stamp,
                frame_id: frame_id.to_string(),
            },
            name: Vec::with_capacity(entries.len()),
            position: Vec::with_capacity(entries.len()),
            velocity: Vec::with_capacity(entries.len()),
            effort: Vec::with_capacity(entries.len()),
        };

        for entry in entries {
            msg.name.push(entry.name);
            msg.position.push(entry.position);
            msg.velocity.push(entry.velocity);
            msg.effort.push(entry.effort);
        }

        msg
    }

    /// Number of joints in the message
    pub fn joint_count(&self) -> usize {
        self.name.len()
    }
}
