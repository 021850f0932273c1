use serde::{Deserialize, Serialize};

/// Latest known state of one joint
///
/// Replaced wholesale on every accepted report, never patched field by field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Joint name (unique within the table)
    pub name: String,

    /// Last reported position (radians)
    pub position: f64,

    /// Last reported velocity
    pub velocity: f64,

    /// Last reported effort (servo load)
    pub effort: f64,
}

impl StateEntry {
    pub fn new(name: impl Into<String>, position: f64, velocity: f64, effort: f64) -> Self {
        Self {
            name: name.into(),
            position,
            velocity,
            effort,
        }
    }

    /// Zero-valued entry used to seed the table
    pub fn zeroed(name: impl Into<String>) -> Self {
        Self::new(name, 0.0, 0.0, 0.0)
    }
}
