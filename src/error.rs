use std::fmt;

/// Errors raised by the aggregation core
#[derive(Debug, Clone, PartialEq)]
pub enum AggregatorError {
    /// Fatal startup misconfiguration (empty controller list, unresolved joint name)
    Configuration(String),
    /// Report for a joint that is not part of the configured table
    UnknownProducerReport { name: String },
    /// Output channel rejected a snapshot
    PublishFailure(String),
}

impl fmt::Display for AggregatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregatorError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            AggregatorError::UnknownProducerReport { name } => {
                write!(f, "report for unknown joint '{}'", name)
            }
            AggregatorError::PublishFailure(msg) => write!(f, "publish failed: {}", msg),
        }
    }
}

impl std::error::Error for AggregatorError {}
