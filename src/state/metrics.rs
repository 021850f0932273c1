use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for the ingress and publish paths
#[derive(Clone, Default)]
pub struct AggregatorMetrics {
    /// Reports written into the table
    reports_accepted: Arc<AtomicU64>,

    /// Reports dropped because the joint is not configured
    reports_rejected: Arc<AtomicU64>,

    /// Snapshots handed to the sink
    snapshots_published: Arc<AtomicU64>,

    /// Ticks whose publish failed
    publish_failures: Arc<AtomicU64>,
}

impl AggregatorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&self) {
        self.reports_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.reports_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self) {
        self.snapshots_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reports_accepted: self.reports_accepted.load(Ordering::Relaxed),
            reports_rejected: self.reports_rejected.load(Ordering::Relaxed),
            snapshots_published: self.snapshots_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub reports_accepted: u64,
    pub reports_rejected: u64,
    pub snapshots_published: u64,
    pub publish_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = AggregatorMetrics::new();
        let snapshot = metrics.get_snapshot();
        assert_eq!(snapshot.reports_accepted, 0);
        assert_eq!(snapshot.reports_rejected, 0);
        assert_eq!(snapshot.snapshots_published, 0);
        assert_eq!(snapshot.publish_failures, 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = AggregatorMetrics::new();
        let clone = metrics.clone();

        clone.record_accepted();
        clone.record_accepted();
        metrics.record_rejected();
        metrics.record_published();
        clone.record_publish_failure();

        let snapshot = metrics.get_snapshot();
        assert_eq!(snapshot.reports_accepted, 2);
        assert_eq!(snapshot.reports_rejected, 1);
        assert_eq!(snapshot.snapshots_published, 1);
        assert_eq!(snapshot.publish_failures, 1);
    }
}
