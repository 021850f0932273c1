use crate::error::AggregatorError;
use crate::snapshot::SnapshotPublisher;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Drives the snapshot publisher at a fixed rate
///
/// Drift policy: a tick that overruns its period delays the next tick, which
/// then fires immediately; missed ticks are neither skipped nor replayed in a
/// burst.
pub struct Scheduler {
    publisher: SnapshotPublisher,
    period: Duration,
}

impl Scheduler {
    pub fn new(publisher: SnapshotPublisher, period: Duration) -> Self {
        Self { publisher, period }
    }

    /// Tick until shutdown is signalled
    ///
    /// The signal is checked between ticks; a tick already running completes.
    /// A dropped shutdown sender also stops the loop. Returns the number of
    /// ticks executed.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!(period_ms = self.period.as_millis() as u64, "Snapshot scheduler running");

        // interval() panics on a zero period
        let mut ticker = interval(self.period.max(Duration::from_nanos(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks = 0u64;

        loop {
            if *shutdown.borrow() {
                break;
            }

            // Shutdown wins when it is ready together with a tick
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            self.publisher.tick().await;
            ticks += 1;
        }

        info!(ticks = ticks, "Snapshot scheduler stopped");
        ticks
    }
}

/// Convert a publish frequency into a tick period
///
/// The rate must be positive and finite.
pub fn period_from_rate(rate_hz: f64) -> Result<Duration, AggregatorError> {
    if !rate_hz.is_finite() || rate_hz <= 0.0 {
        return Err(AggregatorError::Configuration(format!(
            "publish rate must be a positive number, got {}",
            rate_hz
        )));
    }

    match Duration::try_from_secs_f64(1.0 / rate_hz) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(AggregatorError::Configuration(format!(
            "publish rate {} out of range",
            rate_hz
        ))),
    }
}
