// Joint state table and counters

mod entry;
mod metrics;
mod table;

pub use entry::StateEntry;
pub use metrics::{AggregatorMetrics, MetricsSnapshot};
pub use table::StateTable;
