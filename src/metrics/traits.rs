//! Consumption side of the metrics: snapshotting and resetting.
//!
//! Recording stays inside the cache ([`AccessCounters`](super::AccessCounters));
//! these traits only read or zero what was recorded, so a driver can report
//! without knowing the policy type.

/// Snapshot provider for reporting, benches and tests.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Zero the counters between runs without touching cache contents.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}
