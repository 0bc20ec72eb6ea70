//! Access counters and point-in-time statistics for the simulator.
//!
//! Recording is done by [`AccessCounters`], owned by the cache; readers take an
//! [`ArcStatsSnapshot`] through [`MetricsSnapshotProvider`].

pub mod counters;
pub mod snapshot;
pub mod traits;

pub use counters::AccessCounters;
pub use snapshot::ArcStatsSnapshot;
pub use traits::{MetricsReset, MetricsSnapshotProvider};
