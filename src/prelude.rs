pub use crate::builder::{ArcBuilder, ArcConfig};
pub use crate::error::{AccessError, ConfigError, InvariantError};
pub use crate::metrics::{ArcStatsSnapshot, MetricsReset, MetricsSnapshotProvider};
pub use crate::policy::arc::{ArcCache, HitKind, Membership, StateKind};
pub use crate::replay::{IoRequest, ReplaySummary, Replayer, RequestOutcome, block_span};
pub use crate::traits::BlockCache;
pub use crate::types::{BlockId, OpKind};
