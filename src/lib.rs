//! arcsim: a block-level Adaptive Replacement Cache simulator.
//!
//! Replays storage I/O as block accesses against an ARC cache that tracks
//! membership only (no payloads) and classifies every access as a recency,
//! frequency, ghost or plain miss.
//!
//! - [`policy::arc`]: the ARC controller and its four lists
//! - [`replay`]: byte-range requests to block accesses
//! - [`builder`]: configuration
//! - [`metrics`]: counters and snapshots
//!
//! ```
//! use arcsim::prelude::*;
//!
//! let mut replayer = Replayer::new(ArcBuilder::new(1024).build());
//! replayer.replay_all((0..16u64).map(|i| IoRequest::read(i * 4096, 0)));
//! replayer.replay_all((0..16u64).map(|i| IoRequest::read(i * 4096, 0)));
//!
//! let snap = replayer.cache().snapshot();
//! assert_eq!(snap.reads, 32);
//! assert_eq!(snap.resident_hits, 16);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod replay;
pub mod traits;
pub mod types;
