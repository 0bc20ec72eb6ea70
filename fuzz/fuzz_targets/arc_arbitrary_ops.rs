#![no_main]

use arcsim::policy::arc::{ArcCache, HitKind, StateKind};
use arcsim::types::{BlockId, OpKind};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary access sequences on ArcCache
//
// First byte picks the capacity, then byte pairs are (op, block). Invariants
// are checked after every step.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 32) + 1;
    let mut cache = ArcCache::new(capacity);

    for pair in rest.chunks_exact(2) {
        let op_byte = pair[0];
        let block = BlockId::new(u64::from(pair[1]));

        match op_byte % 8 {
            0..=5 => {
                let op = if op_byte % 2 == 0 { OpKind::Read } else { OpKind::Write };
                let before = cache.p_value();
                let hit = cache.access(block, op).unwrap();
                match hit {
                    HitKind::Miss => assert_eq!(cache.head_of(StateKind::Recency), Some(block)),
                    _ => assert_eq!(cache.head_of(StateKind::Frequency), Some(block)),
                }
                match hit {
                    HitKind::GhostHitRecency => assert!(cache.p_value() >= before),
                    HitKind::GhostHitFrequency => assert!(cache.p_value() <= before),
                    _ => assert_eq!(cache.p_value(), before),
                }
            },
            6 => {
                // read-only queries
                let membership = cache.membership_of(block);
                assert_eq!(membership.is_resident(), cache.contains(block));
                assert_eq!(membership.state().is_some(), cache.tracks(block));
            },
            _ => {
                if pair[1] == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                    assert_eq!(cache.ghost_len(), 0);
                } else {
                    cache.reset_counters();
                }
            },
        }

        if let Err(err) = cache.check_invariants() {
            panic!("invariant violated: {err}");
        }
    }
});
