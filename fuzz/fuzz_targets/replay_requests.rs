#![no_main]

use arcsim::builder::ArcBuilder;
use arcsim::replay::{IoRequest, Replayer, block_span};
use arcsim::types::OpKind;
use libfuzzer_sys::fuzz_target;

// Fuzz request replay with arbitrary offsets and sizes
//
// Each 17-byte record is (op, offset: u64, size: u64). Sizes are folded to
// keep spans short; offsets near u64::MAX exercise overflow rejection.
fuzz_target!(|data: &[u8]| {
    let mut replayer = Replayer::new(ArcBuilder::new(64).block_size(512).build());

    for record in data.chunks_exact(17) {
        let op = if record[0] % 2 == 0 { OpKind::Read } else { OpKind::Write };
        let mut offset = [0u8; 8];
        offset.copy_from_slice(&record[1..9]);
        let mut size = [0u8; 8];
        size.copy_from_slice(&record[9..17]);
        let request = IoRequest::new(
            u64::from_le_bytes(offset),
            u64::from_le_bytes(size) % 65_536,
            op,
        );

        let expected = block_span(request.offset, request.size, 512);
        match replayer.replay_request(&request) {
            Ok(outcome) => {
                let span = expected.unwrap();
                assert_eq!(outcome.accesses(), span.end() - span.start() + 1);
            },
            Err(_) => assert!(expected.is_err()),
        }
    }

    let summary = *replayer.summary();
    let cache = replayer.into_inner();
    assert_eq!(summary.totals.accesses(), cache.reads() + cache.writes());
    cache.check_invariants().unwrap();
});
