// SPDX-License-Identifier: GPL-3.0-only

mod common;

use std::collections::BTreeSet;

use common::fixtures::random_registry;
use san_allocator::{compact_ranges, find_conflicts, free_ranges};
use san_types::{VolumeAddress, decode, encode};

const SEEDS: std::ops::Range<u64> = 0..32;

#[test]
fn codec_roundtrips_whole_address_space() {
    for lss in 0..=u8::MAX {
        for vol in 0..=u8::MAX {
            assert_eq!(
                decode(&encode(lss, vol)).expect("decode"),
                VolumeAddress::new(lss, vol)
            );
        }
    }
}

#[test]
fn compacted_ranges_cover_exactly_the_lss() {
    for seed in SEEDS {
        let registry = random_registry(seed);

        for lss in [0x00u8, 0x10, 0x11, 0x42, 0xff] {
            let expected: BTreeSet<u8> = registry
                .in_lss(lss)
                .map(|volume| volume.address.volume_number)
                .collect();

            let ranges = compact_ranges(lss, &registry);
            let mut covered = BTreeSet::new();
            for pair in ranges.windows(2) {
                // Sorted, disjoint and not mergeable.
                assert!(u32::from(pair[0].end_vol) + 1 < u32::from(pair[1].start_vol));
            }
            for range in &ranges {
                assert!(range.start_vol <= range.end_vol);
                covered.extend(range.start_vol..=range.end_vol);
            }

            assert_eq!(covered, expected, "seed {seed}, lss {lss:02X}");
        }
    }
}

#[test]
fn free_ranges_are_the_complement() {
    for seed in SEEDS {
        let registry = random_registry(seed);
        let lss = 0x10;

        let mut all = BTreeSet::new();
        for range in compact_ranges(lss, &registry) {
            all.extend(range.start_vol..=range.end_vol);
        }
        for (start, end) in free_ranges(lss, &registry) {
            for vol in start..=end {
                assert!(all.insert(vol), "seed {seed}: {vol:02X} both free and used");
            }
        }

        assert_eq!(all.len(), 256, "seed {seed}");
    }
}

#[test]
fn conflicts_empty_iff_range_is_free() {
    for seed in SEEDS {
        let registry = random_registry(seed);
        let lss = 0x11;

        for (start, end) in [(0x00u8, 0x00u8), (0x00, 0x0f), (0x20, 0x7f), (0xf0, 0xff)] {
            let conflicts = find_conflicts(lss, start, end, &registry);
            let occupied: Vec<VolumeAddress> = (start..=end)
                .map(|vol| VolumeAddress::new(lss, vol))
                .filter(|address| registry.contains(*address))
                .collect();

            assert_eq!(conflicts.is_empty(), occupied.is_empty());
            assert_eq!(conflicts, occupied, "seed {seed}");
        }
    }
}
