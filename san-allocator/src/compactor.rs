// SPDX-License-Identifier: GPL-3.0-only

//! Compaction of allocated volume numbers into display ranges, and the free
//! gaps between them.

use san_types::{VOLUMES_PER_LSS, VolumeRange};

use crate::registry::VolumeRegistry;

/// Merge the allocated volumes of `lss` into minimal contiguous ranges,
/// ascending by start volume.
///
/// Each range carries the format and capacity of its first member.
pub fn compact_ranges(lss: u8, registry: &VolumeRegistry) -> Vec<VolumeRange> {
    let mut members: Vec<_> = registry
        .in_lss(lss)
        .map(|volume| {
            (
                volume.address.volume_number,
                volume.format,
                volume.capacity_bytes,
            )
        })
        .collect();

    members.sort_by_key(|(volume_number, _, _)| *volume_number);

    let mut ranges: Vec<VolumeRange> = Vec::new();
    for (volume_number, format, capacity) in members {
        if let Some(current) = ranges.last_mut()
            && current.end_vol.checked_add(1) == Some(volume_number)
        {
            current.end_vol = volume_number;
            continue;
        }

        ranges.push(VolumeRange {
            lss,
            start_vol: volume_number,
            end_vol: volume_number,
            format,
            capacity_bytes_per_volume: capacity,
        });
    }

    tracing::debug!("LSS {lss:02X}: {} allocated range(s)", ranges.len());
    ranges
}

/// Unallocated gaps of `lss` as inclusive `(start, end)` volume numbers.
pub fn free_ranges(lss: u8, registry: &VolumeRegistry) -> Vec<(u8, u8)> {
    let mut gaps = Vec::new();
    // Next volume number not yet covered; u32 so it can step past 0xFF.
    let mut cursor: u32 = 0;

    for range in compact_ranges(lss, registry) {
        let start = u32::from(range.start_vol);
        if start > cursor {
            gaps.push((cursor as u8, (start - 1) as u8));
        }
        cursor = u32::from(range.end_vol) + 1;
    }

    if cursor < VOLUMES_PER_LSS {
        gaps.push((cursor as u8, u8::MAX));
    }

    gaps
}

/// Lowest volume number starting `count` consecutive free volumes in `lss`.
pub fn first_free_run(lss: u8, registry: &VolumeRegistry, count: u32) -> Option<u8> {
    if count == 0 || count > VOLUMES_PER_LSS {
        return None;
    }

    free_ranges(lss, registry)
        .into_iter()
        .find(|(start, end)| u32::from(*end) - u32::from(*start) + 1 >= count)
        .map(|(start, _)| start)
}
