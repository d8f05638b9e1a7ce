// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashSet;

use san_types::{VolumeAddress, encode};

use crate::registry::VolumeRegistry;

/// Addresses in `[start_vol, end_vol]` of `lss` that are already allocated,
/// in ascending order.
///
/// Callers guarantee `end_vol >= start_vol`; an inverted range yields no
/// conflicts.
pub fn find_conflicts(
    lss: u8,
    start_vol: u8,
    end_vol: u8,
    registry: &VolumeRegistry,
) -> Vec<VolumeAddress> {
    let allocated: HashSet<String> = registry
        .volumes()
        .iter()
        .map(|volume| volume.address.canonical())
        .collect();

    let conflicts: Vec<VolumeAddress> = (start_vol..=end_vol)
        .filter(|volume_number| allocated.contains(&encode(lss, *volume_number)))
        .map(|volume_number| VolumeAddress::new(lss, volume_number))
        .collect();

    if !conflicts.is_empty() {
        tracing::debug!(
            "{} of {:02X}{:02X}-{:02X}{:02X} already allocated",
            conflicts.len(),
            lss,
            start_vol,
            lss,
            end_vol
        );
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use san_types::{AllocatedVolume, VolumeFormat};

    fn registry(ids: &[&str]) -> VolumeRegistry {
        VolumeRegistry::new(ids.iter().map(|id| AllocatedVolume {
            address: id.parse().expect("valid id"),
            pool_name: None,
            format: VolumeFormat::Ckd,
            capacity_bytes: 1,
        }))
    }

    #[test]
    fn hits_are_reported_in_order() {
        let registry = registry(&["100A", "1002", "2005", "1010"]);
        let hits: Vec<String> = find_conflicts(0x10, 0x00, 0x0f, &registry)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(hits, vec!["1002", "100A"]);
    }

    #[test]
    fn other_lss_never_conflicts() {
        let registry = registry(&["2005"]);
        assert!(find_conflicts(0x10, 0x00, 0xff, &registry).is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let registry = registry(&["1000", "10FF"]);
        assert_eq!(find_conflicts(0x10, 0x00, 0xff, &registry).len(), 2);
        assert_eq!(find_conflicts(0x10, 0x01, 0xfe, &registry).len(), 0);
        assert_eq!(find_conflicts(0x10, 0xff, 0xff, &registry).len(), 1);
    }

    #[test]
    fn inverted_range_is_empty() {
        let registry = registry(&["1003"]);
        assert!(find_conflicts(0x10, 0x05, 0x02, &registry).is_empty());
    }
}
