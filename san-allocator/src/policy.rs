// SPDX-License-Identifier: GPL-3.0-only

use san_types::LssPolicy;

use crate::registry::VolumeRegistry;

/// Pool and format locked by the volumes already present in `lss`.
///
/// Returns `None` when the LSS is empty. Otherwise the first matching volume
/// in registry order decides pool and format; the other members are counted
/// but not compared against it.
pub fn lss_policy(lss: u8, registry: &VolumeRegistry) -> Option<LssPolicy> {
    let mut members = registry.in_lss(lss);
    let first = members.next()?;

    let mut volume_count = 1u32;
    let mut mixed = false;
    for volume in members {
        volume_count += 1;
        mixed |= volume.format != first.format || volume.pool_name != first.pool_name;
    }

    if mixed {
        tracing::warn!(
            "LSS {lss:02X} mixes pools or formats; locking to {} / {:?} from volume {}",
            first.format,
            first.pool_name,
            first.address
        );
    }

    tracing::debug!("LSS {lss:02X} locked by {volume_count} existing volume(s)");

    Some(LssPolicy {
        pool_name: first.pool_name.clone(),
        format: Some(first.format),
        volume_count,
    })
}
