// SPDX-License-Identifier: GPL-3.0-only

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use san_allocator::VolumeRegistry;
use san_types::{AllocationRequest, RawVolumeRecord, VolumeFormat};

pub fn record(volume_id: &str, pool: &str, format: &str, capacity_bytes: u64) -> RawVolumeRecord {
    RawVolumeRecord {
        volume_id: Some(volume_id.to_string()),
        pool_name: Some(pool.to_string()),
        format: Some(format.to_string()),
        capacity_bytes: Some(capacity_bytes),
    }
}

pub fn fb_registry(ids: &[&str]) -> VolumeRegistry {
    VolumeRegistry::from_records(ids.iter().map(|id| record(id, "P0", "FB", 100)))
}

pub fn request(lss: &str, start: &str, end: Option<&str>) -> AllocationRequest {
    AllocationRequest {
        lss: lss.to_string(),
        start_vol: start.to_string(),
        end_vol: end.map(str::to_string),
        format: VolumeFormat::Fb,
        capacity_bytes_per_volume: 100,
        pool_name: Some("P0".to_string()),
    }
}

/// Registry with a seeded random subset of volumes across a few LSSs.
pub fn random_registry(seed: u64) -> VolumeRegistry {
    let mut rng = StdRng::seed_from_u64(seed);
    let density: f64 = rng.gen_range(0.05..0.9);

    let ids: Vec<String> = [0x00u8, 0x10, 0x11, 0xff]
        .iter()
        .flat_map(|lss| (0..=u8::MAX).map(move |vol| (*lss, vol)))
        .filter(|_| rng.gen_bool(density))
        .map(|(lss, vol)| format!("{lss:02X}{vol:02X}"))
        .collect();

    VolumeRegistry::from_records(ids.iter().map(|id| record(id, "P0", "FB", 100)))
}
