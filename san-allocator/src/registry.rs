// SPDX-License-Identifier: GPL-3.0-only

//! Immutable snapshot of already-allocated volumes for one storage system

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use san_contracts::SnapshotId;
use san_types::{AllocatedVolume, RawVolumeRecord, RecordError, VolumeAddress};

/// Ordered, deduplicated set of allocated volumes.
///
/// A snapshot is never edited; a refresh replaces it wholesale and gets a new
/// [`SnapshotId`].
#[derive(Debug, Clone)]
pub struct VolumeRegistry {
    id: SnapshotId,
    fetched_at: DateTime<Utc>,
    volumes: Vec<AllocatedVolume>,
}

impl VolumeRegistry {
    /// Build a snapshot, keeping the first entry for any repeated address.
    pub fn new(volumes: impl IntoIterator<Item = AllocatedVolume>) -> Self {
        let mut seen = HashSet::new();
        let volumes = volumes
            .into_iter()
            .filter(|volume| seen.insert(volume.address))
            .collect();

        Self {
            id: SnapshotId::new(),
            fetched_at: Utc::now(),
            volumes,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Convert backend records. Records without a volume id are dropped
    /// quietly; malformed ones are dropped with a warning, so an unreadable
    /// record only ever means one fewer known volume.
    pub fn from_records(records: impl IntoIterator<Item = RawVolumeRecord>) -> Self {
        Self::new(records_to_volumes(records))
    }

    /// Committed volumes first, then in-project volumes not already committed.
    pub fn overlay(
        committed: impl IntoIterator<Item = AllocatedVolume>,
        in_project: impl IntoIterator<Item = AllocatedVolume>,
    ) -> Self {
        Self::new(committed.into_iter().chain(in_project))
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn volumes(&self) -> &[AllocatedVolume] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Entries of one LSS, in registry order.
    pub fn in_lss(&self, lss: u8) -> impl Iterator<Item = &AllocatedVolume> + '_ {
        self.volumes
            .iter()
            .filter(move |volume| volume.address.lss == lss)
    }

    pub fn contains(&self, address: VolumeAddress) -> bool {
        self.volumes.iter().any(|volume| volume.address == address)
    }
}

impl Default for VolumeRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

pub(crate) fn records_to_volumes(
    records: impl IntoIterator<Item = RawVolumeRecord>,
) -> Vec<AllocatedVolume> {
    records
        .into_iter()
        .filter_map(|record| match AllocatedVolume::try_from(record) {
            Ok(volume) => Some(volume),
            Err(RecordError::MissingVolumeId) => None,
            Err(error) => {
                tracing::warn!("Dropping unreadable volume record: {error}");
                None
            }
        })
        .collect()
}
