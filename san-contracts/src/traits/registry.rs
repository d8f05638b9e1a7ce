// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

use san_types::RawVolumeRecord;

use crate::InventoryError;

/// Supplies volume snapshots for one storage system.
///
/// Implementations own paging and termination; the allocator only ever sees
/// the finished list. A failed or partial fetch must surface as an error,
/// not as an empty list.
#[async_trait]
pub trait VolumeRegistrySource: Send + Sync {
    /// Committed volumes.
    async fn list_volumes(
        &self,
        storage_system: &str,
    ) -> Result<Vec<RawVolumeRecord>, InventoryError>;

    /// Volumes staged in the open project but not yet committed.
    async fn list_project_volumes(
        &self,
        _storage_system: &str,
    ) -> Result<Vec<RawVolumeRecord>, InventoryError> {
        Ok(Vec::new())
    }
}

/// In-memory source, for fixtures and offline snapshots.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistrySource {
    pub committed: Vec<RawVolumeRecord>,
    pub project: Vec<RawVolumeRecord>,
}

impl StaticRegistrySource {
    pub fn new(committed: Vec<RawVolumeRecord>) -> Self {
        Self {
            committed,
            project: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: Vec<RawVolumeRecord>) -> Self {
        self.project = project;
        self
    }
}

#[async_trait]
impl VolumeRegistrySource for StaticRegistrySource {
    async fn list_volumes(
        &self,
        _storage_system: &str,
    ) -> Result<Vec<RawVolumeRecord>, InventoryError> {
        Ok(self.committed.clone())
    }

    async fn list_project_volumes(
        &self,
        _storage_system: &str,
    ) -> Result<Vec<RawVolumeRecord>, InventoryError> {
        Ok(self.project.clone())
    }
}
