// SPDX-License-Identifier: GPL-3.0-only

//! Registry snapshots exported to JSON files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use san_contracts::{InventoryError, InventoryErrorKind, VolumeRegistrySource};
use san_types::RawVolumeRecord;

pub struct JsonFileSource {
    committed: PathBuf,
    project: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(committed: PathBuf, project: Option<PathBuf>) -> Self {
        Self { committed, project }
    }

    async fn read(path: &Path) -> Result<Vec<RawVolumeRecord>, InventoryError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            let kind = if error.kind() == std::io::ErrorKind::NotFound {
                InventoryErrorKind::NotFound
            } else {
                InventoryErrorKind::Unavailable
            };
            InventoryError::new(kind, format!("{}: {error}", path.display()))
        })?;

        serde_json::from_str(&raw).map_err(|error| {
            InventoryError::new(
                InventoryErrorKind::InvalidInput,
                format!("{}: {error}", path.display()),
            )
        })
    }
}

#[async_trait]
impl VolumeRegistrySource for JsonFileSource {
    async fn list_volumes(
        &self,
        storage_system: &str,
    ) -> Result<Vec<RawVolumeRecord>, InventoryError> {
        tracing::debug!(
            "Loading committed volumes of {storage_system} from {}",
            self.committed.display()
        );
        Self::read(&self.committed).await
    }

    async fn list_project_volumes(
        &self,
        storage_system: &str,
    ) -> Result<Vec<RawVolumeRecord>, InventoryError> {
        match &self.project {
            Some(path) => {
                tracing::debug!(
                    "Loading project volumes of {storage_system} from {}",
                    path.display()
                );
                Self::read(path).await
            }
            None => Ok(Vec::new()),
        }
    }
}
