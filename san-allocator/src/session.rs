// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot bookkeeping around the pure allocator functions.
//!
//! A session owns the current registry snapshot and the active LSS. Every
//! validation result is stamped with both, and a result whose stamp no longer
//! matches is discarded rather than merged into newer state.

use std::sync::Arc;

use san_contracts::{InventoryError, SnapshotId, VolumeRegistrySource};
use san_types::{AllocationRequest, LssPolicy, ValidatedPlan, VolumeRange, parse_hex2};
use tokio_util::sync::CancellationToken;

use crate::compactor::{compact_ranges, free_ranges};
use crate::policy::lss_policy;
use crate::registry::{VolumeRegistry, records_to_volumes};
use crate::validator::{ValidationError, validate};

/// Validation outcome tied to the snapshot and LSS it was computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedValidation {
    pub snapshot: SnapshotId,
    pub lss: Option<u8>,
    pub outcome: Result<ValidatedPlan, ValidationError>,
}

pub struct PlanningSession<S> {
    source: S,
    storage_system: String,
    snapshot: Arc<VolumeRegistry>,
    active_lss: Option<u8>,
}

impl<S: VolumeRegistrySource> PlanningSession<S> {
    /// Start with an empty snapshot; call [`Self::refresh`] before relying on
    /// conflict results.
    pub fn new(source: S, storage_system: impl Into<String>) -> Self {
        Self {
            source,
            storage_system: storage_system.into(),
            snapshot: Arc::new(VolumeRegistry::empty()),
            active_lss: None,
        }
    }

    pub fn storage_system(&self) -> &str {
        &self.storage_system
    }

    pub fn snapshot(&self) -> Arc<VolumeRegistry> {
        Arc::clone(&self.snapshot)
    }

    pub fn active_lss(&self) -> Option<u8> {
        self.active_lss
    }

    /// Re-fetch committed and in-project volumes and replace the snapshot.
    ///
    /// On error or cancellation the previous snapshot stays in place.
    pub async fn refresh(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<SnapshotId, InventoryError> {
        let fetch = async {
            let committed = self.source.list_volumes(&self.storage_system).await?;
            let project = self
                .source
                .list_project_volumes(&self.storage_system)
                .await?;
            Ok::<_, InventoryError>((committed, project))
        };

        let (committed, project) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Registry refresh for {} cancelled", self.storage_system);
                return Err(InventoryError::cancelled());
            }
            result = fetch => result?,
        };

        let registry = VolumeRegistry::overlay(
            records_to_volumes(committed),
            records_to_volumes(project),
        );
        tracing::info!(
            "Registry for {} refreshed: {} volume(s), snapshot {}",
            self.storage_system,
            registry.len(),
            registry.id()
        );

        let id = registry.id();
        self.snapshot = Arc::new(registry);
        Ok(id)
    }

    /// Replace the snapshot directly, e.g. with one loaded offline.
    pub fn install_snapshot(&mut self, registry: VolumeRegistry) -> SnapshotId {
        let id = registry.id();
        self.snapshot = Arc::new(registry);
        id
    }

    /// Switch the active LSS. Returns the LSS lock the caller must apply to
    /// its form (see [`AllocationRequest::coerce_to_policy`]).
    pub fn select_lss(&mut self, lss: &str) -> Result<Option<LssPolicy>, ValidationError> {
        let lss = parse_hex2(lss).map_err(|_| ValidationError::InvalidLss)?;
        self.active_lss = Some(lss);
        Ok(lss_policy(lss, &self.snapshot))
    }

    pub fn policy(&self) -> Option<LssPolicy> {
        self.active_lss.and_then(|lss| lss_policy(lss, &self.snapshot))
    }

    pub fn ranges(&self) -> Vec<VolumeRange> {
        self.active_lss
            .map(|lss| compact_ranges(lss, &self.snapshot))
            .unwrap_or_default()
    }

    pub fn free(&self) -> Vec<(u8, u8)> {
        self.active_lss
            .map(|lss| free_ranges(lss, &self.snapshot))
            .unwrap_or_default()
    }

    /// Validate `request` against the current snapshot. The stamp carries the
    /// LSS the request names, `None` when that field does not parse.
    pub fn validate(&self, request: &AllocationRequest) -> StampedValidation {
        StampedValidation {
            snapshot: self.snapshot.id(),
            lss: parse_hex2(&request.lss).ok(),
            outcome: validate(request, &self.snapshot),
        }
    }

    /// Outcome of `stamped` if it still describes the current snapshot and
    /// the active LSS, `None` if it is stale.
    ///
    /// An unparsable LSS is refused the same way whatever is active, so such
    /// a result only goes stale with the snapshot.
    pub fn accept(
        &self,
        stamped: StampedValidation,
    ) -> Option<Result<ValidatedPlan, ValidationError>> {
        let other_lss = stamped.lss.is_some() && stamped.lss != self.active_lss;
        if stamped.snapshot != self.snapshot.id() || other_lss {
            tracing::debug!("Discarding stale validation for snapshot {}", stamped.snapshot);
            return None;
        }

        Some(stamped.outcome)
    }
}
