// SPDX-License-Identifier: GPL-3.0-only

//! Allocation request, derived LSS policy and validated plan

use serde::{Deserialize, Serialize};

use crate::address::VolumeAddress;
use crate::common::bytes_to_pretty;
use crate::volume::VolumeFormat;

/// Volume range creation request (form model).
///
/// Address fields are kept as the 2-hex-digit text the user entered; parsing
/// them is part of validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub lss: String,
    pub start_vol: String,

    /// `None` (or empty) means a single volume at `start_vol`.
    #[serde(default)]
    pub end_vol: Option<String>,

    pub format: VolumeFormat,
    pub capacity_bytes_per_volume: u64,

    #[serde(default)]
    pub pool_name: Option<String>,
}

impl AllocationRequest {
    /// Force format and pool to the values locked by an existing LSS.
    ///
    /// Callers apply this after every LSS change that yields a policy, and
    /// drop any pending "create new pool" state of their own.
    pub fn coerce_to_policy(&self, policy: &LssPolicy) -> Self {
        let mut coerced = self.clone();
        if let Some(format) = policy.format {
            coerced.format = format;
        }
        coerced.pool_name = policy.pool_name.clone();
        coerced
    }
}

/// Pool and format locked by the volumes already present in an LSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LssPolicy {
    pub pool_name: Option<String>,
    pub format: Option<VolumeFormat>,
    pub volume_count: u32,
}

/// Outcome of a successful validation, handed to command preview and
/// persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedPlan {
    pub start_volume: VolumeAddress,
    pub end_volume: VolumeAddress,
    pub count: u32,
    pub total_capacity_bytes: u64,
    pub format: VolumeFormat,
    pub pool_name: Option<String>,
}

impl ValidatedPlan {
    /// One-line human readable description.
    pub fn summary(&self) -> String {
        let span = if self.start_volume == self.end_volume {
            self.start_volume.to_string()
        } else {
            format!("{}-{}", self.start_volume, self.end_volume)
        };
        let noun = if self.count == 1 { "volume" } else { "volumes" };
        let pool = self
            .pool_name
            .as_deref()
            .map(|pool| format!(" in {pool}"))
            .unwrap_or_default();

        format!(
            "{} x {} {} {}{}, {} total",
            self.count,
            self.format,
            noun,
            span,
            pool,
            bytes_to_pretty(&self.total_capacity_bytes, false)
        )
    }
}
