// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end decision for one volume range creation request

use serde::{Deserialize, Serialize};
use thiserror::Error;

use san_types::{
    AllocationRequest, VOLUMES_PER_LSS, ValidatedPlan, VolumeAddress, VolumeFormat, parse_hex2,
};

use crate::conflicts::find_conflicts;
use crate::policy::lss_policy;
use crate::registry::VolumeRegistry;

/// Why a request was refused. Every variant is recoverable by editing the
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ValidationError {
    #[error("LSS must be two hex digits (00-FF)")]
    InvalidLss,

    #[error("Start volume must be two hex digits (00-FF)")]
    InvalidStart,

    #[error("End volume must be two hex digits (00-FF)")]
    InvalidEnd,

    #[error("End volume must not be before start volume")]
    EndBeforeStart,

    #[error("A range may span at most 256 volumes")]
    RangeTooLarge,

    #[error("Volumes already allocated: {}", join_addresses(.0))]
    ConflictsExist(Vec<VolumeAddress>),

    #[error("Capacity per volume must be greater than zero")]
    InvalidCapacity,

    #[error(
        "LSS already holds {} volumes in pool {}; request asks for {} in pool {}",
        display_format(.expected_format),
        display_pool(.expected_pool),
        .requested_format,
        display_pool(.requested_pool)
    )]
    PolicyMismatch {
        expected_format: Option<VolumeFormat>,
        expected_pool: Option<String>,
        requested_format: VolumeFormat,
        requested_pool: Option<String>,
    },
}

/// Fieldless discriminant of [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    InvalidLss,
    InvalidStart,
    InvalidEnd,
    EndBeforeStart,
    RangeTooLarge,
    ConflictsExist,
    InvalidCapacity,
    PolicyMismatch,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::InvalidLss => ValidationErrorKind::InvalidLss,
            Self::InvalidStart => ValidationErrorKind::InvalidStart,
            Self::InvalidEnd => ValidationErrorKind::InvalidEnd,
            Self::EndBeforeStart => ValidationErrorKind::EndBeforeStart,
            Self::RangeTooLarge => ValidationErrorKind::RangeTooLarge,
            Self::ConflictsExist(_) => ValidationErrorKind::ConflictsExist,
            Self::InvalidCapacity => ValidationErrorKind::InvalidCapacity,
            Self::PolicyMismatch { .. } => ValidationErrorKind::PolicyMismatch,
        }
    }
}

fn join_addresses(addresses: &[VolumeAddress]) -> String {
    addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_format(format: &Option<VolumeFormat>) -> &'static str {
    format.map(|format| format.as_str()).unwrap_or("any")
}

fn display_pool(pool: &Option<String>) -> &str {
    pool.as_deref().unwrap_or("<unset>")
}

/// Validate `request` against `registry`.
///
/// Checks run in a fixed order and the first failure wins. The function is
/// pure; turning the plan into volumes is left to the caller.
pub fn validate(
    request: &AllocationRequest,
    registry: &VolumeRegistry,
) -> Result<ValidatedPlan, ValidationError> {
    let lss = parse_hex2(&request.lss).map_err(|_| ValidationError::InvalidLss)?;
    let start = parse_hex2(&request.start_vol).map_err(|_| ValidationError::InvalidStart)?;

    let end = match request.end_vol.as_deref() {
        None | Some("") => start,
        Some(end) => parse_hex2(end).map_err(|_| ValidationError::InvalidEnd)?,
    };

    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }

    let count = u32::from(end) - u32::from(start) + 1;
    if count > VOLUMES_PER_LSS {
        return Err(ValidationError::RangeTooLarge);
    }

    let conflicts = find_conflicts(lss, start, end, registry);
    if !conflicts.is_empty() {
        return Err(ValidationError::ConflictsExist(conflicts));
    }

    if request.capacity_bytes_per_volume == 0 {
        return Err(ValidationError::InvalidCapacity);
    }
    let total_capacity_bytes = request
        .capacity_bytes_per_volume
        .checked_mul(u64::from(count))
        .ok_or(ValidationError::InvalidCapacity)?;

    if let Some(policy) = lss_policy(lss, registry) {
        let format_matches = policy
            .format
            .is_none_or(|format| format == request.format);
        // A pool-less LSS still locks the pool: naming one is a mismatch.
        let pool_matches = request
            .pool_name
            .as_ref()
            .is_none_or(|requested| policy.pool_name.as_ref() == Some(requested));

        if !format_matches || !pool_matches {
            return Err(ValidationError::PolicyMismatch {
                expected_format: policy.format,
                expected_pool: policy.pool_name,
                requested_format: request.format,
                requested_pool: request.pool_name.clone(),
            });
        }
    }

    let plan = ValidatedPlan {
        start_volume: VolumeAddress::new(lss, start),
        end_volume: VolumeAddress::new(lss, end),
        count,
        total_capacity_bytes,
        format: request.format,
        pool_name: request.pool_name.clone(),
    };

    tracing::debug!("Validated plan: {}", plan.summary());
    Ok(plan)
}
