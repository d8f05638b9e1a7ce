// SPDX-License-Identifier: GPL-3.0-only

mod common;

use common::fixtures::{fb_registry, record, request};
use san_allocator::{
    ValidationError, VolumeRegistry, compact_ranges, find_conflicts, lss_policy, validate,
};
use san_types::{VolumeAddress, VolumeFormat};

#[test]
fn invalid_lss_is_rejected_first() {
    let registry = fb_registry(&["1005"]);
    assert_eq!(
        validate(&request("G0", "00", Some("0F")), &registry),
        Err(ValidationError::InvalidLss)
    );
}

#[test]
fn end_before_start_is_rejected() {
    let registry = fb_registry(&[]);
    assert_eq!(
        validate(&request("10", "05", Some("02")), &registry),
        Err(ValidationError::EndBeforeStart)
    );
}

#[test]
fn whole_lss_fits_the_size_cap() {
    let plan = validate(&request("10", "00", Some("FF")), &fb_registry(&[])).expect("plan");

    assert_eq!(plan.count, 256);
    assert_eq!(plan.start_volume, VolumeAddress::new(0x10, 0x00));
    assert_eq!(plan.end_volume, VolumeAddress::new(0x10, 0xff));
    assert_eq!(plan.total_capacity_bytes, 256 * 100);
}

#[test]
fn overlapping_request_reports_conflicting_ids() {
    let registry = VolumeRegistry::from_records([record("1005", "P0", "FB", 100)]);

    let conflicts: Vec<String> = find_conflicts(0x10, 0x00, 0x0f, &registry)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(conflicts, vec!["1005"]);

    assert_eq!(
        validate(&request("10", "00", Some("0F")), &registry),
        Err(ValidationError::ConflictsExist(vec![VolumeAddress::new(
            0x10, 0x05
        )]))
    );
}

#[test]
fn isolated_volume_becomes_its_own_range() {
    let registry = fb_registry(&["1000", "1001", "1002", "1003", "1006"]);

    let spans: Vec<(u8, u8)> = compact_ranges(0x10, &registry)
        .iter()
        .map(|range| (range.start_vol, range.end_vol))
        .collect();

    assert_eq!(spans, vec![(0, 3), (6, 6)]);
}

#[test]
fn policy_only_exists_for_populated_lss() {
    let registry = VolumeRegistry::from_records([
        record("1000", "P7", "CKD", 100),
        record("1001", "P7", "CKD", 100),
    ]);

    let policy = lss_policy(0x10, &registry).expect("LSS 10 is locked");
    assert_eq!(policy.pool_name.as_deref(), Some("P7"));
    assert_eq!(policy.format, Some(VolumeFormat::Ckd));
    assert_eq!(policy.volume_count, 2);

    assert_eq!(lss_policy(0x20, &registry), None);
}

#[test]
fn coerced_request_passes_the_policy_check() {
    let registry = VolumeRegistry::from_records([record("1000", "P7", "CKD", 100)]);
    let unlocked = request("10", "10", Some("13"));

    let err = validate(&unlocked, &registry).unwrap_err();
    assert!(matches!(err, ValidationError::PolicyMismatch { .. }));

    let policy = lss_policy(0x10, &registry).expect("policy");
    let plan = validate(&unlocked.coerce_to_policy(&policy), &registry).expect("plan");
    assert_eq!(plan.format, VolumeFormat::Ckd);
    assert_eq!(plan.pool_name.as_deref(), Some("P7"));
}

#[test]
fn validation_is_idempotent() {
    let registry = fb_registry(&["1005", "1006"]);
    for req in [
        request("10", "00", Some("0F")),
        request("10", "10", None),
        request("zz", "00", None),
    ] {
        assert_eq!(validate(&req, &registry), validate(&req, &registry));
    }
}
