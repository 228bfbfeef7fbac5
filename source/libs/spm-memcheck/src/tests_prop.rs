// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg(test)]
//! CONTEXT: Property-based tests for range arithmetic, classification and the access predicate
//! OWNERS: @security
//! NOTE: Tests only; no validation logic.
//!
//! TEST_SCOPE:
//!   - Containment matches its arithmetic definition, including overflow
//!   - Regions inside one partition classify; regions crossing a boundary do not
//!   - Access predicate is monotonic in the requested flags
//!
//! TEST_SCENARIOS:
//!   - contains_matches_definition(): contains() == lo <= p && p+s <= hi without overflow
//!   - zero_size_contained_iff_in_bounds(): contains(p, 0, lo, hi) == (lo <= p <= hi)
//!   - inside_secure_partition_classifies_secure(): whole-partition regions resolve
//!   - straddling_regions_are_invalid(): boundary-crossing regions never resolve
//!   - adding_flags_never_grants(): has_access(f | g) implies has_access(f)

use crate::{
    contains, has_access, AccessFlags, MemoryLayout, MemoryRegion, Partition, PermissionRegion,
    RegionAttributes, RegionPerms,
};
use proptest::prelude::*;

const SECURE_BASE: usize = 0x1000_0000;
const SECURE_LIMIT: usize = 0x1010_0000;
const NS_BASE: usize = SECURE_LIMIT;
const NS_LIMIT: usize = 0x1020_0000;

const PARTITIONS: [Partition; 2] = [
    Partition::new(SECURE_BASE, SECURE_LIMIT, true),
    Partition::new(NS_BASE, NS_LIMIT, false),
];
const SECURE_MAP: [PermissionRegion; 3] = [
    PermissionRegion::new(SECURE_BASE, 0x1008_0000, RegionPerms::PRIV_READ),
    PermissionRegion::new(
        0x1008_0000,
        SECURE_LIMIT,
        RegionPerms::PRIV_READ.union(RegionPerms::PRIV_WRITE),
    ),
    PermissionRegion::new(
        NS_BASE,
        NS_LIMIT,
        RegionPerms::PRIV_READ
            .union(RegionPerms::PRIV_WRITE)
            .union(RegionPerms::UNPRIV_READ),
    ),
];
const NS_MAP: [PermissionRegion; 2] = [
    PermissionRegion::new(
        NS_BASE,
        0x1018_0000,
        RegionPerms::PRIV_READ
            .union(RegionPerms::PRIV_WRITE)
            .union(RegionPerms::UNPRIV_READ)
            .union(RegionPerms::UNPRIV_WRITE),
    ),
    PermissionRegion::new(0x1018_0000, NS_LIMIT, RegionPerms::UNPRIV_READ),
];

fn layout() -> MemoryLayout<'static> {
    MemoryLayout::new(&PARTITIONS, &SECURE_MAP, &NS_MAP)
}

fn arb_flags() -> impl Strategy<Value = AccessFlags> {
    (0u32..32).prop_map(AccessFlags::from_bits_truncate)
}

fn arb_region() -> impl Strategy<Value = MemoryRegion> {
    prop_oneof![
        (SECURE_BASE - 0x1000..NS_LIMIT + 0x1000, 0usize..0x9_0000)
            .prop_map(|(base, size)| MemoryRegion::new(base, size)),
        (any::<usize>(), any::<usize>()).prop_map(|(base, size)| MemoryRegion::new(base, size)),
    ]
}

proptest! {
    #[test]
    fn contains_matches_definition(p in any::<usize>(), s in any::<usize>(), lo in any::<usize>(), hi in any::<usize>()) {
        let expected = match p.checked_add(s) {
            Some(end) => lo <= p && end <= hi,
            None => false,
        };
        prop_assert_eq!(contains(p, s, lo, hi), expected);
    }

    #[test]
    fn zero_size_contained_iff_in_bounds(p in any::<usize>(), lo in any::<usize>(), hi in any::<usize>()) {
        prop_assert_eq!(contains(p, 0, lo, hi), p >= lo && p <= hi);
    }

    #[test]
    fn inside_secure_partition_classifies_secure(offset in 0usize..0x10_0000, len in 0usize..0x10_0000) {
        prop_assume!(offset + len <= SECURE_LIMIT - SECURE_BASE);
        let attr = layout().security_attr(&MemoryRegion::new(SECURE_BASE + offset, len));
        prop_assert!(attr.is_valid);
        prop_assert!(attr.is_secure);
    }

    #[test]
    fn straddling_regions_are_invalid(before in 1usize..0x1000, after in 1usize..0x1000) {
        let region = MemoryRegion::new(SECURE_LIMIT - before, before + after);
        prop_assert!(!layout().security_attr(&region).is_valid);
    }

    #[test]
    fn adding_flags_never_grants(region in arb_region(), base in arb_flags(), extra in arb_flags()) {
        let layout = layout();
        if has_access(&layout, &region, base | extra) {
            prop_assert!(has_access(&layout, &region, base));
        }
    }
}
