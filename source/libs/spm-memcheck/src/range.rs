// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Overflow-safe range containment
//! INVARIANTS: Half-open `[region_start, region_limit)`; overflowing `p + s` is never contained

/// Returns true when `[p, p + s)` lies inside `[region_start, region_limit)`.
///
/// A zero-sized range is contained when `region_start <= p <= region_limit`.
#[inline]
pub fn contains(p: usize, s: usize, region_start: usize, region_limit: usize) -> bool {
    match p.checked_add(s) {
        Some(end) => p >= region_start && end <= region_limit,
        None => false,
    }
}
