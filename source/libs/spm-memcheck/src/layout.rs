// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Region attribute resolver over the static platform layout tables
//! OWNERS: @security
//! PUBLIC API: Partition, PermissionRegion, RegionPerms, MemoryLayout, RegionAttributes
//! DEPENDS_ON: region::{MemoryRegion, SecurityAttr, MemAttr}, range::contains
//! INVARIANTS: Read-only tables; a region resolves only when wholly inside an entry;
//!             entries that disagree about the same region resolve to invalid
//!
//! No hardware isolation or protection unit is queried here: every answer is a
//! function of the tables and the query, so callers may run it from any context.

use bitflags::bitflags;

use crate::region::{MemAttr, MemoryRegion, SecurityAttr};

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    /// Permission bits carried by a permission-map entry.
    pub struct RegionPerms: u8 {
        /// Privileged code may read.
        const PRIV_READ = 1 << 0;
        /// Privileged code may write.
        const PRIV_WRITE = 1 << 1;
        /// Unprivileged code may read.
        const UNPRIV_READ = 1 << 2;
        /// Unprivileged code may write.
        const UNPRIV_WRITE = 1 << 3;
        /// Instruction fetch is forbidden.
        const EXECUTE_NEVER = 1 << 4;
    }
}

impl RegionPerms {
    /// Expands the bits into the attribute record handed to callers.
    pub const fn to_mem_attr(self) -> MemAttr {
        MemAttr {
            is_mpu_enabled: false,
            is_valid: true,
            is_xn: self.contains(Self::EXECUTE_NEVER),
            priv_rd: self.contains(Self::PRIV_READ),
            priv_wr: self.contains(Self::PRIV_WRITE),
            unpriv_rd: self.contains(Self::UNPRIV_READ),
            unpriv_wr: self.contains(Self::UNPRIV_WRITE),
        }
    }

    /// Collapses an attribute record back into bits; invalid records map to empty.
    pub fn from_mem_attr(attr: &MemAttr) -> Self {
        let mut perms = Self::empty();
        if !attr.is_valid {
            return perms;
        }
        perms.set(Self::PRIV_READ, attr.priv_rd);
        perms.set(Self::PRIV_WRITE, attr.priv_wr);
        perms.set(Self::UNPRIV_READ, attr.unpriv_rd);
        perms.set(Self::UNPRIV_WRITE, attr.unpriv_wr);
        perms.set(Self::EXECUTE_NEVER, attr.is_xn);
        perms
    }
}

/// Static secure/non-secure partition entry covering `[base, limit)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    /// First address of the partition.
    pub base: usize,
    /// Exclusive end address.
    pub limit: usize,
    /// Partition belongs to the secure world.
    pub secure: bool,
}

impl Partition {
    /// Creates a partition entry.
    pub const fn new(base: usize, limit: usize, secure: bool) -> Self {
        Self { base, limit, secure }
    }
}

/// Permission-map entry covering `[base, limit)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionRegion {
    /// First address of the region.
    pub base: usize,
    /// Exclusive end address.
    pub limit: usize,
    /// Granted permissions.
    pub perms: RegionPerms,
}

impl PermissionRegion {
    /// Creates a permission-map entry.
    pub const fn new(base: usize, limit: usize, perms: RegionPerms) -> Self {
        Self { base, limit, perms }
    }
}

trait Bounded {
    fn bounds(&self) -> (usize, usize);
}

impl Bounded for Partition {
    fn bounds(&self) -> (usize, usize) {
        (self.base, self.limit)
    }
}

impl Bounded for PermissionRegion {
    fn bounds(&self) -> (usize, usize) {
        (self.base, self.limit)
    }
}

/// Finds the value every containing entry agrees on.
///
/// Returns `None` when no entry wholly contains `region` or when two containing
/// entries disagree.
fn resolve_unique<E, T, F>(entries: &[E], region: &MemoryRegion, value: F) -> Option<T>
where
    E: Bounded,
    T: PartialEq,
    F: Fn(&E) -> T,
{
    let mut found: Option<T> = None;
    for entry in entries {
        let (base, limit) = entry.bounds();
        if !region.is_within(base, limit) {
            continue;
        }
        let candidate = value(entry);
        match &found {
            None => found = Some(candidate),
            Some(existing) if *existing == candidate => {}
            Some(_) => return None,
        }
    }
    found
}

/// Attribute resolution seam consumed by the access validator.
pub trait RegionAttributes {
    /// Classifies the region against the static secure/non-secure partitioning.
    fn security_attr(&self, region: &MemoryRegion) -> SecurityAttr;
    /// Resolves permissions from the secure-side memory map.
    fn secure_mem_attr(&self, region: &MemoryRegion) -> MemAttr;
    /// Resolves permissions from the non-secure-side memory map.
    fn nonsecure_mem_attr(&self, region: &MemoryRegion) -> MemAttr;
}

/// Borrowed view over the platform's static layout tables.
#[derive(Clone, Copy, Debug)]
pub struct MemoryLayout<'a> {
    partitions: &'a [Partition],
    secure_map: &'a [PermissionRegion],
    nonsecure_map: &'a [PermissionRegion],
}

impl<'a> MemoryLayout<'a> {
    /// Wraps the three static tables.
    pub const fn new(
        partitions: &'a [Partition],
        secure_map: &'a [PermissionRegion],
        nonsecure_map: &'a [PermissionRegion],
    ) -> Self {
        Self { partitions, secure_map, nonsecure_map }
    }

    /// Returns the partition table.
    pub fn partitions(&self) -> &'a [Partition] {
        self.partitions
    }

    /// Returns the secure-side permission map.
    pub fn secure_map(&self) -> &'a [PermissionRegion] {
        self.secure_map
    }

    /// Returns the non-secure-side permission map.
    pub fn nonsecure_map(&self) -> &'a [PermissionRegion] {
        self.nonsecure_map
    }

    fn mem_attr(map: &[PermissionRegion], region: &MemoryRegion) -> MemAttr {
        resolve_unique(map, region, |entry| entry.perms)
            .map(RegionPerms::to_mem_attr)
            .unwrap_or(MemAttr::INVALID)
    }
}

impl RegionAttributes for MemoryLayout<'_> {
    fn security_attr(&self, region: &MemoryRegion) -> SecurityAttr {
        resolve_unique(self.partitions, region, |entry| entry.secure)
            .map(SecurityAttr::resolved)
            .unwrap_or(SecurityAttr::INVALID)
    }

    fn secure_mem_attr(&self, region: &MemoryRegion) -> MemAttr {
        Self::mem_attr(self.secure_map, region)
    }

    fn nonsecure_mem_attr(&self, region: &MemoryRegion) -> MemAttr {
        Self::mem_attr(self.nonsecure_map, region)
    }
}
