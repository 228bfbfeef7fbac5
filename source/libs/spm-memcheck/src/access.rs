// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Combined access-check predicate over a caller-supplied flag set
//! OWNERS: @security
//! PUBLIC API: AccessFlags, AccessCheck, Side, AccessDenied, check_access(), has_access()
//! DEPENDS_ON: layout::RegionAttributes, layout::RegionPerms
//! INVARIANTS: Every requested flag must pass; each flag only adds requirements, so the
//!             predicate is monotonic in flags; unresolvable attributes deny
//!
//! Flag bits keep the CMSE positions so raw values from existing callers decode
//! unchanged. Permission flags are checked against the secure-side map (the side
//! that dereferences the buffer); `MPU_NONSECURE` additionally requires the
//! non-secure map to grant the same permissions to the caller.

use bitflags::bitflags;

use crate::layout::{RegionAttributes, RegionPerms};
use crate::region::{MemAttr, MemoryRegion};

bitflags! {
    /// Access requirements a caller asks the validator to enforce.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
    pub struct AccessFlags: u32 {
        /// Region must be readable and writable through the protection map.
        const MPU_READWRITE = 1 << 0;
        /// Region must be non-secure according to the partition table.
        const AU_NONSECURE = 1 << 1;
        /// Permission checks also apply to unprivileged access.
        const MPU_UNPRIV = 1 << 2;
        /// Region must be readable through the protection map.
        const MPU_READ = 1 << 3;
        /// The non-secure side's protection map must grant the access too.
        const MPU_NONSECURE = 1 << 4;
        /// Both non-secure requirements.
        const NONSECURE = Self::AU_NONSECURE.bits() | Self::MPU_NONSECURE.bits();
    }
}

impl AccessFlags {
    /// Decodes a raw flag word; unknown bits are rejected rather than ignored.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::from_bits(raw)
    }

    /// Iterates the individual checks requested by this set, in evaluation order.
    pub fn checks(self) -> impl Iterator<Item = AccessCheck> {
        AccessCheck::ALL.into_iter().filter(move |check| self.contains(check.flag()))
    }

    /// Permission bits the requested checks demand from each consulted map.
    pub fn required_perms(self) -> RegionPerms {
        self.checks()
            .map(|check| check.required_perms(self))
            .fold(RegionPerms::empty(), |acc, perms| acc | perms)
    }

    fn wants_permissions(self) -> bool {
        self.intersects(Self::MPU_READ | Self::MPU_READWRITE | Self::MPU_UNPRIV)
    }
}

/// One independently failing check, one per flag bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessCheck {
    /// `AU_NONSECURE`.
    NonSecure,
    /// `MPU_READ`.
    Read,
    /// `MPU_READWRITE`.
    ReadWrite,
    /// `MPU_UNPRIV`.
    Unprivileged,
    /// `MPU_NONSECURE`.
    NonSecureMpu,
}

impl AccessCheck {
    /// All checks in evaluation order.
    pub const ALL: [AccessCheck; 5] = [
        AccessCheck::NonSecure,
        AccessCheck::Read,
        AccessCheck::ReadWrite,
        AccessCheck::Unprivileged,
        AccessCheck::NonSecureMpu,
    ];

    /// Flag bit that requests this check.
    pub const fn flag(self) -> AccessFlags {
        match self {
            AccessCheck::NonSecure => AccessFlags::AU_NONSECURE,
            AccessCheck::Read => AccessFlags::MPU_READ,
            AccessCheck::ReadWrite => AccessFlags::MPU_READWRITE,
            AccessCheck::Unprivileged => AccessFlags::MPU_UNPRIV,
            AccessCheck::NonSecureMpu => AccessFlags::MPU_NONSECURE,
        }
    }

    /// Permission bits this check needs, given the full request.
    ///
    /// Unprivileged access needs write permission only when a write was requested.
    pub fn required_perms(self, flags: AccessFlags) -> RegionPerms {
        match self {
            AccessCheck::Read => RegionPerms::PRIV_READ,
            AccessCheck::ReadWrite => RegionPerms::PRIV_READ | RegionPerms::PRIV_WRITE,
            AccessCheck::Unprivileged if flags.contains(AccessFlags::MPU_READWRITE) => {
                RegionPerms::UNPRIV_READ | RegionPerms::UNPRIV_WRITE
            }
            AccessCheck::Unprivileged => RegionPerms::UNPRIV_READ,
            AccessCheck::NonSecure | AccessCheck::NonSecureMpu => RegionPerms::empty(),
        }
    }
}

/// Which permission map a check consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Secure-side memory map.
    Secure,
    /// Non-secure-side memory map.
    NonSecure,
}

/// Reason an access check denied the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDenied {
    /// `base + size` overflows the address width.
    Overflow,
    /// Region is not wholly inside one static partition.
    Unclassified,
    /// Non-secure memory was required but the region is secure.
    SecureMemory,
    /// The consulted map does not describe the region.
    NoMapping {
        /// Map that was consulted.
        side: Side,
    },
    /// The consulted map lacks permission bits a check requires.
    Permission {
        /// Failing check.
        check: AccessCheck,
        /// Map that was consulted.
        side: Side,
        /// Bits the check needed but the map does not grant.
        missing: RegionPerms,
    },
}

impl AccessDenied {
    /// Returns the flag check responsible for the denial, if a single one is.
    pub fn check(&self) -> Option<AccessCheck> {
        match self {
            AccessDenied::SecureMemory => Some(AccessCheck::NonSecure),
            AccessDenied::NoMapping { side: Side::NonSecure } => Some(AccessCheck::NonSecureMpu),
            AccessDenied::Permission { check, .. } => Some(*check),
            AccessDenied::Overflow
            | AccessDenied::Unclassified
            | AccessDenied::NoMapping { side: Side::Secure } => None,
        }
    }
}

fn verify_side(side: Side, attr: MemAttr, flags: AccessFlags) -> Result<(), AccessDenied> {
    if !attr.is_valid {
        return Err(AccessDenied::NoMapping { side });
    }
    // Static bits are authoritative; a live MPU flag never widens the grant.
    let granted = RegionPerms::from_mem_attr(&attr);
    for check in flags.checks() {
        let required = check.required_perms(flags);
        if !granted.contains(required) {
            return Err(AccessDenied::Permission {
                check,
                side,
                missing: required.difference(granted),
            });
        }
    }
    Ok(())
}

/// Checks `region` against every requested flag and explains the first failure.
pub fn check_access<R>(
    resolver: &R,
    region: &MemoryRegion,
    flags: AccessFlags,
) -> Result<(), AccessDenied>
where
    R: RegionAttributes + ?Sized,
{
    if region.end().is_none() {
        return Err(AccessDenied::Overflow);
    }

    let security = resolver.security_attr(region);
    if !security.is_valid {
        return Err(AccessDenied::Unclassified);
    }
    if flags.contains(AccessFlags::AU_NONSECURE) && security.is_secure {
        return Err(AccessDenied::SecureMemory);
    }

    if flags.wants_permissions() {
        verify_side(Side::Secure, resolver.secure_mem_attr(region), flags)?;
    }
    if flags.contains(AccessFlags::MPU_NONSECURE) {
        verify_side(Side::NonSecure, resolver.nonsecure_mem_attr(region), flags)?;
    }
    Ok(())
}

/// Returns true when every requested flag is satisfied for `region`.
#[inline]
pub fn has_access<R>(resolver: &R, region: &MemoryRegion, flags: AccessFlags) -> bool
where
    R: RegionAttributes + ?Sized,
{
    check_access(resolver, region, flags).is_ok()
}
