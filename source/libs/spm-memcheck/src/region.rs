// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-query region descriptor and the attribute records the resolver produces.

/// Caller-supplied memory range `[base, base + size)`.
///
/// Constructed per call and never stored; `size` may be zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    /// First byte of the range.
    pub base: usize,
    /// Length in bytes.
    pub size: usize,
}

impl MemoryRegion {
    /// Creates a region descriptor without validating it.
    #[inline]
    pub const fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    /// Returns the exclusive end address, or `None` when `base + size` overflows.
    #[inline]
    pub const fn end(&self) -> Option<usize> {
        self.base.checked_add(self.size)
    }

    /// Returns true when the region lies wholly inside `[start, limit)`.
    #[inline]
    pub fn is_within(&self, start: usize, limit: usize) -> bool {
        crate::range::contains(self.base, self.size, start, limit)
    }
}

/// Security classification of a region against the static partition table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SecurityAttr {
    /// Region resolved to exactly one classification.
    pub is_valid: bool,
    /// Region is secure memory (meaningless when `is_valid` is false).
    pub is_secure: bool,
}

impl SecurityAttr {
    /// Classification failure.
    pub const INVALID: Self = Self { is_valid: false, is_secure: false };

    /// Successful classification.
    #[inline]
    pub const fn resolved(is_secure: bool) -> Self {
        Self { is_valid: true, is_secure }
    }
}

/// Protection attributes of a region resolved from one side's permission map.
///
/// `is_mpu_enabled` stays false for statically resolved attributes; it does not
/// mean the region is unrestricted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemAttr {
    /// Live protection-unit state was consulted.
    pub is_mpu_enabled: bool,
    /// Region is wholly described by the permission map.
    pub is_valid: bool,
    /// Execute-never.
    pub is_xn: bool,
    /// Privileged read allowed.
    pub priv_rd: bool,
    /// Privileged write allowed.
    pub priv_wr: bool,
    /// Unprivileged read allowed.
    pub unpriv_rd: bool,
    /// Unprivileged write allowed.
    pub unpriv_wr: bool,
}

impl MemAttr {
    /// Attributes for a region outside the map: nothing granted.
    pub const INVALID: Self = Self {
        is_mpu_enabled: false,
        is_valid: false,
        is_xn: false,
        priv_rd: false,
        priv_wr: false,
        unpriv_rd: false,
        unpriv_wr: false,
    };
}
