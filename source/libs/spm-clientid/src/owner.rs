// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Identity newtypes for client-id registration
//! INVARIANTS: `OwnerId` is never zero and never the legacy "any owner" magic

use core::fmt;
use core::num::NonZeroU32;

/// Client identifier as seen by secure services.
pub type ClientId = i32;

/// Raw value legacy callers pass to mean "no specific owner".
pub const OWNER_MAGIC: u32 = 0xFFFF_FFFF;

/// Identity of a caller that may own a client-id range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct OwnerId(NonZeroU32);

impl OwnerId {
    /// Creates an owner identity; zero and [`OWNER_MAGIC`] are reserved.
    #[inline]
    pub const fn new(raw: u32) -> Option<Self> {
        if raw == OWNER_MAGIC {
            return None;
        }
        match NonZeroU32::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the raw identity value.
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// Owner argument of registration and translation calls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    /// No specific owner. Never a valid registration target.
    Unspecified,
    /// A concrete caller identity.
    Client(OwnerId),
}

impl Owner {
    /// Decodes a raw owner word; reserved values become [`Owner::Unspecified`].
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        match OwnerId::new(raw) {
            Some(id) => Owner::Client(id),
            None => Owner::Unspecified,
        }
    }

    /// Returns the concrete identity, if any.
    #[inline]
    pub const fn id(self) -> Option<OwnerId> {
        match self {
            Owner::Client(id) => Some(id),
            Owner::Unspecified => None,
        }
    }
}

impl From<OwnerId> for Owner {
    fn from(value: OwnerId) -> Self {
        Owner::Client(value)
    }
}

/// Mailbox interrupt source keying a provisioned client-id range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct IrqSource(u32);

impl IrqSource {
    /// Wraps a raw interrupt source number.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw interrupt source number.
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for IrqSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "irq{}", self.0)
    }
}
