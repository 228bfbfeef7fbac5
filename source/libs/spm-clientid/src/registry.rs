// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Write-once binding of owners to pre-provisioned client-id ranges
//! OWNERS: @security
//! PUBLIC API: ClientIdRegistry::{new, register, owner_of, range_for, is_bound, len}
//! DEPENDS_ON: range::ClientIdRange, spin::Mutex
//! INVARIANTS: irq sources unique; output images disjoint; owner slot 0 -> owner exactly once
//!
//! The owner word of every slot is an atomic so lookups never lock. Registration
//! holds `bind_lock` while it checks "owner holds no range yet" and performs the
//! bind, so the two steps cannot interleave with another registration.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use spin::Mutex;

use crate::owner::{IrqSource, Owner, OwnerId};
use crate::range::ClientIdRange;

const UNBOUND: u32 = 0;

/// Errors detected while building the registry from platform configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two ranges share an interrupt source.
    #[error("duplicate client id range for {0}")]
    DuplicateIrqSource(IrqSource),
    /// Two ranges would hand out the same internal client id.
    #[error("client id ranges for {first} and {second} produce overlapping ids")]
    OverlappingIds {
        /// Earlier range in table order.
        first: IrqSource,
        /// Later range in table order.
        second: IrqSource,
    },
}

/// Outcome of a rejected registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// Owner is unspecified.
    #[error("owner is not a concrete identity")]
    BadOwner,
    /// No range is provisioned for the interrupt source.
    #[error("no client id range provisioned for this interrupt source")]
    UnknownIrqSource,
    /// The range already has an owner, or the owner already holds a range.
    #[error("client id range already registered")]
    AlreadyRegistered,
}

struct Slot {
    range: ClientIdRange,
    owner: AtomicU32,
}

impl Slot {
    fn owner(&self) -> Option<OwnerId> {
        OwnerId::new(self.owner.load(Ordering::Acquire))
    }
}

/// Table of provisioned client-id ranges with their (write-once) owners.
pub struct ClientIdRegistry {
    slots: Vec<Slot>,
    bind_lock: Mutex<()>,
}

impl ClientIdRegistry {
    /// Builds the registry from the platform's provisioned ranges; all start unbound.
    pub fn new<I>(ranges: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = ClientIdRange>,
    {
        let mut slots: Vec<Slot> = Vec::new();
        for range in ranges {
            for existing in &slots {
                if existing.range.irq_source() == range.irq_source() {
                    return Err(RegistryError::DuplicateIrqSource(range.irq_source()));
                }
                if existing.range.outputs_overlap(&range) {
                    return Err(RegistryError::OverlappingIds {
                        first: existing.range.irq_source(),
                        second: range.irq_source(),
                    });
                }
            }
            slots.push(Slot { range, owner: AtomicU32::new(UNBOUND) });
        }
        Ok(Self { slots, bind_lock: Mutex::new(()) })
    }

    /// Number of provisioned ranges.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when no ranges are provisioned.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates the provisioned ranges in table order.
    pub fn ranges(&self) -> impl Iterator<Item = &ClientIdRange> + '_ {
        self.slots.iter().map(|slot| &slot.range)
    }

    fn slot(&self, irq_source: IrqSource) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.range.irq_source() == irq_source)
    }

    pub(crate) fn slot_owned_by(&self, owner: OwnerId) -> Option<&ClientIdRange> {
        self.slots
            .iter()
            .find(|slot| slot.owner() == Some(owner))
            .map(|slot| &slot.range)
    }

    /// Binds `owner` to the range provisioned for `irq_source`.
    ///
    /// One-shot per range and per owner: a second claim is rejected, never
    /// silently accepted, regardless of which owner makes it.
    pub fn register(&self, owner: Owner, irq_source: IrqSource) -> Result<(), RegisterError> {
        let id = owner.id().ok_or(RegisterError::BadOwner)?;
        let slot = self.slot(irq_source).ok_or(RegisterError::UnknownIrqSource)?;

        let _guard = self.bind_lock.lock();
        if let Some(held) = self.slot_owned_by(id) {
            log::error!(
                target: "spm::clientid",
                "{} already holds the range for {}; rejecting claim on {}",
                id,
                held.irq_source(),
                irq_source
            );
            return Err(RegisterError::AlreadyRegistered);
        }
        if slot
            .owner
            .compare_exchange(UNBOUND, id.as_raw(), Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::error!(
                target: "spm::clientid",
                "client id range for {} is already registered; rejecting re-registration",
                irq_source
            );
            return Err(RegisterError::AlreadyRegistered);
        }
        log::info!(
            target: "spm::clientid",
            "bound client ids [{}, {}] for {}",
            slot.range.id_lo(),
            slot.range.id_hi(),
            irq_source
        );
        Ok(())
    }

    /// Returns the owner bound to the range for `irq_source`, if any.
    pub fn owner_of(&self, irq_source: IrqSource) -> Option<OwnerId> {
        self.slot(irq_source).and_then(Slot::owner)
    }

    /// Returns true when the range for `irq_source` has an owner.
    pub fn is_bound(&self, irq_source: IrqSource) -> bool {
        self.owner_of(irq_source).is_some()
    }

    /// Returns the range bound to `owner`, if it registered one.
    pub fn range_for(&self, owner: OwnerId) -> Option<ClientIdRange> {
        self.slot_owned_by(owner).copied()
    }
}
