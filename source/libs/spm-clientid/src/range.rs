// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pre-provisioned client-id ranges and their input → output mapping.

use crate::owner::{ClientId, IrqSource};

/// How valid input ids of a range become internal client ids.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IdMapping {
    /// Output equals input.
    #[default]
    Identity,
    /// `out = out_base + (in - id_lo)`.
    Offset {
        /// Output id assigned to `id_lo`.
        out_base: ClientId,
    },
}

/// Errors raised while provisioning a range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// `id_lo > id_hi`.
    #[error("client id range is inverted ({lo} > {hi})")]
    Inverted {
        /// Lower bound supplied.
        lo: ClientId,
        /// Upper bound supplied.
        hi: ClientId,
    },
    /// The offset mapping would leave the `i32` id space.
    #[error("offset mapping from base {out_base} overflows the client id space")]
    MappingOverflow {
        /// Offending output base.
        out_base: ClientId,
    },
}

/// A client-id interval `[id_lo, id_hi]` keyed by a mailbox interrupt source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClientIdRange {
    irq_source: IrqSource,
    id_lo: ClientId,
    id_hi: ClientId,
    mapping: IdMapping,
}

impl ClientIdRange {
    /// Provisions a range; bounds are inclusive.
    pub fn new(
        irq_source: IrqSource,
        id_lo: ClientId,
        id_hi: ClientId,
        mapping: IdMapping,
    ) -> Result<Self, RangeError> {
        if id_lo > id_hi {
            return Err(RangeError::Inverted { lo: id_lo, hi: id_hi });
        }
        if let IdMapping::Offset { out_base } = mapping {
            let span = i64::from(id_hi) - i64::from(id_lo);
            if i64::from(out_base) + span > i64::from(ClientId::MAX) {
                return Err(RangeError::MappingOverflow { out_base });
            }
        }
        Ok(Self { irq_source, id_lo, id_hi, mapping })
    }

    /// Provisions an identity-mapped range.
    pub fn identity(
        irq_source: IrqSource,
        id_lo: ClientId,
        id_hi: ClientId,
    ) -> Result<Self, RangeError> {
        Self::new(irq_source, id_lo, id_hi, IdMapping::Identity)
    }

    /// Interrupt source keying this range.
    pub fn irq_source(&self) -> IrqSource {
        self.irq_source
    }

    /// Inclusive lower bound of accepted input ids.
    pub fn id_lo(&self) -> ClientId {
        self.id_lo
    }

    /// Inclusive upper bound of accepted input ids.
    pub fn id_hi(&self) -> ClientId {
        self.id_hi
    }

    /// Mapping applied to accepted ids.
    pub fn mapping(&self) -> IdMapping {
        self.mapping
    }

    /// Returns true when `id` is an accepted input.
    #[inline]
    pub fn contains(&self, id: ClientId) -> bool {
        self.id_lo <= id && id <= self.id_hi
    }

    /// Maps an input id, or returns `None` when it is outside the range.
    pub fn map(&self, id: ClientId) -> Option<ClientId> {
        if !self.contains(id) {
            return None;
        }
        match self.mapping {
            IdMapping::Identity => Some(id),
            IdMapping::Offset { out_base } => {
                let out = i64::from(out_base) + (i64::from(id) - i64::from(self.id_lo));
                ClientId::try_from(out).ok()
            }
        }
    }

    /// Inclusive bounds of the ids this range can produce.
    pub fn output_bounds(&self) -> (ClientId, ClientId) {
        match (self.map(self.id_lo), self.map(self.id_hi)) {
            (Some(lo), Some(hi)) => (lo, hi),
            // Unreachable for ranges built through `new`.
            _ => (self.id_lo, self.id_hi),
        }
    }

    pub(crate) fn outputs_overlap(&self, other: &ClientIdRange) -> bool {
        let (a_lo, a_hi) = self.output_bounds();
        let (b_lo, b_hi) = other.output_bounds();
        a_lo <= b_hi && b_lo <= a_hi
    }
}
