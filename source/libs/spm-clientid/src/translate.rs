// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Client id translation for callers with a bound range. Lookups are lock-free.

use crate::owner::{ClientId, Owner};
use crate::registry::ClientIdRegistry;

/// Outcome of a rejected translation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// Owner is unspecified.
    #[error("owner is not a concrete identity")]
    BadOwner,
    /// Owner has no bound range.
    #[error("owner has not registered a client id range")]
    Unregistered,
    /// Input id lies outside the owner's range.
    #[error("client id outside the owner's registered range")]
    OutOfRange,
}

impl ClientIdRegistry {
    /// Maps `client_id_in` from `owner` to the internal client id.
    ///
    /// Deterministic and injective over the owner's `[id_lo, id_hi]`.
    pub fn translate(&self, owner: Owner, client_id_in: ClientId) -> Result<ClientId, TranslateError> {
        let id = owner.id().ok_or(TranslateError::BadOwner)?;
        let range = self.slot_owned_by(id).ok_or(TranslateError::Unregistered)?;
        range.map(client_id_in).ok_or(TranslateError::OutOfRange)
    }
}
