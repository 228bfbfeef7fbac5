// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: One-shot bring-up of the inter-core mailbox channel
//! OWNERS: @runtime
//! PUBLIC API: MailboxTransport, LoopbackMailbox, MultiCoreComm, CommError
//! INVARIANTS: A live channel is never re-initialised; a failed bring-up leaves nothing live

use log::{error, info};
use thiserror::Error;

/// Hardware seam for the mailbox between the secure and non-secure cores.
pub trait MailboxTransport {
    /// Error surfaced by the transport implementation.
    type Error: core::fmt::Display;

    /// Brings the channel up. Called at most once per successful bring-up.
    fn init(&mut self) -> Result<(), Self::Error>;
}

/// Failures of [`MultiCoreComm::init`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommError {
    /// The channel is already live.
    #[error("mailbox channel already initialised")]
    AlreadyInitialised,
    /// The transport refused to come up.
    #[error("mailbox transport init failed: {0}")]
    Transport(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CommState {
    Uninitialised,
    Live,
}

/// Mailbox channel and its bring-up state.
pub struct MultiCoreComm<T> {
    transport: T,
    state: CommState,
}

impl<T: MailboxTransport> MultiCoreComm<T> {
    /// Wraps a transport; the channel starts down.
    pub fn new(transport: T) -> Self {
        Self { transport, state: CommState::Uninitialised }
    }

    /// Brings the channel up exactly once.
    pub fn init(&mut self) -> Result<(), CommError> {
        if self.state == CommState::Live {
            error!(target: "spm::boot", "mailbox channel already live; refusing re-initialisation");
            return Err(CommError::AlreadyInitialised);
        }
        match self.transport.init() {
            Ok(()) => {
                self.state = CommState::Live;
                info!(target: "spm::boot", "mailbox channel up");
                Ok(())
            }
            Err(err) => {
                error!(target: "spm::boot", "mailbox transport init failed: {err}");
                Err(CommError::Transport(err.to_string()))
            }
        }
    }

    /// Returns true once [`Self::init`] has succeeded.
    pub fn is_live(&self) -> bool {
        self.state == CommState::Live
    }

    /// Borrows the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Error returned by a [`LoopbackMailbox`] told to fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("loopback mailbox refused init")]
pub struct LoopbackError;

/// In-process transport for hosts without a second core.
#[derive(Debug, Default)]
pub struct LoopbackMailbox {
    failures_left: u32,
    init_calls: u32,
}

impl LoopbackMailbox {
    /// A transport whose init always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose first `count` init calls fail.
    pub fn failing(count: u32) -> Self {
        Self { failures_left: count, init_calls: 0 }
    }

    /// Number of times the transport was asked to come up.
    pub fn init_calls(&self) -> u32 {
        self.init_calls
    }
}

impl MailboxTransport for LoopbackMailbox {
    type Error = LoopbackError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.init_calls += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(LoopbackError);
        }
        Ok(())
    }
}
