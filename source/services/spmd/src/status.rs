// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Closed status set returned across the partition dispatch boundary.

use core::fmt;

use spm_clientid::{RegisterError, TranslateError};

use crate::mailbox::CommError;
use crate::manager::SpmError;

/// Boundary status. Codes are stable; no error text crosses the boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// Operation completed.
    Success = 0,
    /// Sentinel owner, malformed flags or an out-of-range id.
    BadParameters = -1,
    /// Unregistered owner or unprovisioned interrupt source.
    NotFound = -2,
    /// One-shot operation already performed.
    AlreadyDone = -3,
    /// Any other failure, including use before the channel is up.
    Generic = -4,
}

impl Status {
    /// Wire code of the status.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decodes a wire code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Status::Success),
            -1 => Some(Status::BadParameters),
            -2 => Some(Status::NotFound),
            -3 => Some(Status::AlreadyDone),
            -4 => Some(Status::Generic),
            _ => None,
        }
    }

    /// Collapses a boundary result into its wire code.
    pub fn code_of<T>(result: &Result<T, Status>) -> i32 {
        match result {
            Ok(_) => Status::Success.code(),
            Err(status) => status.code(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Success => "success",
            Status::BadParameters => "bad parameters",
            Status::NotFound => "not found",
            Status::AlreadyDone => "already done",
            Status::Generic => "generic failure",
        };
        f.write_str(name)
    }
}

impl From<RegisterError> for Status {
    fn from(value: RegisterError) -> Self {
        match value {
            RegisterError::BadOwner => Status::BadParameters,
            RegisterError::UnknownIrqSource => Status::NotFound,
            RegisterError::AlreadyRegistered => Status::AlreadyDone,
        }
    }
}

impl From<TranslateError> for Status {
    fn from(value: TranslateError) -> Self {
        match value {
            TranslateError::BadOwner | TranslateError::OutOfRange => Status::BadParameters,
            TranslateError::Unregistered => Status::NotFound,
        }
    }
}

impl From<CommError> for Status {
    fn from(value: CommError) -> Self {
        match value {
            CommError::AlreadyInitialised => Status::AlreadyDone,
            CommError::Transport(_) => Status::Generic,
        }
    }
}

impl From<SpmError> for Status {
    fn from(value: SpmError) -> Self {
        match value {
            SpmError::NotInitialised => Status::Generic,
            SpmError::Register(err) => err.into(),
            SpmError::Translate(err) => err.into(),
        }
    }
}
