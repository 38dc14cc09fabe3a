// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{io, time::Duration};

use thiserror::Error;

use crate::{SlaveAddress, value::RegisterValueKind};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of a client session.
#[derive(Debug, Error)]
pub enum Error {
    /// The frame or value could not be built or interpreted.
    #[error(transparent)]
    Protocol(#[from] crate::Error),

    /// No complete response arrived in time.
    #[error("Request timed out after {0:?}")]
    RequestTimeout(Duration),

    /// Reading from or writing to the transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    /// A previous transaction never finished.
    #[error("Another transaction is still in progress")]
    TransactionInProgress,

    #[error("Unknown register: {0}")]
    UnknownRegister(String),

    #[error("Register {0} is not readable")]
    NotReadable(u16),

    #[error("Register {0} is not writable")]
    NotWritable(u16),

    /// Device groups accept writes only.
    #[error("Cannot read from group address {0}")]
    MulticastRead(SlaveAddress),

    /// Register number plus source or target offset exceeds the address space.
    #[error("Register {0} is out of range")]
    RegisterOutOfRange(u16),

    #[error("Value kind mismatch: expected = {expected}, actual = {actual}")]
    KindMismatch {
        expected: RegisterValueKind,
        actual: RegisterValueKind,
    },
}

impl Error {
    /// `true` if the request timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeout(_))
    }

    /// The exception code if the device rejected the request.
    #[must_use]
    pub const fn device_exception(&self) -> Option<u8> {
        match self {
            Self::Protocol(crate::Error::DeviceException(code)) => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_are_transparent() {
        let err = Error::from(crate::Error::DeviceException(0x02));
        assert_eq!(err.to_string(), "Device exception: 0x02");
        assert_eq!(err.device_exception(), Some(0x02));
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeout() {
        let err = Error::RequestTimeout(Duration::from_millis(1500));
        assert!(err.is_timeout());
        assert_eq!(err.device_exception(), None);
        assert_eq!(err.to_string(), "Request timed out after 1.5s");
    }

    #[test]
    fn kind_mismatch_message() {
        let err = Error::KindMismatch {
            expected: RegisterValueKind::Float32,
            actual: RegisterValueKind::Enum,
        };
        assert_eq!(
            err.to_string(),
            "Value kind mismatch: expected = f32, actual = enum"
        );
    }

    #[test]
    fn multicast_read_message() {
        let slave = crate::resolve(0, 10).unwrap();
        assert_eq!(
            Error::MulticastRead(slave).to_string(),
            "Cannot read from group address 10"
        );
    }

    #[test]
    fn transport_error() {
        let err = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "port closed"));
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: port closed");
    }
}
