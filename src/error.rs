// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

/// Protocol error
///
/// Everything that can go wrong while building, validating or interpreting
/// frames. Session level failures (timeouts, I/O) are reported by
/// [`client::Error`](crate::client::Error) which wraps this type unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Address offset is not one of `0`, `32`, `64` or `128`
    InvalidOffset(u8),
    /// Logical device index out of range
    InvalidLogicalIndex(u8),
    /// Received frame is shorter than the smallest valid frame
    FrameTooShort(usize),
    /// Invalid CRC
    Crc { expected: u16, actual: u16 },
    /// Response comes from another slave
    AddressMismatch { expected: u8, actual: u8 },
    /// Response answers another function
    FunctionMismatch { expected: u8, actual: u8 },
    /// Number of register words does not fit
    WordCountMismatch { expected: usize, actual: usize },
    /// The device rejected the request with an exception code
    DeviceException(u8),
    /// Invalid buffer size
    BufferSize,
    /// Invalid function code
    FnCode(u8),
    /// Invalid byte count
    ByteCount(u8),
    /// Number of registers is zero or exceeds what one request may carry
    Quantity(usize),
    /// Write response does not echo the request
    EchoMismatch,
    /// Text is not representable as short ASCII
    Text,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            InvalidOffset(offset) => write!(
                f,
                "Invalid address offset: {offset} (expected 0, 32, 64 or 128)"
            ),
            InvalidLogicalIndex(index) => write!(f, "Invalid logical device index: {index}"),
            FrameTooShort(len) => write!(f, "Frame too short: {len} byte(s)"),
            Crc { expected, actual } => write!(
                f,
                "Invalid CRC: expected = 0x{expected:0>4X}, actual = 0x{actual:0>4X}"
            ),
            AddressMismatch { expected, actual } => write!(
                f,
                "Slave address mismatch: expected = {expected}, actual = {actual}"
            ),
            FunctionMismatch { expected, actual } => write!(
                f,
                "Function code mismatch: expected = 0x{expected:0>2X}, actual = 0x{actual:0>2X}"
            ),
            WordCountMismatch { expected, actual } => write!(
                f,
                "Register word count mismatch: expected = {expected}, actual = {actual}"
            ),
            DeviceException(code) => write!(f, "Device exception: 0x{code:0>2X}"),
            BufferSize => write!(f, "Invalid buffer size"),
            FnCode(fn_code) => write!(f, "Invalid function code: 0x{fn_code:0>2X}"),
            ByteCount(cnt) => write!(f, "Invalid byte count: {cnt}"),
            Quantity(cnt) => write!(f, "Invalid register quantity: {cnt}"),
            EchoMismatch => write!(f, "Write response does not echo the request"),
            Text => write!(f, "Invalid short ASCII text"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_crc_error() {
        let err = Error::Crc {
            expected: 0x2AC3,
            actual: 0x0001,
        };
        assert_eq!(
            err.to_string(),
            "Invalid CRC: expected = 0x2AC3, actual = 0x0001"
        );
    }

    #[test]
    fn display_device_exception() {
        assert_eq!(
            Error::DeviceException(2).to_string(),
            "Device exception: 0x02"
        );
    }

    #[test]
    fn display_quantity() {
        assert_eq!(
            Error::Quantity(126).to_string(),
            "Invalid register quantity: 126"
        );
    }

    #[test]
    fn display_function_mismatch() {
        let err = Error::FunctionMismatch {
            expected: 0x03,
            actual: 0x10,
        };
        assert_eq!(
            err.to_string(),
            "Function code mismatch: expected = 0x03, actual = 0x10"
        );
    }
}
