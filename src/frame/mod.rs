// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

mod data;
pub(crate) mod rtu;

pub use self::{data::*, rtu::*};
use byteorder::{BigEndian, ByteOrder};

/// A Modbus function code.
///
/// Only the register functions this client issues are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCode {
    /// Modbus Function Code: `03` (`0x03`).
    ReadHoldingRegisters,

    /// Modbus Function Code: `04` (`0x04`).
    ReadInputRegisters,

    /// Modbus Function Code: `06` (`0x06`).
    WriteSingleRegister,

    /// Modbus Function Code: `16` (`0x10`).
    WriteMultipleRegisters,
}

/// Set on the echoed function code of an exception response.
pub const EXCEPTION_FLAG: u8 = 0x80;

impl FunctionCode {
    /// Get the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ReadHoldingRegisters => 0x03,
            Self::ReadInputRegisters => 0x04,
            Self::WriteSingleRegister => 0x06,
            Self::WriteMultipleRegisters => 0x10,
        }
    }

    /// The function code of the matching exception response.
    #[must_use]
    pub const fn exception_value(self) -> u8 {
        self.value() | EXCEPTION_FLAG
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = crate::Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let fn_code = match code {
            0x03 => Self::ReadHoldingRegisters,
            0x04 => Self::ReadInputRegisters,
            0x06 => Self::WriteSingleRegister,
            0x10 => Self::WriteMultipleRegisters,
            _ => return Err(crate::Error::FnCode(code)),
        };
        Ok(fn_code)
    }
}

impl From<FunctionCode> for u8 {
    fn from(fn_code: FunctionCode) -> Self {
        fn_code.value()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// A Modbus address is represented by 16 bit (from `0` to `65535`).
pub(crate) type Address = u16;

/// Modbus uses 16 bit for its data items (big-endian representation).
pub(crate) type Word = u16;

/// Number of items to process (`0` - `65535`).
pub(crate) type Quantity = u16;

/// Raw PDU data
type RawData<'r> = &'r [u8];

/// Maximum number of registers a single read may request.
pub const MAX_READ_QUANTITY: Quantity = 125;

/// Maximum number of registers a single multiple write may carry.
pub const MAX_WRITE_QUANTITY: Quantity = 123;

/// A request represents a message from the client (master) to the server (slave).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'r> {
    ReadHoldingRegisters(Address, Quantity),
    ReadInputRegisters(Address, Quantity),
    WriteSingleRegister(Address, Word),
    WriteMultipleRegisters(Address, Data<'r>),
}

/// The response data of a successful request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'r> {
    ReadHoldingRegisters(Data<'r>),
    ReadInputRegisters(Data<'r>),
    WriteSingleRegister(Address, Word),
    WriteMultipleRegisters(Address, Quantity),
}

impl<'r> From<Request<'r>> for FunctionCode {
    fn from(r: Request<'r>) -> Self {
        use Request as R;

        match r {
            R::ReadHoldingRegisters(_, _) => Self::ReadHoldingRegisters,
            R::ReadInputRegisters(_, _) => Self::ReadInputRegisters,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
            R::WriteMultipleRegisters(_, _) => Self::WriteMultipleRegisters,
        }
    }
}

impl<'r> From<Response<'r>> for FunctionCode {
    fn from(r: Response<'r>) -> Self {
        use Response as R;

        match r {
            R::ReadHoldingRegisters(_) => Self::ReadHoldingRegisters,
            R::ReadInputRegisters(_) => Self::ReadInputRegisters,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
            R::WriteMultipleRegisters(_, _) => Self::WriteMultipleRegisters,
        }
    }
}

/// A server (slave) exception.
///
/// These are the codes defined by the Modbus application protocol.
/// Devices may answer with other (vendor) codes, which is why
/// [`Error::DeviceException`](crate::Error::DeviceException) keeps the raw byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    IllegalFunction = 0x01,
    IllegalDataAddress = 0x02,
    IllegalDataValue = 0x03,
    ServerDeviceFailure = 0x04,
    Acknowledge = 0x05,
    ServerDeviceBusy = 0x06,
    MemoryParityError = 0x08,
    GatewayPathUnavailable = 0x0A,
    GatewayTargetDevice = 0x0B,
}

impl Exception {
    const fn get_name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "Illegal function",
            Self::IllegalDataAddress => "Illegal data address",
            Self::IllegalDataValue => "Illegal data value",
            Self::ServerDeviceFailure => "Server device failure",
            Self::Acknowledge => "Acknowledge",
            Self::ServerDeviceBusy => "Server device busy",
            Self::MemoryParityError => "Memory parity error",
            Self::GatewayPathUnavailable => "Gateway path unavailable",
            Self::GatewayTargetDevice => "Gateway target device failed to respond",
        }
    }

    /// Look up a standard exception by its code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        let ex = match code {
            0x01 => Self::IllegalFunction,
            0x02 => Self::IllegalDataAddress,
            0x03 => Self::IllegalDataValue,
            0x04 => Self::ServerDeviceFailure,
            0x05 => Self::Acknowledge,
            0x06 => Self::ServerDeviceBusy,
            0x08 => Self::MemoryParityError,
            0x0A => Self::GatewayPathUnavailable,
            0x0B => Self::GatewayTargetDevice,
            _ => return None,
        };
        Some(ex)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

impl Request<'_> {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub const fn pdu_len(&self) -> usize {
        match *self {
            Self::ReadHoldingRegisters(_, _)
            | Self::ReadInputRegisters(_, _)
            | Self::WriteSingleRegister(_, _) => 5,
            Self::WriteMultipleRegisters(_, words) => 6 + words.len() * 2,
        }
    }

    /// The first register the request refers to.
    #[must_use]
    pub const fn start_register(&self) -> Address {
        match *self {
            Self::ReadHoldingRegisters(addr, _)
            | Self::ReadInputRegisters(addr, _)
            | Self::WriteSingleRegister(addr, _)
            | Self::WriteMultipleRegisters(addr, _) => addr,
        }
    }

    /// Number of registers read or written.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        match *self {
            Self::ReadHoldingRegisters(_, qty) | Self::ReadInputRegisters(_, qty) => qty,
            Self::WriteSingleRegister(_, _) => 1,
            Self::WriteMultipleRegisters(_, words) => words.len() as Quantity,
        }
    }
}

impl<'r> Response<'r> {
    /// Register words carried by a read response.
    #[must_use]
    pub const fn data(&self) -> Option<Data<'r>> {
        match *self {
            Self::ReadHoldingRegisters(words) | Self::ReadInputRegisters(words) => Some(words),
            Self::WriteSingleRegister(_, _) | Self::WriteMultipleRegisters(_, _) => None,
        }
    }
}

/// Read the big-endian address/value pair echoed by write responses.
pub(crate) fn read_echo(bytes: &[u8]) -> (Address, Word) {
    (
        BigEndian::read_u16(&bytes[0..2]),
        BigEndian::read_u16(&bytes[2..4]),
    )
}
