use super::*;
use crate::error::Error;
use byteorder::LittleEndian;

/// Slave ID
pub type SlaveId = u8;

// [MODBUS over Serial Line Specification and Implementation Guide V1.02](http://modbus.org/docs/Modbus_over_serial_line_V1_02.pdf), page 13
// "The maximum size of a MODBUS RTU frame is 256 bytes."
pub const MAX_FRAME_LEN: usize = 256;

/// An encoded RTU request.
///
/// The frame is built once and never changes afterwards; its trailing CRC
/// covers every preceding byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    slave: SlaveId,
    function: FunctionCode,
    start: Address,
    quantity: Quantity,
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl RequestFrame {
    /// Encode `request` for `slave`.
    pub fn new(slave: SlaveId, request: Request<'_>) -> Result<Self, Error> {
        let mut buf = [0; MAX_FRAME_LEN];
        let len = crate::rtu::client::encode_request(slave, request, &mut buf)?;
        Ok(Self {
            slave,
            function: request.into(),
            start: request.start_register(),
            quantity: request.quantity(),
            buf,
            len,
        })
    }

    #[must_use]
    pub const fn slave(&self) -> SlaveId {
        self.slave
    }

    #[must_use]
    pub const fn function(&self) -> FunctionCode {
        self.function
    }

    #[must_use]
    pub const fn start_register(&self) -> Address {
        self.start
    }

    /// Number of registers read or written.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// The bytes to put on the wire.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The CRC as transmitted (low byte first).
    #[must_use]
    pub fn crc(&self) -> u16 {
        LittleEndian::read_u16(&self.buf[self.len - 2..self.len])
    }

    /// Function specific request fields (without slave, function code and CRC).
    pub(crate) fn fields(&self) -> &[u8] {
        &self.buf[2..self.len - 2]
    }
}

impl AsRef<[u8]> for RequestFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// A validated RTU response.
///
/// `data` holds the function specific fields between the function code
/// and the CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame<'a> {
    pub slave: SlaveId,
    pub function: FunctionCode,
    pub data: &'a [u8],
    pub crc: u16,
}
