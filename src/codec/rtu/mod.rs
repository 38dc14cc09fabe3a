// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU

use super::*;
use byteorder::LittleEndian;

pub mod client;
pub use crate::frame::rtu::*;

/// Slave address, function code and CRC.
const ADU_OVERHEAD: usize = 4;

/// Smallest frame that can be checked at all: slave, function, CRC.
pub const MIN_FRAME_LEN: usize = 4;

/// Slave, function with the exception flag, exception code and CRC.
pub const EXCEPTION_FRAME_LEN: usize = 5;

/// Calculate the CRC (Cyclic Redundancy Check) sum.
///
/// The result is the plain CRC register value, it is transmitted
/// low byte first.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFF;
    for x in data {
        crc ^= u16::from(*x);
        for _ in 0..8 {
            // if we followed clippy's suggestion to move out the crc >>= 1, the condition may not be met any more
            // the recommended action therefore makes no sense and it is better to allow this lint
            #[allow(clippy::branches_sharing_code)]
            if (crc & 0x0001) != 0 {
                crc >>= 1;
                crc ^= 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Append the CRC of `buf[..len]` at `buf[len..len + 2]`.
///
/// Returns the new frame length.
pub(crate) fn append_crc(buf: &mut [u8], len: usize) -> Result<usize> {
    if buf.len() < len + 2 {
        return Err(Error::BufferSize);
    }
    let crc = crc16(&buf[..len]);
    LittleEndian::write_u16(&mut buf[len..], crc);
    Ok(len + 2)
}

/// Check the trailing CRC of a complete frame.
///
/// Returns the frame without its CRC together with the received CRC.
pub fn verify_crc(frame: &[u8]) -> Result<(&[u8], u16)> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(Error::FrameTooShort(frame.len()));
    }
    let (adu_buf, crc_buf) = frame.split_at(frame.len() - 2);
    let expected_crc = LittleEndian::read_u16(crc_buf);
    let actual_crc = crc16(adu_buf);
    if expected_crc != actual_crc {
        return Err(Error::Crc {
            expected: expected_crc,
            actual: actual_crc,
        });
    }
    Ok((adu_buf, expected_crc))
}

/// Length of the complete response to `request`.
///
/// The length follows from the request alone, so a corrupted length
/// or function byte in the response is left for the CRC check. The
/// only exception is the exception frame, recognized by its function
/// byte in `adu_buf` (the bytes received so far).
#[must_use]
pub fn response_frame_len(request: &RequestFrame, adu_buf: &[u8]) -> usize {
    use FunctionCode as f;

    if adu_buf.get(1) == Some(&request.function().exception_value()) {
        return EXCEPTION_FRAME_LEN;
    }
    let pdu_len = match request.function() {
        f::ReadHoldingRegisters | f::ReadInputRegisters => 2 + 2 * usize::from(request.quantity()),
        f::WriteSingleRegister | f::WriteMultipleRegisters => 5,
    };
    pdu_len + ADU_OVERHEAD - 1
}
