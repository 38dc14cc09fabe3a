// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU client (master) specific functions.
use super::*;

/// Encode an RTU request.
pub fn encode_request(slave: SlaveId, request: Request<'_>, buf: &mut [u8]) -> Result<usize> {
    if buf.len() < 2 {
        return Err(Error::BufferSize);
    }
    let len = request.encode(&mut buf[1..])?;
    buf[0] = slave;
    append_crc(buf, len + 1)
}

/// Decode an RTU response.
///
/// The frame must be complete: the checks are applied in order
/// length, CRC, slave address, function code, exception flag.
pub fn decode_response(
    buf: &[u8],
    expected_slave: SlaveId,
    expected_function: FunctionCode,
) -> Result<ResponseFrame<'_>> {
    let (adu_buf, crc) = verify_crc(buf)?;
    let slave = adu_buf[0];
    if slave != expected_slave {
        return Err(Error::AddressMismatch {
            expected: expected_slave,
            actual: slave,
        });
    }
    let fn_code = adu_buf[1];
    if fn_code & !EXCEPTION_FLAG != expected_function.value() {
        return Err(Error::FunctionMismatch {
            expected: expected_function.value(),
            actual: fn_code,
        });
    }
    let data = &adu_buf[2..];
    if fn_code & EXCEPTION_FLAG != 0 {
        let [code] = data else {
            return Err(Error::ByteCount(data.len() as u8));
        };
        #[cfg(feature = "log")]
        log::debug!("Slave {slave} answered 0x{fn_code:0>2X} with exception 0x{code:0>2X}");
        return Err(Error::DeviceException(*code));
    }
    Ok(ResponseFrame {
        slave,
        function: expected_function,
        data,
        crc,
    })
}

impl RequestFrame {
    /// Interpret a validated response frame as the answer to this request.
    ///
    /// Reads must deliver exactly the requested number of words, writes
    /// must echo the request fields.
    pub fn check_response<'a>(&self, frame: &ResponseFrame<'a>) -> Result<Response<'a>> {
        if frame.slave != self.slave() {
            return Err(Error::AddressMismatch {
                expected: self.slave(),
                actual: frame.slave,
            });
        }
        if frame.function != self.function() {
            return Err(Error::FunctionMismatch {
                expected: self.function().value(),
                actual: frame.function.value(),
            });
        }
        let rsp = parse_pdu(frame)?;
        match rsp {
            Response::ReadHoldingRegisters(data) | Response::ReadInputRegisters(data) => {
                let expected = usize::from(self.quantity());
                if data.len() != expected {
                    return Err(Error::WordCountMismatch {
                        expected,
                        actual: data.len(),
                    });
                }
            }
            Response::WriteSingleRegister(_, _) | Response::WriteMultipleRegisters(_, _) => {
                if frame.data != &self.fields()[..4] {
                    return Err(Error::EchoMismatch);
                }
            }
        }
        Ok(rsp)
    }
}

fn parse_pdu<'a>(frame: &ResponseFrame<'a>) -> Result<Response<'a>> {
    use crate::frame::Response as R;
    use FunctionCode as f;

    let data = frame.data;
    let rsp = match frame.function {
        f::ReadHoldingRegisters | f::ReadInputRegisters => {
            let Some((&byte_count, words)) = data.split_first() else {
                return Err(Error::BufferSize);
            };
            if usize::from(byte_count) != words.len() {
                return Err(Error::ByteCount(byte_count));
            }
            let words = Data::from_bytes(words).map_err(|_| Error::ByteCount(byte_count))?;
            if frame.function == f::ReadInputRegisters {
                R::ReadInputRegisters(words)
            } else {
                R::ReadHoldingRegisters(words)
            }
        }
        f::WriteSingleRegister | f::WriteMultipleRegisters => {
            if data.len() != 4 {
                return Err(Error::BufferSize);
            }
            let (addr, payload) = read_echo(data);
            if frame.function == f::WriteSingleRegister {
                R::WriteSingleRegister(addr, payload)
            } else {
                R::WriteMultipleRegisters(addr, payload)
            }
        }
    };
    Ok(rsp)
}
