use crate::{error::*, frame::*};
use byteorder::{BigEndian, ByteOrder};

pub mod rtu;

type Result<T> = core::result::Result<T, Error>;

impl Request<'_> {
    /// Serialize the PDU (function code and fields) into `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.pdu_len();
        if buf.len() < len {
            return Err(Error::BufferSize);
        }
        buf[0] = FunctionCode::from(*self).value();
        match *self {
            Self::ReadHoldingRegisters(address, quantity)
            | Self::ReadInputRegisters(address, quantity) => {
                if quantity == 0 || quantity > MAX_READ_QUANTITY {
                    return Err(Error::Quantity(quantity.into()));
                }
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], quantity);
            }
            Self::WriteSingleRegister(address, word) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], word);
            }
            Self::WriteMultipleRegisters(address, words) => {
                if words.is_empty() || words.len() > usize::from(MAX_WRITE_QUANTITY) {
                    return Err(Error::Quantity(words.len()));
                }
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], words.len() as u16);
                buf[5] = (words.len() * 2) as u8;
                words.copy_to(&mut buf[6..]);
            }
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod serialize_requests {
        use super::*;

        #[test]
        fn read_holding_registers() {
            let buf = &mut [0; 5];
            let len = Request::ReadHoldingRegisters(0x0010, 2)
                .encode(buf)
                .unwrap();
            assert_eq!(len, 5);
            assert_eq!(buf, &[0x03, 0x00, 0x10, 0x00, 0x02]);
        }

        #[test]
        fn read_input_registers() {
            let buf = &mut [0; 5];
            Request::ReadInputRegisters(0x0009, 77).encode(buf).unwrap();
            assert_eq!(buf, &[0x04, 0x00, 0x09, 0x00, 0x4D]);
        }

        #[test]
        fn read_zero_or_too_many_registers() {
            let buf = &mut [0; 5];
            assert_eq!(
                Request::ReadHoldingRegisters(0, 0).encode(buf),
                Err(Error::Quantity(0))
            );
            assert_eq!(
                Request::ReadInputRegisters(0, 126).encode(buf),
                Err(Error::Quantity(126))
            );
            assert!(Request::ReadInputRegisters(0, 125).encode(buf).is_ok());
        }

        #[test]
        fn write_too_many_registers() {
            let words = [0xABCD; 124];
            let bytes = &mut [0; 248];
            let data = Data::from_words(&words, bytes).unwrap();
            let buf = &mut [0; 256];
            assert_eq!(
                Request::WriteMultipleRegisters(0, data).encode(buf),
                Err(Error::Quantity(124))
            );
        }

        #[test]
        fn write_single_register() {
            let buf = &mut [0; 5];
            Request::WriteSingleRegister(0x07, 0xABCD).encode(buf).unwrap();
            assert_eq!(buf, &[0x06, 0x00, 0x07, 0xAB, 0xCD]);
        }

        #[test]
        fn write_multiple_registers() {
            let words = &mut [0; 4];
            let data = Data::from_words(&[0xABCD, 0xEF12], words).unwrap();
            let buf = &mut [0; 10];
            let len = Request::WriteMultipleRegisters(0x06, data)
                .encode(buf)
                .unwrap();
            assert_eq!(len, 10);
            assert_eq!(
                buf,
                &[0x10, 0x00, 0x06, 0x00, 0x02, 0x04, 0xAB, 0xCD, 0xEF, 0x12]
            );
        }

        #[test]
        fn encode_into_small_buffer() {
            let buf = &mut [0; 4];
            assert_eq!(
                Request::WriteSingleRegister(0x07, 0xABCD).encode(buf),
                Err(Error::BufferSize)
            );
        }
    }
}
