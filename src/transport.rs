// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte transport between the client and the bus.
//!
//! A transport only moves bytes. Framing, CRC and timeouts of a
//! whole transaction are handled by the
//! [`TransactionManager`](crate::client::TransactionManager).

use std::{io, time::Duration};

/// A byte oriented duplex channel (usually a RS-485 serial port).
pub trait Transport {
    /// Write a complete request frame.
    fn write(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Read whatever arrives within `max_wait` into `buf`.
    ///
    /// Returns `Ok(0)` if nothing arrived in time.
    fn read_available(&mut self, buf: &mut [u8], max_wait: Duration) -> io::Result<usize>;

    /// Drop bytes that were received but not read yet.
    fn discard_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).write(frame)
    }

    fn read_available(&mut self, buf: &mut [u8], max_wait: Duration) -> io::Result<usize> {
        (**self).read_available(buf, max_wait)
    }

    fn discard_input(&mut self) -> io::Result<()> {
        (**self).discard_input()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).write(frame)
    }

    fn read_available(&mut self, buf: &mut [u8], max_wait: Duration) -> io::Result<usize> {
        (**self).read_available(buf, max_wait)
    }

    fn discard_input(&mut self) -> io::Result<()> {
        (**self).discard_input()
    }
}

/// Baud rates supported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaudRate {
    #[default]
    B9600,
    B19200,
    B38400,
    B115200,
}

impl BaudRate {
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::B9600 => 9_600,
            Self::B19200 => 19_200,
            Self::B38400 => 38_400,
            Self::B115200 => 115_200,
        }
    }

    #[must_use]
    pub const fn from_value(baud_rate: u32) -> Option<Self> {
        let baud_rate = match baud_rate {
            9_600 => Self::B9600,
            19_200 => Self::B19200,
            38_400 => Self::B38400,
            115_200 => Self::B115200,
            _ => return None,
        };
        Some(baud_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataBits {
    Seven,
    #[default]
    Eight,
}

/// Line settings of the serial port.
///
/// Parity is always even with one stop bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerialConfig {
    pub baud_rate: BaudRate,
    pub data_bits: DataBits,
}

impl SerialConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_baud_rate(mut self, baud_rate: BaudRate) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    #[must_use]
    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }
}

#[cfg(feature = "serial")]
pub use self::serial::SerialTransport;

#[cfg(feature = "serial")]
mod serial {
    use std::io::{Read, Write};

    use serialport::{ClearBuffer, Parity, SerialPort, StopBits};

    use super::*;

    /// [`Transport`] on top of a `serialport` port.
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
    }

    impl SerialTransport {
        /// Open the serial device at `path`.
        pub fn open(path: &str, config: &SerialConfig) -> io::Result<Self> {
            let data_bits = match config.data_bits {
                DataBits::Seven => serialport::DataBits::Seven,
                DataBits::Eight => serialport::DataBits::Eight,
            };
            let port = serialport::new(path, config.baud_rate.value())
                .data_bits(data_bits)
                .parity(Parity::Even)
                .stop_bits(StopBits::One)
                .timeout(Duration::from_millis(100))
                .open()?;
            #[cfg(feature = "log")]
            log::debug!("Opened {path} with {config:?}");
            Ok(Self::from_port(port))
        }

        /// Use an already opened port.
        #[must_use]
        pub fn from_port(port: Box<dyn SerialPort>) -> Self {
            Self { port }
        }

        #[must_use]
        pub fn into_inner(self) -> Box<dyn SerialPort> {
            self.port
        }
    }

    impl Transport for SerialTransport {
        fn write(&mut self, frame: &[u8]) -> io::Result<()> {
            self.port.write_all(frame)?;
            self.port.flush()
        }

        fn read_available(&mut self, buf: &mut [u8], max_wait: Duration) -> io::Result<usize> {
            if buf.is_empty() || max_wait.is_zero() {
                return Ok(0);
            }
            self.port.set_timeout(max_wait)?;
            match self.port.read(buf) {
                Ok(n) => Ok(n),
                Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(0),
                Err(err) => Err(err),
            }
        }

        fn discard_input(&mut self) -> io::Result<()> {
            self.port.clear(ClearBuffer::Input)?;
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;

    use super::*;

    /// Answers every written frame with the next scripted response.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedTransport {
        responses: VecDeque<Vec<u8>>,
        pending: VecDeque<u8>,
        pub(crate) written: Vec<Vec<u8>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(responses: &[&[u8]]) -> Self {
            Self {
                responses: responses.iter().map(|r| r.to_vec()).collect(),
                ..Default::default()
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn write(&mut self, frame: &[u8]) -> io::Result<()> {
            self.written.push(frame.to_vec());
            if let Some(response) = self.responses.pop_front() {
                self.pending.extend(response);
            }
            Ok(())
        }

        fn read_available(&mut self, buf: &mut [u8], max_wait: Duration) -> io::Result<usize> {
            if self.pending.is_empty() {
                std::thread::sleep(max_wait);
                return Ok(0);
            }
            let n = buf.len().min(self.pending.len());
            for (dst, src) in buf.iter_mut().zip(self.pending.drain(..n)) {
                *dst = src;
            }
            Ok(n)
        }

        fn discard_input(&mut self) -> io::Result<()> {
            self.pending.clear();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baud_rates() {
        assert_eq!(BaudRate::default().value(), 9_600);
        assert_eq!(BaudRate::from_value(38_400), Some(BaudRate::B38400));
        assert_eq!(BaudRate::from_value(4_800), None);
    }

    #[test]
    fn serial_config_builder() {
        let config = SerialConfig::new()
            .with_baud_rate(BaudRate::B115200)
            .with_data_bits(DataBits::Seven);
        assert_eq!(config.baud_rate, BaudRate::B115200);
        assert_eq!(config.data_bits, DataBits::Seven);
        assert_eq!(SerialConfig::default().data_bits, DataBits::Eight);
    }

    #[test]
    fn blanket_impls_forward() {
        let mut transport = mock::ScriptedTransport::new(&[&[0x01, 0x02]]);
        {
            let mut by_ref = &mut transport;
            Transport::write(&mut by_ref, &[0xFF]).unwrap();
        }
        assert_eq!(transport.written, vec![vec![0xFF]]);
        let mut boxed: Box<dyn Transport> = Box::new(transport);
        let buf = &mut [0; 4];
        assert_eq!(boxed.read_available(buf, Duration::ZERO).unwrap(), 2);
        assert_eq!(&buf[..2], &[0x01, 0x02]);
        assert_eq!(boxed.read_available(buf, Duration::ZERO).unwrap(), 0);
    }
}
