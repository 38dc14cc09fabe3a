// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Xcom-485i specific access to parameters, user infos, the system
//! clock and the message queue.

use super::{Client, Error, Result};
use crate::{
    Device,
    transport::Transport,
    value::{self, RegisterValue},
};

/// Where a parameter value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterSource {
    /// The value stored in flash
    #[default]
    Flash,
    /// The smallest allowed value
    Minimum,
    /// The largest allowed value
    Maximum,
}

impl ParameterSource {
    /// Added to the parameter number to get the register address.
    #[must_use]
    pub const fn offset(self) -> u16 {
        match self {
            Self::Flash => 0,
            Self::Minimum => 2000,
            Self::Maximum => 4000,
        }
    }
}

/// Where a parameter value is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WriteTarget {
    #[default]
    FlashAndRam,
    /// Lost on power loss; preferred for values that change often.
    RamOnly,
}

impl WriteTarget {
    /// Added to the parameter number to get the register address.
    #[must_use]
    pub const fn offset(self) -> u16 {
        match self {
            Self::FlashAndRam => 0,
            Self::RamOnly => 6000,
        }
    }
}

/// Number of registers holding the system time.
pub const SYSTEM_TIME_REGISTERS: u16 = 8;

/// The system clock, one register per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SystemTime {
    pub millisecond: u16,
    pub second: u16,
    pub minute: u16,
    pub hour: u16,
    /// Day of the week, Monday is `0`.
    pub weekday: u16,
    pub day: u16,
    pub month: u16,
    pub year: u16,
}

impl SystemTime {
    #[must_use]
    pub const fn from_words(words: [u16; 8]) -> Self {
        let [millisecond, second, minute, hour, weekday, day, month, year] = words;
        Self {
            millisecond,
            second,
            minute,
            hour,
            weekday,
            day,
            month,
            year,
        }
    }

    #[must_use]
    pub const fn to_words(&self) -> [u16; 8] {
        [
            self.millisecond,
            self.second,
            self.minute,
            self.hour,
            self.weekday,
            self.day,
            self.month,
            self.year,
        ]
    }
}

/// An entry of the gateway message queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message {
    /// Index of the device that raised the message
    pub source: u16,
    /// Message number as listed in the device documentation
    pub id: u16,
    /// Message specific value, `0` if unused
    pub value: u32,
}

const PENDING_MESSAGES_REGISTER: u16 = 0;
const MESSAGE_REGISTER: u16 = 1;
const MESSAGE_REGISTERS: u16 = 4;

impl<T: Transport> Client<T> {
    /// Read a parameter of `device`.
    pub fn read_parameter(
        &mut self,
        device: Device,
        parameter: u16,
        source: ParameterSource,
    ) -> Result<f32> {
        let slave = self.resolve(device)?;
        let addr = shifted(parameter, source.offset())?;
        let words = self.read_holding_registers(slave, addr, 2)?;
        Ok(value::decode_f32(&words)?)
    }

    /// Write a parameter of `device`.
    ///
    /// Returns the number of registers written.
    pub fn write_parameter(
        &mut self,
        device: Device,
        parameter: u16,
        value: f32,
        target: WriteTarget,
    ) -> Result<u16> {
        let slave = self.resolve(device)?;
        let addr = shifted(parameter, target.offset())?;
        let words = value::encode(&RegisterValue::Float32(value));
        self.write_multiple_registers(slave, addr, words.as_slice())
    }

    /// Read a user info (measured or computed value) of `device`.
    pub fn read_info(&mut self, device: Device, info: u16) -> Result<f32> {
        let slave = self.resolve(device)?;
        let words = self.read_input_registers(slave, info, 2)?;
        Ok(value::decode_f32(&words)?)
    }

    pub fn read_time(&mut self) -> Result<SystemTime> {
        let slave = self.resolve(Device::System)?;
        let words = self.read_holding_registers(slave, 0, SYSTEM_TIME_REGISTERS)?;
        let words = <[u16; 8]>::try_from(words.as_slice()).map_err(|_| {
            crate::Error::WordCountMismatch {
                expected: SYSTEM_TIME_REGISTERS.into(),
                actual: words.len(),
            }
        })?;
        Ok(SystemTime::from_words(words))
    }

    /// Set the system clock.
    ///
    /// Returns the number of registers written.
    pub fn write_time(&mut self, time: &SystemTime) -> Result<u16> {
        let slave = self.resolve(Device::System)?;
        self.write_multiple_registers(slave, 0, &time.to_words())
    }

    /// Number of messages waiting in the gateway queue.
    pub fn pending_message_count(&mut self) -> Result<u16> {
        let slave = self.resolve(Device::Gateway)?;
        let words = self.read_input_registers(slave, PENDING_MESSAGES_REGISTER, 1)?;
        Ok(words[0])
    }

    /// Read the oldest queued message.
    pub fn read_message(&mut self) -> Result<Message> {
        let slave = self.resolve(Device::Gateway)?;
        let words = self.read_input_registers(slave, MESSAGE_REGISTER, MESSAGE_REGISTERS)?;
        Ok(Message {
            source: words[0],
            id: words[1],
            value: value::decode_u32(&words[2..])?,
        })
    }
}

fn shifted(register: u16, offset: u16) -> Result<u16> {
    register
        .checked_add(offset)
        .ok_or(Error::RegisterOutOfRange(register))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::ClientConfig, rtu::append_crc, transport::mock::ScriptedTransport};

    fn client(responses: &[&[u8]]) -> Client<ScriptedTransport> {
        Client::new(
            ScriptedTransport::new(responses),
            ClientConfig::default().with_timeout(std::time::Duration::from_millis(50)),
        )
    }

    #[test]
    fn parameter_offsets() {
        assert_eq!(ParameterSource::Flash.offset(), 0);
        assert_eq!(ParameterSource::Minimum.offset(), 2000);
        assert_eq!(ParameterSource::Maximum.offset(), 4000);
        assert_eq!(WriteTarget::FlashAndRam.offset(), 0);
        assert_eq!(WriteTarget::RamOnly.offset(), 6000);
    }

    #[test]
    fn read_parameter_from_flash() {
        let mut client = client(&[&[0x0B, 0x03, 0x04, 0x42, 0x00, 0x00, 0x00, 0x44, 0x4B]]);
        let value = client
            .read_parameter(Device::Xtender(1), 14, ParameterSource::Flash)
            .unwrap();
        assert_eq!(value, 32.0);
        assert_eq!(
            client.into_inner().written,
            vec![vec![0x0B, 0x03, 0x00, 0x0E, 0x00, 0x02, 0xA5, 0x62]]
        );
    }

    #[test]
    fn read_parameter_limits() {
        let mut client = client(&[]);
        assert!(
            client
                .read_parameter(Device::Xtender(1), 14, ParameterSource::Maximum)
                .unwrap_err()
                .is_timeout()
        );
        let written = client.into_inner().written;
        // 14 + 4000
        assert_eq!(&written[0][2..4], &[0x0F, 0xAE]);
    }

    #[test]
    fn parameter_out_of_range() {
        let mut client = client(&[]);
        assert!(matches!(
            client.read_parameter(Device::Xtender(1), 65_000, ParameterSource::Minimum),
            Err(Error::RegisterOutOfRange(65_000))
        ));
        assert!(client.into_inner().written.is_empty());
    }

    #[test]
    fn group_reads_fail_without_bus_traffic() {
        let mut client = client(&[]);
        assert!(matches!(
            client.read_parameter(Device::XtenderGroup, 14, ParameterSource::Flash),
            Err(Error::MulticastRead(slave)) if slave.value() == 10
        ));
        assert!(matches!(
            client.read_info(Device::BspGroup, 0),
            Err(Error::MulticastRead(slave)) if slave.value() == 60
        ));
        assert!(client.into_inner().written.is_empty());
    }

    #[test]
    fn write_parameter_to_group() {
        let mut response = [0x0A, 0x10, 0x17, 0x7E, 0x00, 0x02, 0, 0];
        append_crc(&mut response, 6).unwrap();
        let mut client = client(&[&response]);
        let cnt = client
            .write_parameter(Device::XtenderGroup, 14, 32.0, WriteTarget::RamOnly)
            .unwrap();
        assert_eq!(cnt, 2);
    }

    #[test]
    fn write_parameter_to_ram() {
        let mut response = [0x0B, 0x10, 0x17, 0x7E, 0x00, 0x02, 0, 0];
        append_crc(&mut response, 6).unwrap();
        let mut client = client(&[&response]);
        let cnt = client
            .write_parameter(Device::Xtender(1), 14, 32.0, WriteTarget::RamOnly)
            .unwrap();
        assert_eq!(cnt, 2);
        let written = client.into_inner().written;
        assert_eq!(
            &written[0][..11],
            &[0x0B, 0x10, 0x17, 0x7E, 0x00, 0x02, 0x04, 0x42, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn read_user_info() {
        let mut client = client(&[&[0x0B, 0x04, 0x04, 0x41, 0xCC, 0x00, 0x00, 0x85, 0x87]]);
        let value = client.read_info(Device::Xtender(1), 2).unwrap();
        assert_eq!(value, 25.5);
        assert_eq!(
            client.into_inner().written,
            vec![vec![0x0B, 0x04, 0x00, 0x02, 0x00, 0x02, 0xD0, 0xA1]]
        );
    }

    const TIME_RESPONSE: &[u8] = &[
        0x02, 0x03, 0x10, 0x00, 0xFA, 0x00, 0x1E, 0x00, 0x0F, 0x00, 0x0A, 0x00, 0x02, 0x00, 0x13,
        0x00, 0x0A, 0x00, 0x1A, 0xBB, 0x3E,
    ];

    fn time() -> SystemTime {
        SystemTime {
            millisecond: 250,
            second: 30,
            minute: 15,
            hour: 10,
            weekday: 2,
            day: 19,
            month: 10,
            year: 26,
        }
    }

    #[test]
    fn read_system_time() {
        let mut client = client(&[TIME_RESPONSE]);
        assert_eq!(client.read_time().unwrap(), time());
        assert_eq!(
            client.into_inner().written,
            vec![vec![0x02, 0x03, 0x00, 0x00, 0x00, 0x08, 0x44, 0x3F]]
        );
    }

    #[test]
    fn write_system_time() {
        let mut client = client(&[&[0x02, 0x10, 0x00, 0x00, 0x00, 0x08, 0xC1, 0xFC]]);
        assert_eq!(client.write_time(&time()).unwrap(), 8);
        let written = client.into_inner().written;
        assert_eq!(
            written[0],
            [
                0x02, 0x10, 0x00, 0x00, 0x00, 0x08, 0x10, 0x00, 0xFA, 0x00, 0x1E, 0x00, 0x0F, 0x00,
                0x0A, 0x00, 0x02, 0x00, 0x13, 0x00, 0x0A, 0x00, 0x1A, 0x56, 0x0B,
            ]
        );
    }

    #[test]
    fn system_time_words() {
        assert_eq!(SystemTime::from_words(time().to_words()), time());
        assert_eq!(time().to_words()[7], 26);
    }

    #[test]
    fn read_messages() {
        let mut client = client(&[
            &[0x01, 0x04, 0x02, 0x00, 0x03, 0xF9, 0x31],
            &[
                0x01, 0x04, 0x08, 0x00, 0x0B, 0x00, 0x14, 0x12, 0x34, 0x56, 0x78, 0xD5, 0xFA,
            ],
        ]);
        assert_eq!(client.pending_message_count().unwrap(), 3);
        assert_eq!(
            client.read_message().unwrap(),
            Message {
                source: 11,
                id: 20,
                value: 0x1234_5678,
            }
        );
        let written = client.into_inner().written;
        assert_eq!(written[0], [0x01, 0x04, 0x00, 0x00, 0x00, 0x01, 0x31, 0xCA]);
        assert_eq!(written[1], [0x01, 0x04, 0x00, 0x01, 0x00, 0x04, 0xA0, 0x09]);
    }

    #[test]
    fn exception_from_parameter_write() {
        let mut client = client(&[&[0x0B, 0x90, 0x03, 0x2C, 0x03]]);
        let err = client
            .write_parameter(Device::Xtender(1), 14, 1e9, WriteTarget::FlashAndRam)
            .unwrap_err();
        assert_eq!(err.device_exception(), Some(0x03));
    }

    #[test]
    fn response_from_wrong_slave() {
        let mut client = client(&[&[0x0C, 0x03, 0x04, 0x42, 0x00, 0x00, 0x00, 0x32, 0x8B]]);
        let err = client
            .read_parameter(Device::Xtender(1), 14, ParameterSource::Flash)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(crate::Error::AddressMismatch {
                expected: 0x0B,
                actual: 0x0C
            })
        ));
    }
}
