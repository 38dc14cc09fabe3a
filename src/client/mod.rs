// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking Modbus RTU client.
//!
//! ```no_run
//! # #[cfg(feature = "serial")]
//! # fn main() -> xcom485i::client::Result<()> {
//! use xcom485i::{
//!     AddressOffset, Device,
//!     client::{Client, ClientConfig, gateway::ParameterSource},
//!     transport::{SerialConfig, SerialTransport},
//! };
//!
//! let transport = SerialTransport::open("/dev/ttyUSB0", &SerialConfig::default())?;
//! let mut client = Client::new(transport, ClientConfig::new(AddressOffset::Zero));
//! let current = client.read_parameter(Device::Xtender(1), 14, ParameterSource::Flash)?;
//! println!("Battery charge current: {current} A");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "serial"))]
//! # fn main() {}
//! ```

use std::time::Duration;

use byteorder::{BigEndian, ByteOrder};

use crate::{
    AddressOffset, Data, Device, MAX_FRAME_LEN, Request, RequestFrame, SlaveAddress,
    register::{RegisterBank, RegisterDescriptor, RegisterMap},
    transport::Transport,
    value::{self, RegisterValue},
};

mod error;
pub mod gateway;
mod transaction;

pub use self::{
    error::{Error, Result},
    transaction::{TransactionManager, TransactionState},
};

/// Default time to wait for a response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Address offset set with the DIP switches of the gateway.
    pub offset: AddressOffset,
    /// Time to wait for each response.
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub const fn new(offset: AddressOffset) -> Self {
        Self {
            offset,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom timeout (default is 1 second).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: AddressOffset) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(AddressOffset::default())
    }
}

/// A Modbus RTU client talking to the devices behind one gateway.
#[derive(Debug)]
pub struct Client<T> {
    manager: TransactionManager<T>,
    config: ClientConfig,
}

impl<T> Client<T> {
    pub const fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            manager: TransactionManager::new(transport),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.manager.state()
    }

    /// Clear an unfinished transaction.
    pub fn reset(&mut self) {
        self.manager.reset();
    }

    pub fn into_inner(self) -> T {
        self.manager.into_inner()
    }

    /// Slave address of `device` behind the configured gateway.
    pub fn resolve(&self, device: Device) -> Result<SlaveAddress> {
        Ok(self.config.offset.device(device)?)
    }
}

impl<T: Transport> Client<T> {
    pub fn read_holding_registers(
        &mut self,
        slave: SlaveAddress,
        addr: u16,
        cnt: u16,
    ) -> Result<Vec<u16>> {
        self.read(slave, Request::ReadHoldingRegisters(addr, cnt))
    }

    pub fn read_input_registers(
        &mut self,
        slave: SlaveAddress,
        addr: u16,
        cnt: u16,
    ) -> Result<Vec<u16>> {
        self.read(slave, Request::ReadInputRegisters(addr, cnt))
    }

    pub fn write_single_register(&mut self, slave: SlaveAddress, addr: u16, word: u16) -> Result<()> {
        self.write(slave, Request::WriteSingleRegister(addr, word))?;
        Ok(())
    }

    /// Write consecutive registers.
    ///
    /// Returns the number of registers the device confirmed.
    pub fn write_multiple_registers(
        &mut self,
        slave: SlaveAddress,
        addr: u16,
        words: &[u16],
    ) -> Result<u16> {
        let buf = &mut [0; MAX_FRAME_LEN];
        let data = Data::from_words(words, buf)?;
        self.write(slave, Request::WriteMultipleRegisters(addr, data))
    }

    /// Read a typed value.
    pub fn read_value(
        &mut self,
        slave: SlaveAddress,
        descriptor: &RegisterDescriptor,
    ) -> Result<RegisterValue> {
        if !descriptor.access.is_readable() {
            return Err(Error::NotReadable(descriptor.address));
        }
        let cnt = descriptor.word_count() as u16;
        let words = match descriptor.bank {
            RegisterBank::Holding => self.read_holding_registers(slave, descriptor.address, cnt)?,
            RegisterBank::Input => self.read_input_registers(slave, descriptor.address, cnt)?,
        };
        Ok(value::decode_with_order(
            descriptor.kind,
            descriptor.word_order,
            &words,
        )?)
    }

    /// Write a typed value.
    ///
    /// One word values are written with `0x06`, two word values with `0x10`.
    pub fn write_value(
        &mut self,
        slave: SlaveAddress,
        descriptor: &RegisterDescriptor,
        value: &RegisterValue,
    ) -> Result<()> {
        if !descriptor.access.is_writable() || descriptor.bank == RegisterBank::Input {
            return Err(Error::NotWritable(descriptor.address));
        }
        if value.kind() != descriptor.kind {
            return Err(Error::KindMismatch {
                expected: descriptor.kind,
                actual: value.kind(),
            });
        }
        let words = value::encode_with_order(value, descriptor.word_order);
        match *words.as_slice() {
            [word] => self.write_single_register(slave, descriptor.address, word),
            _ => self
                .write_multiple_registers(slave, descriptor.address, words.as_slice())
                .map(drop),
        }
    }

    /// Read the register called `id` in `map`.
    pub fn read_named<M>(&mut self, slave: SlaveAddress, map: &M, id: &str) -> Result<RegisterValue>
    where
        M: RegisterMap + ?Sized,
    {
        let descriptor = lookup(map, id)?;
        self.read_value(slave, &descriptor)
    }

    /// Write the register called `id` in `map`.
    pub fn write_named<M>(
        &mut self,
        slave: SlaveAddress,
        map: &M,
        id: &str,
        value: &RegisterValue,
    ) -> Result<()>
    where
        M: RegisterMap + ?Sized,
    {
        let descriptor = lookup(map, id)?;
        self.write_value(slave, &descriptor, value)
    }

    /// Reads from device groups are rejected before anything is sent.
    fn read(&mut self, slave: SlaveAddress, request: Request<'_>) -> Result<Vec<u16>> {
        if self.config.offset.is_multicast(slave) {
            return Err(Error::MulticastRead(slave));
        }
        let req = RequestFrame::new(slave.value(), request)?;
        let frame = self.manager.execute(&req, self.config.timeout)?;
        // byte count and word count are checked by the manager
        let words = frame.data[1..]
            .chunks_exact(2)
            .map(BigEndian::read_u16)
            .collect();
        Ok(words)
    }

    /// Returns the echoed value or quantity.
    fn write(&mut self, slave: SlaveAddress, request: Request<'_>) -> Result<u16> {
        let req = RequestFrame::new(slave.value(), request)?;
        let frame = self.manager.execute(&req, self.config.timeout)?;
        // the echo is checked by the manager
        Ok(BigEndian::read_u16(&frame.data[2..4]))
    }
}

fn lookup<M: RegisterMap + ?Sized>(map: &M, id: &str) -> Result<RegisterDescriptor> {
    map.descriptor(id)
        .ok_or_else(|| Error::UnknownRegister(id.to_string()))
}
