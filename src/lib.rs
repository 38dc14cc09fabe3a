// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod codec;
mod error;
mod frame;

pub mod address;
pub mod register;
pub mod value;

#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod transport;

pub use address::{AddressOffset, Device, SlaveAddress, resolve};
pub use codec::rtu;
pub use error::*;
pub use frame::*;
pub use register::{AccessMode, RegisterBank, RegisterDescriptor, RegisterMap};
pub use value::{RegisterValue, RegisterValueKind, ShortAscii, WordOrder, Words};
