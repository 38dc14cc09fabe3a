// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slave addresses of the devices behind the gateway.
//!
//! The gateway shifts every logical device index by an offset selected
//! with its DIP switches, so several gateways can share one bus.

use core::fmt;

use crate::error::Error;

/// Highest logical device index; `64` is reserved for broadcast.
pub const MAX_LOGICAL_INDEX: u8 = 63;

/// A Modbus slave address computed from an offset and a logical index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlaveAddress(u8);

impl SlaveAddress {
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<SlaveAddress> for u8 {
    fn from(addr: SlaveAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for SlaveAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Address offset as set with the DIP switches of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressOffset {
    #[default]
    Zero,
    ThirtyTwo,
    SixtyFour,
    OneHundredTwentyEight,
}

impl AddressOffset {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::ThirtyTwo => 32,
            Self::SixtyFour => 64,
            Self::OneHundredTwentyEight => 128,
        }
    }

    /// Shift a logical device index into the band of this offset.
    pub const fn resolve(self, logical_index: u8) -> Result<SlaveAddress, Error> {
        if logical_index == 0 || logical_index > MAX_LOGICAL_INDEX {
            return Err(Error::InvalidLogicalIndex(logical_index));
        }
        Ok(SlaveAddress(self.value() + logical_index))
    }

    /// Slave address of `device` behind a gateway with this offset.
    pub fn device(self, device: Device) -> Result<SlaveAddress, Error> {
        self.resolve(device.logical_index()?)
    }

    /// `true` if `slave` is the address of a device group behind a
    /// gateway with this offset.
    ///
    /// Groups only accept writes; nobody answers a read.
    #[must_use]
    pub const fn is_multicast(self, slave: SlaveAddress) -> bool {
        match slave.0.checked_sub(self.value()) {
            Some(index) => is_group_index(index),
            None => false,
        }
    }
}

impl TryFrom<u8> for AddressOffset {
    type Error = Error;

    fn try_from(offset: u8) -> Result<Self, Self::Error> {
        let offset = match offset {
            0 => Self::Zero,
            32 => Self::ThirtyTwo,
            64 => Self::SixtyFour,
            128 => Self::OneHundredTwentyEight,
            _ => return Err(Error::InvalidOffset(offset)),
        };
        Ok(offset)
    }
}

impl From<AddressOffset> for u8 {
    fn from(offset: AddressOffset) -> Self {
        offset.value()
    }
}

/// Compute the slave address `offset + logical_index`.
///
/// ```
/// assert_eq!(xcom485i::resolve(32, 5).unwrap().value(), 37);
/// ```
pub fn resolve(offset: u8, logical_index: u8) -> Result<SlaveAddress, Error> {
    AddressOffset::try_from(offset)?.resolve(logical_index)
}

const XTENDER_L1_GROUP: u8 = 7;
const XTENDER_L2_GROUP: u8 = 8;
const XTENDER_L3_GROUP: u8 = 9;
const XTENDER_GROUP: u8 = 10;
const VARIO_TRACK_GROUP: u8 = 20;
const VARIO_STRING_GROUP: u8 = 40;
const BSP_GROUP: u8 = 60;

const fn is_group_index(logical_index: u8) -> bool {
    matches!(
        logical_index,
        XTENDER_L1_GROUP
            | XTENDER_L2_GROUP
            | XTENDER_L3_GROUP
            | XTENDER_GROUP
            | VARIO_TRACK_GROUP
            | VARIO_STRING_GROUP
            | BSP_GROUP
    )
}

/// Number of Xtender inverters a system can hold.
pub const MAX_XTENDERS: u8 = 9;

/// Number of VarioTrack or VarioString chargers a system can hold.
pub const MAX_CHARGERS: u8 = 15;

/// Logical devices reachable through the gateway.
///
/// Groups address every device of a kind at once (multicast).
/// Numbered devices follow the index displayed on the remote control,
/// starting at `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// The gateway itself (configuration, status and messages)
    Gateway,
    /// System wide values such as the clock
    System,
    XtenderL1Group,
    XtenderL2Group,
    XtenderL3Group,
    XtenderGroup,
    Xtender(u8),
    VarioTrackGroup,
    VarioTrack(u8),
    VarioStringGroup,
    VarioString(u8),
    /// All battery monitors or BMS
    BspGroup,
    /// A single BSP or Xcom-CAN BMS
    Bsp,
}

impl Device {
    /// The logical index of the device before the offset is applied.
    pub fn logical_index(self) -> Result<u8, Error> {
        let index = match self {
            Self::Gateway => 1,
            Self::System => 2,
            Self::XtenderL1Group => XTENDER_L1_GROUP,
            Self::XtenderL2Group => XTENDER_L2_GROUP,
            Self::XtenderL3Group => XTENDER_L3_GROUP,
            Self::XtenderGroup => XTENDER_GROUP,
            Self::Xtender(n) => numbered(XTENDER_GROUP, n, MAX_XTENDERS)?,
            Self::VarioTrackGroup => VARIO_TRACK_GROUP,
            Self::VarioTrack(n) => numbered(VARIO_TRACK_GROUP, n, MAX_CHARGERS)?,
            Self::VarioStringGroup => VARIO_STRING_GROUP,
            Self::VarioString(n) => numbered(VARIO_STRING_GROUP, n, MAX_CHARGERS)?,
            Self::BspGroup => BSP_GROUP,
            Self::Bsp => BSP_GROUP + 1,
        };
        Ok(index)
    }

    /// `true` if the address reaches more than one device.
    #[must_use]
    pub const fn is_multicast(self) -> bool {
        matches!(
            self,
            Self::XtenderL1Group
                | Self::XtenderL2Group
                | Self::XtenderL3Group
                | Self::XtenderGroup
                | Self::VarioTrackGroup
                | Self::VarioStringGroup
                | Self::BspGroup
        )
    }
}

const fn numbered(group: u8, n: u8, max: u8) -> Result<u8, Error> {
    if n == 0 || n > max {
        return Err(Error::InvalidLogicalIndex(n));
    }
    Ok(group + n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_address() {
        assert_eq!(resolve(32, 5), Ok(SlaveAddress(37)));
        assert_eq!(resolve(0, 1), Ok(SlaveAddress(1)));
        assert_eq!(resolve(128, 63), Ok(SlaveAddress(191)));
    }

    #[test]
    fn resolve_invalid_offset() {
        assert_eq!(resolve(16, 5), Err(Error::InvalidOffset(16)));
        assert_eq!(resolve(1, 5), Err(Error::InvalidOffset(1)));
        assert_eq!(resolve(255, 5), Err(Error::InvalidOffset(255)));
    }

    #[test]
    fn resolve_invalid_logical_index() {
        assert_eq!(resolve(128, 64), Err(Error::InvalidLogicalIndex(64)));
        assert_eq!(resolve(0, 0), Err(Error::InvalidLogicalIndex(0)));
        assert_eq!(resolve(64, 200), Err(Error::InvalidLogicalIndex(200)));
    }

    #[test]
    fn every_address_stays_in_its_band() {
        for offset in [0, 32, 64, 128] {
            for index in 1..=MAX_LOGICAL_INDEX {
                let addr = resolve(offset, index).unwrap().value();
                assert!(addr > offset);
                assert!(addr <= offset + MAX_LOGICAL_INDEX);
            }
        }
    }

    #[test]
    fn offset_from_u8() {
        assert_eq!(AddressOffset::try_from(64), Ok(AddressOffset::SixtyFour));
        assert_eq!(u8::from(AddressOffset::OneHundredTwentyEight), 128);
        assert_eq!(AddressOffset::default().value(), 0);
    }

    #[test]
    fn device_addresses() {
        let offset = AddressOffset::Zero;
        assert_eq!(offset.device(Device::Gateway), Ok(SlaveAddress(1)));
        assert_eq!(offset.device(Device::System), Ok(SlaveAddress(2)));
        assert_eq!(offset.device(Device::XtenderL2Group), Ok(SlaveAddress(8)));
        assert_eq!(offset.device(Device::Xtender(1)), Ok(SlaveAddress(11)));
        assert_eq!(offset.device(Device::VarioTrack(15)), Ok(SlaveAddress(35)));
        assert_eq!(offset.device(Device::VarioString(3)), Ok(SlaveAddress(43)));
        assert_eq!(offset.device(Device::Bsp), Ok(SlaveAddress(61)));

        let offset = AddressOffset::ThirtyTwo;
        assert_eq!(offset.device(Device::Xtender(5)), Ok(SlaveAddress(47)));
        assert_eq!(offset.device(Device::BspGroup), Ok(SlaveAddress(92)));
    }

    #[test]
    fn numbered_devices_out_of_range() {
        assert_eq!(
            Device::Xtender(10).logical_index(),
            Err(Error::InvalidLogicalIndex(10))
        );
        assert_eq!(
            Device::VarioTrack(0).logical_index(),
            Err(Error::InvalidLogicalIndex(0))
        );
        assert_eq!(
            Device::VarioString(16).logical_index(),
            Err(Error::InvalidLogicalIndex(16))
        );
    }

    #[test]
    fn multicast_devices() {
        assert!(Device::XtenderGroup.is_multicast());
        assert!(Device::BspGroup.is_multicast());
        assert!(!Device::Bsp.is_multicast());
        assert!(!Device::Xtender(1).is_multicast());
        assert!(!Device::Gateway.is_multicast());
    }

    #[test]
    fn multicast_slave_addresses() {
        let devices = [
            Device::Gateway,
            Device::System,
            Device::XtenderL1Group,
            Device::XtenderL2Group,
            Device::XtenderL3Group,
            Device::XtenderGroup,
            Device::Xtender(1),
            Device::Xtender(9),
            Device::VarioTrackGroup,
            Device::VarioTrack(1),
            Device::VarioStringGroup,
            Device::VarioString(15),
            Device::BspGroup,
            Device::Bsp,
        ];
        for offset in [
            AddressOffset::Zero,
            AddressOffset::ThirtyTwo,
            AddressOffset::SixtyFour,
            AddressOffset::OneHundredTwentyEight,
        ] {
            for device in devices {
                let slave = offset.device(device).unwrap();
                assert_eq!(offset.is_multicast(slave), device.is_multicast(), "{device:?}");
            }
        }
        // below the band of the offset
        assert!(!AddressOffset::SixtyFour.is_multicast(SlaveAddress(10)));
        assert!(AddressOffset::Zero.is_multicast(SlaveAddress(10)));
    }
}
