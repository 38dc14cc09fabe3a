// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Register descriptions looked up by identifier.
//!
//! The table itself is device data and supplied by the caller.

use crate::value::{RegisterValueKind, WordOrder};

/// Whether a register may be read, written or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    #[must_use]
    pub const fn is_readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// The register space a register lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegisterBank {
    #[default]
    Holding,
    /// Read only; accessed with function code `0x04`.
    Input,
}

/// Location and type of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterDescriptor {
    pub address: u16,
    pub kind: RegisterValueKind,
    pub access: AccessMode,
    pub bank: RegisterBank,
    pub word_order: WordOrder,
}

impl RegisterDescriptor {
    /// A holding register with the default word order.
    #[must_use]
    pub const fn new(address: u16, kind: RegisterValueKind, access: AccessMode) -> Self {
        Self {
            address,
            kind,
            access,
            bank: RegisterBank::Holding,
            word_order: WordOrder::HighFirst,
        }
    }

    /// A read only input register with the default word order.
    #[must_use]
    pub const fn input(address: u16, kind: RegisterValueKind) -> Self {
        Self {
            address,
            kind,
            access: AccessMode::ReadOnly,
            bank: RegisterBank::Input,
            word_order: WordOrder::HighFirst,
        }
    }

    #[must_use]
    pub const fn with_word_order(mut self, word_order: WordOrder) -> Self {
        self.word_order = word_order;
        self
    }

    /// Number of registers the value occupies.
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.kind.word_count()
    }
}

/// Lookup of register descriptions by identifier.
pub trait RegisterMap {
    fn descriptor(&self, id: &str) -> Option<RegisterDescriptor>;
}

impl RegisterMap for [(&str, RegisterDescriptor)] {
    fn descriptor(&self, id: &str) -> Option<RegisterDescriptor> {
        self.iter()
            .find(|(name, _)| *name == id)
            .map(|(_, descriptor)| *descriptor)
    }
}

impl<const N: usize> RegisterMap for [(&str, RegisterDescriptor); N] {
    fn descriptor(&self, id: &str) -> Option<RegisterDescriptor> {
        self.as_slice().descriptor(id)
    }
}

#[cfg(feature = "std")]
impl<S: std::hash::BuildHasher> RegisterMap
    for std::collections::HashMap<String, RegisterDescriptor, S>
{
    fn descriptor(&self, id: &str) -> Option<RegisterDescriptor> {
        self.get(id).copied()
    }
}

impl<M: RegisterMap + ?Sized> RegisterMap for &M {
    fn descriptor(&self, id: &str) -> Option<RegisterDescriptor> {
        (**self).descriptor(id)
    }
}
