// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed interpretation of raw register words.
//!
//! Values occupy one or two consecutive registers. Two word values are
//! reinterpreted bit for bit, never converted numerically.

use core::fmt;

use crate::error::Error;

/// The type of a register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterValueKind {
    UnsignedInt16,
    UnsignedInt32,
    SignedInt32,
    Float32,
    ShortAscii,
    /// Enumerated or bitfield value; the symbolic meaning is device specific.
    Enum,
}

impl RegisterValueKind {
    /// Number of registers a value of this kind occupies.
    #[must_use]
    pub const fn word_count(self) -> usize {
        match self {
            Self::UnsignedInt16 | Self::Enum => 1,
            Self::UnsignedInt32 | Self::SignedInt32 | Self::Float32 | Self::ShortAscii => 2,
        }
    }
}

impl fmt::Display for RegisterValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsignedInt16 => "u16",
            Self::UnsignedInt32 => "u32",
            Self::SignedInt32 => "i32",
            Self::Float32 => "f32",
            Self::ShortAscii => "short ASCII",
            Self::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// Order of the two registers of a 32 bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordOrder {
    /// The first register holds the high 16 bits.
    #[default]
    HighFirst,
    /// The first register holds the low 16 bits.
    LowFirst,
}

impl WordOrder {
    const fn join(self, first: u16, second: u16) -> u32 {
        let (hi, lo) = match self {
            Self::HighFirst => (first, second),
            Self::LowFirst => (second, first),
        };
        ((hi as u32) << 16) | lo as u32
    }

    const fn split(self, raw: u32) -> [u16; 2] {
        let hi = (raw >> 16) as u16;
        let lo = raw as u16;
        match self {
            Self::HighFirst => [hi, lo],
            Self::LowFirst => [lo, hi],
        }
    }
}

/// Maximum length of a [`ShortAscii`] text.
pub const SHORT_ASCII_LEN: usize = 4;

/// Up to four ASCII characters stored in two registers.
///
/// On the wire the text is padded with NUL bytes, so NUL itself
/// cannot be part of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShortAscii {
    bytes: [u8; SHORT_ASCII_LEN],
    len: usize,
}

impl ShortAscii {
    pub fn new(text: &str) -> Result<Self, Error> {
        let bytes = text.as_bytes();
        if bytes.len() > SHORT_ASCII_LEN || bytes.iter().any(|b| *b == 0 || !b.is_ascii()) {
            return Err(Error::Text);
        }
        let mut buf = [0; SHORT_ASCII_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: buf,
            len: bytes.len(),
        })
    }

    /// Parse the NUL padded wire representation.
    pub fn from_padded(padded: [u8; SHORT_ASCII_LEN]) -> Result<Self, Error> {
        let len = padded
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(SHORT_ASCII_LEN);
        let (text, padding) = padded.split_at(len);
        if padding.iter().any(|b| *b != 0) || !text.is_ascii() {
            return Err(Error::Text);
        }
        Ok(Self { bytes: padded, len })
    }

    /// The NUL padded wire representation.
    #[must_use]
    pub const fn to_padded(&self) -> [u8; SHORT_ASCII_LEN] {
        self.bytes
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever stored.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl TryFrom<&str> for ShortAscii {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl fmt::Display for ShortAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed register value.
///
/// Equality of `Float32` values compares the bit patterns, so every
/// value (NaN included) equals itself.
#[derive(Debug, Clone, Copy)]
pub enum RegisterValue {
    UnsignedInt16(u16),
    UnsignedInt32(u32),
    SignedInt32(i32),
    Float32(f32),
    ShortAscii(ShortAscii),
    Enum(u16),
}

impl RegisterValue {
    #[must_use]
    pub const fn kind(&self) -> RegisterValueKind {
        match self {
            Self::UnsignedInt16(_) => RegisterValueKind::UnsignedInt16,
            Self::UnsignedInt32(_) => RegisterValueKind::UnsignedInt32,
            Self::SignedInt32(_) => RegisterValueKind::SignedInt32,
            Self::Float32(_) => RegisterValueKind::Float32,
            Self::ShortAscii(_) => RegisterValueKind::ShortAscii,
            Self::Enum(_) => RegisterValueKind::Enum,
        }
    }

    #[must_use]
    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for RegisterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnsignedInt16(a), Self::UnsignedInt16(b)) | (Self::Enum(a), Self::Enum(b)) => {
                a == b
            }
            (Self::UnsignedInt32(a), Self::UnsignedInt32(b)) => a == b,
            (Self::SignedInt32(a), Self::SignedInt32(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            (Self::ShortAscii(a), Self::ShortAscii(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for RegisterValue {}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsignedInt16(v) | Self::Enum(v) => fmt::Display::fmt(v, f),
            Self::UnsignedInt32(v) => fmt::Display::fmt(v, f),
            Self::SignedInt32(v) => fmt::Display::fmt(v, f),
            Self::Float32(v) => fmt::Display::fmt(v, f),
            Self::ShortAscii(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// The registers of one encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Words {
    buf: [u16; 2],
    len: usize,
}

impl Words {
    const fn one(word: u16) -> Self {
        Self {
            buf: [word, 0],
            len: 1,
        }
    }

    const fn two(buf: [u16; 2]) -> Self {
        Self { buf, len: 2 }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.buf[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u16]> for Words {
    fn as_ref(&self) -> &[u16] {
        self.as_slice()
    }
}

/// Decode register words (high word first).
pub fn decode(kind: RegisterValueKind, words: &[u16]) -> Result<RegisterValue, Error> {
    decode_with_order(kind, WordOrder::HighFirst, words)
}

/// Decode register words using the given word order.
pub fn decode_with_order(
    kind: RegisterValueKind,
    order: WordOrder,
    words: &[u16],
) -> Result<RegisterValue, Error> {
    use RegisterValueKind as K;

    let expected = kind.word_count();
    if words.len() != expected {
        return Err(Error::WordCountMismatch {
            expected,
            actual: words.len(),
        });
    }
    let value = match kind {
        K::UnsignedInt16 => RegisterValue::UnsignedInt16(words[0]),
        K::Enum => RegisterValue::Enum(words[0]),
        K::UnsignedInt32 => RegisterValue::UnsignedInt32(order.join(words[0], words[1])),
        K::SignedInt32 => RegisterValue::SignedInt32(order.join(words[0], words[1]) as i32),
        K::Float32 => RegisterValue::Float32(f32::from_bits(order.join(words[0], words[1]))),
        K::ShortAscii => {
            let padded = order.join(words[0], words[1]).to_be_bytes();
            RegisterValue::ShortAscii(ShortAscii::from_padded(padded)?)
        }
    };
    Ok(value)
}

/// Decode an unsigned 32 bit integer from two words (high word first).
pub fn decode_u32(words: &[u16]) -> Result<u32, Error> {
    let &[first, second] = words else {
        return Err(Error::WordCountMismatch {
            expected: 2,
            actual: words.len(),
        });
    };
    Ok(WordOrder::HighFirst.join(first, second))
}

/// Decode a float from two words (high word first).
pub fn decode_f32(words: &[u16]) -> Result<f32, Error> {
    decode_u32(words).map(f32::from_bits)
}

/// Encode a value into register words (high word first).
#[must_use]
pub fn encode(value: &RegisterValue) -> Words {
    encode_with_order(value, WordOrder::HighFirst)
}

/// Encode a value into register words using the given word order.
#[must_use]
pub fn encode_with_order(value: &RegisterValue, order: WordOrder) -> Words {
    match *value {
        RegisterValue::UnsignedInt16(v) | RegisterValue::Enum(v) => Words::one(v),
        RegisterValue::UnsignedInt32(v) => Words::two(order.split(v)),
        RegisterValue::SignedInt32(v) => Words::two(order.split(v as u32)),
        RegisterValue::Float32(v) => Words::two(order.split(v.to_bits())),
        RegisterValue::ShortAscii(v) => {
            Words::two(order.split(u32::from_be_bytes(v.to_padded())))
        }
    }
}
