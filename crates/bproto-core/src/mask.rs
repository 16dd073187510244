//! # Number Masks: Variable-Length Non-Negative Integers
//!
//! A mask reserves the top `b` bits of the first byte to announce how many
//! bytes follow (`len - 1`), and stores the number big-endian in the rest.
//!
//! | Mask     | Header bits | Bytes  | Max value   |
//! |----------|-------------|--------|-------------|
//! | `Tiny`   | 0           | 1      | 255         |
//! | `Short`  | 1           | 1..=2  | 2^15 - 1    |
//! | `Normal` | 2           | 1..=4  | 2^30 - 1    |
//! | `Long`   | 3           | 1..=8  | 2^61 - 1    |
//!
//! A number always takes the shortest length that can hold it. The reader
//! rejects longer encodings so each number has exactly one byte form.

use crate::error::BytesError;

/// Variable-length encoding policy for non-negative integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberMask {
    Tiny,
    Short,
    Normal,
    Long,
}

impl NumberMask {
    /// All masks, narrowest first.
    pub const ALL: [NumberMask; 4] = [Self::Tiny, Self::Short, Self::Normal, Self::Long];

    /// Number of header bits taken from the first byte.
    pub fn bit_count(&self) -> u32 {
        match self {
            Self::Tiny => 0,
            Self::Short => 1,
            Self::Normal => 2,
            Self::Long => 3,
        }
    }

    /// Largest byte length this mask can announce.
    pub fn max_len(&self) -> usize {
        1 << self.bit_count()
    }

    /// Annotation name of the mask.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tiny => "TINY",
            Self::Short => "SHORT",
            Self::Normal => "NORMAL",
            Self::Long => "LONG",
        }
    }

    /// Exclusive upper bound of numbers that fit in `len` bytes.
    fn boundary(&self, len: usize) -> i64 {
        1i64 << (len as u32 * 8 - self.bit_count())
    }

    /// Largest number this mask can encode.
    pub fn max_value(&self) -> i64 {
        self.boundary(self.max_len()) - 1
    }

    /// Number of bytes `number` occupies under this mask.
    pub fn mask_len(&self, number: i64) -> Result<usize, BytesError> {
        if number >= 0 {
            for len in 1..=self.max_len() {
                if number < self.boundary(len) {
                    return Ok(len);
                }
            }
        }
        Err(BytesError::MaskOverflow {
            number,
            mask: self.name(),
            max: self.max_value(),
        })
    }

    /// Append the masked form of `number` to `out`, returning the bytes written.
    pub fn write(&self, number: i64, out: &mut Vec<u8>) -> Result<usize, BytesError> {
        let len = self.mask_len(number)?;
        let raw = number.to_be_bytes();
        let start = out.len();
        out.extend_from_slice(&raw[8 - len..]);
        let header = ((len as u32 - 1) << (8 - self.bit_count())) as u8;
        out[start] |= header;
        Ok(len)
    }

    /// Byte length announced by a head byte.
    pub fn resolve_len(&self, head: u8) -> usize {
        match self.bit_count() {
            0 => 1,
            bits => ((head as u32) >> (8 - bits)) as usize + 1,
        }
    }

    /// Read a masked number from the front of `bytes`.
    ///
    /// Returns the number and the count of bytes consumed.
    pub fn read(&self, bytes: &[u8]) -> Result<(i64, usize), BytesError> {
        let head = *bytes.first().ok_or(BytesError::Truncated {
            needed: 1,
            remaining: 0,
        })?;
        let len = self.resolve_len(head);
        if bytes.len() < len {
            return Err(BytesError::Truncated {
                needed: len,
                remaining: bytes.len(),
            });
        }
        let mut number = (head & (0xFFu8 >> self.bit_count())) as i64;
        for b in &bytes[1..len] {
            number = (number << 8) | *b as i64;
        }
        if len > 1 && number < self.boundary(len - 1) {
            return Err(BytesError::NonCanonicalMask { number, len });
        }
        Ok((number, len))
    }
}

impl std::fmt::Display for NumberMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
