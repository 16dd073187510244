//! Errors raised by the primitive converters.

use thiserror::Error;

/// Failure while converting between numbers and their byte representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BytesError {
    /// Fewer bytes were available than the conversion needs.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes required by the conversion.
        needed: usize,
        /// Bytes actually available.
        remaining: usize,
    },

    /// Input is wider than the target integer.
    #[error("input of {len} bytes does not fit a {width}-byte integer")]
    TooWide {
        /// Length of the offending slice.
        len: usize,
        /// Width of the target integer.
        width: usize,
    },

    /// A boolean sentinel other than `0x00` / `0x01`.
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBool(u8),

    /// Number is negative or exceeds what the mask can represent.
    #[error("number {number} cannot be encoded with {mask} mask (max {max})")]
    MaskOverflow {
        /// The rejected number.
        number: i64,
        /// Mask name.
        mask: &'static str,
        /// Largest encodable number for the mask.
        max: i64,
    },

    /// A masked number written with more bytes than its value needs.
    #[error("number {number} is not minimally encoded in {len} bytes")]
    NonCanonicalMask {
        /// The decoded number.
        number: i64,
        /// Length announced by the mask header.
        len: usize,
    },
}
