//! # Big-Endian Primitive Conversions
//!
//! Numbers are written high byte first: the most significant byte lands at
//! the lowest address. The `to_*` readers accept inputs shorter than the
//! target width and left-pad them with zeros, so a 2-byte slice can be read
//! as a 4-byte integer. Inputs wider than the target are rejected rather
//! than silently truncated.

use crate::error::BytesError;

/// Sentinel byte for `true`.
pub const TRUE_BYTE: u8 = 0x01;

/// Sentinel byte for `false`.
pub const FALSE_BYTE: u8 = 0x00;

pub fn int8_to_byte(value: i8) -> u8 {
    value as u8
}

pub fn int16_to_bytes(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn int32_to_bytes(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn int64_to_bytes(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn uint16_to_bytes(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn uint32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn uint64_to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn bool_to_byte(value: bool) -> u8 {
    if value {
        TRUE_BYTE
    } else {
        FALSE_BYTE
    }
}

/// Read a boolean sentinel.
///
/// Only `0x00` and `0x01` are accepted. Anything else would give two byte
/// sequences for the same logical value, which breaks canonical decoding.
pub fn to_bool(byte: u8) -> Result<bool, BytesError> {
    match byte {
        TRUE_BYTE => Ok(true),
        FALSE_BYTE => Ok(false),
        other => Err(BytesError::InvalidBool(other)),
    }
}

pub fn to_int8(byte: u8) -> i8 {
    byte as i8
}

/// Left-pad `bytes` into a fixed `N`-byte big-endian array.
fn padded<const N: usize>(bytes: &[u8]) -> Result<[u8; N], BytesError> {
    if bytes.len() > N {
        return Err(BytesError::TooWide {
            len: bytes.len(),
            width: N,
        });
    }
    let mut out = [0u8; N];
    out[N - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

pub fn to_int16(bytes: &[u8]) -> Result<i16, BytesError> {
    padded::<2>(bytes).map(i16::from_be_bytes)
}

pub fn to_int32(bytes: &[u8]) -> Result<i32, BytesError> {
    padded::<4>(bytes).map(i32::from_be_bytes)
}

pub fn to_int64(bytes: &[u8]) -> Result<i64, BytesError> {
    padded::<8>(bytes).map(i64::from_be_bytes)
}

pub fn to_uint16(bytes: &[u8]) -> Result<u16, BytesError> {
    padded::<2>(bytes).map(u16::from_be_bytes)
}

pub fn to_uint32(bytes: &[u8]) -> Result<u32, BytesError> {
    padded::<4>(bytes).map(u32::from_be_bytes)
}

pub fn to_uint64(bytes: &[u8]) -> Result<u64, BytesError> {
    padded::<8>(bytes).map(u64::from_be_bytes)
}

/// Concatenate slices into one freshly allocated buffer.
pub fn concat(slices: &[&[u8]]) -> Vec<u8> {
    let total = slices.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(total);
    for s in slices {
        out.extend_from_slice(s);
    }
    out
}

/// Whether `src` begins with `prefix`. A prefix longer than `src` never matches.
pub fn starts_with(src: &[u8], prefix: &[u8]) -> bool {
    src.starts_with(prefix)
}
