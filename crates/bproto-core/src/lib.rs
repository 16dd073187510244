//! # bproto-core: Primitive Conversions for the Binary Codec
//!
//! Leaf crate of the binary-proto workspace. It owns the byte-level building
//! blocks the codec composes into records:
//!
//! - **Fixed-width integers** in big-endian order (1/2/4/8 bytes, signed and
//!   unsigned), see [`bytes`].
//! - **Boolean sentinels** `0x01` / `0x00`, strict on the read side.
//! - **Number masks** ([`NumberMask`]), the variable-length encoding for
//!   non-negative integers where the first byte's high bits carry the length.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bproto-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests. Every read is bounds-checked
//!   and reports [`BytesError`].

pub mod bytes;
pub mod error;
pub mod mask;

pub use bytes::{FALSE_BYTE, TRUE_BYTE};
pub use error::BytesError;
pub use mask::NumberMask;
