//! # Statically Typed Contracts
//!
//! A Rust type becomes a contract by naming its code, declaring its fields
//! once, and converting to and from a [`Record`]. The declaration is resolved
//! when the type is registered and cached by the registry, so encoding a
//! typed value costs the same as encoding a hand-built record.

use crate::error::CodecError;
use crate::schema::ContractDecl;
use crate::value::Record;

/// A record type with a registered code and an explicit field declaration.
pub trait Contract: Sized {
    /// Registered contract code; also the header emitted before the body.
    const CODE: i32;

    /// Field declarations in source order; `order` annotations decide wire order.
    fn declare() -> ContractDecl;

    fn to_record(&self) -> Record;

    fn from_record(record: Record) -> Result<Self, CodecError>;
}
