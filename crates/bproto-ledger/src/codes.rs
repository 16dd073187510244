//! Registered contract codes of the ledger model.
//!
//! Codes are part of the wire format: every encoded record starts with one,
//! so changing a value here changes every content hash.

pub const TX_CONTENT_BODY: i32 = 0x200;

/// Abstract operation code; generic fields dispatch on the concrete codes below.
pub const OPERATION: i32 = 0x300;
pub const USER_REGISTER_OPERATION: i32 = 0x310;
pub const DATA_ACCOUNT_REGISTER_OPERATION: i32 = 0x320;
pub const DATA_ACCOUNT_KV_SET_OPERATION: i32 = 0x321;
pub const KV_WRITE_ENTRY: i32 = 0x322;

pub const BLOCKCHAIN_IDENTITY: i32 = 0x390;
