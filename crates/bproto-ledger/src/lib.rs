//! # bproto-ledger: Transaction Model over the Canonical Codec
//!
//! Ledger records declared as [`Contract`](bproto_codec::Contract) types and
//! the builder that turns a list of operations into hashed transaction
//! content. The content hash is SHA-256 over the codec's encoding of
//! [`TransactionContentBody`], so it is only as stable as the registry:
//! every node must register the same codes with the same declarations.
//!
//! ## Crate Policy
//!
//! - Digests are computed from `&EncodedBuffer` only.
//! - Codec failures propagate as [`LedgerError`]; nothing here panics.

pub mod builder;
pub mod codes;
pub mod content;
pub mod digest;
pub mod error;
pub mod operation;

use bproto_codec::{CodecError, TypeRegistry};

pub use builder::{compute_content_hash, verify_content_hash, TxBuilder};
pub use content::{TransactionContent, TransactionContentBody};
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::LedgerError;
pub use operation::{
    BlockchainIdentity, DataAccountKVSetOperation, DataAccountRegisterOperation, KVWriteEntry,
    Operation, UserRegisterOperation,
};

/// Register every ledger contract and the operation substitutions.
pub fn register_ledger_contracts(registry: &TypeRegistry) -> Result<(), CodecError> {
    registry.register::<BlockchainIdentity>()?;
    registry.register::<KVWriteEntry>()?;
    registry.register::<UserRegisterOperation>()?;
    registry.register::<DataAccountRegisterOperation>()?;
    registry.register::<DataAccountKVSetOperation>()?;
    for concrete in [
        codes::USER_REGISTER_OPERATION,
        codes::DATA_ACCOUNT_REGISTER_OPERATION,
        codes::DATA_ACCOUNT_KV_SET_OPERATION,
    ] {
        registry.register_generic(codes::OPERATION, concrete)?;
    }
    registry.register::<TransactionContentBody>()?;
    Ok(())
}
