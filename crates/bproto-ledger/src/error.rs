//! Ledger-model errors.

use thiserror::Error;

use bproto_codec::CodecError;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Encoding or decoding a ledger record failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A stored content hash has the wrong length.
    #[error("content digest must be 32 bytes, got {0}")]
    DigestLength(usize),
}
