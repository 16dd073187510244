//! # Transaction Builder
//!
//! Collects operations against one ledger and seals them into a
//! [`TransactionContent`] whose hash is SHA-256 over the canonical encoding
//! of the body. Two builders holding the same operations and timestamp
//! produce the same hash.

use bproto_codec::Codec;

use crate::content::{TransactionContent, TransactionContentBody};
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::LedgerError;
use crate::operation::{
    BlockchainIdentity, DataAccountKVSetOperation, DataAccountRegisterOperation, KVWriteEntry,
    Operation, UserRegisterOperation,
};

#[derive(Debug, Clone)]
pub struct TxBuilder {
    ledger_hash: Vec<u8>,
    operations: Vec<Operation>,
}

impl TxBuilder {
    pub fn new(ledger_hash: impl Into<Vec<u8>>) -> Self {
        Self {
            ledger_hash: ledger_hash.into(),
            operations: Vec::new(),
        }
    }

    pub fn ledger_hash(&self) -> &[u8] {
        &self.ledger_hash
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation(&mut self, op: impl Into<Operation>) -> &mut Self {
        self.operations.push(op.into());
        self
    }

    pub fn register_user(&mut self, user_id: BlockchainIdentity) -> &mut Self {
        self.operation(UserRegisterOperation { user_id })
    }

    pub fn register_data_account(&mut self, account_id: BlockchainIdentity) -> &mut Self {
        self.operation(DataAccountRegisterOperation { account_id })
    }

    /// Write a set of keys into the data account at `account_address`.
    pub fn set_kv(
        &mut self,
        account_address: impl Into<Vec<u8>>,
        write_set: Vec<KVWriteEntry>,
    ) -> &mut Self {
        self.operation(DataAccountKVSetOperation {
            account_address: account_address.into(),
            write_set,
        })
    }

    /// Seal the collected operations at `timestamp` (Unix seconds).
    pub fn prepare_content(
        &self,
        codec: &Codec<'_>,
        timestamp: i64,
    ) -> Result<TransactionContent, LedgerError> {
        let body = TransactionContentBody {
            ledger_hash: self.ledger_hash.clone(),
            operations: self.operations.clone(),
            timestamp,
        };
        let hash = compute_content_hash(codec, &body)?;
        tracing::debug!(
            operations = body.operations.len(),
            timestamp,
            hash = %hash,
            "prepared transaction content"
        );
        Ok(TransactionContent { body, hash })
    }

    /// [`prepare_content`](Self::prepare_content) at the current UTC time.
    pub fn prepare_content_now(&self, codec: &Codec<'_>) -> Result<TransactionContent, LedgerError> {
        self.prepare_content(codec, chrono::Utc::now().timestamp())
    }
}

/// SHA-256 of the canonical encoding of `body`.
///
/// # Errors
///
/// Any codec failure, e.g. ledger contracts missing from the registry.
pub fn compute_content_hash(
    codec: &Codec<'_>,
    body: &TransactionContentBody,
) -> Result<ContentDigest, LedgerError> {
    let encoded = codec.encode_contract(body)?;
    Ok(sha256_digest(&encoded))
}

/// Recompute the hash of `body` and compare it with `expected`.
pub fn verify_content_hash(
    codec: &Codec<'_>,
    body: &TransactionContentBody,
    expected: &ContentDigest,
) -> Result<bool, LedgerError> {
    let actual = compute_content_hash(codec, body)?;
    if actual != *expected {
        tracing::warn!(expected = %expected, actual = %actual, "content hash mismatch");
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_ledger_contracts;
    use bproto_codec::{CodecError, TypeRegistry};

    fn registry() -> TypeRegistry {
        let reg = TypeRegistry::new();
        register_ledger_contracts(&reg).unwrap();
        reg
    }

    fn builder() -> TxBuilder {
        let mut tx = TxBuilder::new(vec![0x11; 32]);
        tx.register_user(BlockchainIdentity::new(vec![1, 2], vec![3, 4]))
            .set_kv(vec![9], vec![KVWriteEntry::new("k", b"v".to_vec(), -1)]);
        tx
    }

    #[test]
    fn test_prepare_content_is_deterministic() {
        let reg = registry();
        let codec = Codec::new(&reg);
        let a = builder().prepare_content(&codec, 1_700_000_000).unwrap();
        let b = builder().prepare_content(&codec, 1_700_000_000).unwrap();
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.body.operations.len(), 2);
    }

    #[test]
    fn test_timestamp_changes_hash() {
        let reg = registry();
        let codec = Codec::new(&reg);
        let a = builder().prepare_content(&codec, 1).unwrap();
        let b = builder().prepare_content(&codec, 2).unwrap();
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_verify_content_hash() {
        let reg = registry();
        let codec = Codec::new(&reg);
        let content = builder().prepare_content(&codec, 42).unwrap();
        assert!(verify_content_hash(&codec, &content.body, &content.hash).unwrap());

        let mut tampered = content.body.clone();
        tampered.timestamp += 1;
        assert!(!verify_content_hash(&codec, &tampered, &content.hash).unwrap());
    }

    #[test]
    fn test_prepare_content_now_uses_current_time() {
        let reg = registry();
        let codec = Codec::new(&reg);
        let before = chrono::Utc::now().timestamp();
        let content = builder().prepare_content_now(&codec).unwrap();
        assert!(content.body.timestamp >= before);
    }

    #[test]
    fn test_unregistered_contracts_propagate_error() {
        let reg = TypeRegistry::new();
        let codec = Codec::new(&reg);
        let err = builder().prepare_content(&codec, 0).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Codec(CodecError::NotRegistered { .. })
        ));
    }
}
