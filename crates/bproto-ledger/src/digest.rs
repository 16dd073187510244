//! # Content Digest
//!
//! `ContentDigest` is the hash of a canonical encoding plus the tag of the
//! algorithm that produced it.
//!
//! ## Security Invariant
//!
//! [`sha256_digest()`] accepts only `&EncodedBuffer`, which has no public
//! constructor. A digest therefore always covers bytes the codec produced
//! from a registered schema, never hand-assembled bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use bproto_codec::EncodedBuffer;

use crate::error::LedgerError;

/// Hash algorithm tag carried by every digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte digest with its algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    pub algorithm: DigestAlgorithm,
    pub bytes: [u8; 32],
}

impl ContentDigest {
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Rebuild a SHA-256 digest from raw bytes, e.g. a hash stored on a ledger.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LedgerError> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| LedgerError::DigestLength(bytes.len()))?;
        Ok(Self::new(DigestAlgorithm::Sha256, bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex of the digest bytes.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// SHA-256 over the canonical encoding of one record.
pub fn sha256_digest(encoded: &EncodedBuffer) -> ContentDigest {
    let hash = Sha256::digest(encoded.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bproto_codec::{Codec, ContractDecl, FieldDecl, PrimitiveType, Record, TypeRegistry};

    fn encoded(flag: bool) -> EncodedBuffer {
        let reg = TypeRegistry::new();
        reg.register_contract(
            1001,
            &ContractDecl::new("Pair")
                .field(FieldDecl::new("amount").order(0).primitive(PrimitiveType::Int32))
                .field(FieldDecl::new("flag").order(1).primitive(PrimitiveType::Boolean)),
        )
        .unwrap();
        Codec::new(&reg)
            .encode(&Record::new(1001).with("amount", 17).with("flag", flag))
            .unwrap()
    }

    #[test]
    fn test_sha256_digest_known_vector() {
        // sha256(00 00 03 e9 00 00 00 11 01)
        let manual = Sha256::digest([0x00, 0x00, 0x03, 0xE9, 0x00, 0x00, 0x00, 0x11, 0x01]);
        let digest = sha256_digest(&encoded(true));
        assert_eq!(digest.as_bytes(), manual.as_slice());
        assert_eq!(digest.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn test_digest_differs_with_content() {
        assert_ne!(sha256_digest(&encoded(true)), sha256_digest(&encoded(false)));
    }

    #[test]
    fn test_display_and_hex() {
        let d = ContentDigest::new(DigestAlgorithm::Sha256, [0xAB; 32]);
        assert_eq!(d.to_hex().len(), 64);
        assert!(d.to_string().starts_with("sha256:abab"));
    }

    #[test]
    fn test_from_slice_length() {
        assert!(ContentDigest::from_slice(&[0u8; 32]).is_ok());
        assert!(matches!(
            ContentDigest::from_slice(&[0u8; 31]).unwrap_err(),
            LedgerError::DigestLength(31)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let d = sha256_digest(&encoded(true));
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"sha256\""));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
