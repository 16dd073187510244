//! # Encoded Buffer
//!
//! `EncodedBuffer` is the immutable output of [`Codec::encode`](crate::Codec::encode).
//! Its inner bytes are private and it has no public constructor, so anything
//! that accepts `&EncodedBuffer` (content hashing in particular) is guaranteed
//! to see the canonical encoding and never hand-assembled bytes.

/// Canonical bytes of one encoded record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedBuffer(Vec<u8>);

impl EncodedBuffer {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Give up the canonical wrapper and take the raw bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for EncodedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
