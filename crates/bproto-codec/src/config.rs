//! Codec configuration.

use serde::{Deserialize, Serialize};

/// Framing of repeated (non-blob) fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayFraming {
    /// A 4-byte count precedes every repeated field, whatever its length.
    #[default]
    Counted,
    /// Count only when there are two or more elements. Zero and one element
    /// are written inline, which the decoder cannot tell apart from a plain
    /// field, so this mode is encode-only.
    Legacy,
}

/// Tunables shared by encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecConfig {
    /// Framing of repeated fields; see [`ArrayFraming`].
    pub array_framing: ArrayFraming,
    /// Largest length prefix or element count accepted while decoding.
    pub max_length: u32,
    /// Deepest contract nesting accepted while decoding.
    pub max_depth: usize,
}

impl CodecConfig {
    /// 64 MiB.
    pub const DEFAULT_MAX_LENGTH: u32 = 64 * 1024 * 1024;
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Default limits with [`ArrayFraming::Legacy`].
    pub fn legacy() -> Self {
        Self {
            array_framing: ArrayFraming::Legacy,
            ..Self::default()
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            array_framing: ArrayFraming::Counted,
            max_length: Self::DEFAULT_MAX_LENGTH,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
