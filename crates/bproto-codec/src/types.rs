//! Wire primitive kinds.

use serde::{Deserialize, Serialize};

/// Primitive wire representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrimitiveType {
    Int8,
    Int16,
    Int32,
    Int64,
    #[serde(rename = "UINT8")]
    UInt8,
    #[serde(rename = "UINT16")]
    UInt16,
    #[serde(rename = "UINT32")]
    UInt32,
    #[serde(rename = "UINT64")]
    UInt64,
    Boolean,
    /// UTF-8 string, length-prefixed.
    Text,
    /// Raw byte blob, length-prefixed, never split.
    Bytes,
}

impl PrimitiveType {
    /// Parse the annotation name (`INT32`, `TEXT`, ...). Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim().to_ascii_uppercase().as_str() {
            "INT8" => Self::Int8,
            "INT16" => Self::Int16,
            "INT32" => Self::Int32,
            "INT64" => Self::Int64,
            "UINT8" => Self::UInt8,
            "UINT16" => Self::UInt16,
            "UINT32" => Self::UInt32,
            "UINT64" => Self::UInt64,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "TEXT" | "STRING" => Self::Text,
            "BYTES" => Self::Bytes,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::UInt8 => "UINT8",
            Self::UInt16 => "UINT16",
            Self::UInt32 => "UINT32",
            Self::UInt64 => "UINT64",
            Self::Boolean => "BOOLEAN",
            Self::Text => "TEXT",
            Self::Bytes => "BYTES",
        }
    }

    /// Fixed byte width of integer kinds.
    pub fn width(&self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 => Some(4),
            Self::Int64 | Self::UInt64 => Some(8),
            Self::Boolean | Self::Text | Self::Bytes => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.width().is_some()
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Inclusive value range of integer kinds, widened to `i128`.
    pub(crate) fn range(&self) -> Option<(i128, i128)> {
        let range = match self {
            Self::Int8 => (i8::MIN as i128, i8::MAX as i128),
            Self::Int16 => (i16::MIN as i128, i16::MAX as i128),
            Self::Int32 => (i32::MIN as i128, i32::MAX as i128),
            Self::Int64 => (i64::MIN as i128, i64::MAX as i128),
            Self::UInt8 => (0, u8::MAX as i128),
            Self::UInt16 => (0, u16::MAX as i128),
            Self::UInt32 => (0, u32::MAX as i128),
            Self::UInt64 => (0, u64::MAX as i128),
            Self::Boolean | Self::Text | Self::Bytes => return None,
        };
        Some(range)
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrips_name() {
        for kind in [
            PrimitiveType::Int8,
            PrimitiveType::UInt64,
            PrimitiveType::Boolean,
            PrimitiveType::Text,
            PrimitiveType::Bytes,
        ] {
            assert_eq!(PrimitiveType::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PrimitiveType::from_name("int32"), Some(PrimitiveType::Int32));
        assert_eq!(PrimitiveType::from_name("FLOAT"), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(PrimitiveType::Int16.width(), Some(2));
        assert_eq!(PrimitiveType::UInt64.width(), Some(8));
        assert_eq!(PrimitiveType::Text.width(), None);
        assert!(!PrimitiveType::UInt32.is_signed());
    }
}
