//! # Error Types: Codec Failure Taxonomy
//!
//! Every failure is returned to the caller of `encode`/`decode`; the codec
//! never retries and never exposes a partially written buffer.
//!
//! - [`SchemaError`]: malformed or ambiguous field annotations.
//! - [`CodecError::NotRegistered`]: a contract, enum or generic code that the
//!   registry does not know.
//! - [`DecodeError`]: truncated or structurally invalid bytes.
//! - [`CodecError::SchemaMismatch`]: bytes or values that contradict the
//!   schema they are read or written under.

use thiserror::Error;

use bproto_core::BytesError;

/// Registry namespace a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Contract,
    Enum,
    Generic,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Contract => "contract",
            Self::Enum => "enum",
            Self::Generic => "generic",
        })
    }
}

/// Top-level error type for encoding and decoding.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Field annotations could not be resolved into a schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A code is absent from its registry namespace.
    #[error("{namespace} code {code} is not registered")]
    NotRegistered {
        /// Namespace that was searched.
        namespace: Namespace,
        /// The unknown code.
        code: i32,
    },

    /// The buffer is truncated or structurally invalid.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Bytes or record contents are inconsistent with the expected schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A field value cannot be represented under its declared kind.
    #[error("invalid value for field `{field}`: {reason}")]
    InvalidValue {
        /// Member identifier of the field.
        field: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// Registration attempted after the registry was frozen.
    #[error("type registry is frozen; cannot register {namespace} code {code}")]
    RegistryFrozen {
        /// Namespace of the rejected registration.
        namespace: Namespace,
        /// Code of the rejected registration.
        code: i32,
    },
}

impl CodecError {
    pub(crate) fn not_registered(namespace: Namespace, code: i32) -> Self {
        Self::NotRegistered { namespace, code }
    }

    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Malformed or ambiguous field metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// `order` is present but not an integer.
    #[error("field `{field}`: order `{value}` is not an integer")]
    InvalidOrder {
        /// Member identifier of the field.
        field: String,
        /// Raw annotation text.
        value: String,
    },

    /// `refContract` or `refEnum` is present but not an integer.
    #[error("field `{field}`: {tag} `{value}` is not an integer code")]
    InvalidReference {
        /// Member identifier of the field.
        field: String,
        /// Annotation tag.
        tag: &'static str,
        /// Raw annotation text.
        value: String,
    },

    /// Any other annotation whose value cannot be parsed.
    #[error("field `{field}`: annotation {tag} has invalid value `{value}`")]
    InvalidAnnotation {
        /// Member identifier of the field.
        field: String,
        /// Annotation tag.
        tag: &'static str,
        /// Raw annotation text.
        value: String,
    },

    /// Two fields claim the same wire position.
    #[error("fields `{first}` and `{second}` share order {order}")]
    DuplicateOrder {
        /// The contested order value.
        order: i32,
        /// Field declared first.
        first: String,
        /// Field declared second.
        second: String,
    },

    /// The same member identifier declared twice.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    /// `primitiveType` names no known kind.
    #[error("field `{field}`: unknown primitive type `{value}`")]
    UnknownPrimitiveType {
        /// Member identifier of the field.
        field: String,
        /// Raw annotation text.
        value: String,
    },

    /// `numberEncoding` names no known mask.
    #[error("field `{field}`: unknown number encoding `{value}`")]
    UnknownNumberEncoding {
        /// Member identifier of the field.
        field: String,
        /// Raw annotation text.
        value: String,
    },

    /// A number mask on a field that is not an integer.
    #[error("field `{field}`: number encoding applies to integers, not {kind}")]
    MaskOnNonInteger {
        /// Member identifier of the field.
        field: String,
        /// The field's primitive kind.
        kind: &'static str,
    },

    /// A generic field without the abstract contract code.
    #[error("field `{0}`: generic contract field needs refContract")]
    GenericWithoutReference(String),

    /// Neither a primitive type nor a reference was declared.
    #[error("field `{0}` declares no primitive type, contract or enum reference")]
    MissingKind(String),
}

/// Truncated or structurally invalid input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Primitive conversion failed (truncation, bad sentinel, bad mask).
    #[error(transparent)]
    Primitive(#[from] BytesError),

    /// A text field holds bytes that are not UTF-8.
    #[error("field `{0}` is not valid UTF-8")]
    InvalidUtf8(String),

    /// A length prefix or element count beyond the configured limit.
    #[error("length {length} exceeds limit {limit}")]
    LengthLimit {
        /// Announced length.
        length: u32,
        /// Configured limit.
        limit: u32,
    },

    /// Nested contracts deeper than the configured limit.
    #[error("nesting depth exceeds limit {0}")]
    DepthLimit(usize),

    /// Bytes left over after the outermost record.
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    /// Legacy array framing cannot be read back unambiguously.
    #[error("field `{0}`: repeated field cannot be decoded under legacy array framing")]
    AmbiguousFraming(String),
}

impl From<BytesError> for CodecError {
    fn from(err: BytesError) -> Self {
        Self::Decode(DecodeError::Primitive(err))
    }
}
