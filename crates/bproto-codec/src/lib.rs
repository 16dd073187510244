//! # bproto-codec: Schema-Driven Canonical Binary Codec
//!
//! Turns typed records into a deterministic byte sequence and back. Every
//! record is written as its registered 4-byte type code followed by its
//! fields in schema order, so the same record under the same registry
//! always yields the same bytes. Those bytes feed content hashes, which is
//! why determinism is the one property this crate cannot trade away.
//!
//! ## Layers
//!
//! 1. **[`TypeRegistry`]** maps codes to resolved contract schemas, enum
//!    descriptors and generic substitution sets.
//! 2. **[`schema`]** resolves field annotations (order, primitive type,
//!    references, repetition, number masks) into [`ContractSchema`]s.
//! 3. **Encoder / Decoder** (crate-private) walk a schema over a [`Record`]
//!    or a byte slice.
//! 4. **[`Codec`]** is the facade: `encode(&Record)`, `decode(bytes, code)`.
//!
//! ## Crate Policy
//!
//! - Only `bproto-core` from this workspace.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests. Malformed input is an error,
//!   never a crash.
//! - Decoded lengths and counts are capped before allocation
//!   ([`CodecConfig::max_length`]).

pub mod buffer;
pub mod codec;
pub mod config;
pub mod contract;
pub(crate) mod decode;
pub(crate) mod encode;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

pub use bproto_core::NumberMask;
pub use buffer::EncodedBuffer;
pub use codec::Codec;
pub use config::{ArrayFraming, CodecConfig};
pub use contract::Contract;
pub use error::{CodecError, DecodeError, Namespace, SchemaError};
pub use manifest::{ContractEntry, EnumEntry, GenericEntry, RegistryManifest};
pub use registry::{EnumConstant, EnumDescriptor, TypeRegistry};
pub use schema::{Annotation, ContractDecl, ContractSchema, FieldDecl, FieldKind, FieldSchema};
pub use types::PrimitiveType;
pub use value::{Record, Value};
