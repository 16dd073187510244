//! # Codec Facade
//!
//! [`Codec`] is the single entry point collaborators use: it wraps a
//! [`TypeRegistry`] and a [`CodecConfig`], resolves the outermost schema, and
//! drives the encoder or decoder. Encoding the same record under an
//! unchanged registry always yields the same bytes.

use std::sync::Arc;

use crate::buffer::EncodedBuffer;
use crate::config::CodecConfig;
use crate::contract::Contract;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::CodecError;
use crate::registry::{EnumDescriptor, TypeRegistry};
use crate::schema::{ContractDecl, ContractSchema};
use crate::value::Record;

/// Registry-backed encoder/decoder.
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r TypeRegistry,
    config: CodecConfig,
}

impl Codec<'static> {
    /// Codec over the process-wide registry with default configuration.
    pub fn global() -> Self {
        Self::new(TypeRegistry::global())
    }
}

impl<'r> Codec<'r> {
    /// Codec over `registry` with the default [`CodecConfig`].
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            config: CodecConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry this codec resolves codes against.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// See [`TypeRegistry::register_contract`].
    pub fn register_contract(
        &self,
        code: i32,
        decl: &ContractDecl,
    ) -> Result<Arc<ContractSchema>, CodecError> {
        self.registry.register_contract(code, decl)
    }

    /// See [`TypeRegistry::register`].
    pub fn register<T: Contract>(&self) -> Result<Arc<ContractSchema>, CodecError> {
        self.registry.register::<T>()
    }

    /// See [`TypeRegistry::register_enum`].
    pub fn register_enum(&self, code: i32, descriptor: EnumDescriptor) -> Result<(), CodecError> {
        self.registry.register_enum(code, descriptor)
    }

    /// See [`TypeRegistry::register_generic`].
    pub fn register_generic(&self, abstract_code: i32, concrete_code: i32) -> Result<(), CodecError> {
        self.registry.register_generic(abstract_code, concrete_code)
    }

    /// Encode a record as `TypeCode ‖ fields`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` for an unknown record, nested, enum or generic code;
    /// `SchemaMismatch` or `InvalidValue` when the record does not fit its
    /// schema. No bytes are returned on failure.
    pub fn encode(&self, record: &Record) -> Result<EncodedBuffer, CodecError> {
        let schema = self.registry.resolve_contract(record.code())?;
        let mut encoder = Encoder::new(self.registry, &self.config);
        encoder.encode_contract(&schema, record)?;
        let buffer = EncodedBuffer::new(encoder.finish());
        tracing::trace!(code = record.code(), len = buffer.len(), "encoded record");
        Ok(buffer)
    }

    /// Decode bytes that must hold exactly one record of contract `code`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` when `code` (or any nested code) is unknown, checked
    /// before the input is read; `SchemaMismatch` when the header names a
    /// different contract; `Decode` for truncated, malformed or trailing bytes.
    pub fn decode(&self, bytes: &[u8], code: i32) -> Result<Record, CodecError> {
        let schema = self.registry.resolve_contract(code)?;
        let mut decoder = Decoder::new(self.registry, &self.config, bytes);
        let record = decoder.decode_contract(&schema)?;
        decoder.finish()?;
        tracing::trace!(code, len = bytes.len(), "decoded record");
        Ok(record)
    }

    /// Decode a record of whichever contract its header names.
    ///
    /// # Errors
    ///
    /// As [`decode`](Self::decode), plus `Decode` when fewer than four bytes
    /// are available for the header.
    pub fn decode_any(&self, bytes: &[u8]) -> Result<Record, CodecError> {
        let decoder = Decoder::new(self.registry, &self.config, bytes);
        let code = decoder.peek_header()?;
        self.decode(bytes, code)
    }

    /// Encode a typed contract through its [`Record`] form.
    pub fn encode_contract<T: Contract>(&self, value: &T) -> Result<EncodedBuffer, CodecError> {
        self.encode(&value.to_record())
    }

    /// Decode bytes holding a `T` and convert the record back.
    pub fn decode_contract<T: Contract>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        T::from_record(self.decode(bytes, T::CODE)?)
    }
}
