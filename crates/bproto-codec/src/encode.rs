//! # Encoder: Header, Body and Array Encoding
//!
//! ```text
//! Record        = TypeCode(i32) ‖ Field₁ ‖ … ‖ Fieldₙ        (schema order)
//! Blob field    = Length(u32) ‖ raw bytes                    (even if repeatable)
//! Repeated      = Count(u32) ‖ Element₁ ‖ … ‖ Elementₙ
//! Nested        = TypeCode(i32) ‖ fields of that contract
//! Enum          = constant value (i32)
//! Integer       = big-endian at declared width, or number mask
//! Boolean       = 0x01 / 0x00
//! Text          = Length(u32) ‖ UTF-8 bytes
//! ```
//!
//! Under [`ArrayFraming::Legacy`] the count is omitted for zero or one element.
//!
//! Encoding appends to a private buffer that is only handed out once the whole
//! record succeeded; any error drops it.

use bproto_core::bytes;

use crate::config::{ArrayFraming, CodecConfig};
use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::schema::{ContractSchema, FieldKind, FieldSchema};
use crate::types::PrimitiveType;
use crate::value::{Record, Value};

pub(crate) struct Encoder<'a> {
    registry: &'a TypeRegistry,
    config: &'a CodecConfig,
    out: Vec<u8>,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, config: &'a CodecConfig) -> Self {
        Self {
            registry,
            config,
            out: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }

    /// Header followed by body.
    pub(crate) fn encode_contract(
        &mut self,
        schema: &ContractSchema,
        record: &Record,
    ) -> Result<(), CodecError> {
        if record.code() != schema.code {
            return Err(CodecError::SchemaMismatch(format!(
                "record of contract {} encoded as contract {}",
                record.code(),
                schema.code
            )));
        }
        self.encode_header(schema.code);
        self.encode_body(schema, record)
    }

    fn encode_header(&mut self, code: i32) {
        self.out.extend_from_slice(&bytes::int32_to_bytes(code));
    }

    fn encode_body(&mut self, schema: &ContractSchema, record: &Record) -> Result<(), CodecError> {
        if let Some((undeclared, _)) = record.fields().find(|(f, _)| schema.field(f).is_none()) {
            return Err(CodecError::SchemaMismatch(format!(
                "record {} carries undeclared field `{undeclared}`",
                schema.code
            )));
        }
        for field in &schema.fields {
            let value = record.get(&field.field).ok_or_else(|| {
                CodecError::SchemaMismatch(format!(
                    "record {} is missing field `{}`",
                    schema.code, field.field
                ))
            })?;
            self.encode_field(field, value)?;
        }
        Ok(())
    }

    fn encode_field(&mut self, field: &FieldSchema, value: &Value) -> Result<(), CodecError> {
        if field.is_blob() {
            return match value {
                Value::Bytes(blob) => self.encode_blob(field, blob),
                other => Err(expected(field, "bytes", other)),
            };
        }
        match (field.repeatable, value) {
            (true, Value::Array(items)) => self.encode_array(field, items),
            (true, other) => Err(expected(field, "array", other)),
            (false, Value::Array(_)) => Err(expected(field, "single value", value)),
            (false, single) => self.encode_element(field, single),
        }
    }

    fn encode_blob(&mut self, field: &FieldSchema, blob: &[u8]) -> Result<(), CodecError> {
        advise_size(field, blob.len());
        self.encode_length(field, blob.len())?;
        self.out.extend_from_slice(blob);
        Ok(())
    }

    fn encode_length(&mut self, field: &FieldSchema, len: usize) -> Result<(), CodecError> {
        let len = u32::try_from(len)
            .map_err(|_| CodecError::invalid_value(&field.field, format!("length {len} exceeds u32")))?;
        self.out.extend_from_slice(&bytes::uint32_to_bytes(len));
        Ok(())
    }

    fn encode_array(&mut self, field: &FieldSchema, items: &[Value]) -> Result<(), CodecError> {
        advise_size(field, items.len());
        match self.config.array_framing {
            ArrayFraming::Counted => self.encode_length(field, items.len())?,
            ArrayFraming::Legacy if items.len() > 1 => self.encode_length(field, items.len())?,
            ArrayFraming::Legacy => {}
        }
        for item in items {
            self.encode_element(field, item)?;
        }
        Ok(())
    }

    fn encode_element(&mut self, field: &FieldSchema, value: &Value) -> Result<(), CodecError> {
        match field.kind {
            FieldKind::Generic(abstract_code) => self.encode_generic(field, abstract_code, value),
            FieldKind::Contract(code) => self.encode_nested(field, code, value),
            FieldKind::Enum(code) => self.encode_enum(field, code, value),
            FieldKind::Primitive(kind) => self.encode_primitive(field, kind, value),
        }
    }

    /// The runtime record's own code picks the schema.
    fn encode_generic(
        &mut self,
        field: &FieldSchema,
        abstract_code: i32,
        value: &Value,
    ) -> Result<(), CodecError> {
        let Value::Contract(record) = value else {
            return Err(expected(field, "contract", value));
        };
        let schema = self
            .registry
            .resolve_generic_code(abstract_code, record.code())?;
        self.encode_contract(&schema, record)
    }

    fn encode_nested(&mut self, field: &FieldSchema, code: i32, value: &Value) -> Result<(), CodecError> {
        let Value::Contract(record) = value else {
            return Err(expected(field, "contract", value));
        };
        let schema = self.registry.resolve_contract(code)?;
        if record.code() != code {
            return Err(CodecError::SchemaMismatch(format!(
                "field `{}` expects contract {code}, found {}",
                field.field,
                record.code()
            )));
        }
        self.encode_contract(&schema, record)
    }

    fn encode_enum(&mut self, field: &FieldSchema, code: i32, value: &Value) -> Result<(), CodecError> {
        let Value::Enum(constant) = value else {
            return Err(expected(field, "enum", value));
        };
        let descriptor = self.registry.resolve_enum(code)?;
        let wire = descriptor.value_of(constant).ok_or_else(|| {
            CodecError::invalid_value(
                &field.field,
                format!("`{constant}` is not a constant of enum {}", descriptor.name),
            )
        })?;
        self.out.extend_from_slice(&bytes::int32_to_bytes(wire));
        Ok(())
    }

    fn encode_primitive(
        &mut self,
        field: &FieldSchema,
        kind: PrimitiveType,
        value: &Value,
    ) -> Result<(), CodecError> {
        match (kind, value) {
            (PrimitiveType::Boolean, Value::Bool(b)) => {
                self.out.push(bytes::bool_to_byte(*b));
                Ok(())
            }
            (PrimitiveType::Text, Value::Text(s)) => {
                advise_size(field, s.len());
                self.encode_length(field, s.len())?;
                self.out.extend_from_slice(s.as_bytes());
                Ok(())
            }
            (PrimitiveType::Bytes, Value::Bytes(blob)) => self.encode_blob(field, blob),
            // Signed kinds take `Int`, unsigned kinds `UInt`, matching what decode yields.
            (_, Value::Int(_)) if kind.is_integer() && kind.is_signed() => {
                self.encode_integer(field, kind, value)
            }
            (_, Value::UInt(_)) if kind.is_integer() && !kind.is_signed() => {
                self.encode_integer(field, kind, value)
            }
            _ => Err(expected(field, kind.name(), value)),
        }
    }

    fn encode_integer(
        &mut self,
        field: &FieldSchema,
        kind: PrimitiveType,
        value: &Value,
    ) -> Result<(), CodecError> {
        let n: i128 = match value {
            Value::Int(v) => *v as i128,
            Value::UInt(v) => *v as i128,
            other => return Err(expected(field, kind.name(), other)),
        };
        let (min, max) = kind
            .range()
            .ok_or_else(|| expected(field, kind.name(), value))?;
        if n < min || n > max {
            return Err(CodecError::invalid_value(
                &field.field,
                format!("{n} is out of range for {kind}"),
            ));
        }

        if let Some(mask) = field.number_mask {
            let n = i64::try_from(n).map_err(|_| {
                CodecError::invalid_value(&field.field, format!("{n} exceeds {mask} mask"))
            })?;
            mask.write(n, &mut self.out)
                .map_err(|e| CodecError::invalid_value(&field.field, e.to_string()))?;
            return Ok(());
        }

        match kind {
            PrimitiveType::Int8 => self.out.push(bytes::int8_to_byte(n as i8)),
            PrimitiveType::Int16 => self.out.extend_from_slice(&bytes::int16_to_bytes(n as i16)),
            PrimitiveType::Int32 => self.out.extend_from_slice(&bytes::int32_to_bytes(n as i32)),
            PrimitiveType::Int64 => self.out.extend_from_slice(&bytes::int64_to_bytes(n as i64)),
            PrimitiveType::UInt8 => self.out.push(n as u8),
            PrimitiveType::UInt16 => self.out.extend_from_slice(&bytes::uint16_to_bytes(n as u16)),
            PrimitiveType::UInt32 => self.out.extend_from_slice(&bytes::uint32_to_bytes(n as u32)),
            PrimitiveType::UInt64 => self.out.extend_from_slice(&bytes::uint64_to_bytes(n as u64)),
            PrimitiveType::Boolean | PrimitiveType::Text | PrimitiveType::Bytes => {
                return Err(expected(field, kind.name(), value))
            }
        }
        Ok(())
    }
}

/// `maxSize` is advisory: oversize values are logged, not rejected.
fn advise_size(field: &FieldSchema, len: usize) {
    if field.max_size >= 0 && len as i64 > field.max_size {
        tracing::warn!(
            field = %field.field,
            len,
            max_size = field.max_size,
            "value exceeds advisory maxSize"
        );
    }
}

fn expected(field: &FieldSchema, expected: &str, found: &Value) -> CodecError {
    CodecError::invalid_value(
        &field.field,
        format!("expected {expected}, found {}", found.kind_name()),
    )
}
