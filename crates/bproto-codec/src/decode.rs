//! # Decoder
//!
//! Exact inverse of the encoder: read a header, resolve its schema, then read
//! each field in the same authoritative order with the same dispatch. Every
//! read is bounds-checked; length prefixes and counts are capped by
//! [`CodecConfig::max_length`] before anything is allocated, and contract
//! nesting is capped by [`CodecConfig::max_depth`].

use bproto_core::bytes;

use crate::config::{ArrayFraming, CodecConfig};
use crate::error::{CodecError, DecodeError};
use crate::registry::TypeRegistry;
use crate::schema::{ContractSchema, FieldKind, FieldSchema};
use crate::types::PrimitiveType;
use crate::value::{Record, Value};

/// Cursor over an input slice.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Primitive(bproto_core::BytesError::Truncated {
                needed: n,
                remaining: self.remaining(),
            }));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(bytes::to_int32(self.take(4)?)?)
    }

    /// Length prefix or element count, capped at `limit`.
    fn read_length(&mut self, limit: u32) -> Result<u32, DecodeError> {
        let length = bytes::to_uint32(self.take(4)?)?;
        if length > limit {
            return Err(DecodeError::LengthLimit { length, limit });
        }
        Ok(length)
    }

    fn read_blob(&mut self, limit: u32) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_length(limit)? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn peek_i32(&self) -> Result<i32, DecodeError> {
        let mut probe = Reader::new(self.rest());
        probe.read_i32()
    }
}

pub(crate) struct Decoder<'a> {
    registry: &'a TypeRegistry,
    config: &'a CodecConfig,
    reader: Reader<'a>,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, config: &'a CodecConfig, input: &'a [u8]) -> Self {
        Self {
            registry,
            config,
            reader: Reader::new(input),
            depth: 0,
        }
    }

    /// Code in the next header, without consuming it.
    pub(crate) fn peek_header(&self) -> Result<i32, CodecError> {
        Ok(self.reader.peek_i32()?)
    }

    /// The outermost record must consume the whole input.
    pub(crate) fn finish(self) -> Result<(), CodecError> {
        match self.reader.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n).into()),
        }
    }

    /// Header followed by body; the header must name `schema`.
    pub(crate) fn decode_contract(&mut self, schema: &ContractSchema) -> Result<Record, CodecError> {
        let code = self.reader.read_i32()?;
        if code != schema.code {
            return Err(CodecError::SchemaMismatch(format!(
                "header names contract {code}, expected {}",
                schema.code
            )));
        }
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(DecodeError::DepthLimit(self.config.max_depth).into());
        }
        let mut record = Record::new(code);
        for field in &schema.fields {
            let value = self.decode_field(field)?;
            record.set(&field.field, value);
        }
        self.depth -= 1;
        Ok(record)
    }

    fn decode_field(&mut self, field: &FieldSchema) -> Result<Value, CodecError> {
        if field.is_blob() {
            return Ok(Value::Bytes(self.reader.read_blob(self.config.max_length)?));
        }
        if !field.repeatable {
            return self.decode_element(field);
        }
        if self.config.array_framing == ArrayFraming::Legacy {
            return Err(DecodeError::AmbiguousFraming(field.field.clone()).into());
        }
        let count = self.reader.read_length(self.config.max_length)?;
        // Capacity is bounded by input left, not by the announced count.
        let mut items = Vec::with_capacity((count as usize).min(self.reader.remaining()));
        for _ in 0..count {
            items.push(self.decode_element(field)?);
        }
        Ok(Value::Array(items))
    }

    fn decode_element(&mut self, field: &FieldSchema) -> Result<Value, CodecError> {
        match field.kind {
            FieldKind::Generic(abstract_code) => {
                let concrete = self.reader.peek_i32()?;
                let schema = self.registry.resolve_generic_code(abstract_code, concrete)?;
                Ok(Value::Contract(self.decode_contract(&schema)?))
            }
            FieldKind::Contract(code) => {
                let schema = self.registry.resolve_contract(code)?;
                Ok(Value::Contract(self.decode_contract(&schema)?))
            }
            FieldKind::Enum(code) => {
                let descriptor = self.registry.resolve_enum(code)?;
                let wire = self.reader.read_i32()?;
                let constant = descriptor.constant_of(wire).ok_or_else(|| {
                    CodecError::SchemaMismatch(format!(
                        "field `{}`: {wire} is not a constant of enum {}",
                        field.field, descriptor.name
                    ))
                })?;
                Ok(Value::Enum(constant.to_string()))
            }
            FieldKind::Primitive(kind) => self.decode_primitive(field, kind),
        }
    }

    fn decode_primitive(&mut self, field: &FieldSchema, kind: PrimitiveType) -> Result<Value, CodecError> {
        if let Some(mask) = field.number_mask {
            let (n, used) = mask.read(self.reader.rest())?;
            self.reader.take(used)?;
            return masked_value(field, kind, n);
        }
        let limit = self.config.max_length;
        let r = &mut self.reader;
        let value = match kind {
            PrimitiveType::Boolean => Value::Bool(bytes::to_bool(r.read_u8()?)?),
            PrimitiveType::Int8 => Value::Int(bytes::to_int8(r.read_u8()?) as i64),
            PrimitiveType::Int16 => Value::Int(bytes::to_int16(r.take(2)?)? as i64),
            PrimitiveType::Int32 => Value::Int(bytes::to_int32(r.take(4)?)? as i64),
            PrimitiveType::Int64 => Value::Int(bytes::to_int64(r.take(8)?)?),
            PrimitiveType::UInt8 => Value::UInt(r.read_u8()? as u64),
            PrimitiveType::UInt16 => Value::UInt(bytes::to_uint16(r.take(2)?)? as u64),
            PrimitiveType::UInt32 => Value::UInt(bytes::to_uint32(r.take(4)?)? as u64),
            PrimitiveType::UInt64 => Value::UInt(bytes::to_uint64(r.take(8)?)?),
            PrimitiveType::Bytes => Value::Bytes(r.read_blob(limit)?),
            PrimitiveType::Text => {
                let text = String::from_utf8(r.read_blob(limit)?)
                    .map_err(|_| DecodeError::InvalidUtf8(field.field.clone()))?;
                Value::Text(text)
            }
        };
        Ok(value)
    }
}

fn masked_value(field: &FieldSchema, kind: PrimitiveType, n: i64) -> Result<Value, CodecError> {
    let in_range = kind
        .range()
        .is_some_and(|(min, max)| (n as i128) >= min && (n as i128) <= max);
    if !in_range {
        return Err(CodecError::SchemaMismatch(format!(
            "field `{}`: masked value {n} does not fit {kind}",
            field.field
        )));
    }
    Ok(if kind.is_signed() {
        Value::Int(n)
    } else {
        Value::UInt(n as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_take_truncated() {
        let mut r = Reader::new(&[1, 2, 3]);
        assert_eq!(r.take(2).unwrap(), &[1, 2]);
        assert!(matches!(
            r.take(2).unwrap_err(),
            DecodeError::Primitive(bproto_core::BytesError::Truncated { needed: 2, remaining: 1 })
        ));
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let r = Reader::new(&[0, 0, 3, 0xE9, 7]);
        assert_eq!(r.peek_i32().unwrap(), 1001);
        assert_eq!(r.remaining(), 5);
    }
}
