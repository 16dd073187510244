//! # Record Values
//!
//! [`Record`] is the runtime shape of a contract instance: its registered
//! code plus one [`Value`] per field, keyed by member identifier. The map
//! order is irrelevant to the wire; the encoder walks the schema order.

use std::collections::BTreeMap;

use crate::error::CodecError;

/// A field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Value of a signed integer field (`INT8`..`INT64`).
    Int(i64),
    /// Value of an unsigned integer field (`UINT8`..`UINT64`).
    UInt(u64),
    Bool(bool),
    Bytes(Vec<u8>),
    Text(String),
    /// Constant name of an enumeration.
    Enum(String),
    /// Nested contract; for generic fields the record's code selects the subtype.
    Contract(Record),
    /// Elements of a repeated field.
    Array(Vec<Value>),
}

impl Value {
    /// Short kind label used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Enum(_) => "enum",
            Self::Contract(_) => "contract",
            Self::Array(_) => "array",
        }
    }

    /// Builds an enum value from a constant name.
    pub fn constant(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v as $target)
            }
        })+
    };
}

value_from!(Int, i64, i8, i16, i32, i64);
value_from!(UInt, u64, u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Contract(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

/// An instance of a registered contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    code: i32,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// An empty record of contract `code`.
    pub fn new(code: i32) -> Self {
        Self {
            code,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.to_string(), value.into())
    }

    /// Contract code written in the record's header.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Value of a field, if set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Fields in member-identifier order (not wire order).
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove a field's value.
    pub fn take(&mut self, field: &str) -> Result<Value, CodecError> {
        self.fields.remove(field).ok_or_else(|| {
            CodecError::SchemaMismatch(format!(
                "record {} has no field `{field}`",
                self.code
            ))
        })
    }

    /// Remove the value of a signed integer field.
    pub fn take_int(&mut self, field: &str) -> Result<i64, CodecError> {
        match self.take(field)? {
            Value::Int(v) => Ok(v),
            other => Err(mismatch(field, "int", &other)),
        }
    }

    /// Remove the value of an unsigned integer field.
    pub fn take_uint(&mut self, field: &str) -> Result<u64, CodecError> {
        match self.take(field)? {
            Value::UInt(v) => Ok(v),
            other => Err(mismatch(field, "uint", &other)),
        }
    }

    /// Remove the value of a `BOOLEAN` field.
    pub fn take_bool(&mut self, field: &str) -> Result<bool, CodecError> {
        match self.take(field)? {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(field, "bool", &other)),
        }
    }

    /// Remove the value of a `BYTES` field.
    pub fn take_bytes(&mut self, field: &str) -> Result<Vec<u8>, CodecError> {
        match self.take(field)? {
            Value::Bytes(v) => Ok(v),
            other => Err(mismatch(field, "bytes", &other)),
        }
    }

    /// Remove the value of a `TEXT` field.
    pub fn take_text(&mut self, field: &str) -> Result<String, CodecError> {
        match self.take(field)? {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(field, "text", &other)),
        }
    }

    /// Remove the constant name of an enum field.
    pub fn take_enum(&mut self, field: &str) -> Result<String, CodecError> {
        match self.take(field)? {
            Value::Enum(v) => Ok(v),
            other => Err(mismatch(field, "enum", &other)),
        }
    }

    /// Remove the value of a nested or generic contract field.
    pub fn take_record(&mut self, field: &str) -> Result<Record, CodecError> {
        match self.take(field)? {
            Value::Contract(v) => Ok(v),
            other => Err(mismatch(field, "contract", &other)),
        }
    }

    /// Remove the elements of a repeated field.
    pub fn take_array(&mut self, field: &str) -> Result<Vec<Value>, CodecError> {
        match self.take(field)? {
            Value::Array(v) => Ok(v),
            other => Err(mismatch(field, "array", &other)),
        }
    }
}

fn mismatch(field: &str, expected: &str, found: &Value) -> CodecError {
    CodecError::invalid_value(
        field,
        format!("expected {expected}, found {}", found.kind_name()),
    )
}
