//! # JSON ↔ Record Conversion
//!
//! JSON has no notion of widths, blobs or generic subtypes, so conversion
//! is driven by the registered schema:
//!
//! - integers: JSON numbers, or decimal strings for values beyond 2^53;
//! - `BYTES`: lowercase or uppercase hex, optional `0x` prefix;
//! - enums: the constant name;
//! - nested contracts: JSON objects;
//! - generic fields: objects carrying the concrete code under `"@code"`;
//!   any other object may carry `"@code"` only if it names its own contract;
//! - repeated fields: JSON arrays (byte blobs stay a single hex string).

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Map, Value as Json};

use bproto_codec::{FieldKind, FieldSchema, PrimitiveType, Record, TypeRegistry, Value};

/// Key naming the concrete contract of a generic field's value.
pub const CODE_KEY: &str = "@code";

/// Build a record of contract `code` from a JSON object.
pub fn json_to_record(registry: &TypeRegistry, code: i32, json: &Json) -> Result<Record> {
    let schema = registry.resolve_contract(code)?;
    let object = json
        .as_object()
        .ok_or_else(|| anyhow!("contract {} ({code}) must be a JSON object", schema.name))?;

    for key in object.keys() {
        if key != CODE_KEY && schema.field(key).is_none() {
            bail!("contract {} has no field `{key}`", schema.name);
        }
    }
    if let Some(tagged) = object.get(CODE_KEY) {
        if tagged.as_i64() != Some(i64::from(code)) {
            bail!("`{CODE_KEY}` {tagged} does not match contract {} ({code})", schema.name);
        }
    }

    let mut record = Record::new(code);
    for field in &schema.fields {
        let raw = object
            .get(&field.field)
            .ok_or_else(|| anyhow!("contract {} is missing field `{}`", schema.name, field.field))?;
        let value = field_from_json(registry, field, raw)
            .with_context(|| format!("field `{}` of {}", field.field, schema.name))?;
        record.set(&field.field, value);
    }
    Ok(record)
}

fn field_from_json(registry: &TypeRegistry, field: &FieldSchema, raw: &Json) -> Result<Value> {
    if !field.is_sequence() {
        return element_from_json(registry, field, raw);
    }
    let items = raw
        .as_array()
        .ok_or_else(|| anyhow!("repeated field expects a JSON array"))?;
    items
        .iter()
        .map(|item| element_from_json(registry, field, item))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn element_from_json(registry: &TypeRegistry, field: &FieldSchema, raw: &Json) -> Result<Value> {
    match field.kind {
        FieldKind::Primitive(kind) => primitive_from_json(kind, raw),
        FieldKind::Enum(_) => raw
            .as_str()
            .map(Value::constant)
            .ok_or_else(|| anyhow!("enum value must be a constant name")),
        FieldKind::Contract(code) => Ok(Value::Contract(json_to_record(registry, code, raw)?)),
        FieldKind::Generic(_) => {
            let concrete = raw
                .get(CODE_KEY)
                .and_then(Json::as_i64)
                .and_then(|c| i32::try_from(c).ok())
                .ok_or_else(|| anyhow!("generic value needs an integer `{CODE_KEY}`"))?;
            Ok(Value::Contract(json_to_record(registry, concrete, raw)?))
        }
    }
}

fn primitive_from_json(kind: PrimitiveType, raw: &Json) -> Result<Value> {
    match kind {
        PrimitiveType::Boolean => raw
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| anyhow!("expected true or false")),
        PrimitiveType::Text => raw
            .as_str()
            .map(Value::from)
            .ok_or_else(|| anyhow!("expected a string")),
        PrimitiveType::Bytes => {
            let text = raw.as_str().ok_or_else(|| anyhow!("expected a hex string"))?;
            let text = text.strip_prefix("0x").unwrap_or(text);
            Ok(Value::Bytes(hex::decode(text).context("invalid hex")?))
        }
        _ if kind.is_signed() => {
            let n = match raw {
                Json::String(s) => s.trim().parse::<i64>().ok(),
                other => other.as_i64(),
            };
            n.map(Value::Int)
                .ok_or_else(|| anyhow!("expected a signed integer for {kind}"))
        }
        _ => {
            let n = match raw {
                Json::String(s) => s.trim().parse::<u64>().ok(),
                other => other.as_u64(),
            };
            n.map(Value::UInt)
                .ok_or_else(|| anyhow!("expected an unsigned integer for {kind}"))
        }
    }
}

/// Render a decoded record as JSON, the inverse of [`json_to_record`].
pub fn record_to_json(registry: &TypeRegistry, record: &Record) -> Result<Json> {
    let schema = registry.resolve_contract(record.code())?;
    let mut object = Map::new();
    for field in &schema.fields {
        let value = record
            .get(&field.field)
            .ok_or_else(|| anyhow!("decoded record lacks field `{}`", field.field))?;
        object.insert(field.field.clone(), value_to_json(registry, field, value)?);
    }
    Ok(Json::Object(object))
}

fn value_to_json(registry: &TypeRegistry, field: &FieldSchema, value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Int(n) => json!(n),
        Value::UInt(n) => json!(n),
        Value::Bool(b) => json!(b),
        Value::Bytes(b) => json!(hex::encode(b)),
        Value::Text(s) => json!(s),
        Value::Enum(name) => json!(name),
        Value::Contract(record) => {
            let mut nested = record_to_json(registry, record)?;
            if let (FieldKind::Generic(_), Json::Object(map)) = (field.kind, &mut nested) {
                map.insert(CODE_KEY.to_string(), json!(record.code()));
            }
            nested
        }
        Value::Array(items) => Json::Array(
            items
                .iter()
                .map(|item| value_to_json(registry, field, item))
                .collect::<Result<Vec<_>>>()?,
        ),
    })
}
