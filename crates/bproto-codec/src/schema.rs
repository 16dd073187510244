//! # Schema Resolver: Field Declarations to Wire Schemas
//!
//! A contract is declared as an explicit list of [`FieldDecl`]s, each
//! carrying the annotation set the codec understands:
//!
//! | Tag               | Meaning                                         |
//! |-------------------|-------------------------------------------------|
//! | `name`            | Informational display name                      |
//! | `order`           | Authoritative wire position                     |
//! | `description`     | Informational, never serialized                 |
//! | `primitiveType`   | `INT8`..`UINT64`, `BOOLEAN`, `TEXT`, `BYTES`    |
//! | `refContract`     | Code of a nested contract (or abstract type)    |
//! | `refEnum`         | Code of an enumeration; `0` on either is unset  |
//! | `genericContract` | `refContract` is abstract; dispatch on runtime  |
//! | `maxSize`         | Advisory bound, `-1` for unbounded              |
//! | `numberEncoding`  | `NONE`, `TINY`, `SHORT`, `NORMAL`, `LONG`       |
//! | `repeatable`      | Field holds a sequence                          |
//!
//! Annotation values may be integers, booleans or text. Text is parsed, so
//! declarations loaded from a manifest and declarations built in code go
//! through the same checks.
//!
//! ## Wire order
//!
//! Fields carrying `order` are placed first, ascending. Fields without it
//! follow in declaration order. Two fields with the same `order` are
//! rejected: the wire layout would depend on declaration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bproto_core::NumberMask;

use crate::error::SchemaError;
use crate::types::PrimitiveType;

pub const TAG_NAME: &str = "name";
pub const TAG_ORDER: &str = "order";
pub const TAG_DESCRIPTION: &str = "description";
pub const TAG_PRIMITIVE_TYPE: &str = "primitiveType";
pub const TAG_REF_CONTRACT: &str = "refContract";
pub const TAG_REF_ENUM: &str = "refEnum";
pub const TAG_GENERIC_CONTRACT: &str = "genericContract";
pub const TAG_MAX_SIZE: &str = "maxSize";
pub const TAG_NUMBER_ENCODING: &str = "numberEncoding";
pub const TAG_REPEATABLE: &str = "repeatable";

const KNOWN_TAGS: [&str; 10] = [
    TAG_NAME,
    TAG_ORDER,
    TAG_DESCRIPTION,
    TAG_PRIMITIVE_TYPE,
    TAG_REF_CONTRACT,
    TAG_REF_ENUM,
    TAG_GENERIC_CONTRACT,
    TAG_MAX_SIZE,
    TAG_NUMBER_ENCODING,
    TAG_REPEATABLE,
];

/// A single annotation value as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Annotation {
    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Self::Int(_) => None,
        }
    }

    fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for Annotation {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Annotation {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Annotation {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for Annotation {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Annotation {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Declaration of one contract field: its member identifier plus annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Member identifier; the key of the field's value in a [`Record`](crate::Record).
    pub field: String,
    #[serde(flatten)]
    pub annotations: BTreeMap<String, Annotation>,
}

impl FieldDecl {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Set a raw annotation.
    pub fn annotate(mut self, tag: &str, value: impl Into<Annotation>) -> Self {
        self.annotations.insert(tag.to_string(), value.into());
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.annotate(TAG_NAME, name)
    }

    pub fn order(self, order: i32) -> Self {
        self.annotate(TAG_ORDER, order)
    }

    pub fn description(self, description: &str) -> Self {
        self.annotate(TAG_DESCRIPTION, description)
    }

    pub fn primitive(self, kind: PrimitiveType) -> Self {
        self.annotate(TAG_PRIMITIVE_TYPE, kind.name())
    }

    pub fn ref_contract(self, code: i32) -> Self {
        self.annotate(TAG_REF_CONTRACT, code)
    }

    pub fn ref_enum(self, code: i32) -> Self {
        self.annotate(TAG_REF_ENUM, code)
    }

    /// Mark `refContract` as an abstract type resolved at runtime.
    pub fn generic(self) -> Self {
        self.annotate(TAG_GENERIC_CONTRACT, true)
    }

    pub fn max_size(self, max: i64) -> Self {
        self.annotate(TAG_MAX_SIZE, max)
    }

    pub fn number_mask(self, mask: NumberMask) -> Self {
        self.annotate(TAG_NUMBER_ENCODING, mask.name())
    }

    pub fn repeatable(self) -> Self {
        self.annotate(TAG_REPEATABLE, true)
    }
}

/// Declaration of a contract type: display name plus field declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl ContractDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }
}

/// How a field's value reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(PrimitiveType),
    /// Nested contract of exactly this code.
    Contract(i32),
    /// Any registered substitution of this abstract code.
    Generic(i32),
    /// Constant of this enumeration.
    Enum(i32),
}

/// Resolved codec metadata of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub field: String,
    pub name: Option<String>,
    pub order: Option<i32>,
    pub description: Option<String>,
    pub kind: FieldKind,
    /// Advisory bound; `-1` is unbounded.
    pub max_size: i64,
    pub number_mask: Option<NumberMask>,
    pub repeatable: bool,
}

impl FieldSchema {
    /// Byte blobs are one length-prefixed unit even when declared repeatable.
    pub fn is_blob(&self) -> bool {
        self.kind == FieldKind::Primitive(PrimitiveType::Bytes)
    }

    /// Whether the value is framed as a sequence.
    pub fn is_sequence(&self) -> bool {
        self.repeatable && !self.is_blob()
    }
}

/// A registered contract's code and fields in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSchema {
    pub code: i32,
    pub name: String,
    pub fields: Vec<FieldSchema>,
}

impl ContractSchema {
    pub fn field(&self, field: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.field == field)
    }
}

/// Resolve a contract declaration into its wire schema.
pub fn resolve_contract(code: i32, decl: &ContractDecl) -> Result<ContractSchema, SchemaError> {
    let mut resolved: Vec<(usize, FieldSchema)> = Vec::with_capacity(decl.fields.len());
    for (idx, field) in decl.fields.iter().enumerate() {
        if resolved.iter().any(|(_, f)| f.field == field.field) {
            return Err(SchemaError::DuplicateField(field.field.clone()));
        }
        resolved.push((idx, resolve_field(field)?));
    }

    let mut by_order: BTreeMap<i32, &str> = BTreeMap::new();
    for (_, f) in &resolved {
        if let Some(order) = f.order {
            if let Some(first) = by_order.insert(order, f.field.as_str()) {
                return Err(SchemaError::DuplicateOrder {
                    order,
                    first: first.to_string(),
                    second: f.field.clone(),
                });
            }
        }
    }

    resolved.sort_by_key(|(idx, f)| match f.order {
        Some(order) => (0, order as i64),
        None => (1, *idx as i64),
    });

    Ok(ContractSchema {
        code,
        name: decl.name.clone(),
        fields: resolved.into_iter().map(|(_, f)| f).collect(),
    })
}

/// Resolve one field declaration.
pub fn resolve_field(decl: &FieldDecl) -> Result<FieldSchema, SchemaError> {
    let field = decl.field.as_str();
    let get = |tag: &str| decl.annotations.get(tag);

    for tag in decl.annotations.keys() {
        if !KNOWN_TAGS.contains(&tag.as_str()) {
            tracing::warn!(field, tag = %tag, "ignoring unknown field annotation");
        }
    }

    let order = match get(TAG_ORDER) {
        Some(raw) => Some(
            raw.as_int()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| SchemaError::InvalidOrder {
                    field: field.to_string(),
                    value: raw.as_text(),
                })?,
        ),
        None => None,
    };

    let ref_contract = parse_code(field, TAG_REF_CONTRACT, get(TAG_REF_CONTRACT))?;
    let ref_enum = parse_code(field, TAG_REF_ENUM, get(TAG_REF_ENUM))?;
    let generic = parse_flag(field, TAG_GENERIC_CONTRACT, get(TAG_GENERIC_CONTRACT))?;
    let repeatable = parse_flag(field, TAG_REPEATABLE, get(TAG_REPEATABLE))?;

    let max_size = match get(TAG_MAX_SIZE) {
        Some(raw) => raw.as_int().ok_or_else(|| SchemaError::InvalidAnnotation {
            field: field.to_string(),
            tag: TAG_MAX_SIZE,
            value: raw.as_text(),
        })?,
        None => -1,
    };

    let primitive = match get(TAG_PRIMITIVE_TYPE) {
        Some(raw) => {
            let text = raw.as_text();
            Some(PrimitiveType::from_name(&text).ok_or_else(|| {
                SchemaError::UnknownPrimitiveType {
                    field: field.to_string(),
                    value: text,
                }
            })?)
        }
        None => None,
    };

    let number_mask = match get(TAG_NUMBER_ENCODING) {
        Some(raw) => parse_mask(field, raw)?,
        None => None,
    };

    // Blob first, then generic, contract, enum, and finally the primitive kind.
    let kind = match (primitive, generic, ref_contract, ref_enum) {
        (Some(PrimitiveType::Bytes), ..) => FieldKind::Primitive(PrimitiveType::Bytes),
        (_, true, Some(code), _) => FieldKind::Generic(code),
        (_, true, None, _) => return Err(SchemaError::GenericWithoutReference(field.to_string())),
        (_, false, Some(code), _) => FieldKind::Contract(code),
        (_, false, None, Some(code)) => FieldKind::Enum(code),
        (Some(kind), false, None, None) => FieldKind::Primitive(kind),
        (None, false, None, None) => return Err(SchemaError::MissingKind(field.to_string())),
    };

    if number_mask.is_some() {
        match kind {
            FieldKind::Primitive(p) if p.is_integer() => {}
            FieldKind::Primitive(p) => {
                return Err(SchemaError::MaskOnNonInteger {
                    field: field.to_string(),
                    kind: p.name(),
                })
            }
            _ => {
                return Err(SchemaError::MaskOnNonInteger {
                    field: field.to_string(),
                    kind: "a reference",
                })
            }
        }
    }

    Ok(FieldSchema {
        field: field.to_string(),
        name: get(TAG_NAME).map(Annotation::as_text),
        order,
        description: get(TAG_DESCRIPTION).map(Annotation::as_text),
        kind,
        max_size,
        number_mask,
        repeatable,
    })
}

/// Reference code of `refContract` / `refEnum`; `0` means no reference.
fn parse_code(
    field: &str,
    tag: &'static str,
    raw: Option<&Annotation>,
) -> Result<Option<i32>, SchemaError> {
    let code = raw
        .map(|raw| {
            raw.as_int()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| SchemaError::InvalidReference {
                    field: field.to_string(),
                    tag,
                    value: raw.as_text(),
                })
        })
        .transpose()?;
    Ok(code.filter(|&code| code != 0))
}

fn parse_flag(field: &str, tag: &'static str, raw: Option<&Annotation>) -> Result<bool, SchemaError> {
    match raw {
        None => Ok(false),
        Some(raw) => raw.as_bool().ok_or_else(|| SchemaError::InvalidAnnotation {
            field: field.to_string(),
            tag,
            value: raw.as_text(),
        }),
    }
}

fn parse_mask(field: &str, raw: &Annotation) -> Result<Option<NumberMask>, SchemaError> {
    let text = raw.as_text();
    let mask = match text.trim().to_ascii_uppercase().as_str() {
        "NONE" => None,
        "TINY" => Some(NumberMask::Tiny),
        "SHORT" => Some(NumberMask::Short),
        "NORMAL" => Some(NumberMask::Normal),
        "LONG" => Some(NumberMask::Long),
        _ => {
            return Err(SchemaError::UnknownNumberEncoding {
                field: field.to_string(),
                value: text,
            })
        }
    };
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int32(field: &str) -> FieldDecl {
        FieldDecl::new(field).primitive(PrimitiveType::Int32)
    }

    #[test]
    fn test_explicit_order_wins_over_declaration_order() {
        let decl = ContractDecl::new("Pair")
            .field(int32("second").order(1))
            .field(int32("first").order(0));
        let schema = resolve_contract(7, &decl).unwrap();
        let names: Vec<_> = schema.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_unordered_fields_follow_in_declaration_order() {
        let decl = ContractDecl::new("Mixed")
            .field(int32("b"))
            .field(int32("z").order(5))
            .field(int32("a"));
        let schema = resolve_contract(7, &decl).unwrap();
        let names: Vec<_> = schema.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, ["z", "b", "a"]);
    }

    #[test]
    fn test_duplicate_order_rejected() {
        let decl = ContractDecl::new("Dup")
            .field(int32("a").order(1))
            .field(int32("b").order(1));
        let err = resolve_contract(7, &decl).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateOrder {
                order: 1,
                first: "a".into(),
                second: "b".into()
            }
        );
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let decl = ContractDecl::new("Dup").field(int32("a")).field(int32("a"));
        assert_eq!(
            resolve_contract(7, &decl).unwrap_err(),
            SchemaError::DuplicateField("a".into())
        );
    }

    #[test]
    fn test_unparseable_order() {
        let decl = int32("a").annotate(TAG_ORDER, "first");
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::InvalidOrder { value, .. } if value == "first"
        ));
    }

    #[test]
    fn test_order_parsed_from_text() {
        let decl = int32("a").annotate(TAG_ORDER, " 3 ");
        assert_eq!(resolve_field(&decl).unwrap().order, Some(3));
    }

    #[test]
    fn test_unparseable_reference() {
        let decl = FieldDecl::new("child").annotate(TAG_REF_CONTRACT, "0x10");
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::InvalidReference { tag: TAG_REF_CONTRACT, .. }
        ));
        let decl = FieldDecl::new("level").annotate(TAG_REF_ENUM, "low");
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::InvalidReference { tag: TAG_REF_ENUM, .. }
        ));
    }

    #[test]
    fn test_kind_precedence() {
        let blob = FieldDecl::new("data")
            .primitive(PrimitiveType::Bytes)
            .ref_contract(9)
            .repeatable();
        let schema = resolve_field(&blob).unwrap();
        assert!(schema.is_blob());
        assert!(!schema.is_sequence());

        let generic = FieldDecl::new("op").ref_contract(300).generic();
        assert_eq!(resolve_field(&generic).unwrap().kind, FieldKind::Generic(300));

        let nested = FieldDecl::new("child").ref_contract(12).ref_enum(4);
        assert_eq!(resolve_field(&nested).unwrap().kind, FieldKind::Contract(12));

        let level = FieldDecl::new("level").ref_enum(4);
        assert_eq!(resolve_field(&level).unwrap().kind, FieldKind::Enum(4));
    }

    #[test]
    fn test_zero_reference_is_absent() {
        let decl = FieldDecl::new("n").primitive(PrimitiveType::Int32).ref_contract(0).ref_enum(0);
        assert_eq!(
            resolve_field(&decl).unwrap().kind,
            FieldKind::Primitive(PrimitiveType::Int32)
        );
        let decl = FieldDecl::new("child").annotate(TAG_REF_CONTRACT, "0");
        assert_eq!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::MissingKind("child".into())
        );
        let decl = FieldDecl::new("op").ref_contract(0).generic();
        assert_eq!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::GenericWithoutReference("op".into())
        );
    }

    #[test]
    fn test_generic_requires_reference() {
        let decl = FieldDecl::new("op").generic();
        assert_eq!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::GenericWithoutReference("op".into())
        );
    }

    #[test]
    fn test_missing_kind() {
        let decl = FieldDecl::new("nothing").order(0);
        assert_eq!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::MissingKind("nothing".into())
        );
    }

    #[test]
    fn test_unknown_primitive_and_mask() {
        let decl = FieldDecl::new("x").annotate(TAG_PRIMITIVE_TYPE, "FLOAT64");
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::UnknownPrimitiveType { .. }
        ));
        let decl = int32("x").annotate(TAG_NUMBER_ENCODING, "HUGE");
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::UnknownNumberEncoding { .. }
        ));
    }

    #[test]
    fn test_mask_only_on_integers() {
        let decl = FieldDecl::new("s")
            .primitive(PrimitiveType::Text)
            .number_mask(NumberMask::Normal);
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::MaskOnNonInteger { kind: "TEXT", .. }
        ));
        let ok = int32("n").number_mask(NumberMask::Normal);
        assert_eq!(resolve_field(&ok).unwrap().number_mask, Some(NumberMask::Normal));
        let none = int32("n").annotate(TAG_NUMBER_ENCODING, "NONE");
        assert_eq!(resolve_field(&none).unwrap().number_mask, None);
    }

    #[test]
    fn test_defaults_and_informational_tags() {
        let decl = int32("amount").name("Amount").description("transfer amount");
        let schema = resolve_field(&decl).unwrap();
        assert_eq!(schema.max_size, -1);
        assert!(!schema.repeatable);
        assert_eq!(schema.name.as_deref(), Some("Amount"));
        assert_eq!(schema.description.as_deref(), Some("transfer amount"));
    }

    #[test]
    fn test_bad_flag_rejected() {
        let decl = int32("a").annotate(TAG_REPEATABLE, "yes");
        assert!(matches!(
            resolve_field(&decl).unwrap_err(),
            SchemaError::InvalidAnnotation { tag: TAG_REPEATABLE, .. }
        ));
    }
}
