//! # Wire Format Tests
//!
//! End-to-end checks of the byte layout through the public API only:
//! typed contracts, generic dispatch on the runtime subtype, enum constants
//! and the determinism/round-trip properties the content hash relies on.

use bproto_codec::{
    Codec, CodecError, Contract, ContractDecl, EnumDescriptor, FieldDecl, NumberMask,
    PrimitiveType, Record, TypeRegistry, Value,
};
use proptest::prelude::*;

const ACTION: i32 = 300;
const TRANSFER: i32 = 301;
const MEMO: i32 = 302;
const BATCH: i32 = 310;
const UNRELATED: i32 = 399;
const PRIORITY: i32 = 320;

#[derive(Debug, Clone, PartialEq)]
struct Transfer {
    to: Vec<u8>,
    amount: i64,
}

impl Contract for Transfer {
    const CODE: i32 = TRANSFER;

    fn declare() -> ContractDecl {
        ContractDecl::new("Transfer")
            .field(FieldDecl::new("to").order(0).primitive(PrimitiveType::Bytes))
            .field(
                FieldDecl::new("amount")
                    .order(1)
                    .primitive(PrimitiveType::Int64)
                    .number_mask(NumberMask::Long),
            )
    }

    fn to_record(&self) -> Record {
        Record::new(Self::CODE)
            .with("to", self.to.clone())
            .with("amount", self.amount)
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        Ok(Self {
            to: record.take_bytes("to")?,
            amount: record.take_int("amount")?,
        })
    }
}

fn registry() -> TypeRegistry {
    let reg = TypeRegistry::new();
    reg.register::<Transfer>().unwrap();
    reg.register_contract(
        MEMO,
        &ContractDecl::new("Memo").field(FieldDecl::new("text").primitive(PrimitiveType::Text)),
    )
    .unwrap();
    reg.register_contract(
        UNRELATED,
        &ContractDecl::new("Unrelated").field(FieldDecl::new("x").primitive(PrimitiveType::Int8)),
    )
    .unwrap();
    reg.register_generic(ACTION, TRANSFER).unwrap();
    reg.register_generic(ACTION, MEMO).unwrap();
    reg.register_enum(
        PRIORITY,
        EnumDescriptor::new("Priority")
            .constant("LOW", 0)
            .constant("HIGH", 10),
    )
    .unwrap();
    reg.register_contract(
        BATCH,
        &ContractDecl::new("Batch")
            .field(FieldDecl::new("priority").order(1).ref_enum(PRIORITY))
            .field(
                FieldDecl::new("actions")
                    .order(0)
                    .ref_contract(ACTION)
                    .generic()
                    .repeatable(),
            ),
    )
    .unwrap();
    reg
}

fn batch(actions: Vec<Value>) -> Record {
    Record::new(BATCH)
        .with("actions", actions)
        .with("priority", Value::constant("HIGH"))
}

#[test]
fn test_typed_contract_roundtrip() {
    let reg = registry();
    let codec = Codec::new(&reg);
    let transfer = Transfer {
        to: vec![0xAB; 3],
        amount: 5,
    };
    let bytes = codec.encode_contract(&transfer).unwrap();
    assert_eq!(
        bytes.as_bytes(),
        &[0x00, 0x00, 0x01, 0x2D, 0, 0, 0, 3, 0xAB, 0xAB, 0xAB, 0x05]
    );
    let back: Transfer = codec.decode_contract(bytes.as_bytes()).unwrap();
    assert_eq!(back, transfer);
}

#[test]
fn test_generic_elements_carry_their_own_header() {
    let reg = registry();
    let codec = Codec::new(&reg);
    let rec = batch(vec![
        Value::Contract(Transfer { to: vec![], amount: 1 }.to_record()),
        Value::Contract(Record::new(MEMO).with("text", "hi")),
    ]);
    let bytes = codec.encode(&rec).unwrap();
    let b = bytes.as_bytes();
    assert_eq!(&b[0..4], &BATCH.to_be_bytes());
    assert_eq!(&b[4..8], &2u32.to_be_bytes());
    assert_eq!(&b[8..12], &TRANSFER.to_be_bytes());
    // empty `to` blob, one-byte masked amount
    assert_eq!(&b[12..17], &[0, 0, 0, 0, 0x01]);
    assert_eq!(&b[17..21], &MEMO.to_be_bytes());
    assert_eq!(&b[21..27], &[0, 0, 0, 2, b'h', b'i']);
    assert_eq!(&b[27..], &10i32.to_be_bytes());

    assert_eq!(codec.decode(b, BATCH).unwrap(), rec);
}

#[test]
fn test_generic_rejects_non_substitution() {
    let reg = registry();
    let codec = Codec::new(&reg);
    let rec = batch(vec![Value::Contract(Record::new(UNRELATED).with("x", 1i8))]);
    assert!(matches!(
        codec.encode(&rec).unwrap_err(),
        CodecError::SchemaMismatch(_)
    ));

    let rec = batch(vec![Value::Contract(Record::new(777))]);
    assert!(matches!(
        codec.encode(&rec).unwrap_err(),
        CodecError::NotRegistered { code: 777, .. }
    ));
}

#[test]
fn test_decode_any_uses_header() {
    let reg = registry();
    let codec = Codec::new(&reg);
    let bytes = codec.encode(&Record::new(MEMO).with("text", "x")).unwrap();
    let rec = codec.decode_any(bytes.as_bytes()).unwrap();
    assert_eq!(rec.code(), MEMO);
    assert_eq!(rec.get("text"), Some(&Value::Text("x".into())));
}

#[test]
fn test_unknown_enum_wire_value() {
    let reg = registry();
    let codec = Codec::new(&reg);
    let mut bytes = codec.encode(&batch(vec![])).unwrap().into_vec();
    let n = bytes.len();
    bytes[n - 4..].copy_from_slice(&5i32.to_be_bytes());
    assert!(matches!(
        codec.decode(&bytes, BATCH).unwrap_err(),
        CodecError::SchemaMismatch(_)
    ));
}

#[test]
fn test_frozen_registry_still_encodes() {
    let reg = registry();
    reg.freeze();
    let codec = Codec::new(&reg);
    assert!(codec.encode(&batch(vec![])).is_ok());
    assert!(matches!(
        codec.register::<Transfer>().unwrap_err(),
        CodecError::RegistryFrozen { .. }
    ));
}

proptest! {
    #[test]
    fn encoding_is_deterministic_and_invertible(
        to in proptest::collection::vec(any::<u8>(), 0..64),
        amount in 0i64..(1i64 << 60),
        memos in proptest::collection::vec("[a-z]{0,12}", 0..4),
    ) {
        let reg = registry();
        let codec = Codec::new(&reg);
        let mut actions = vec![Value::Contract(Transfer { to, amount }.to_record())];
        actions.extend(
            memos
                .into_iter()
                .map(|m| Value::Contract(Record::new(MEMO).with("text", m))),
        );
        let rec = batch(actions);

        let first = codec.encode(&rec).unwrap();
        let second = codec.encode(&rec.clone()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(codec.decode(first.as_bytes(), BATCH).unwrap(), rec);
    }

    #[test]
    fn truncated_input_never_decodes(cut in 1usize..20) {
        let reg = registry();
        let codec = Codec::new(&reg);
        let bytes = codec
            .encode(&batch(vec![Value::Contract(Record::new(MEMO).with("text", "hello"))]))
            .unwrap()
            .into_vec();
        let keep = bytes.len().saturating_sub(cut);
        prop_assert!(codec.decode(&bytes[..keep], BATCH).is_err());
    }
}
