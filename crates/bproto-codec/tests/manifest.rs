//! Registry manifests loaded from YAML and JSON must register the same
//! schemas as declarations built in code.

use bproto_codec::{
    ArrayFraming, Codec, CodecError, ContractDecl, FieldDecl, PrimitiveType, Record,
    RegistryManifest, SchemaError, TypeRegistry, Value,
};

const MANIFEST: &str = r#"
config:
  arrayFraming: counted
  maxLength: 1024
contracts:
  - code: 1001
    name: Pair
    fields:
      - field: flag
        order: 1
        primitiveType: BOOLEAN
      - field: amount
        order: 0
        primitiveType: INT32
  - code: 1010
    name: Tagged
    fields:
      - field: level
        refEnum: 2001
      - field: pairs
        refContract: 1001
        repeatable: true
      - field: counter
        primitiveType: INT64
        numberEncoding: NORMAL
enums:
  - code: 2001
    name: Level
    constants:
      - { name: LOW, value: 1 }
      - { name: HIGH, value: 9 }
generics:
  - abstract: 300
    concrete: 1001
"#;

#[test]
fn test_yaml_manifest_registers_everything() {
    let manifest: RegistryManifest = serde_yaml::from_str(MANIFEST).unwrap();
    assert_eq!(manifest.config.array_framing, ArrayFraming::Counted);
    assert_eq!(manifest.config.max_length, 1024);

    let reg = TypeRegistry::new();
    manifest.apply(&reg).unwrap();
    assert_eq!(reg.contract_codes(), vec![1001, 1010]);
    assert_eq!(reg.resolve_enum(2001).unwrap().value_of("HIGH"), Some(9));
    assert_eq!(reg.resolve_generic_candidates(300).unwrap(), vec![1001]);

    let codec = Codec::new(&reg).with_config(manifest.config.clone());
    let pair = Record::new(1001).with("amount", 17).with("flag", true);
    assert_eq!(
        codec.encode(&pair).unwrap().as_bytes(),
        &[0x00, 0x00, 0x03, 0xE9, 0x00, 0x00, 0x00, 0x11, 0x01]
    );

    let tagged = Record::new(1010)
        .with("level", Value::constant("LOW"))
        .with("pairs", vec![Value::Contract(pair)])
        .with("counter", 7i64);
    let bytes = codec.encode(&tagged).unwrap();
    assert_eq!(codec.decode(bytes.as_bytes(), 1010).unwrap(), tagged);
}

#[test]
fn test_manifest_matches_code_declaration() {
    let manifest: RegistryManifest = serde_yaml::from_str(MANIFEST).unwrap();
    let from_manifest = TypeRegistry::new();
    manifest.apply(&from_manifest).unwrap();

    let in_code = TypeRegistry::new();
    in_code
        .register_contract(
            1001,
            &ContractDecl::new("Pair")
                .field(FieldDecl::new("flag").order(1).primitive(PrimitiveType::Boolean))
                .field(FieldDecl::new("amount").order(0).primitive(PrimitiveType::Int32)),
        )
        .unwrap();

    assert_eq!(
        from_manifest.resolve_contract(1001).unwrap(),
        in_code.resolve_contract(1001).unwrap()
    );
}

#[test]
fn test_json_manifest_with_defaults() {
    let json = r#"{
        "contracts": [
            { "code": 7, "name": "One", "fields": [
                { "field": "v", "primitiveType": "UINT16" }
            ]}
        ]
    }"#;
    let manifest: RegistryManifest = serde_json::from_str(json).unwrap();
    assert_eq!(manifest.config, Default::default());
    assert!(manifest.enums.is_empty());

    let reg = TypeRegistry::new();
    manifest.apply(&reg).unwrap();
    let codec = Codec::new(&reg);
    let bytes = codec.encode(&Record::new(7).with("v", 513u16)).unwrap();
    assert_eq!(bytes.as_bytes(), &[0, 0, 0, 7, 0x02, 0x01]);
}

#[test]
fn test_manifest_schema_error_stops_apply() {
    let yaml = r#"
contracts:
  - code: 1
    name: Broken
    fields:
      - field: a
        order: 0
        primitiveType: INT8
      - field: b
        order: 0
        primitiveType: INT8
"#;
    let manifest: RegistryManifest = serde_yaml::from_str(yaml).unwrap();
    let reg = TypeRegistry::new();
    let err = manifest.apply(&reg).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Schema(SchemaError::DuplicateOrder { order: 0, .. })
    ));
    assert!(reg.contract_codes().is_empty());
}

#[test]
fn test_manifest_roundtrips_through_yaml() {
    let manifest: RegistryManifest = serde_yaml::from_str(MANIFEST).unwrap();
    let text = serde_yaml::to_string(&manifest).unwrap();
    let again: RegistryManifest = serde_yaml::from_str(&text).unwrap();
    assert_eq!(manifest, again);
}
