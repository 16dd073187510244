//! # Ledger Operations
//!
//! Concrete operations a transaction carries. Each is a [`Contract`] of its
//! own and a registered substitution for the abstract
//! [`OPERATION`](crate::codes::OPERATION) code, so a transaction's operation
//! list is a repeated generic field: every element is written with its
//! concrete header and read back by dispatching on it.

use bproto_codec::{
    CodecError, Contract, ContractDecl, FieldDecl, PrimitiveType, Record, Value,
};

use crate::codes;

/// Address and public key of a ledger participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockchainIdentity {
    pub address: Vec<u8>,
    pub pub_key: Vec<u8>,
}

impl BlockchainIdentity {
    pub fn new(address: impl Into<Vec<u8>>, pub_key: impl Into<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            pub_key: pub_key.into(),
        }
    }
}

impl Contract for BlockchainIdentity {
    const CODE: i32 = codes::BLOCKCHAIN_IDENTITY;

    fn declare() -> ContractDecl {
        ContractDecl::new("BlockchainIdentity")
            .field(FieldDecl::new("address").order(1).primitive(PrimitiveType::Bytes))
            .field(FieldDecl::new("pubKey").order(2).primitive(PrimitiveType::Bytes))
    }

    fn to_record(&self) -> Record {
        Record::new(Self::CODE)
            .with("address", self.address.clone())
            .with("pubKey", self.pub_key.clone())
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        Ok(Self {
            address: record.take_bytes("address")?,
            pub_key: record.take_bytes("pubKey")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegisterOperation {
    pub user_id: BlockchainIdentity,
}

impl Contract for UserRegisterOperation {
    const CODE: i32 = codes::USER_REGISTER_OPERATION;

    fn declare() -> ContractDecl {
        ContractDecl::new("UserRegisterOperation").field(
            FieldDecl::new("userID")
                .order(1)
                .ref_contract(codes::BLOCKCHAIN_IDENTITY),
        )
    }

    fn to_record(&self) -> Record {
        Record::new(Self::CODE).with("userID", self.user_id.to_record())
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        Ok(Self {
            user_id: BlockchainIdentity::from_record(record.take_record("userID")?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAccountRegisterOperation {
    pub account_id: BlockchainIdentity,
}

impl Contract for DataAccountRegisterOperation {
    const CODE: i32 = codes::DATA_ACCOUNT_REGISTER_OPERATION;

    fn declare() -> ContractDecl {
        ContractDecl::new("DataAccountRegisterOperation").field(
            FieldDecl::new("accountID")
                .order(1)
                .ref_contract(codes::BLOCKCHAIN_IDENTITY),
        )
    }

    fn to_record(&self) -> Record {
        Record::new(Self::CODE).with("accountID", self.account_id.to_record())
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        Ok(Self {
            account_id: BlockchainIdentity::from_record(record.take_record("accountID")?)?,
        })
    }
}

/// One key write inside a KV-set operation.
///
/// `expected_version` is the version the writer last saw; `-1` means the key
/// must not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KVWriteEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub expected_version: i64,
}

impl KVWriteEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>, expected_version: i64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            expected_version,
        }
    }
}

impl Contract for KVWriteEntry {
    const CODE: i32 = codes::KV_WRITE_ENTRY;

    fn declare() -> ContractDecl {
        ContractDecl::new("KVWriteEntry")
            .field(FieldDecl::new("key").order(1).primitive(PrimitiveType::Text))
            .field(FieldDecl::new("value").order(2).primitive(PrimitiveType::Bytes))
            .field(
                FieldDecl::new("expectedVersion")
                    .order(3)
                    .primitive(PrimitiveType::Int64),
            )
    }

    fn to_record(&self) -> Record {
        Record::new(Self::CODE)
            .with("key", self.key.as_str())
            .with("value", self.value.clone())
            .with("expectedVersion", self.expected_version)
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        Ok(Self {
            key: record.take_text("key")?,
            value: record.take_bytes("value")?,
            expected_version: record.take_int("expectedVersion")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAccountKVSetOperation {
    pub account_address: Vec<u8>,
    pub write_set: Vec<KVWriteEntry>,
}

impl Contract for DataAccountKVSetOperation {
    const CODE: i32 = codes::DATA_ACCOUNT_KV_SET_OPERATION;

    fn declare() -> ContractDecl {
        ContractDecl::new("DataAccountKVSetOperation")
            .field(
                FieldDecl::new("accountAddress")
                    .order(1)
                    .primitive(PrimitiveType::Bytes),
            )
            .field(
                FieldDecl::new("writeSet")
                    .order(2)
                    .ref_contract(codes::KV_WRITE_ENTRY)
                    .repeatable()
                    .max_size(1024),
            )
    }

    fn to_record(&self) -> Record {
        let entries: Vec<Value> = self
            .write_set
            .iter()
            .map(|e| Value::Contract(e.to_record()))
            .collect();
        Record::new(Self::CODE)
            .with("accountAddress", self.account_address.clone())
            .with("writeSet", entries)
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        let write_set = record
            .take_array("writeSet")?
            .into_iter()
            .map(|v| match v {
                Value::Contract(r) => KVWriteEntry::from_record(r),
                other => Err(CodecError::SchemaMismatch(format!(
                    "writeSet element is {}, expected contract",
                    other.kind_name()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            account_address: record.take_bytes("accountAddress")?,
            write_set,
        })
    }
}

/// Any operation a transaction can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    UserRegister(UserRegisterOperation),
    DataAccountRegister(DataAccountRegisterOperation),
    DataAccountKVSet(DataAccountKVSetOperation),
}

impl Operation {
    /// Concrete contract code written as the element header.
    pub fn code(&self) -> i32 {
        match self {
            Self::UserRegister(_) => UserRegisterOperation::CODE,
            Self::DataAccountRegister(_) => DataAccountRegisterOperation::CODE,
            Self::DataAccountKVSet(_) => DataAccountKVSetOperation::CODE,
        }
    }

    pub fn to_record(&self) -> Record {
        match self {
            Self::UserRegister(op) => op.to_record(),
            Self::DataAccountRegister(op) => op.to_record(),
            Self::DataAccountKVSet(op) => op.to_record(),
        }
    }

    /// Pick the variant from the record's concrete code.
    pub fn from_record(record: Record) -> Result<Self, CodecError> {
        match record.code() {
            UserRegisterOperation::CODE => {
                UserRegisterOperation::from_record(record).map(Self::UserRegister)
            }
            DataAccountRegisterOperation::CODE => {
                DataAccountRegisterOperation::from_record(record).map(Self::DataAccountRegister)
            }
            DataAccountKVSetOperation::CODE => {
                DataAccountKVSetOperation::from_record(record).map(Self::DataAccountKVSet)
            }
            other => Err(CodecError::SchemaMismatch(format!(
                "contract {other} is not a ledger operation"
            ))),
        }
    }
}

impl From<UserRegisterOperation> for Operation {
    fn from(op: UserRegisterOperation) -> Self {
        Self::UserRegister(op)
    }
}

impl From<DataAccountRegisterOperation> for Operation {
    fn from(op: DataAccountRegisterOperation) -> Self {
        Self::DataAccountRegister(op)
    }
}

impl From<DataAccountKVSetOperation> for Operation {
    fn from(op: DataAccountKVSetOperation) -> Self {
        Self::DataAccountKVSet(op)
    }
}
