//! # Transaction Content
//!
//! `TransactionContentBody` is the hashed part of a transaction:
//!
//! ```text
//! 00 00 02 00          TX_CONTENT_BODY header
//! len ‖ ledgerHash     bytes
//! count ‖ op₁ ‖ …      operations, each with its concrete header
//! timestamp            i64, seconds since the Unix epoch
//! ```

use bproto_codec::{
    CodecError, Contract, ContractDecl, FieldDecl, PrimitiveType, Record, Value,
};

use crate::codes;
use crate::digest::ContentDigest;
use crate::operation::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContentBody {
    pub ledger_hash: Vec<u8>,
    pub operations: Vec<Operation>,
    pub timestamp: i64,
}

impl Contract for TransactionContentBody {
    const CODE: i32 = codes::TX_CONTENT_BODY;

    fn declare() -> ContractDecl {
        ContractDecl::new("TransactionContentBody")
            .field(
                FieldDecl::new("ledgerHash")
                    .order(1)
                    .primitive(PrimitiveType::Bytes),
            )
            .field(
                FieldDecl::new("operations")
                    .order(2)
                    .ref_contract(codes::OPERATION)
                    .generic()
                    .repeatable(),
            )
            .field(
                FieldDecl::new("timestamp")
                    .order(3)
                    .primitive(PrimitiveType::Int64),
            )
    }

    fn to_record(&self) -> Record {
        let operations: Vec<Value> = self
            .operations
            .iter()
            .map(|op| Value::Contract(op.to_record()))
            .collect();
        Record::new(Self::CODE)
            .with("ledgerHash", self.ledger_hash.clone())
            .with("operations", operations)
            .with("timestamp", self.timestamp)
    }

    fn from_record(mut record: Record) -> Result<Self, CodecError> {
        let operations = record
            .take_array("operations")?
            .into_iter()
            .map(|v| match v {
                Value::Contract(r) => Operation::from_record(r),
                other => Err(CodecError::SchemaMismatch(format!(
                    "operation element is {}, expected contract",
                    other.kind_name()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            ledger_hash: record.take_bytes("ledgerHash")?,
            operations,
            timestamp: record.take_int("timestamp")?,
        })
    }
}

/// A prepared transaction: the body plus the hash of its canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContent {
    pub body: TransactionContentBody,
    pub hash: ContentDigest,
}
