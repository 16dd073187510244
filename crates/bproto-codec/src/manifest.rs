//! # Registry Manifest
//!
//! A serde document describing a full registry: codec configuration,
//! contract declarations, enum descriptors and generic substitutions. The
//! CLI loads it from YAML or JSON so types can be registered without
//! writing Rust.
//!
//! ```yaml
//! config:
//!   arrayFraming: counted
//! contracts:
//!   - code: 1001
//!     name: Pair
//!     fields:
//!       - field: amount
//!         order: 0
//!         primitiveType: INT32
//! enums:
//!   - code: 2001
//!     name: Level
//!     constants: [{ name: LOW, value: 1 }]
//! generics:
//!   - abstract: 300
//!     concrete: 301
//! ```

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::registry::{EnumDescriptor, TypeRegistry};
use crate::schema::ContractDecl;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEntry {
    pub code: i32,
    #[serde(flatten)]
    pub decl: ContractDecl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub code: i32,
    #[serde(flatten)]
    pub descriptor: EnumDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericEntry {
    #[serde(rename = "abstract")]
    pub abstract_code: i32,
    pub concrete: i32,
}

/// Declarative registry contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryManifest {
    pub config: CodecConfig,
    pub contracts: Vec<ContractEntry>,
    pub enums: Vec<EnumEntry>,
    pub generics: Vec<GenericEntry>,
}

impl RegistryManifest {
    /// Register every entry into `registry`.
    ///
    /// Enums and generic pairings go first so that contract resolution order
    /// never matters. Stops at the first failing entry.
    pub fn apply(&self, registry: &TypeRegistry) -> Result<(), CodecError> {
        for entry in &self.enums {
            registry.register_enum(entry.code, entry.descriptor.clone())?;
        }
        for entry in &self.generics {
            registry.register_generic(entry.abstract_code, entry.concrete)?;
        }
        for entry in &self.contracts {
            registry.register_contract(entry.code, &entry.decl)?;
        }
        tracing::info!(
            contracts = self.contracts.len(),
            enums = self.enums.len(),
            generics = self.generics.len(),
            "applied registry manifest"
        );
        Ok(())
    }
}
