//! # Type Registry
//!
//! Maps integer codes to registered types in three namespaces:
//!
//! - **contracts**: code → resolved [`ContractSchema`], cached at
//!   registration so encoding never re-resolves annotations;
//! - **enums**: code → [`EnumDescriptor`];
//! - **generics**: abstract code → set of concrete contract codes.
//!
//! Registration inserts or overwrites (last writer wins). The registry
//! is expected to be filled during startup and then [frozen](TypeRegistry::freeze);
//! after that every registration fails with [`CodecError::RegistryFrozen`].
//!
//! ## Concurrency
//!
//! State sits behind a `parking_lot::RwLock`, so registration after startup
//! is still race-free. Lookups clone `Arc` handles and release the lock
//! before the caller recurses into nested contracts.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::error::{CodecError, Namespace};
use crate::schema::{resolve_contract, ContractDecl, ContractSchema};

/// One named constant of an enumeration and its wire value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Constant name, as carried by [`Value::Enum`](crate::Value::Enum).
    pub name: String,
    /// Wire value, written as 4 big-endian bytes.
    pub value: i32,
}

/// A registered enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Display name used in error messages.
    pub name: String,
    /// Constants in declaration order.
    #[serde(default)]
    pub constants: Vec<EnumConstant>,
}

impl EnumDescriptor {
    /// An enumeration with no constants yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constants: Vec::new(),
        }
    }

    /// Append a constant.
    pub fn constant(mut self, name: impl Into<String>, value: i32) -> Self {
        self.constants.push(EnumConstant {
            name: name.into(),
            value,
        });
        self
    }

    /// Wire value of a constant.
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.constants.iter().find(|c| c.name == name).map(|c| c.value)
    }

    /// Constant carrying a wire value.
    pub fn constant_of(&self, value: i32) -> Option<&str> {
        self.constants
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.name.as_str())
    }
}

#[derive(Debug, Default)]
struct Tables {
    contracts: HashMap<i32, Arc<ContractSchema>>,
    enums: HashMap<i32, Arc<EnumDescriptor>>,
    generics: HashMap<i32, BTreeSet<i32>>,
}

/// Process-wide code → type mapping.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    tables: RwLock<Tables>,
    frozen: AtomicBool,
}

impl TypeRegistry {
    /// An empty, open registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    /// Resolve and register a contract under `code`.
    ///
    /// # Errors
    ///
    /// `SchemaError` when the declaration cannot be resolved, `RegistryFrozen`
    /// after [`freeze`](Self::freeze). Re-registering a code overwrites it.
    pub fn register_contract(
        &self,
        code: i32,
        decl: &ContractDecl,
    ) -> Result<Arc<ContractSchema>, CodecError> {
        let schema = Arc::new(resolve_contract(code, decl)?);
        let mut tables = self.tables.write();
        self.ensure_open(Namespace::Contract, code)?;
        if tables.contracts.insert(code, Arc::clone(&schema)).is_some() {
            tracing::debug!(code, name = %decl.name, "overwrote contract registration");
        } else {
            tracing::debug!(code, name = %decl.name, fields = schema.fields.len(), "registered contract");
        }
        Ok(schema)
    }

    /// Register a statically typed contract.
    pub fn register<T: Contract>(&self) -> Result<Arc<ContractSchema>, CodecError> {
        self.register_contract(T::CODE, &T::declare())
    }

    /// Register an enumeration under `code`, overwriting any earlier one.
    ///
    /// # Errors
    ///
    /// `RegistryFrozen` after [`freeze`](Self::freeze).
    pub fn register_enum(&self, code: i32, descriptor: EnumDescriptor) -> Result<(), CodecError> {
        let mut tables = self.tables.write();
        self.ensure_open(Namespace::Enum, code)?;
        tracing::debug!(code, name = %descriptor.name, constants = descriptor.constants.len(), "registered enum");
        tables.enums.insert(code, Arc::new(descriptor));
        Ok(())
    }

    /// Declare `concrete_code` as a permitted substitution for `abstract_code`.
    ///
    /// The concrete contract may be registered before or after the pairing.
    pub fn register_generic(&self, abstract_code: i32, concrete_code: i32) -> Result<(), CodecError> {
        let mut tables = self.tables.write();
        self.ensure_open(Namespace::Generic, abstract_code)?;
        tracing::debug!(abstract_code, concrete_code, "registered generic substitution");
        tables
            .generics
            .entry(abstract_code)
            .or_default()
            .insert(concrete_code);
        Ok(())
    }

    /// Resolved schema of the contract registered under `code`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` in the contract namespace.
    pub fn resolve_contract(&self, code: i32) -> Result<Arc<ContractSchema>, CodecError> {
        self.tables
            .read()
            .contracts
            .get(&code)
            .cloned()
            .ok_or_else(|| miss(Namespace::Contract, code))
    }

    /// Enumeration registered under `code`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` in the enum namespace.
    pub fn resolve_enum(&self, code: i32) -> Result<Arc<EnumDescriptor>, CodecError> {
        self.tables
            .read()
            .enums
            .get(&code)
            .cloned()
            .ok_or_else(|| miss(Namespace::Enum, code))
    }

    /// Concrete codes registered for an abstract code, ascending.
    pub fn resolve_generic_candidates(&self, abstract_code: i32) -> Result<Vec<i32>, CodecError> {
        self.tables
            .read()
            .generics
            .get(&abstract_code)
            .filter(|set| !set.is_empty())
            .map(|set| set.iter().copied().collect())
            .ok_or_else(|| miss(Namespace::Generic, abstract_code))
    }

    /// Resolve the schema a runtime value of `concrete_code` is encoded with
    /// when it fills a field declared as `abstract_code`.
    ///
    /// Accepted when `concrete_code` is a registered substitution, or when it
    /// equals `abstract_code` and that code is itself a registered contract.
    ///
    /// # Errors
    ///
    /// `NotRegistered` when `concrete_code` is not a contract at all,
    /// `SchemaMismatch` when it is one but not a substitution of `abstract_code`.
    pub fn resolve_generic_code(
        &self,
        abstract_code: i32,
        concrete_code: i32,
    ) -> Result<Arc<ContractSchema>, CodecError> {
        let tables = self.tables.read();
        let schema = tables
            .contracts
            .get(&concrete_code)
            .cloned()
            .ok_or_else(|| miss(Namespace::Contract, concrete_code))?;
        let substitutes = tables
            .generics
            .get(&abstract_code)
            .is_some_and(|set| set.contains(&concrete_code));
        if substitutes || concrete_code == abstract_code {
            Ok(schema)
        } else {
            Err(CodecError::SchemaMismatch(format!(
                "contract {concrete_code} is not a registered substitution for {abstract_code}"
            )))
        }
    }

    /// Reject all further registrations.
    pub fn freeze(&self) {
        let _guard = self.tables.write();
        self.frozen.store(true, Ordering::Release);
        tracing::debug!("type registry frozen");
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Registered contract codes, ascending.
    pub fn contract_codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.tables.read().contracts.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Checked while holding the write lock so a concurrent `freeze` cannot interleave.
    fn ensure_open(&self, namespace: Namespace, code: i32) -> Result<(), CodecError> {
        if self.is_frozen() {
            tracing::warn!(%namespace, code, "registration rejected: registry frozen");
            return Err(CodecError::RegistryFrozen { namespace, code });
        }
        Ok(())
    }
}

fn miss(namespace: Namespace, code: i32) -> CodecError {
    tracing::debug!(%namespace, code, "registry lookup miss");
    CodecError::not_registered(namespace, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDecl;
    use crate::types::PrimitiveType;

    fn decl(name: &str) -> ContractDecl {
        ContractDecl::new(name).field(
            FieldDecl::new("id")
                .order(0)
                .primitive(PrimitiveType::Int64),
        )
    }

    #[test]
    fn test_register_and_resolve_contract() {
        let reg = TypeRegistry::new();
        reg.register_contract(10, &decl("A")).unwrap();
        let schema = reg.resolve_contract(10).unwrap();
        assert_eq!(schema.code, 10);
        assert_eq!(schema.name, "A");
    }

    #[test]
    fn test_last_writer_wins() {
        let reg = TypeRegistry::new();
        reg.register_contract(10, &decl("A")).unwrap();
        reg.register_contract(10, &decl("B")).unwrap();
        assert_eq!(reg.resolve_contract(10).unwrap().name, "B");
        assert_eq!(reg.contract_codes(), vec![10]);
    }

    #[test]
    fn test_unknown_codes_not_registered() {
        let reg = TypeRegistry::new();
        assert!(matches!(
            reg.resolve_contract(9999).unwrap_err(),
            CodecError::NotRegistered { namespace: Namespace::Contract, code: 9999 }
        ));
        assert!(matches!(
            reg.resolve_enum(1).unwrap_err(),
            CodecError::NotRegistered { namespace: Namespace::Enum, .. }
        ));
        assert!(matches!(
            reg.resolve_generic_candidates(3).unwrap_err(),
            CodecError::NotRegistered { namespace: Namespace::Generic, .. }
        ));
    }

    #[test]
    fn test_schema_error_surfaces_at_registration() {
        let reg = TypeRegistry::new();
        let bad = ContractDecl::new("Bad").field(FieldDecl::new("x").annotate("order", "x"));
        assert!(matches!(
            reg.register_contract(1, &bad).unwrap_err(),
            CodecError::Schema(_)
        ));
        assert!(reg.resolve_contract(1).is_err());
    }

    #[test]
    fn test_generic_candidates_one_to_many() {
        let reg = TypeRegistry::new();
        reg.register_generic(300, 302).unwrap();
        reg.register_generic(300, 301).unwrap();
        reg.register_generic(300, 301).unwrap();
        assert_eq!(reg.resolve_generic_candidates(300).unwrap(), vec![301, 302]);
    }

    #[test]
    fn test_resolve_generic_code() {
        let reg = TypeRegistry::new();
        reg.register_contract(301, &decl("Concrete")).unwrap();
        reg.register_contract(400, &decl("Unrelated")).unwrap();
        reg.register_generic(300, 301).unwrap();

        assert_eq!(reg.resolve_generic_code(300, 301).unwrap().code, 301);
        assert!(matches!(
            reg.resolve_generic_code(300, 400).unwrap_err(),
            CodecError::SchemaMismatch(_)
        ));
        assert!(matches!(
            reg.resolve_generic_code(300, 302).unwrap_err(),
            CodecError::NotRegistered { code: 302, .. }
        ));
        // An abstract code that is itself a contract accepts its own instances.
        assert_eq!(reg.resolve_generic_code(400, 400).unwrap().code, 400);
    }

    #[test]
    fn test_freeze_rejects_registration() {
        let reg = TypeRegistry::new();
        reg.register_contract(1, &decl("A")).unwrap();
        assert!(!reg.is_frozen());
        reg.freeze();
        assert!(reg.is_frozen());
        assert!(matches!(
            reg.register_contract(2, &decl("B")).unwrap_err(),
            CodecError::RegistryFrozen { namespace: Namespace::Contract, code: 2 }
        ));
        assert!(reg.register_enum(5, EnumDescriptor::new("E")).is_err());
        assert!(reg.register_generic(5, 6).is_err());
        // Reads still work.
        assert!(reg.resolve_contract(1).is_ok());
    }

    #[test]
    fn test_enum_descriptor_lookup() {
        let d = EnumDescriptor::new("Level").constant("LOW", 1).constant("HIGH", 9);
        assert_eq!(d.value_of("HIGH"), Some(9));
        assert_eq!(d.constant_of(1), Some("LOW"));
        assert_eq!(d.value_of("MID"), None);
    }

    #[test]
    fn test_concurrent_readers_after_freeze() {
        let reg = Arc::new(TypeRegistry::new());
        reg.register_contract(1, &decl("A")).unwrap();
        reg.freeze();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || reg.resolve_contract(1).map(|s| s.code).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1);
        }
    }
}
